#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod exercise_type;
pub mod one_rep_max;
pub mod progression;
pub mod record;
mod service;
mod session;
mod user;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    BandType, BandTypeError, Exercise, ExerciseID, ExerciseRepository, Name, NameError, Property,
};
pub use exercise_type::{
    ChartType, DEFAULT_PROGRESSION_AXES, ExerciseType, ExerciseTypeError, FieldRule,
    InvalidExerciseData, ProgressionAxis, ResolveError, ResolverConfig, TypeConfig, TypeResolver,
    UnsupportedOperation, ValidationRules,
};
pub use progression::Suggestion;
pub use record::{
    PersonalRecord, PersonalRecordRepository, PrCandidate, PrCategory, RecordHistory, RecordID,
};
pub use service::{AmendWorkoutError, LogWorkoutError, Service, SuggestError, WorkoutOutcome};
pub use session::{
    BandColor, BandColorError, Distance, LoggedSet, Reps, RepsError, SetInput, Time, TimeError,
    Weight, WeightError, WorkoutSession, WorkoutSessionID, WorkoutSessionRepository,
};
pub use user::{UserID, UserPreferences};
