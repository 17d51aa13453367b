use chrono::NaiveDateTime;
use log::{debug, error};

use crate::{
    CreateError, Exercise, ExerciseID, ExerciseRepository, InvalidExerciseData, PersonalRecord,
    PersonalRecordRepository, ReadError, RecordHistory, ResolveError, ResolverConfig, SetInput,
    Suggestion, Time, TypeResolver, UpdateError, UserID, WorkoutSession, WorkoutSessionRepository,
    progression, record,
};

/// Orchestrates the pure engine against the caller's persistence layer:
/// normalization, record detection and the supersession chain all happen
/// here, between repository calls.
pub struct Service<R> {
    repository: R,
    resolver: TypeResolver,
}

/// A logged or amended session together with the records it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutOutcome {
    pub session: WorkoutSession,
    pub records: Vec<PersonalRecord>,
}

#[derive(thiserror::Error, Debug)]
pub enum LogWorkoutError {
    #[error(transparent)]
    InvalidData(#[from] InvalidExerciseData),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

#[derive(thiserror::Error, Debug)]
pub enum AmendWorkoutError {
    #[error(transparent)]
    InvalidData(#[from] InvalidExerciseData),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

#[derive(thiserror::Error, Debug)]
pub enum SuggestError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            resolver: TypeResolver::new(ResolverConfig::default()),
        }
    }

    pub fn with_resolver(repository: R, resolver: TypeResolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }
}

impl<R> Service<R>
where
    R: ExerciseRepository + WorkoutSessionRepository + PersonalRecordRepository,
{
    pub async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(self.repository.read_exercises(), ReadError, "get", "exercises")
    }

    pub async fn get_workouts(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<WorkoutSession>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(user_id, exercise_id),
            ReadError,
            "get",
            "workouts"
        )
    }

    pub async fn get_records(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<PersonalRecord>, ReadError> {
        log_on_error!(
            self.repository.read_records(user_id, exercise_id),
            ReadError,
            "get",
            "records"
        )
    }

    /// Normalize and persist a newly logged session, then detect and
    /// persist the records it sets.
    ///
    /// Detection for a (user, exercise) pair must be serialized with
    /// edits and deletes for that pair; the persistence layer is expected
    /// to provide that ordering.
    pub async fn log_workout(
        &mut self,
        user_id: UserID,
        exercise_id: ExerciseID,
        performed_at: NaiveDateTime,
        duration: Option<Time>,
        sets: &[SetInput],
    ) -> Result<WorkoutOutcome, LogWorkoutError> {
        let exercise = log_on_error!(
            self.repository.read_exercise(exercise_id),
            ReadError,
            "get",
            "exercise"
        )?;
        let exercise_type = self.resolver.resolve(&exercise)?;

        let sets = sets
            .iter()
            .map(|set| exercise_type.normalize_set(set))
            .collect::<Result<Vec<_>, _>>()?;

        let history = log_on_error!(
            self.repository.read_workouts(user_id, exercise_id),
            ReadError,
            "get",
            "workouts"
        )?;
        let session = log_on_error!(
            self.repository
                .create_workout(user_id, exercise_id, performed_at, duration, sets),
            CreateError,
            "create",
            "workout"
        )?;

        let prior: Vec<&WorkoutSession> = history.iter().collect();
        let new_bests = record::detect(exercise_type, &session, &prior);

        let mut records = RecordHistory::new(log_on_error!(
            self.repository.read_records(user_id, exercise_id),
            ReadError,
            "get",
            "records"
        )?);
        let mut created = Vec::new();
        for candidate in &new_bests {
            let record = records.confirm(&session, candidate);
            created.push(log_on_error!(
                self.repository.create_record(record),
                CreateError,
                "create",
                "record"
            )?);
        }

        Ok(WorkoutOutcome {
            session,
            records: created,
        })
    }

    /// Replace an edited session and rebuild the full record chain of its
    /// (user, exercise) pair. Rebuilding from scratch keeps every
    /// supersession link consistent with the edited history.
    pub async fn amend_workout(
        &mut self,
        workout: WorkoutSession,
    ) -> Result<WorkoutOutcome, AmendWorkoutError> {
        let exercise = log_on_error!(
            self.repository.read_exercise(workout.exercise_id),
            ReadError,
            "get",
            "exercise"
        )?;
        let exercise_type = self.resolver.resolve(&exercise)?;

        let sets = workout
            .sets
            .iter()
            .map(|set| exercise_type.normalize_set(&SetInput::from(set)))
            .collect::<Result<Vec<_>, _>>()?;
        let workout = WorkoutSession { sets, ..workout };
        let user_id = workout.user_id;
        let exercise_id = workout.exercise_id;

        let session = log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )?;

        let sessions = log_on_error!(
            self.repository.read_workouts(user_id, exercise_id),
            ReadError,
            "get",
            "workouts"
        )?;
        let refs: Vec<&WorkoutSession> = sessions.iter().collect();
        let history = RecordHistory::rebuild(exercise_type, &refs);

        let records = log_on_error!(
            self.repository
                .replace_records(user_id, exercise_id, history.into_records()),
            UpdateError,
            "replace",
            "records"
        )?;

        Ok(WorkoutOutcome { session, records })
    }

    /// Next-session target for an exercise, derived from the user's most
    /// recent session. `None` when no suggestion applies.
    pub async fn suggest_next(
        &mut self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Option<Suggestion>, SuggestError> {
        let exercise = log_on_error!(
            self.repository.read_exercise(exercise_id),
            ReadError,
            "get",
            "exercise"
        )?;
        let exercise_type = self.resolver.resolve(&exercise)?;

        let workouts = log_on_error!(
            self.repository.read_workouts(user_id, exercise_id),
            ReadError,
            "get",
            "workouts"
        )?;

        Ok(workouts
            .iter()
            .max_by_key(|workout| workout.performed_at)
            .and_then(|last| progression::suggest(exercise_type, last)))
    }
}
