use std::slice::Iter;

use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{CreateError, DeleteError, ExerciseType, InvalidExerciseData, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        kind: ExerciseType,
        band_type: Option<BandType>,
        bodyweight: bool,
    ) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

/// Exercise metadata as stored: a type tag plus the two flags that refine
/// it. The tag and flags can disagree; `ExerciseType::of` applies the
/// documented precedence when resolving the effective type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub kind: ExerciseType,
    pub band_type: Option<BandType>,
    pub bodyweight: bool,
}

impl Exercise {
    /// The same exercise with its mutually exclusive flags reconciled
    /// against the type tag.
    pub fn reconciled(self) -> Result<Exercise, InvalidExerciseData> {
        let (band_type, bodyweight) = self.kind.normalize_metadata(self.band_type, self.bodyweight)?;
        Ok(Exercise {
            band_type,
            bodyweight,
            ..self
        })
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum BandType {
    Resistance,
    Assistance,
}

impl Property for BandType {
    fn iter() -> Iter<'static, BandType> {
        static BAND_TYPES: [BandType; 2] = [BandType::Resistance, BandType::Assistance];
        BAND_TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            BandType::Resistance => "Resistance",
            BandType::Assistance => "Assistance",
        }
    }
}

impl TryFrom<&str> for BandType {
    type Error = BandTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "resistance" => Ok(BandType::Resistance),
            "assistance" => Ok(BandType::Assistance),
            _ => Err(BandTypeError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BandTypeError {
    #[error("Band type must be resistance or assistance")]
    Invalid,
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.len();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
