use std::slice::Iter;

use chrono::NaiveDateTime;
use derive_more::{Deref, Display, Into};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, Property, ReadError, UpdateError, UserID,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionRepository {
    async fn read_workouts(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn create_workout(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        performed_at: NaiveDateTime,
        duration: Option<Time>,
        sets: Vec<LoggedSet>,
    ) -> Result<WorkoutSession, CreateError>;
    async fn replace_workout(&self, workout: WorkoutSession)
    -> Result<WorkoutSession, UpdateError>;
    async fn delete_workout(&self, id: WorkoutSessionID)
    -> Result<WorkoutSessionID, DeleteError>;
}

/// A single logged exercise instance: one or more sets tied to a user,
/// an exercise and a point in time. Sessions are append-only as far as
/// record detection is concerned; edits go through chain recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: WorkoutSessionID,
    pub user_id: UserID,
    pub exercise_id: ExerciseID,
    pub performed_at: NaiveDateTime,
    pub duration: Option<Time>,
    pub sets: Vec<LoggedSet>,
}

impl WorkoutSession {
    /// Total work of the session (Σ weight × reps over all sets).
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(LoggedSet::volume).sum()
    }

    #[must_use]
    pub fn top_weight(&self) -> Option<Weight> {
        self.sets
            .iter()
            .map(|s| s.weight)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    #[must_use]
    pub fn max_reps(&self) -> Option<Reps> {
        self.sets.iter().filter_map(|s| s.reps).max()
    }

    #[must_use]
    pub fn min_reps(&self) -> Option<Reps> {
        self.sets.iter().filter_map(|s| s.reps).min()
    }

    #[must_use]
    pub fn max_hold(&self) -> Option<Time> {
        self.sets.iter().filter_map(|s| s.time).max()
    }

    #[must_use]
    pub fn max_distance(&self) -> Option<Distance> {
        self.sets.iter().filter_map(LoggedSet::distance).max()
    }

    /// Band color of the most recent set carrying one.
    #[must_use]
    pub fn band_color(&self) -> Option<BandColor> {
        self.sets.iter().rev().find_map(|s| s.band_color)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSessionID(Uuid);

impl WorkoutSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// One unit of work within a session, after type-specific normalization.
/// Only the fields relevant to the owning exercise's type carry meaningful
/// values; the rest hold type-defined defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedSet {
    pub weight: Weight,
    pub reps: Option<Reps>,
    pub time: Option<Time>,
    pub band_color: Option<BandColor>,
}

impl LoggedSet {
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.reps
            .map_or(0.0, |reps| f64::from(self.weight) * f64::from(u32::from(reps)))
    }

    /// Distance work stores meters in the reps field.
    #[must_use]
    pub fn distance(&self) -> Option<Distance> {
        self.reps.map(|reps| Distance::from(u32::from(reps)))
    }
}

impl From<&LoggedSet> for SetInput {
    fn from(value: &LoggedSet) -> Self {
        SetInput {
            weight: Some(value.weight.into()),
            reps: value.reps.map(u32::from),
            time: value.time.map(u32::from),
            band_color: value.band_color,
        }
    }
}

/// Raw set data as logged, before any type-specific normalization.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetInput {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub time: Option<u32>,
    pub band_color: Option<BandColor>,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);
    pub const MAX_LBS: f64 = 2000.0;

    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() || !(0.0..=Self::MAX_LBS).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Weight increased by the given amount, clamped to the valid range.
    #[must_use]
    pub fn adding(self, lbs: f64) -> Weight {
        Weight((self.0 + lbs).clamp(0.0, Self::MAX_LBS))
    }

    /// Value in tenths of a pound, usable as an exact grouping key.
    #[must_use]
    pub fn tenths(self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (self.0 * 10.0).round() as u64
        }
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f64>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0 to 2000 lbs")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub const ONE: Reps = Reps(1);

    /// The reps field doubles as a meter count for distance work, so the
    /// upper bound matches the longest supported distance.
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value > 50_000 {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 50000")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl Time {
    pub fn new(value: u32) -> Result<Self, TimeError> {
        if value > 3600 {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl From<Time> for i64 {
    fn from(value: Time) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be in the range 0 to 3600 s")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

#[derive(Deref, Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Distance(u32);

impl From<u32> for Distance {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BandColor {
    Red,
    Blue,
    Green,
}

impl BandColor {
    /// Next resistance tier up, if any.
    #[must_use]
    pub fn heavier(self) -> Option<BandColor> {
        match self {
            BandColor::Red => Some(BandColor::Blue),
            BandColor::Blue => Some(BandColor::Green),
            BandColor::Green => None,
        }
    }

    /// Next resistance tier down, if any.
    #[must_use]
    pub fn lighter(self) -> Option<BandColor> {
        match self {
            BandColor::Green => Some(BandColor::Blue),
            BandColor::Blue => Some(BandColor::Red),
            BandColor::Red => None,
        }
    }
}

impl Property for BandColor {
    fn iter() -> Iter<'static, BandColor> {
        static BAND_COLORS: [BandColor; 3] = [BandColor::Red, BandColor::Blue, BandColor::Green];
        BAND_COLORS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            BandColor::Red => "Red",
            BandColor::Blue => "Blue",
            BandColor::Green => "Green",
        }
    }
}

impl TryFrom<&str> for BandColor {
    type Error = BandColorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "red" => Ok(BandColor::Red),
            "blue" => Ok(BandColor::Blue),
            "green" => Ok(BandColor::Green),
            _ => Err(BandColorError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BandColorError {
    #[error("Band color must be red, blue or green")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn set(weight: f64, reps: Option<u32>, time: Option<u32>) -> LoggedSet {
        LoggedSet {
            weight: Weight::new(weight).unwrap(),
            reps: reps.map(|r| Reps::new(r).unwrap()),
            time: time.map(|t| Time::new(t).unwrap()),
            band_color: None,
        }
    }

    static SESSION: std::sync::LazyLock<WorkoutSession> =
        std::sync::LazyLock::new(|| WorkoutSession {
            id: 1.into(),
            user_id: 2.into(),
            exercise_id: 3.into(),
            performed_at: NaiveDate::from_ymd_opt(2024, 5, 4)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            duration: Some(Time::new(1800).unwrap()),
            sets: vec![
                set(135.0, Some(10), None),
                set(155.0, Some(8), None),
                set(185.0, Some(5), None),
            ],
        });

    #[test]
    fn test_workout_session_volume() {
        assert_eq!(SESSION.volume(), 135.0 * 10.0 + 155.0 * 8.0 + 185.0 * 5.0);
    }

    #[test]
    fn test_workout_session_aggregates() {
        assert_eq!(SESSION.top_weight(), Some(Weight::new(185.0).unwrap()));
        assert_eq!(SESSION.max_reps(), Some(Reps::new(10).unwrap()));
        assert_eq!(SESSION.min_reps(), Some(Reps::new(5).unwrap()));
        assert_eq!(SESSION.max_hold(), None);
        assert_eq!(SESSION.band_color(), None);
    }

    #[test]
    fn test_workout_session_empty_aggregates() {
        let mut session = SESSION.clone();
        session.sets.clear();
        assert_eq!(session.volume(), 0.0);
        assert_eq!(session.top_weight(), None);
        assert_eq!(session.max_reps(), None);
        assert_eq!(session.max_distance(), None);
    }

    #[rstest]
    #[case(0.0, Ok(Weight(0.0)))]
    #[case(100.5, Ok(Weight(100.5)))]
    #[case(2000.0, Ok(Weight(2000.0)))]
    #[case(-0.1, Err(WeightError::OutOfRange))]
    #[case(2000.1, Err(WeightError::OutOfRange))]
    #[case(f64::NAN, Err(WeightError::OutOfRange))]
    fn test_weight_new(#[case] value: f64, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::new(value), expected);
    }

    #[rstest]
    #[case(1995.0, 10.0, 2000.0)]
    #[case(185.0, 5.0, 190.0)]
    fn test_weight_adding(#[case] value: f64, #[case] lbs: f64, #[case] expected: f64) {
        assert_eq!(
            Weight::new(value).unwrap().adding(lbs),
            Weight::new(expected).unwrap()
        );
    }

    #[rstest]
    #[case(0, Ok(Reps(0)))]
    #[case(50_000, Ok(Reps(50_000)))]
    #[case(50_001, Err(RepsError::OutOfRange))]
    fn test_reps_new(#[case] value: u32, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::new(value), expected);
    }

    #[rstest]
    #[case(0, Ok(Time(0)))]
    #[case(3600, Ok(Time(3600)))]
    #[case(3601, Err(TimeError::OutOfRange))]
    fn test_time_new(#[case] value: u32, #[case] expected: Result<Time, TimeError>) {
        assert_eq!(Time::new(value), expected);
    }

    #[rstest]
    #[case("red", Ok(BandColor::Red))]
    #[case("blue", Ok(BandColor::Blue))]
    #[case("green", Ok(BandColor::Green))]
    #[case("purple", Err(BandColorError::Invalid))]
    fn test_band_color_try_from(
        #[case] value: &str,
        #[case] expected: Result<BandColor, BandColorError>,
    ) {
        assert_eq!(BandColor::try_from(value), expected);
    }

    #[rstest]
    #[case(BandColor::Red, Some(BandColor::Blue), None)]
    #[case(BandColor::Blue, Some(BandColor::Green), Some(BandColor::Red))]
    #[case(BandColor::Green, None, Some(BandColor::Blue))]
    fn test_band_color_tiers(
        #[case] color: BandColor,
        #[case] heavier: Option<BandColor>,
        #[case] lighter: Option<BandColor>,
    ) {
        assert_eq!(color.heavier(), heavier);
        assert_eq!(color.lighter(), lighter);
    }
}
