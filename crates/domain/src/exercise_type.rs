use std::{collections::BTreeMap, slice::Iter};

use crate::{
    BandType, Exercise, ExerciseID, LoggedSet, Property, Reps, SetInput, Time, UserPreferences,
    Weight, WorkoutSession, one_rep_max,
};

/// The closed set of exercise behaviors. Every operation that varies by
/// type matches exhaustively on this enum, so an unsupported capability
/// is visible at the call site instead of at runtime dispatch.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ExerciseType {
    Regular,
    BandedResistance,
    BandedAssistance,
    Bodyweight,
    Cardio,
    StaticHold,
}

impl Property for ExerciseType {
    fn iter() -> Iter<'static, ExerciseType> {
        static EXERCISE_TYPES: [ExerciseType; 6] = [
            ExerciseType::Regular,
            ExerciseType::BandedResistance,
            ExerciseType::BandedAssistance,
            ExerciseType::Bodyweight,
            ExerciseType::Cardio,
            ExerciseType::StaticHold,
        ];
        EXERCISE_TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ExerciseType::Regular => "Regular",
            ExerciseType::BandedResistance => "Banded Resistance",
            ExerciseType::BandedAssistance => "Banded Assistance",
            ExerciseType::Bodyweight => "Bodyweight",
            ExerciseType::Cardio => "Cardio",
            ExerciseType::StaticHold => "Static Hold",
        }
    }
}

impl ExerciseType {
    /// Stable identifier used in stored exercise records.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ExerciseType::Regular => "regular",
            ExerciseType::BandedResistance => "banded_resistance",
            ExerciseType::BandedAssistance => "banded_assistance",
            ExerciseType::Bodyweight => "bodyweight",
            ExerciseType::Cardio => "cardio",
            ExerciseType::StaticHold => "static_hold",
        }
    }

    /// Effective type of an exercise. The band subtype takes precedence
    /// over the bodyweight flag even if both are set; a bare bodyweight
    /// tag without the flag resolves to Regular. Both behaviors are
    /// deliberate and pinned by tests.
    pub fn of(exercise: &Exercise) -> Result<ExerciseType, ResolveError> {
        if let Some(band_type) = exercise.band_type {
            return Ok(match band_type {
                BandType::Resistance => ExerciseType::BandedResistance,
                BandType::Assistance => ExerciseType::BandedAssistance,
            });
        }

        if exercise.bodyweight {
            return Ok(ExerciseType::Bodyweight);
        }

        match exercise.kind {
            ExerciseType::Cardio => Ok(ExerciseType::Cardio),
            ExerciseType::StaticHold => Ok(ExerciseType::StaticHold),
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => {
                Err(ResolveError::MissingBandType {
                    exercise_type: exercise.kind.name(),
                })
            }
            ExerciseType::Regular | ExerciseType::Bodyweight => Ok(ExerciseType::Regular),
        }
    }

    #[must_use]
    pub fn supports_one_rep_max(self) -> bool {
        matches!(self, ExerciseType::Regular | ExerciseType::Bodyweight)
    }

    /// Field-level constraints for this type. Preferences only influence
    /// whether bodyweight exercises require an added-weight entry.
    #[must_use]
    pub fn validation_rules(self, prefs: &UserPreferences) -> ValidationRules {
        match self {
            ExerciseType::Regular => ValidationRules {
                weight: Some(WEIGHT_RULE),
                reps: Some(REPS_RULE),
                time: None,
                band_color: false,
            },
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => ValidationRules {
                weight: None,
                reps: Some(REPS_RULE),
                time: None,
                band_color: true,
            },
            ExerciseType::Bodyweight => ValidationRules {
                weight: Some(if prefs.show_extra_weight {
                    WEIGHT_RULE
                } else {
                    OPTIONAL_WEIGHT_RULE
                }),
                reps: Some(REPS_RULE),
                time: None,
                band_color: false,
            },
            ExerciseType::Cardio => ValidationRules {
                weight: None,
                reps: Some(DISTANCE_RULE),
                time: None,
                band_color: false,
            },
            ExerciseType::StaticHold => ValidationRules {
                weight: Some(OPTIONAL_WEIGHT_RULE),
                reps: None,
                time: Some(HOLD_RULE),
                band_color: false,
            },
        }
    }

    /// Coerce raw set data into the normalized shape for this type.
    ///
    /// Fields irrelevant to the type are forced to their defaults; missing
    /// or out-of-range required fields fail with a field-specific error.
    pub fn normalize_set(self, input: &SetInput) -> Result<LoggedSet, InvalidExerciseData> {
        let exercise_type = self.name();
        match self {
            ExerciseType::Regular => {
                let weight = require_weight(exercise_type, WEIGHT_RULE, input.weight)?;
                let reps = require_reps(exercise_type, "reps", REPS_RULE, input.reps)?;
                Ok(LoggedSet {
                    weight,
                    reps: Some(reps),
                    time: None,
                    band_color: None,
                })
            }
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => {
                let band_color = input.band_color.ok_or(InvalidExerciseData::MissingField {
                    exercise_type,
                    field: "band_color",
                })?;
                let reps = require_reps(exercise_type, "reps", REPS_RULE, input.reps)?;
                Ok(LoggedSet {
                    weight: Weight::ZERO,
                    reps: Some(reps),
                    time: None,
                    band_color: Some(band_color),
                })
            }
            ExerciseType::Bodyweight => {
                let weight = match input.weight {
                    None => Weight::ZERO,
                    Some(value) => checked_weight(exercise_type, WEIGHT_RULE, value)?,
                };
                let reps = require_reps(exercise_type, "reps", REPS_RULE, input.reps)?;
                Ok(LoggedSet {
                    weight,
                    reps: Some(reps),
                    time: None,
                    band_color: None,
                })
            }
            ExerciseType::Cardio => {
                let distance = require_reps(exercise_type, "distance", DISTANCE_RULE, input.reps)?;
                Ok(LoggedSet {
                    weight: Weight::ZERO,
                    reps: Some(distance),
                    time: None,
                    band_color: None,
                })
            }
            ExerciseType::StaticHold => {
                let time = require_time(exercise_type, "time", HOLD_RULE, input.time)?;
                let weight = match input.weight {
                    None => Weight::ZERO,
                    Some(value) if value < 0.0 => {
                        return Err(InvalidExerciseData::NegativeWeight { exercise_type });
                    }
                    Some(value) => checked_weight(exercise_type, WEIGHT_RULE, value)?,
                };
                // A hold is one rep.
                Ok(LoggedSet {
                    weight,
                    reps: Some(Reps::ONE),
                    time: Some(time),
                    band_color: None,
                })
            }
        }
    }

    /// Reconcile the mutually exclusive exercise-level flags for this tag.
    ///
    /// A band subtype forces the bodyweight flag off; the bodyweight flag
    /// forces the band subtype out; Regular and Cardio force both flags to
    /// the plain state. Banded tags without a subtype cannot be reconciled.
    pub fn normalize_metadata(
        self,
        band_type: Option<BandType>,
        bodyweight: bool,
    ) -> Result<(Option<BandType>, bool), InvalidExerciseData> {
        match self {
            ExerciseType::Regular | ExerciseType::Cardio => Ok((None, false)),
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => match band_type {
                Some(band_type) => Ok((Some(band_type), false)),
                None => Err(InvalidExerciseData::MissingField {
                    exercise_type: self.name(),
                    field: "band_type",
                }),
            },
            ExerciseType::Bodyweight => Ok((None, true)),
            ExerciseType::StaticHold => {
                if band_type.is_some() {
                    Ok((band_type, false))
                } else {
                    Ok((None, bodyweight))
                }
            }
        }
    }

    /// Type-specific rendering of a set's effort.
    #[must_use]
    pub fn format_weight(self, input: &SetInput) -> String {
        match self {
            ExerciseType::Regular => format!("{} lbs", displayable_weight(input.weight)),
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => {
                match input.band_color {
                    Some(color) => format!("Band: {}", color.name()),
                    None => String::from("Band: N/A"),
                }
            }
            ExerciseType::Bodyweight => {
                let extra = displayable_weight(input.weight);
                if extra > 0.0 {
                    format!("Bodyweight +{extra} lbs")
                } else {
                    String::from("Bodyweight")
                }
            }
            ExerciseType::Cardio => format_distance(input.reps.unwrap_or(0)),
            ExerciseType::StaticHold => {
                let mut formatted = format_hold(input.time.unwrap_or(0));
                let extra = displayable_weight(input.weight);
                if extra > 0.0 {
                    formatted.push_str(&format!(" +{extra} lbs"));
                }
                formatted
            }
        }
    }

    /// Best one-rep-max estimate of the session, formatted for display.
    ///
    /// Empty when no set yields an estimate. Types without one-rep-max
    /// support fail; callers are expected to check the capability first.
    pub fn format_one_rep_max(
        self,
        session: &WorkoutSession,
    ) -> Result<String, UnsupportedOperation> {
        if !self.supports_one_rep_max() {
            return Err(UnsupportedOperation {
                exercise_type: self.name(),
                operation: "one-rep-max estimation",
            });
        }

        let best = session
            .sets
            .iter()
            .map(|set| {
                one_rep_max::estimate(f64::from(set.weight), set.reps.map_or(0, u32::from))
            })
            .fold(0.0, f64::max);

        if best > 0.0 {
            Ok(format!("{best:.1} lbs"))
        } else {
            Ok(String::new())
        }
    }

    #[must_use]
    pub fn chart_type(self) -> ChartType {
        match self {
            ExerciseType::Regular | ExerciseType::Bodyweight => ChartType::Weight,
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => ChartType::Band,
            ExerciseType::Cardio => ChartType::Distance,
            ExerciseType::StaticHold => ChartType::Duration,
        }
    }

    #[must_use]
    pub fn progression_axes(self) -> &'static [ProgressionAxis] {
        match self {
            ExerciseType::Regular => &[ProgressionAxis::Linear],
            ExerciseType::Bodyweight => &[ProgressionAxis::Linear, ProgressionAxis::Reps],
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => {
                &[ProgressionAxis::Band, ProgressionAxis::Reps]
            }
            ExerciseType::Cardio => &[ProgressionAxis::Distance, ProgressionAxis::Rounds],
            ExerciseType::StaticHold => &[ProgressionAxis::Duration],
        }
    }

    /// Resolved configuration of this type, for diagnostics.
    #[must_use]
    pub fn config(self) -> TypeConfig {
        TypeConfig {
            name: self.name(),
            tag: self.tag(),
            supports_one_rep_max: self.supports_one_rep_max(),
            rules: self.validation_rules(&UserPreferences::default()),
            chart: self.chart_type(),
            axes: self.progression_axes(),
        }
    }
}

impl TryFrom<&str> for ExerciseType {
    type Error = ExerciseTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ExerciseType::iter()
            .find(|t| t.tag() == value)
            .copied()
            .ok_or(ExerciseTypeError::Invalid)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseTypeError {
    #[error("Unknown exercise type tag")]
    Invalid,
}

/// Range constraint on a single numeric input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    pub min: u32,
    pub max: u32,
}

/// Field-level constraints of an exercise type. `None` means the field
/// is forced to its default rather than validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub weight: Option<FieldRule>,
    pub reps: Option<FieldRule>,
    pub time: Option<FieldRule>,
    pub band_color: bool,
}

const WEIGHT_RULE: FieldRule = FieldRule {
    required: true,
    min: 0,
    max: 2000,
};

const OPTIONAL_WEIGHT_RULE: FieldRule = FieldRule {
    required: false,
    min: 0,
    max: 2000,
};

const REPS_RULE: FieldRule = FieldRule {
    required: true,
    min: 1,
    max: 100,
};

const DISTANCE_RULE: FieldRule = FieldRule {
    required: true,
    min: 50,
    max: 50_000,
};

const HOLD_RULE: FieldRule = FieldRule {
    required: true,
    min: 1,
    max: 300,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    #[default]
    Default,
    Weight,
    Band,
    Distance,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionAxis {
    Linear,
    Reps,
    Band,
    Distance,
    Rounds,
    Duration,
}

/// Trend visualizations valid for types without an explicit configuration.
pub const DEFAULT_PROGRESSION_AXES: &[ProgressionAxis] = &[ProgressionAxis::Linear];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeConfig {
    pub name: &'static str,
    pub tag: &'static str,
    pub supports_one_rep_max: bool,
    pub rules: ValidationRules,
    pub chart: ChartType,
    pub axes: &'static [ProgressionAxis],
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidExerciseData {
    #[error("{field} is required for {exercise_type} exercises")]
    MissingField {
        exercise_type: &'static str,
        field: &'static str,
    },
    #[error("{field} must be between {min} and {max} for {exercise_type} exercises")]
    OutOfRange {
        exercise_type: &'static str,
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("weight must not be negative for {exercise_type} exercises")]
    NegativeWeight { exercise_type: &'static str },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{exercise_type} exercises do not support {operation}")]
pub struct UnsupportedOperation {
    pub exercise_type: &'static str,
    pub operation: &'static str,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("exercise is tagged {exercise_type} but has no band type")]
    MissingBandType { exercise_type: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub caching: bool,
    /// Fall back to the Regular type instead of failing resolution.
    pub fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            caching: true,
            fallback: false,
        }
    }
}

/// Maps exercise metadata to its effective type, memoizing per exercise
/// when caching is enabled. The cache key includes every type-determining
/// field, so metadata edits are picked up without an explicit clear.
/// Not synchronized; each worker owns its own resolver.
#[derive(Debug, Default)]
pub struct TypeResolver {
    config: ResolverConfig,
    cache: BTreeMap<CacheKey, ExerciseType>,
}

type CacheKey = (ExerciseID, ExerciseType, Option<BandType>, bool);

impl TypeResolver {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: BTreeMap::new(),
        }
    }

    pub fn resolve(&mut self, exercise: &Exercise) -> Result<ExerciseType, ResolveError> {
        let key = (
            exercise.id,
            exercise.kind,
            exercise.band_type,
            exercise.bodyweight,
        );

        if self.config.caching {
            if let Some(resolved) = self.cache.get(&key) {
                return Ok(*resolved);
            }
        }

        let resolved = match ExerciseType::of(exercise) {
            Ok(resolved) => resolved,
            Err(_) if self.config.fallback => ExerciseType::Regular,
            Err(err) => return Err(err),
        };

        if self.config.caching {
            self.cache.insert(key, resolved);
        }

        Ok(resolved)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn require_weight(
    exercise_type: &'static str,
    rule: FieldRule,
    value: Option<f64>,
) -> Result<Weight, InvalidExerciseData> {
    let Some(value) = value else {
        return Err(InvalidExerciseData::MissingField {
            exercise_type,
            field: "weight",
        });
    };
    checked_weight(exercise_type, rule, value)
}

fn checked_weight(
    exercise_type: &'static str,
    rule: FieldRule,
    value: f64,
) -> Result<Weight, InvalidExerciseData> {
    let out_of_range = InvalidExerciseData::OutOfRange {
        exercise_type,
        field: "weight",
        min: rule.min,
        max: rule.max,
    };

    if !value.is_finite() || value < f64::from(rule.min) || value > f64::from(rule.max) {
        return Err(out_of_range);
    }

    Weight::new(value).map_err(|_| out_of_range)
}

fn require_reps(
    exercise_type: &'static str,
    field: &'static str,
    rule: FieldRule,
    value: Option<u32>,
) -> Result<Reps, InvalidExerciseData> {
    let Some(value) = value else {
        return Err(InvalidExerciseData::MissingField {
            exercise_type,
            field,
        });
    };

    let out_of_range = InvalidExerciseData::OutOfRange {
        exercise_type,
        field,
        min: rule.min,
        max: rule.max,
    };

    if !(rule.min..=rule.max).contains(&value) {
        return Err(out_of_range);
    }

    Reps::new(value).map_err(|_| out_of_range)
}

fn require_time(
    exercise_type: &'static str,
    field: &'static str,
    rule: FieldRule,
    value: Option<u32>,
) -> Result<Time, InvalidExerciseData> {
    let Some(value) = value else {
        return Err(InvalidExerciseData::MissingField {
            exercise_type,
            field,
        });
    };

    let out_of_range = InvalidExerciseData::OutOfRange {
        exercise_type,
        field,
        min: rule.min,
        max: rule.max,
    };

    if !(rule.min..=rule.max).contains(&value) {
        return Err(out_of_range);
    }

    Time::new(value).map_err(|_| out_of_range)
}

/// Display value of a possibly missing or malformed weight entry.
fn displayable_weight(value: Option<f64>) -> f64 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

pub(crate) fn format_distance(meters: u32) -> String {
    if meters < 1000 {
        format!("{meters}m")
    } else if meters % 1000 == 0 {
        format!("{}km", meters / 1000)
    } else {
        format!("{:.1}km", f64::from(meters) / 1000.0)
    }
}

pub(crate) fn format_hold(seconds: u32) -> String {
    if seconds < 60 {
        format!("{seconds}s hold")
    } else if seconds % 60 == 0 {
        format!("{}m hold", seconds / 60)
    } else {
        format!("{}m {}s hold", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{BandColor, Name};

    use super::*;

    fn exercise(
        kind: ExerciseType,
        band_type: Option<BandType>,
        bodyweight: bool,
    ) -> Exercise {
        Exercise {
            id: 1.into(),
            name: Name::new("A").unwrap(),
            kind,
            band_type,
            bodyweight,
        }
    }

    fn session_of(sets: Vec<LoggedSet>) -> WorkoutSession {
        WorkoutSession {
            id: 1.into(),
            user_id: 2.into(),
            exercise_id: 3.into(),
            performed_at: NaiveDateTime::default(),
            duration: None,
            sets,
        }
    }

    fn lift(weight: f64, reps: u32) -> LoggedSet {
        LoggedSet {
            weight: Weight::new(weight).unwrap(),
            reps: Some(Reps::new(reps).unwrap()),
            time: None,
            band_color: None,
        }
    }

    #[rstest]
    #[case::band_type_wins_over_bodyweight_flag(
        exercise(ExerciseType::Bodyweight, Some(BandType::Resistance), true),
        Ok(ExerciseType::BandedResistance)
    )]
    #[case::assistance_band(
        exercise(ExerciseType::Regular, Some(BandType::Assistance), false),
        Ok(ExerciseType::BandedAssistance)
    )]
    #[case::bodyweight_flag(
        exercise(ExerciseType::Regular, None, true),
        Ok(ExerciseType::Bodyweight)
    )]
    #[case::cardio_tag(
        exercise(ExerciseType::Cardio, None, false),
        Ok(ExerciseType::Cardio)
    )]
    #[case::static_hold_tag(
        exercise(ExerciseType::StaticHold, None, false),
        Ok(ExerciseType::StaticHold)
    )]
    #[case::bodyweight_tag_without_flag(
        exercise(ExerciseType::Bodyweight, None, false),
        Ok(ExerciseType::Regular)
    )]
    #[case::banded_tag_without_band_type(
        exercise(ExerciseType::BandedResistance, None, false),
        Err(ResolveError::MissingBandType { exercise_type: "Banded Resistance" })
    )]
    fn test_exercise_type_of(
        #[case] exercise: Exercise,
        #[case] expected: Result<ExerciseType, ResolveError>,
    ) {
        assert_eq!(ExerciseType::of(&exercise), expected);
    }

    #[test]
    fn test_resolver_caches_and_clears() {
        let mut resolver = TypeResolver::new(ResolverConfig::default());
        let e = exercise(ExerciseType::Regular, None, false);
        assert_eq!(resolver.resolve(&e), Ok(ExerciseType::Regular));
        assert_eq!(resolver.resolve(&e), Ok(ExerciseType::Regular));
        assert_eq!(resolver.cached(), 1);

        // A metadata change is a different cache key, not a stale hit.
        let mut banded = e.clone();
        banded.band_type = Some(BandType::Resistance);
        assert_eq!(resolver.resolve(&banded), Ok(ExerciseType::BandedResistance));
        assert_eq!(resolver.cached(), 2);

        resolver.clear_cache();
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_resolver_without_caching() {
        let mut resolver = TypeResolver::new(ResolverConfig {
            caching: false,
            fallback: false,
        });
        let e = exercise(ExerciseType::Cardio, None, false);
        assert_eq!(resolver.resolve(&e), Ok(ExerciseType::Cardio));
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_resolver_fallback() {
        let broken = exercise(ExerciseType::BandedAssistance, None, false);

        let mut strict = TypeResolver::new(ResolverConfig::default());
        assert!(strict.resolve(&broken).is_err());

        let mut lenient = TypeResolver::new(ResolverConfig {
            caching: true,
            fallback: true,
        });
        assert_eq!(lenient.resolve(&broken), Ok(ExerciseType::Regular));
    }

    #[rstest]
    #[case(ExerciseType::Regular, true)]
    #[case(ExerciseType::Bodyweight, true)]
    #[case(ExerciseType::BandedResistance, false)]
    #[case(ExerciseType::BandedAssistance, false)]
    #[case(ExerciseType::Cardio, false)]
    #[case(ExerciseType::StaticHold, false)]
    fn test_supports_one_rep_max(#[case] exercise_type: ExerciseType, #[case] expected: bool) {
        assert_eq!(exercise_type.supports_one_rep_max(), expected);
    }

    #[test]
    fn test_normalize_set_regular() {
        let set = ExerciseType::Regular
            .normalize_set(&SetInput {
                weight: Some(315.0),
                reps: Some(3),
                time: Some(10),
                band_color: Some(BandColor::Red),
            })
            .unwrap();
        assert_eq!(set.weight, Weight::new(315.0).unwrap());
        assert_eq!(set.reps, Some(Reps::new(3).unwrap()));
        assert_eq!(set.time, None);
        assert_eq!(set.band_color, None);
    }

    #[rstest]
    #[case::missing_weight(
        SetInput { reps: Some(5), ..SetInput::default() },
        InvalidExerciseData::MissingField { exercise_type: "Regular", field: "weight" }
    )]
    #[case::missing_reps(
        SetInput { weight: Some(100.0), ..SetInput::default() },
        InvalidExerciseData::MissingField { exercise_type: "Regular", field: "reps" }
    )]
    #[case::negative_weight(
        SetInput { weight: Some(-10.0), reps: Some(5), ..SetInput::default() },
        InvalidExerciseData::OutOfRange { exercise_type: "Regular", field: "weight", min: 0, max: 2000 }
    )]
    #[case::excessive_reps(
        SetInput { weight: Some(100.0), reps: Some(101), ..SetInput::default() },
        InvalidExerciseData::OutOfRange { exercise_type: "Regular", field: "reps", min: 1, max: 100 }
    )]
    fn test_normalize_set_regular_invalid(
        #[case] input: SetInput,
        #[case] expected: InvalidExerciseData,
    ) {
        assert_eq!(ExerciseType::Regular.normalize_set(&input), Err(expected));
    }

    #[test]
    fn test_normalize_set_banded_zeroes_weight() {
        for band in [ExerciseType::BandedResistance, ExerciseType::BandedAssistance] {
            let set = band
                .normalize_set(&SetInput {
                    weight: Some(135.0),
                    reps: Some(12),
                    time: None,
                    band_color: Some(BandColor::Blue),
                })
                .unwrap();
            assert_eq!(set.weight, Weight::ZERO);
            assert_eq!(set.band_color, Some(BandColor::Blue));
        }
    }

    #[test]
    fn test_normalize_set_banded_requires_color() {
        assert_eq!(
            ExerciseType::BandedResistance.normalize_set(&SetInput {
                reps: Some(10),
                ..SetInput::default()
            }),
            Err(InvalidExerciseData::MissingField {
                exercise_type: "Banded Resistance",
                field: "band_color"
            })
        );
    }

    #[test]
    fn test_normalize_set_bodyweight_nulls_band_color() {
        let set = ExerciseType::Bodyweight
            .normalize_set(&SetInput {
                weight: None,
                reps: Some(8),
                time: None,
                band_color: Some(BandColor::Green),
            })
            .unwrap();
        assert_eq!(set.weight, Weight::ZERO);
        assert_eq!(set.band_color, None);
    }

    #[rstest]
    #[case::lower_bound(50, true)]
    #[case::typical(500, true)]
    #[case::upper_bound(50_000, true)]
    #[case::below_lower_bound(49, false)]
    #[case::above_upper_bound(50_001, false)]
    fn test_normalize_set_cardio_distance_bounds(#[case] distance: u32, #[case] valid: bool) {
        let result = ExerciseType::Cardio.normalize_set(&SetInput {
            weight: Some(20.0),
            reps: Some(distance),
            time: None,
            band_color: None,
        });
        if valid {
            let set = result.unwrap();
            assert_eq!(set.weight, Weight::ZERO);
            assert_eq!(set.reps, Some(Reps::new(distance).unwrap()));
            assert_eq!(set.band_color, None);
        } else {
            assert_eq!(
                result,
                Err(InvalidExerciseData::OutOfRange {
                    exercise_type: "Cardio",
                    field: "distance",
                    min: 50,
                    max: 50_000
                })
            );
        }
    }

    #[test]
    fn test_normalize_set_cardio_requires_distance() {
        assert_eq!(
            ExerciseType::Cardio.normalize_set(&SetInput::default()),
            Err(InvalidExerciseData::MissingField {
                exercise_type: "Cardio",
                field: "distance"
            })
        );
    }

    #[rstest]
    #[case::lower_bound(1, true)]
    #[case::upper_bound(300, true)]
    #[case::zero(0, false)]
    #[case::above_upper_bound(301, false)]
    fn test_normalize_set_static_hold_time_bounds(#[case] time: u32, #[case] valid: bool) {
        let result = ExerciseType::StaticHold.normalize_set(&SetInput {
            weight: None,
            reps: Some(5),
            time: Some(time),
            band_color: None,
        });
        if valid {
            let set = result.unwrap();
            // Holds count as a single rep regardless of input.
            assert_eq!(set.reps, Some(Reps::ONE));
            assert_eq!(set.time, Some(Time::new(time).unwrap()));
        } else {
            assert_eq!(
                result,
                Err(InvalidExerciseData::OutOfRange {
                    exercise_type: "Static Hold",
                    field: "time",
                    min: 1,
                    max: 300
                })
            );
        }
    }

    #[test]
    fn test_normalize_set_static_hold_negative_weight() {
        assert_eq!(
            ExerciseType::StaticHold.normalize_set(&SetInput {
                weight: Some(-5.0),
                reps: None,
                time: Some(30),
                band_color: None,
            }),
            Err(InvalidExerciseData::NegativeWeight {
                exercise_type: "Static Hold"
            })
        );
    }

    #[rstest]
    #[case::regular_forces_plain(ExerciseType::Regular, Some(BandType::Resistance), true, Ok((None, false)))]
    #[case::cardio_forces_plain(ExerciseType::Cardio, None, true, Ok((None, false)))]
    #[case::band_type_clears_bodyweight(
        ExerciseType::BandedAssistance,
        Some(BandType::Assistance),
        true,
        Ok((Some(BandType::Assistance), false))
    )]
    #[case::bodyweight_clears_band_type(ExerciseType::Bodyweight, None, false, Ok((None, true)))]
    #[case::banded_without_band_type(
        ExerciseType::BandedResistance,
        None,
        false,
        Err(InvalidExerciseData::MissingField { exercise_type: "Banded Resistance", field: "band_type" })
    )]
    fn test_normalize_metadata(
        #[case] exercise_type: ExerciseType,
        #[case] band_type: Option<BandType>,
        #[case] bodyweight: bool,
        #[case] expected: Result<(Option<BandType>, bool), InvalidExerciseData>,
    ) {
        assert_eq!(
            exercise_type.normalize_metadata(band_type, bodyweight),
            expected
        );
    }

    #[rstest]
    #[case::negative_clamps(Some(-10.0), "0 lbs")]
    #[case::missing_clamps(None, "0 lbs")]
    #[case::fractional(Some(100.5), "100.5 lbs")]
    #[case::whole(Some(315.0), "315 lbs")]
    fn test_format_weight_regular(#[case] weight: Option<f64>, #[case] expected: &str) {
        assert_eq!(
            ExerciseType::Regular.format_weight(&SetInput {
                weight,
                reps: Some(5),
                ..SetInput::default()
            }),
            expected
        );
    }

    #[rstest]
    #[case(Some(BandColor::Red), "Band: Red")]
    #[case(Some(BandColor::Green), "Band: Green")]
    #[case(None, "Band: N/A")]
    fn test_format_weight_banded(#[case] band_color: Option<BandColor>, #[case] expected: &str) {
        assert_eq!(
            ExerciseType::BandedResistance.format_weight(&SetInput {
                band_color,
                ..SetInput::default()
            }),
            expected
        );
    }

    #[rstest]
    #[case::unloaded(None, "Bodyweight")]
    #[case::zero_load(Some(0.0), "Bodyweight")]
    #[case::loaded(Some(25.0), "Bodyweight +25 lbs")]
    fn test_format_weight_bodyweight(#[case] weight: Option<f64>, #[case] expected: &str) {
        assert_eq!(
            ExerciseType::Bodyweight.format_weight(&SetInput {
                weight,
                ..SetInput::default()
            }),
            expected
        );
    }

    #[rstest]
    #[case::meters(500, "500m")]
    #[case::fractional_kilometers(1500, "1.5km")]
    #[case::whole_kilometers(2000, "2km")]
    fn test_format_weight_cardio(#[case] distance: u32, #[case] expected: &str) {
        assert_eq!(
            ExerciseType::Cardio.format_weight(&SetInput {
                reps: Some(distance),
                ..SetInput::default()
            }),
            expected
        );
    }

    #[rstest]
    #[case::seconds(45, None, "45s hold")]
    #[case::minutes_and_seconds(90, None, "1m 30s hold")]
    #[case::exact_minutes(120, None, "2m hold")]
    #[case::loaded(30, Some(25.0), "30s hold +25 lbs")]
    fn test_format_weight_static_hold(
        #[case] time: u32,
        #[case] weight: Option<f64>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            ExerciseType::StaticHold.format_weight(&SetInput {
                weight,
                time: Some(time),
                ..SetInput::default()
            }),
            expected
        );
    }

    #[rstest]
    #[case(ExerciseType::BandedResistance)]
    #[case(ExerciseType::BandedAssistance)]
    #[case(ExerciseType::Cardio)]
    #[case(ExerciseType::StaticHold)]
    fn test_format_one_rep_max_unsupported(#[case] exercise_type: ExerciseType) {
        assert_eq!(
            exercise_type.format_one_rep_max(&session_of(vec![lift(100.0, 5)])),
            Err(UnsupportedOperation {
                exercise_type: exercise_type.name(),
                operation: "one-rep-max estimation"
            })
        );
    }

    #[test]
    fn test_format_one_rep_max() {
        assert_eq!(
            ExerciseType::Regular.format_one_rep_max(&session_of(vec![lift(100.0, 10)])),
            Ok(String::from("133.3 lbs"))
        );
        assert_eq!(
            ExerciseType::Bodyweight.format_one_rep_max(&session_of(vec![lift(0.0, 10)])),
            Ok(String::new())
        );
        assert_eq!(
            ExerciseType::Regular.format_one_rep_max(&session_of(vec![])),
            Ok(String::new())
        );
    }

    #[test]
    fn test_validation_rules_bodyweight_preference() {
        let relaxed = ExerciseType::Bodyweight.validation_rules(&UserPreferences::default());
        assert!(!relaxed.weight.unwrap().required);

        let strict = ExerciseType::Bodyweight.validation_rules(&UserPreferences {
            show_extra_weight: true,
        });
        assert!(strict.weight.unwrap().required);
    }

    #[test]
    fn test_type_config() {
        let config = ExerciseType::Cardio.config();
        assert_eq!(config.name, "Cardio");
        assert_eq!(config.tag, "cardio");
        assert!(!config.supports_one_rep_max);
        assert_eq!(config.chart, ChartType::Distance);
        assert_eq!(
            config.axes,
            &[ProgressionAxis::Distance, ProgressionAxis::Rounds]
        );
        assert_eq!(config.rules.reps, Some(DISTANCE_RULE));
    }

    #[rstest]
    #[case("regular", Ok(ExerciseType::Regular))]
    #[case("banded_resistance", Ok(ExerciseType::BandedResistance))]
    #[case("static_hold", Ok(ExerciseType::StaticHold))]
    #[case("yoga", Err(ExerciseTypeError::Invalid))]
    fn test_exercise_type_try_from(
        #[case] tag: &str,
        #[case] expected: Result<ExerciseType, ExerciseTypeError>,
    ) {
        assert_eq!(ExerciseType::try_from(tag), expected);
    }
}
