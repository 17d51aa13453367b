//! Next-session targets derived from a user's most recent session.

use std::fmt::{self, Display};

use crate::{
    BandColor, Distance, ExerciseType, Property, Reps, Time, Weight, WorkoutSession,
    exercise_type::{format_distance, format_hold},
};

/// Rep count above which band work moves to the next tier.
const BAND_HIGH_REP_THRESHOLD: u32 = 12;

/// Rep count above which bodyweight work earns extra load.
const BODYWEIGHT_HIGH_REP_THRESHOLD: u32 = 10;

/// Target rep count after stepping to a new band tier.
const BAND_RESET_REPS: u32 = 8;

/// A type-specific "try next time" target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suggestion {
    /// Next working weight.
    Weight(Weight),
    /// Start using extra load, within a recommended range.
    ExtraLoad { min: Weight, max: Weight },
    /// New total added load on a bodyweight exercise.
    MoreLoad(Weight),
    /// Next band tier at a reset rep target.
    Band { color: BandColor, reps: Reps },
    /// The lightest assistance band has been outgrown.
    RemoveBand,
    Cardio { distance: Distance, rounds: u32 },
    Hold { duration: Time, weight: Weight, sets: u32 },
}

impl Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Weight(weight) => write!(f, "Try {weight} lbs"),
            Suggestion::ExtraLoad { min, max } => {
                write!(f, "Try adding {min}-{max} lbs of extra weight")
            }
            Suggestion::MoreLoad(weight) => write!(f, "Try Bodyweight +{weight} lbs"),
            Suggestion::Band { color, reps } => {
                write!(f, "Try the {} band for {reps} reps", color.name())
            }
            Suggestion::RemoveBand => write!(f, "Try without a band"),
            Suggestion::Cardio { distance, rounds } => {
                write!(f, "Try {rounds} x {}", format_distance(u32::from(*distance)))
            }
            Suggestion::Hold {
                duration,
                weight,
                sets,
            } => {
                write!(f, "Try {sets} x {}", format_hold(u32::from(*duration)))?;
                if f64::from(*weight) > 0.0 {
                    write!(f, " +{weight} lbs")?;
                }
                Ok(())
            }
        }
    }
}

/// Next-session target for an exercise, based on its most recent session.
/// Returns `None` when no suggestion applies.
#[must_use]
pub fn suggest(exercise_type: ExerciseType, last: &WorkoutSession) -> Option<Suggestion> {
    if last.sets.is_empty() {
        return None;
    }

    match exercise_type {
        ExerciseType::Regular => regular(last),
        ExerciseType::BandedResistance => banded_resistance(last),
        ExerciseType::BandedAssistance => banded_assistance(last),
        ExerciseType::Bodyweight => bodyweight(last),
        ExerciseType::Cardio => cardio(last),
        ExerciseType::StaticHold => static_hold(last),
    }
}

/// Every set at or above 8 reps earns the next plate; otherwise the top
/// weight is consolidated. Without any rep data the last weight plus
/// 5 lbs is the fallback.
fn regular(last: &WorkoutSession) -> Option<Suggestion> {
    let top = last.top_weight()?;
    let next = match last.min_reps() {
        Some(min) if u32::from(min) >= 8 => top.adding(5.0),
        Some(_) => top,
        None => top.adding(5.0),
    };
    Some(Suggestion::Weight(next))
}

fn banded_resistance(last: &WorkoutSession) -> Option<Suggestion> {
    if u32::from(last.max_reps()?) <= BAND_HIGH_REP_THRESHOLD {
        return None;
    }
    let next = last.band_color()?.heavier()?;
    Some(Suggestion::Band {
        color: next,
        reps: Reps::new(BAND_RESET_REPS).ok()?,
    })
}

fn banded_assistance(last: &WorkoutSession) -> Option<Suggestion> {
    if u32::from(last.max_reps()?) <= BAND_HIGH_REP_THRESHOLD {
        return None;
    }
    match last.band_color()?.lighter() {
        Some(lighter) => Some(Suggestion::Band {
            color: lighter,
            reps: Reps::new(BAND_RESET_REPS).ok()?,
        }),
        None => Some(Suggestion::RemoveBand),
    }
}

fn bodyweight(last: &WorkoutSession) -> Option<Suggestion> {
    if u32::from(last.max_reps()?) <= BODYWEIGHT_HIGH_REP_THRESHOLD {
        return None;
    }
    let extra = last.top_weight().unwrap_or(Weight::ZERO);
    if f64::from(extra) > 0.0 {
        Some(Suggestion::MoreLoad(extra.adding(5.0)))
    } else {
        Some(Suggestion::ExtraLoad {
            min: Weight::ZERO.adding(5.0),
            max: Weight::ZERO.adding(10.0),
        })
    }
}

/// The suggestion axis shifts from distance to volume as distance grows.
fn cardio(last: &WorkoutSession) -> Option<Suggestion> {
    let distance = u32::from(last.max_distance()?);
    if distance == 0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let rounds = last.sets.len() as u32;

    let (next_distance, next_rounds) = if distance < 400 {
        (distance + 50, rounds + 1)
    } else if distance < 1500 {
        (distance + 100, rounds)
    } else {
        (distance, rounds + 1)
    };

    Some(Suggestion::Cardio {
        distance: Distance::from(next_distance),
        rounds: next_rounds,
    })
}

fn static_hold(last: &WorkoutSession) -> Option<Suggestion> {
    let duration = u32::from(last.max_hold()?);
    if duration == 0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let sets = last.sets.len() as u32;
    let weight = last.top_weight().unwrap_or(Weight::ZERO);

    if duration < 30 {
        return Some(Suggestion::Hold {
            duration: Time::new(duration + 2).ok()?,
            weight,
            sets,
        });
    }

    if duration < 60 {
        // 5 % of the hold, a smaller relative step than the +2 s below 30 s.
        return Some(Suggestion::Hold {
            duration: Time::new(duration + duration.div_ceil(20)).ok()?,
            weight,
            sets,
        });
    }

    let duration = Time::new(duration).ok()?;
    if f64::from(weight) > 0.0 {
        Some(Suggestion::Hold {
            duration,
            weight,
            sets: sets + 1,
        })
    } else {
        Some(Suggestion::Hold {
            duration,
            weight: weight.adding(5.0),
            sets,
        })
    }
}
