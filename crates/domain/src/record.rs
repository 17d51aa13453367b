//! Personal-record detection and the append-only record log.

use std::{collections::BTreeMap, slice::Iter};

use chrono::NaiveDateTime;
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, ExerciseID, ExerciseType, LoggedSet, Property, ReadError, Reps, UpdateError,
    UserID, Weight, WorkoutSession, WorkoutSessionID, one_rep_max,
};

#[allow(async_fn_in_trait)]
pub trait PersonalRecordRepository {
    async fn read_records(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<PersonalRecord>, ReadError>;
    async fn create_record(&self, record: PersonalRecord)
    -> Result<PersonalRecord, CreateError>;
    async fn replace_records(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        records: Vec<PersonalRecord>,
    ) -> Result<Vec<PersonalRecord>, UpdateError>;
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum PrCategory {
    OneRepMax,
    Volume,
    RepSpecific,
    Hypertrophy,
    Time,
    Endurance,
    Density,
    Consistency,
}

impl Property for PrCategory {
    fn iter() -> Iter<'static, PrCategory> {
        static CATEGORIES: [PrCategory; 8] = [
            PrCategory::OneRepMax,
            PrCategory::Volume,
            PrCategory::RepSpecific,
            PrCategory::Hypertrophy,
            PrCategory::Time,
            PrCategory::Endurance,
            PrCategory::Density,
            PrCategory::Consistency,
        ];
        CATEGORIES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            PrCategory::OneRepMax => "One-Rep Max",
            PrCategory::Volume => "Volume",
            PrCategory::RepSpecific => "Rep-Specific",
            PrCategory::Hypertrophy => "Hypertrophy",
            PrCategory::Time => "Time",
            PrCategory::Endurance => "Endurance",
            PrCategory::Density => "Density",
            PrCategory::Consistency => "Consistency",
        }
    }
}

impl PrCategory {
    /// Stable identifier used in stored records.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            PrCategory::OneRepMax => "one_rm",
            PrCategory::Volume => "volume",
            PrCategory::RepSpecific => "rep_specific",
            PrCategory::Hypertrophy => "hypertrophy",
            PrCategory::Time => "time",
            PrCategory::Endurance => "endurance",
            PrCategory::Density => "density",
            PrCategory::Consistency => "consistency",
        }
    }
}

/// A best-ever value for a (user, exercise, category) combination.
///
/// Records are never mutated; a superseding record points back at the one
/// it replaced, so the full history is preserved. "Current" is derived
/// from the chain, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub id: RecordID,
    pub user_id: UserID,
    pub exercise_id: ExerciseID,
    pub category: PrCategory,
    pub value: f64,
    /// Rep count the record is tracked at, for rep-specific records.
    pub reps: Option<Reps>,
    /// Weight tier the record is tracked at, for hypertrophy records.
    pub weight: Option<Weight>,
    pub achieved_at: NaiveDateTime,
    pub session_id: WorkoutSessionID,
    pub previous: Option<RecordID>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordID(Uuid);

impl RecordID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RecordID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RecordID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A session value that may supersede the stored best of its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrCandidate {
    pub category: PrCategory,
    pub value: f64,
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
}

type CandidateKey = (PrCategory, Option<Reps>, Option<u64>);

impl PrCandidate {
    fn key(&self) -> CandidateKey {
        (self.category, self.reps, self.weight.map(Weight::tenths))
    }
}

/// Every record candidate a session yields for its exercise type.
///
/// Categories not reachable for the type are simply absent; a session
/// with zero sets yields nothing. Zero-valued candidates are dropped so
/// degenerate sessions cannot mint meaningless records.
#[must_use]
pub fn candidates(exercise_type: ExerciseType, session: &WorkoutSession) -> Vec<PrCandidate> {
    if session.sets.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();

    if exercise_type.supports_one_rep_max() {
        let best_estimate = session
            .sets
            .iter()
            .map(|set| one_rep_max::estimate(f64::from(set.weight), set.reps.map_or(0, u32::from)))
            .fold(0.0, f64::max);
        push_positive(&mut result, PrCategory::OneRepMax, best_estimate, None, None);

        push_positive(&mut result, PrCategory::Volume, session.volume(), None, None);

        for (reps, weight) in max_weight_per_rep_count(&session.sets) {
            push_positive(
                &mut result,
                PrCategory::RepSpecific,
                f64::from(weight),
                Some(reps),
                None,
            );
        }

        for (weight, reps) in max_reps_per_weight(&session.sets) {
            push_positive(
                &mut result,
                PrCategory::Hypertrophy,
                f64::from(u32::from(reps)),
                None,
                Some(weight),
            );
        }

        if let Some(duration) = session.duration {
            let minutes = f64::from(u32::from(duration)) / 60.0;
            if minutes > 0.0 {
                push_positive(
                    &mut result,
                    PrCategory::Density,
                    session.volume() / minutes,
                    None,
                    None,
                );
            }
        }
    }

    match exercise_type {
        ExerciseType::StaticHold => {
            let best_hold = session.max_hold().map_or(0.0, |t| f64::from(u32::from(t)));
            push_positive(&mut result, PrCategory::Time, best_hold, None, None);
        }
        ExerciseType::Cardio => {
            let best_distance = session
                .max_distance()
                .map_or(0.0, |d| f64::from(u32::from(d)));
            push_positive(&mut result, PrCategory::Endurance, best_distance, None, None);
        }
        _ => {}
    }

    if let Some(value) = consistency_value(exercise_type, session) {
        push_positive(&mut result, PrCategory::Consistency, value, None, None);
    }

    result
}

/// Candidates of the session that strictly exceed every prior session.
///
/// Consistency is compared against the historical maximum of session
/// minimums; all other categories against historical maxima. Ties never
/// count as new records.
#[must_use]
pub fn detect(
    exercise_type: ExerciseType,
    session: &WorkoutSession,
    prior: &[&WorkoutSession],
) -> Vec<PrCandidate> {
    let mut prior_bests: BTreeMap<CandidateKey, f64> = BTreeMap::new();
    for prior_session in prior {
        for candidate in candidates(exercise_type, prior_session) {
            prior_bests
                .entry(candidate.key())
                .and_modify(|best| *best = best.max(candidate.value))
                .or_insert(candidate.value);
        }
    }

    candidates(exercise_type, session)
        .into_iter()
        .filter(|candidate| {
            prior_bests
                .get(&candidate.key())
                .is_none_or(|best| candidate.value > *best)
        })
        .collect()
}

/// The append-only record log of a user. Confirming a candidate appends
/// a record whose `previous` field points at the superseded one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordHistory {
    records: Vec<PersonalRecord>,
}

impl RecordHistory {
    #[must_use]
    pub fn new(records: Vec<PersonalRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[PersonalRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PersonalRecord> {
        self.records
    }

    /// The record no other record supersedes, for the given key.
    #[must_use]
    pub fn current(
        &self,
        exercise_id: ExerciseID,
        category: PrCategory,
        reps: Option<Reps>,
        weight: Option<Weight>,
    ) -> Option<&PersonalRecord> {
        self.records
            .iter()
            .rev()
            .filter(|record| {
                record.exercise_id == exercise_id
                    && record.category == category
                    && record.reps == reps
                    && record.weight.map(Weight::tenths) == weight.map(Weight::tenths)
            })
            .find(|record| {
                !self
                    .records
                    .iter()
                    .any(|other| other.previous == Some(record.id))
            })
    }

    /// Turn a confirmed candidate into a record, linking it backward to
    /// the record it supersedes.
    pub fn confirm(&mut self, session: &WorkoutSession, candidate: &PrCandidate) -> PersonalRecord {
        let previous = self
            .current(
                session.exercise_id,
                candidate.category,
                candidate.reps,
                candidate.weight,
            )
            .map(|record| record.id);

        let record = PersonalRecord {
            id: Uuid::new_v4().into(),
            user_id: session.user_id,
            exercise_id: session.exercise_id,
            category: candidate.category,
            value: candidate.value,
            reps: candidate.reps,
            weight: candidate.weight,
            achieved_at: session.performed_at,
            session_id: session.id,
            previous,
        };
        self.records.push(record.clone());
        record
    }

    /// Re-derive the full record log of a (user, exercise) pair from its
    /// chronologically ordered sessions. Used after edits: rebuilding the
    /// whole chain cannot leave stale supersession links behind, unlike
    /// forward-only patching.
    #[must_use]
    pub fn rebuild(exercise_type: ExerciseType, sessions: &[&WorkoutSession]) -> Self {
        let mut ordered: Vec<&WorkoutSession> = sessions.to_vec();
        ordered.sort_by_key(|session| session.performed_at);

        let mut history = RecordHistory::default();
        for i in 0..ordered.len() {
            let (prior, rest) = ordered.split_at(i);
            let Some(session) = rest.first() else {
                break;
            };
            for candidate in detect(exercise_type, session, prior) {
                history.confirm(session, &candidate);
            }
        }
        history
    }
}

fn push_positive(
    result: &mut Vec<PrCandidate>,
    category: PrCategory,
    value: f64,
    reps: Option<Reps>,
    weight: Option<Weight>,
) {
    if value > 0.0 {
        result.push(PrCandidate {
            category,
            value,
            reps,
            weight,
        });
    }
}

fn max_weight_per_rep_count(sets: &[LoggedSet]) -> BTreeMap<Reps, Weight> {
    let mut result: BTreeMap<Reps, Weight> = BTreeMap::new();
    for set in sets {
        let Some(reps) = set.reps else { continue };
        if u32::from(reps) == 0 || f64::from(set.weight) <= 0.0 {
            continue;
        }
        result
            .entry(reps)
            .and_modify(|weight| {
                if set.weight > *weight {
                    *weight = set.weight;
                }
            })
            .or_insert(set.weight);
    }
    result
}

fn max_reps_per_weight(sets: &[LoggedSet]) -> Vec<(Weight, Reps)> {
    let mut result: BTreeMap<u64, (Weight, Reps)> = BTreeMap::new();
    for set in sets {
        let Some(reps) = set.reps else { continue };
        if u32::from(reps) == 0 || f64::from(set.weight) <= 0.0 {
            continue;
        }
        result
            .entry(set.weight.tenths())
            .and_modify(|(_, best)| {
                if reps > *best {
                    *best = reps;
                }
            })
            .or_insert((set.weight, reps));
    }
    result.into_values().collect()
}

/// Session minimum of the type's primary metric. Rewards uniformity
/// across sets rather than peak effort.
fn consistency_value(exercise_type: ExerciseType, session: &WorkoutSession) -> Option<f64> {
    session
        .sets
        .iter()
        .map(|set| match exercise_type {
            ExerciseType::Regular | ExerciseType::Bodyweight => set.volume(),
            ExerciseType::BandedResistance | ExerciseType::BandedAssistance => {
                set.reps.map_or(0.0, |reps| f64::from(u32::from(reps)))
            }
            ExerciseType::Cardio => set
                .distance()
                .map_or(0.0, |distance| f64::from(u32::from(distance))),
            ExerciseType::StaticHold => set.time.map_or(0.0, |time| f64::from(u32::from(time))),
        })
        .fold(None, |min: Option<f64>, value| {
            Some(min.map_or(value, |min| min.min(value)))
        })
}
