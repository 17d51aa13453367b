//! Epley-style one-rep-max estimation.

const EPLEY_COEFFICIENT: f64 = 0.0333;

/// Estimated one-rep maximum for a weight × reps observation.
///
/// Pure and referentially transparent; returns 0 for non-positive
/// weight or reps, which callers treat as "no estimate".
#[must_use]
pub fn estimate(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }

    weight * (1.0 + EPLEY_COEFFICIENT * f64::from(reps))
}
