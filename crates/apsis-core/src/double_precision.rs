//! Compensated accumulation.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A running sum and the rounding error accumulated while forming it.
///
/// [`increment`](DoublePrecision::increment) folds each delta in through an
/// error-free transformation, so after N increments of magnitude at most M
/// the representable error stays O(ε·M) instead of the O(N·ε·M) of naive
/// summation. Integrations run for millions of steps; without this the time
/// variable alone would drift visibly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoublePrecision<T> {
    pub value: T,
    pub error: T,
}

impl<T: Default> DoublePrecision<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            error: T::default(),
        }
    }
}

impl<T> DoublePrecision<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    /// Compensated increment: adds `delta` to the sum, keeping the residual
    /// that `value` cannot represent in `error`.
    pub fn increment(&mut self, delta: T) {
        let previous_value = self.value;
        let incremented_error = self.error + delta;
        self.value = previous_value + incremented_error;
        self.error = (previous_value - self.value) + incremented_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{Time, si};

    #[test]
    fn test_increment_tracks_residual() {
        let mut sum = DoublePrecision::new(1.0f64);
        sum.increment(1e-17);
        // The delta is below one ulp of the value, but not lost.
        assert_eq!(sum.value, 1.0);
        assert_eq!(sum.error, 1e-17);
    }

    #[test]
    fn test_compensated_sum_beats_naive_sum() {
        const COUNT: usize = 1_000_000;
        let delta = 0.1f64;

        let mut naive = 0.0f64;
        let mut compensated = DoublePrecision::new(0.0f64);
        for _ in 0..COUNT {
            naive += delta;
            compensated.increment(delta);
        }

        // One rounding instead of a million.
        let reference = COUNT as f64 * delta;
        let naive_error = (naive - reference).abs();
        let compensated_error = (compensated.value + compensated.error - reference).abs();
        assert!(
            compensated_error < 1e-9,
            "compensated error too large: {compensated_error}"
        );
        assert!(
            naive_error > 10.0 * compensated_error,
            "naive summation unexpectedly accurate: {naive_error} vs {compensated_error}"
        );
    }

    #[test]
    fn test_accumulates_quantities() {
        let mut time: DoublePrecision<Time> = DoublePrecision::new(0.0 * si::second());
        for _ in 0..1000 {
            time.increment(0.001 * si::second());
        }
        let total = f64::from((time.value + time.error) / si::second());
        assert!((total - 1.0).abs() < 1e-12, "time drifted: {total}");
    }
}
