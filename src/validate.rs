//! Result validation.
//!
//! The sequential rendition of each kernel is the reference for its parallel counterpart: after
//! profiling, the two output buffers are compared elementwise and every pair whose
//! percent-difference exceeds the kernel's threshold is counted. Mismatches are benchmark output,
//! not errors.

use crate::consts;
use crate::utils::Real;

use std::fmt;

/// Relative difference between two values, in percent.
///
/// Pairs where both magnitudes fall below [`consts::NEAR_ZERO`] compare as identical; otherwise
/// the difference is taken relative to the first value (guarded against a zero denominator).
pub fn percent_diff<T: Real>(val1: T, val2: T) -> f64 {
    let a = val1.to_f64().unwrap_or(f64::NAN);
    let b = val2.to_f64().unwrap_or(f64::NAN);

    if a.abs() < consts::NEAR_ZERO && b.abs() < consts::NEAR_ZERO {
        return 0.0;
    }
    100.0 * ((a - b).abs() / (a.abs() + consts::SMALL_FLOAT_VAL)).abs()
}

/// Elementwise seq/par comparison against a percent-difference threshold.
pub struct Validation {
    threshold: f64,
    mismatches: usize,
    checked: usize,
}

impl Validation {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            mismatches: 0,
            checked: 0,
        }
    }

    /// Records a single pair of values.
    pub fn check<T: Real>(&mut self, expected: T, actual: T) {
        self.checked += 1;
        if percent_diff(expected, actual) > self.threshold {
            self.mismatches += 1;
        }
    }

    /// Records every pair of corresponding elements of two output buffers.
    pub fn compare<T: Real>(&mut self, expected: &[T], actual: &[T]) {
        assert_eq!(
            expected.len(),
            actual.len(),
            "compared buffers must have the same length"
        );
        for (&e, &a) in expected.iter().zip(actual.iter()) {
            self.check(e, a);
        }
    }

    pub fn mismatches(&self) -> usize {
        self.mismatches
    }

    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-matching seq/par outputs beyond error threshold of {:4.2}%: {} (of {})",
            self.threshold, self.mismatches, self.checked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_values_have_zero_diff() {
        assert_eq!(percent_diff(42.0_f32, 42.0_f32), 0.0);
    }

    #[test]
    fn near_zero_pairs_compare_equal() {
        // Both magnitudes below the near-zero cutoff: treated as identical even though the
        // relative difference is large.
        assert_eq!(percent_diff(0.004_f32, -0.009_f32), 0.0);
    }

    #[test]
    fn relative_difference_in_percent() {
        let d = percent_diff(100.0_f64, 101.0_f64);
        assert!((d - 1.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn denominator_is_first_operand() {
        // The comparison is asymmetric: the difference is taken relative to the first value.
        let d1 = percent_diff(10.0_f64, 11.0_f64);
        let d2 = percent_diff(11.0_f64, 10.0_f64);
        assert!(d1 > d2);
    }

    #[test]
    fn counts_mismatches_beyond_threshold() {
        let mut v = Validation::new(0.5);
        v.compare(&[1.0_f32, 2.0, 3.0, 0.001], &[1.0, 2.02, 3.0, 0.002]);
        assert_eq!(v.mismatches(), 1);
        assert!(!v.passed());
    }

    #[test]
    fn passes_within_threshold() {
        let mut v = Validation::new(0.5);
        v.compare(&[1.0_f64, 2.0], &[1.000_01, 2.000_02]);
        assert!(v.passed());
    }
}
