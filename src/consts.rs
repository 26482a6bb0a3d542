//! Crate-level constants.

/// Default number of meta repetitions performed when benchmarking a kernel.
pub const META_REPETITIONS: u8 = 5;

/// Default number of tight loop repetitions performed when benchmarking a kernel.
pub const TIGHT_LOOP_REPETITIONS: u16 = 1;

/// Default number of FDTD time steps.
pub const TIME_STEPS: usize = 500;

/// Default percent-difference threshold below which seq/par results are considered equal.
pub const ERROR_THRESHOLD: f64 = 0.5;

/// Magnitude below which a pair of compared values counts as "both near zero".
pub const NEAR_ZERO: f64 = 0.01;

/// Guard added to the percent-difference denominator.
pub const SMALL_FLOAT_VAL: f64 = 1e-8;
