//! Utility functions and traits.

use rand::prelude::*;

use std::{
    fmt,
    ops::{AddAssign, DivAssign, MulAssign, SubAssign},
};

/// Utility trait that generalizes the floating-point element types the benchmarks run on and
/// implements common functionnalities needed by the kernel and driver functions.
///
/// Also provides a generic way of generating floating-point vectors in the wanted type.
pub trait Real:
    num::Float
    + num::FromPrimitive
    + num::ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + fmt::Display
{
    /// Produces a vector of type `T` and length `n`, filled with values in the range [0.0, 1.0)
    /// drawn from a seeded RNG (deterministic for a given seed).
    fn rand_vector(n: usize, seed: Option<u64>) -> Vec<Self>;
}

impl Real for f32 {
    fn rand_vector(n: usize, seed: Option<u64>) -> Vec<Self> {
        let seed = seed.unwrap_or(0);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let between = rand::distributions::Uniform::new(0.0_f32, 1.0_f32);
        (0..n).map(|_| between.sample(&mut rng)).collect()
    }
}

impl Real for f64 {
    fn rand_vector(n: usize, seed: Option<u64>) -> Vec<Self> {
        let seed = seed.unwrap_or(0);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let between = rand::distributions::Uniform::new(0.0_f64, 1.0_f64);
        (0..n).map(|_| between.sample(&mut rng)).collect()
    }
}

/// Casts an `f64` constant or index expression into the benchmark element type.
pub fn real<T: Real>(v: f64) -> T {
    T::from_f64(v).expect("value not representable in element type")
}

/// Consumes a result buffer so the optimizer cannot discard the kernel that produced it.
///
/// Only used when the seq/par cross-check is skipped; otherwise the comparison itself keeps the
/// results alive. The accumulated checksum is reported on `stderr`.
pub fn dce_guard<T: Real>(values: impl Iterator<Item = T>) -> T {
    let acc = values.fold(T::zero(), |acc, x| acc + x);
    eprintln!("dce guard: acc = {acc}");
    std::hint::black_box(acc)
}
