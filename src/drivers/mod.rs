//! Kernel drivers.
//!
//! This module provides the API for appropriately initializing and profiling the kernels, as
//! well as post-processing the results.
//!
//! # High-level approach for kernel profiling
//! ## 1. Data initialization
//! Every driver fills its input buffers with the deterministic synthetic pattern of its
//! benchmark (closed-form index formulas, or a seeded RNG where the benchmark calls for one),
//! so a given seed always reproduces the same run.
//!
//! ## 2. Performance evaluation
//! The execution time of the chosen kernel is measured over a "meta repetitions loop"; enough
//! measurements to assess the precision of the results (see [`crate::consts`] for the default
//! amount and [`crate::cli`] for overriding it from the command-line). The pristine input state
//! is re-cloned outside the timed section before every repetition, so in-place kernels never
//! compound across repetitions and both variants start every repetition from identical data.
//!
//! For kernels operating on very little data, the execution time can be increased by repeatedly
//! calling the kernel in a tight loop and averaging the elapsed time over its iteration count
//! (see [`crate::cli`] for overriding the number of tight loop repetitions).
//!
//! ## 3. Post-processing
//! The sequential and parallel outputs are compared elementwise against the kernel's
//! percent-difference threshold and the verdict is reported on `stderr` (with `--skip-check`
//! the outputs are instead consumed by the dead-code-elimination guard). Performance metrics
//! extracted from the recorded execution times go to `stdout`, or a file if specified (see
//! [`crate::cli`] for specifying an output file from the command-line).

mod decomp;
mod linalg;
mod mriq;
mod nearest;
mod stats;
mod stencil;

use crate::cli::{CliArgs, KernelCmd};
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::{dce_guard, real, Real};
use crate::validate::Validation;

use std::{
    fs::OpenOptions,
    io::{stdout, Write},
    time::Instant,
};

/// Runs the selected kernel command over all requested problem sizes and writes the collected
/// performance reports.
pub fn dispatch<T: Real>(args: CliArgs) {
    let sizes = args.kernel.sizes().to_vec();

    let reports = match args.kernel {
        KernelCmd::Conv2d { .. } => stencil::conv2d::<T>(&args, &sizes),
        KernelCmd::Conv3d { .. } => stencil::conv3d::<T>(&args, &sizes),
        KernelCmd::Fdtd2d { time_steps, .. } => stencil::fdtd2d::<T>(&args, &sizes, time_steps),
        KernelCmd::Gemm { .. } => linalg::gemm::<T>(&args, &sizes),
        KernelCmd::Mm2 { .. } => linalg::mm2::<T>(&args, &sizes),
        KernelCmd::Mm3 { .. } => linalg::mm3::<T>(&args, &sizes),
        KernelCmd::Atax { .. } => linalg::atax::<T>(&args, &sizes),
        KernelCmd::Bicg { .. } => linalg::bicg::<T>(&args, &sizes),
        KernelCmd::Mvt { .. } => linalg::mvt::<T>(&args, &sizes),
        KernelCmd::Gesummv { .. } => linalg::gesummv::<T>(&args, &sizes),
        KernelCmd::Syrk { .. } => linalg::syrk::<T>(&args, &sizes),
        KernelCmd::Syr2k { .. } => linalg::syr2k::<T>(&args, &sizes),
        KernelCmd::Gramschmidt { .. } => decomp::gramschmidt::<T>(&args, &sizes),
        KernelCmd::Lud { .. } => decomp::lud::<T>(&args, &sizes),
        KernelCmd::Correlation { .. } => stats::correlation::<T>(&args, &sizes),
        KernelCmd::Covariance { .. } => stats::covariance::<T>(&args, &sizes),
        KernelCmd::KNearest { .. } => nearest::k_nearest::<T>(&args, &sizes),
        KernelCmd::NearestPairs { .. } => nearest::nearest_pairs::<T>(&args, &sizes),
        KernelCmd::Mriq { .. } => mriq::mriq::<T>(&args, &sizes),
    };

    let mut output: Box<dyn Write> = match args.output_file {
        Some(ref name) => Box::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(name)
                .expect("Failed to open output file"),
        ),
        None => Box::new(stdout()),
    };

    PerfReport::print_csv_header(&mut output);
    for report in reports {
        writeln!(output, "{report}").expect("Failed to write report");
    }
}

/// Measures the execution time of `kernel` over the meta-repetitions loop.
///
/// `initial` is the pristine mutable state the kernel runs on; it is re-cloned outside the
/// timed section before every repetition. Returns the performance report and the output state
/// of the last repetition (for validation).
pub(crate) fn profile<S, F>(
    kind: KernelKind,
    variant: KernelVariant,
    n: usize,
    elem_size: usize,
    args: &CliArgs,
    initial: &S,
    kernel: F,
) -> (PerfReport, S)
where
    S: Clone,
    F: Fn(&mut S),
{
    let mut result = initial.clone();
    let mut durations = Vec::with_capacity(args.meta_repetitions.into());
    for _ in 0..durations.capacity() {
        let mut state = initial.clone();
        let start = Instant::now();
        for _ in 0..args.tight_loop_repetitions {
            kernel(&mut state);
        }
        durations.push((start.elapsed() / args.tight_loop_repetitions as u32).as_secs_f64());
        result = state;
    }

    (
        PerfReport::new(kind, variant, n, elem_size, &mut durations),
        result,
    )
}

/// Cross-checks pairs of seq/par output buffers and reports the verdict on `stderr`, or feeds
/// the sequential outputs to the DCE guard when checking is skipped.
pub(crate) fn check<T: Real>(args: &CliArgs, kind: KernelKind, n: usize, pairs: &[(&[T], &[T])]) {
    if args.skip_check {
        for (seq, _) in pairs {
            dce_guard(seq.iter().copied());
        }
        return;
    }

    let mut validation = Validation::new(kind.error_threshold());
    for (seq, par) in pairs {
        validation.compare(seq, par);
    }
    eprintln!("{kind} (n = {n}): {validation}");
}

/// Fills a `rows x cols` matrix from an index formula evaluated in `f64`.
pub(crate) fn matrix<T: Real>(
    rows: usize,
    cols: usize,
    f: impl Fn(usize, usize) -> f64,
) -> Vec<T> {
    (0..rows * cols)
        .map(|idx| real(f(idx / cols, idx % cols)))
        .collect()
}

/// Fills a vector from an index formula evaluated in `f64`.
pub(crate) fn vector<T: Real>(len: usize, f: impl Fn(usize) -> f64) -> Vec<T> {
    (0..len).map(|i| real(f(i))).collect()
}

/// Derives a per-array seed so sibling input arrays of one benchmark differ while staying
/// reproducible for a given `--seed`.
pub(crate) fn offset_seed(seed: Option<u64>, k: u64) -> Option<u64> {
    Some(seed.unwrap_or(0).wrapping_add(k))
}
