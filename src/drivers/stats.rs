//! Drivers for the correlation and covariance kernels.
//!
//! Both benchmarks use a one-based (n + 1) x (n + 1) padded layout; row and column zero exist
//! but are never read or written by the kernels.

use super::{check, matrix, profile};
use crate::cli::CliArgs;
use crate::kernels::stats;
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::Real;

use std::mem::size_of;

pub fn correlation<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Correlation Computation (n = {n}) <<");
        let w = n + 1;
        let data0: Vec<T> = matrix(w, w, |i, j| (i * j) as f64 / w as f64);
        let state0 = (
            data0,
            vec![T::zero(); w],
            vec![T::zero(); w],
            vec![T::zero(); w * w],
        );

        let kind = KernelKind::Correlation;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(data, mean, stddev, symmat)| stats::correlation(n, data, mean, stddev, symmat),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(data, mean, stddev, symmat)| stats::par_correlation(n, data, mean, stddev, symmat),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.3.as_slice(), par.3.as_slice())]);
    }
    reports
}

pub fn covariance<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Covariance Computation (n = {n}) <<");
        let w = n + 1;
        let data0: Vec<T> = matrix(w, w, |i, j| {
            if i >= 1 && j >= 1 {
                (i * j) as f64 / n as f64
            } else {
                0.0
            }
        });
        let state0 = (data0, vec![T::zero(); w], vec![T::zero(); w * w]);

        let kind = KernelKind::Covariance;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(data, mean, symmat)| stats::covariance(n, data, mean, symmat),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(data, mean, symmat)| stats::par_covariance(n, data, mean, symmat),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.2.as_slice(), par.2.as_slice())]);
    }
    reports
}
