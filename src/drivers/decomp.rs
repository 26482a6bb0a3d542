//! Drivers for the matrix decomposition kernels.

use super::{check, matrix, profile};
use crate::cli::CliArgs;
use crate::kernels::decomp;
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::Real;

use std::mem::size_of;

pub fn gramschmidt<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Gram-Schmidt decomposition (n = {n}) <<");
        let a0: Vec<T> = matrix(n, n, |i, j| ((i + 1) * (j + 1)) as f64 / (n + 1) as f64);
        let state0 = (a0, vec![T::zero(); n * n], vec![T::zero(); n * n]);

        let kind = KernelKind::Gramschmidt;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(a, r, q)| decomp::gramschmidt(n, a, r, q),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(a, r, q)| decomp::par_gramschmidt(n, a, r, q),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.0.as_slice(), par.0.as_slice())]);
    }
    reports
}

pub fn lud<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> LU decomposition (n = {n}) <<");
        let a0 = toeplitz_input::<T>(n);

        let kind = KernelKind::Lud;
        let (report, a_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &a0, |a| {
            decomp::lud(n, a)
        });
        reports.push(report);
        let (report, a_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &a0, |a| {
            decomp::par_lud(n, a)
        });
        reports.push(report);

        check(args, kind, n, &[(a_seq.as_slice(), a_par.as_slice())]);
    }
    reports
}

/// Diagonally dominant symmetric Toeplitz matrix built from an exponential decay profile, so
/// the factorization is stable without pivoting.
fn toeplitz_input<T: Real>(n: usize) -> Vec<T> {
    let mut coe = vec![0.0_f64; 2 * n - 1];
    for j in 0..n {
        let c = 10.0 * (-0.001 * j as f64).exp();
        coe[n - 1 + j] = c;
        coe[n - 1 - j] = c;
    }
    matrix(n, n, |i, j| coe[n - 1 - i + j])
}
