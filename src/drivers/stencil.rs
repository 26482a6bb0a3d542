//! Drivers for the stencil and convolution kernels.

use super::{check, matrix, profile, vector};
use crate::cli::CliArgs;
use crate::kernels::stencil;
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::{real, Real};

use std::mem::size_of;

pub fn conv2d<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Two dimensional (2D) convolution (n = {n}) <<");
        let a = T::rand_vector(n * n, args.seed);
        let b0 = vec![T::zero(); n * n];

        let kind = KernelKind::Conv2d;
        let (report, b_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &b0, |b| {
            stencil::conv2d(n, &a, b)
        });
        reports.push(report);
        let (report, b_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &b0, |b| {
            stencil::par_conv2d(n, &a, b)
        });
        reports.push(report);

        check(args, kind, n, &[(b_seq.as_slice(), b_par.as_slice())]);
    }
    reports
}

pub fn conv3d<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Three dimensional (3D) convolution (n = {n}) <<");
        let a: Vec<T> = (0..n * n * n)
            .map(|idx| {
                let (i, j, k) = (idx / (n * n), (idx / n) % n, idx % n);
                real((i % 12 + 2 * (j % 7) + 3 * (k % 13)) as f64)
            })
            .collect();
        let b0 = vec![T::zero(); n * n * n];

        let kind = KernelKind::Conv3d;
        let (report, b_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &b0, |b| {
            stencil::conv3d(n, &a, b)
        });
        reports.push(report);
        let (report, b_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &b0, |b| {
            stencil::par_conv3d(n, &a, b)
        });
        reports.push(report);

        check(args, kind, n, &[(b_seq.as_slice(), b_par.as_slice())]);
    }
    reports
}

pub fn fdtd2d<T: Real>(args: &CliArgs, sizes: &[usize], steps: usize) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> 2-D Finite Different Time Domain Kernel (n = {n}, steps = {steps}) <<");
        let pulse: Vec<T> = vector(steps, |t| t as f64);
        let ex0: Vec<T> = matrix(n, n + 1, |i, j| (i as f64 * (j + 1) as f64 + 1.0) / n as f64);
        let ey0: Vec<T> = matrix(n + 1, n, |i, j| {
            ((i as f64 - 1.0) * (j + 2) as f64 + 2.0) / n as f64
        });
        let hz0: Vec<T> = matrix(n, n, |i, j| {
            ((i as f64 - 9.0) * (j + 4) as f64 + 3.0) / n as f64
        });
        let state0 = (ex0, ey0, hz0);

        let kind = KernelKind::Fdtd2d { steps };
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(ex, ey, hz)| stencil::fdtd2d(n, steps, &pulse, ex, ey, hz),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(ex, ey, hz)| stencil::par_fdtd2d(n, steps, &pulse, ex, ey, hz),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.2.as_slice(), par.2.as_slice())]);
    }
    reports
}
