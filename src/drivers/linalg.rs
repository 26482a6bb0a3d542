//! Drivers for the dense linear algebra kernels.

use super::{check, matrix, profile, vector};
use crate::cli::CliArgs;
use crate::kernels::linalg;
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::{real, Real};

use std::{f64::consts::PI, mem::size_of};

pub fn gemm<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();
    let (alpha, beta): (T, T) = (real(linalg::GEMM_ALPHA), real(linalg::GEMM_BETA));

    for &n in sizes {
        eprintln!(">> Matrix-multiply C=alpha.A.B+beta.C (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let b: Vec<T> = matrix(n, n, |i, j| (i * j + 1) as f64 / n as f64);
        let c0: Vec<T> = matrix(n, n, |i, j| (i * j + 2) as f64 / n as f64);

        let kind = KernelKind::Gemm;
        let (report, c_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &c0, |c| {
            linalg::gemm(n, alpha, beta, &a, &b, c)
        });
        reports.push(report);
        let (report, c_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &c0, |c| {
            linalg::par_gemm(n, alpha, beta, &a, &b, c)
        });
        reports.push(report);

        check(args, kind, n, &[(c_seq.as_slice(), c_par.as_slice())]);
    }
    reports
}

pub fn mm2<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Linear Algebra: 2 Matrix Multiplications (C=A.B; E=C.D) (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let b: Vec<T> = matrix(n, n, |i, j| (i * (j + 1)) as f64 / n as f64);
        let d: Vec<T> = matrix(n, n, |i, j| (i * (j + 2)) as f64 / n as f64);
        let state0 = (vec![T::zero(); n * n], vec![T::zero(); n * n]);

        let kind = KernelKind::Mm2;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(c, e)| linalg::mm2(n, &a, &b, c, &d, e),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(c, e)| linalg::par_mm2(n, &a, &b, c, &d, e),
        );
        reports.push(report);

        check(
            args,
            kind,
            n,
            &[
                (seq.0.as_slice(), par.0.as_slice()),
                (seq.1.as_slice(), par.1.as_slice()),
            ],
        );
    }
    reports
}

pub fn mm3<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(
            ">> Linear Algebra: 3 Matrix Multiplications (E=A.B; F=C.D; G=E.F) (n = {n}) <<"
        );
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let b: Vec<T> = matrix(n, n, |i, j| (i * (j + 1)) as f64 / n as f64);
        let c: Vec<T> = matrix(n, n, |i, j| (i * (j + 3)) as f64 / n as f64);
        let d: Vec<T> = matrix(n, n, |i, j| (i * (j + 2)) as f64 / n as f64);
        let state0 = (
            vec![T::zero(); n * n],
            vec![T::zero(); n * n],
            vec![T::zero(); n * n],
        );

        let kind = KernelKind::Mm3;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(e, f, g)| linalg::mm3(n, &a, &b, &c, &d, e, f, g),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(e, f, g)| linalg::par_mm3(n, &a, &b, &c, &d, e, f, g),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.2.as_slice(), par.2.as_slice())]);
    }
    reports
}

pub fn atax<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Matrix Transpose and Vector Multiplication (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let x: Vec<T> = vector(n, |i| i as f64 * PI);
        let state0 = (vec![T::zero(); n], vec![T::zero(); n]);

        let kind = KernelKind::Atax;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(y, tmp)| linalg::atax(n, &a, &x, y, tmp),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(y, tmp)| linalg::par_atax(n, &a, &x, y, tmp),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.0.as_slice(), par.0.as_slice())]);
    }
    reports
}

pub fn bicg<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> BiCG Sub Kernel of BiCGStab Linear Solver (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let r: Vec<T> = vector(n, |i| i as f64 * PI);
        let p: Vec<T> = vector(n, |i| i as f64 * PI);
        let state0 = (vec![T::zero(); n], vec![T::zero(); n]);

        let kind = KernelKind::Bicg;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(s, q)| linalg::bicg(n, &a, &r, s, &p, q),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(s, q)| linalg::par_bicg(n, &a, &r, s, &p, q),
        );
        reports.push(report);

        check(
            args,
            kind,
            n,
            &[
                (seq.0.as_slice(), par.0.as_slice()),
                (seq.1.as_slice(), par.1.as_slice()),
            ],
        );
    }
    reports
}

pub fn mvt<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Matrix Vector Product and Transpose (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let y1: Vec<T> = vector(n, |i| (i + 3) as f64 / n as f64);
        let y2: Vec<T> = vector(n, |i| (i + 4) as f64 / n as f64);
        let x1_0: Vec<T> = vector(n, |i| i as f64 / n as f64);
        let x2_0: Vec<T> = vector(n, |i| (i + 1) as f64 / n as f64);
        let state0 = (x1_0, x2_0);

        let kind = KernelKind::Mvt;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(x1, x2)| linalg::mvt(n, &a, x1, x2, &y1, &y2),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(x1, x2)| linalg::par_mvt(n, &a, x1, x2, &y1, &y2),
        );
        reports.push(report);

        check(
            args,
            kind,
            n,
            &[
                (seq.0.as_slice(), par.0.as_slice()),
                (seq.1.as_slice(), par.1.as_slice()),
            ],
        );
    }
    reports
}

pub fn gesummv<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();
    let (alpha, beta): (T, T) = (real(linalg::GESUMMV_ALPHA), real(linalg::GESUMMV_BETA));

    for &n in sizes {
        eprintln!(">> Scalar, Vector and Matrix Multiplication (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let b: Vec<T> = matrix(n, n, |i, j| (i * j + 1) as f64 / n as f64);
        let x: Vec<T> = vector(n, |i| i as f64 / n as f64);
        let state0 = (vec![T::zero(); n], vec![T::zero(); n]);

        let kind = KernelKind::Gesummv;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(y, tmp)| linalg::gesummv(n, alpha, beta, &a, &b, &x, y, tmp),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(y, tmp)| linalg::par_gesummv(n, alpha, beta, &a, &b, &x, y, tmp),
        );
        reports.push(report);

        check(args, kind, n, &[(seq.0.as_slice(), par.0.as_slice())]);
    }
    reports
}

pub fn syrk<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();
    let (alpha, beta): (T, T) = (real(linalg::SYRK_ALPHA), real(linalg::SYRK_BETA));

    for &n in sizes {
        eprintln!(">> Symmetric rank-k operations (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let c0: Vec<T> = matrix(n, n, |i, j| (i * j + 2) as f64 / n as f64);

        let kind = KernelKind::Syrk;
        let (report, c_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &c0, |c| {
            linalg::syrk(n, alpha, beta, &a, c)
        });
        reports.push(report);
        let (report, c_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &c0, |c| {
            linalg::par_syrk(n, alpha, beta, &a, c)
        });
        reports.push(report);

        check(args, kind, n, &[(c_seq.as_slice(), c_par.as_slice())]);
    }
    reports
}

pub fn syr2k<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();
    let (alpha, beta): (T, T) = (real(linalg::SYRK_ALPHA), real(linalg::SYRK_BETA));

    for &n in sizes {
        eprintln!(">> Symmetric rank-2k operations (n = {n}) <<");
        let a: Vec<T> = matrix(n, n, |i, j| (i * j) as f64 / n as f64);
        let b: Vec<T> = matrix(n, n, |i, j| (i * j + 1) as f64 / n as f64);
        let c0: Vec<T> = matrix(n, n, |i, j| (i * j + 2) as f64 / n as f64);

        let kind = KernelKind::Syr2k;
        let (report, c_seq) = profile(kind, KernelVariant::Seq, n, size_of::<T>(), args, &c0, |c| {
            linalg::syr2k(n, alpha, beta, &a, &b, c)
        });
        reports.push(report);
        let (report, c_par) = profile(kind, KernelVariant::Par, n, size_of::<T>(), args, &c0, |c| {
            linalg::par_syr2k(n, alpha, beta, &a, &b, c)
        });
        reports.push(report);

        check(args, kind, n, &[(c_seq.as_slice(), c_par.as_slice())]);
    }
    reports
}
