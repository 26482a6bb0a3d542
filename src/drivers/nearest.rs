//! Drivers for the nearest-neighbor search kernels.
//!
//! Validation covers both record fields: the distance values and the point indices that ended
//! up in each sorted slot (indices are compared through the same percent-difference test the
//! distances use).

use super::profile;
use crate::cli::CliArgs;
use crate::kernels::nearest::{self, Point, SelPoint};
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::{dce_guard, real, Real};
use crate::validate::Validation;

use std::mem::size_of;

pub fn k_nearest<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> K-nearest (n = {n}) <<");
        let pivots: Vec<Point> = (0..n / 2)
            .map(|i| Point {
                x: i as i32 * 3,
                y: i as i32 * 2,
            })
            .collect();
        let points: Vec<Point> = (0..n)
            .map(|i| Point {
                x: i as i32 * 3,
                y: i as i32 * 2,
            })
            .collect();
        let selected0: Vec<SelPoint<T>> = vec![SelPoint::unselected(); n * n];

        let kind = KernelKind::KNearest;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &selected0,
            |selected| nearest::k_nearest(&pivots, &points, selected),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &selected0,
            |selected| nearest::par_k_nearest(&pivots, &points, selected),
        );
        reports.push(report);

        check_selected(args, kind, n, &seq, &par);
    }
    reports
}

pub fn nearest_pairs<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Nearest pairs (n = {n}) <<");
        let points: Vec<Point> = (0..n)
            .map(|i| Point {
                x: i as i32,
                y: i as i32 * 2,
            })
            .collect();
        let selected0: Vec<SelPoint<T>> = vec![SelPoint::unselected(); n * n];

        let kind = KernelKind::NearestPairs;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &selected0,
            |selected| nearest::nearest_pairs(&points, selected),
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &selected0,
            |selected| nearest::par_nearest_pairs(&points, selected),
        );
        reports.push(report);

        check_selected(args, kind, n, &seq, &par);
    }
    reports
}

fn check_selected<T: Real>(
    args: &CliArgs,
    kind: KernelKind,
    n: usize,
    seq: &[SelPoint<T>],
    par: &[SelPoint<T>],
) {
    if args.skip_check {
        dce_guard(seq.iter().map(|s| s.value));
        return;
    }

    let mut validation = Validation::new(kind.error_threshold());
    for (s, p) in seq.iter().zip(par.iter()) {
        validation.check(s.value, p.value);
        validation.check(real::<T>(s.position as f64), real::<T>(p.position as f64));
    }
    eprintln!("{kind} (n = {n}): {validation}");
}
