//! Driver for the non-uniform k-space sampling kernel.
//!
//! The k-space samples, coil sensitivities and sample coordinates are seeded uniform [0, 1)
//! fills; per-array seed offsets keep sibling arrays distinct while a given `--seed` still
//! reproduces the run. The magnitude precomputation runs in the same variant as the main
//! accumulation, as part of the timed kernel.

use super::{check, offset_seed, profile};
use crate::cli::CliArgs;
use crate::kernels::mriq::{self, KSample};
use crate::perf_report::{KernelKind, KernelVariant, PerfReport};
use crate::utils::Real;

use std::mem::size_of;

pub fn mriq<T: Real>(args: &CliArgs, sizes: &[usize]) -> Vec<PerfReport> {
    let mut reports = Vec::new();

    for &n in sizes {
        eprintln!(">> Non-uniform k-space sampling (n = {n}) <<");
        let phi_r = T::rand_vector(n, args.seed);
        let phi_i = T::rand_vector(n, offset_seed(args.seed, 1));
        let kx = T::rand_vector(n, offset_seed(args.seed, 2));
        let ky = T::rand_vector(n, offset_seed(args.seed, 3));
        let kz = T::rand_vector(n, offset_seed(args.seed, 4));
        let x = T::rand_vector(n, offset_seed(args.seed, 5));
        let y = T::rand_vector(n, offset_seed(args.seed, 6));
        let z = T::rand_vector(n, offset_seed(args.seed, 7));

        let state0 = (vec![T::zero(); n], vec![T::zero(); n]);
        let samples = |mags: &[T]| -> Vec<KSample<T>> {
            (0..n)
                .map(|k| KSample {
                    kx: kx[k],
                    ky: ky[k],
                    kz: kz[k],
                    phi_mag: mags[k],
                })
                .collect()
        };

        let kind = KernelKind::Mriq;
        let (report, seq) = profile(
            kind,
            KernelVariant::Seq,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(qr, qi)| {
                let mut mags = vec![T::zero(); n];
                mriq::phi_mag(&phi_r, &phi_i, &mut mags);
                mriq::compute_q(&samples(&mags), &x, &y, &z, qr, qi);
            },
        );
        reports.push(report);
        let (report, par) = profile(
            kind,
            KernelVariant::Par,
            n,
            size_of::<T>(),
            args,
            &state0,
            |(qr, qi)| {
                let mut mags = vec![T::zero(); n];
                mriq::par_phi_mag(&phi_r, &phi_i, &mut mags);
                mriq::par_compute_q(&samples(&mags), &x, &y, &z, qr, qi);
            },
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
