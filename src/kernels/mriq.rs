//! Non-uniform k-space sampling kernels.
//!
//! A precomputation squares the coil sensitivities into per-sample magnitudes; the main kernel
//! then accumulates the real and imaginary field response of every k-space sample at every
//! coordinate.

use rayon::prelude::*;

use crate::utils::{real, Real};

use std::f64::consts::TAU;

/// One k-space sample: coordinates plus its precomputed magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KSample<T> {
    pub kx: T,
    pub ky: T,
    pub kz: T,
    pub phi_mag: T,
}

/// Magnitude of the complex coil sensitivity: `phi_mag[k] = phi_r[k]^2 + phi_i[k]^2`.
pub fn phi_mag<T: Real>(phi_r: &[T], phi_i: &[T], out: &mut [T]) {
    for (k, m) in out.iter_mut().enumerate() {
        *m = phi_r[k] * phi_r[k] + phi_i[k] * phi_i[k];
    }
}

/// Parallel magnitude precomputation.
pub fn par_phi_mag<T: Real>(phi_r: &[T], phi_i: &[T], out: &mut [T]) {
    out.par_iter_mut().enumerate().for_each(|(k, m)| {
        *m = phi_r[k] * phi_r[k] + phi_i[k] * phi_i[k];
    });
}

/// Accumulates `Qr`/`Qi` over every k-space sample at every coordinate:
/// `Q[x] += phi_mag * (cos + i sin)(2 * pi * k . x)`.
pub fn compute_q<T: Real>(
    samples: &[KSample<T>],
    x: &[T],
    y: &[T],
    z: &[T],
    qr: &mut [T],
    qi: &mut [T],
) {
    let tau: T = real(TAU);

    for sample in samples {
        for ix in 0..x.len() {
            let arg = tau * (sample.kx * x[ix] + sample.ky * y[ix] + sample.kz * z[ix]);
            qr[ix] += sample.phi_mag * arg.cos();
            qi[ix] += sample.phi_mag * arg.sin();
        }
    }
}

/// Parallel variant: each task owns one coordinate's `Qr`/`Qi` pair and walks the samples in
/// the same order as the sequential loop, so the accumulation is unchanged.
pub fn par_compute_q<T: Real>(
    samples: &[KSample<T>],
    x: &[T],
    y: &[T],
    z: &[T],
    qr: &mut [T],
    qi: &mut [T],
) {
    let tau: T = real(TAU);

    qr.par_iter_mut()
        .zip(qi.par_iter_mut())
        .enumerate()
        .for_each(|(ix, (qr_x, qi_x))| {
            for sample in samples {
                let arg = tau * (sample.kx * x[ix] + sample.ky * y[ix] + sample.kz * z[ix]);
                *qr_x += sample.phi_mag * arg.cos();
                *qi_x += sample.phi_mag * arg.sin();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validation;

    fn sample_set(n: usize) -> Vec<KSample<f64>> {
        let phi_r = f64::rand_vector(n, Some(1));
        let phi_i = f64::rand_vector(n, Some(2));
        let kx = f64::rand_vector(n, Some(3));
        let ky = f64::rand_vector(n, Some(4));
        let kz = f64::rand_vector(n, Some(5));

        let mut mags = vec![0.0; n];
        phi_mag(&phi_r, &phi_i, &mut mags);
        (0..n)
            .map(|k| KSample {
                kx: kx[k],
                ky: ky[k],
                kz: kz[k],
                phi_mag: mags[k],
            })
            .collect()
    }

    #[test]
    fn phi_mag_squares_both_parts() {
        let mut out = vec![0.0_f64; 2];
        phi_mag(&[3.0, 0.0], &[4.0, 2.0], &mut out);
        assert_eq!(out, vec![25.0, 4.0]);
    }

    #[test]
    fn par_phi_mag_matches_sequential() {
        let n = 64;
        let phi_r = f64::rand_vector(n, Some(11));
        let phi_i = f64::rand_vector(n, Some(12));
        let mut seq = vec![0.0; n];
        phi_mag(&phi_r, &phi_i, &mut seq);
        let mut par = vec![0.0; n];
        par_phi_mag(&phi_r, &phi_i, &mut par);
        assert_eq!(seq, par);
    }

    #[test]
    fn single_sample_at_origin_contributes_its_magnitude() {
        let samples = vec![KSample {
            kx: 0.25_f64,
            ky: 0.5,
            kz: 0.75,
            phi_mag: 2.0,
        }];
        // At the origin the phase is zero: cos contributes everything, sin nothing.
        let (x, y, z) = (vec![0.0], vec![0.0], vec![0.0]);
        let (mut qr, mut qi) = (vec![0.0], vec![0.0]);
        compute_q(&samples, &x, &y, &z, &mut qr, &mut qi);
        assert!((qr[0] - 2.0).abs() < 1e-12);
        assert!(qi[0].abs() < 1e-12);
    }

    #[test]
    fn par_compute_q_matches_sequential() {
        let n = 48;
        let samples = sample_set(n);
        let x = f64::rand_vector(n, Some(6));
        let y = f64::rand_vector(n, Some(7));
        let z = f64::rand_vector(n, Some(8));

        let (mut qr_seq, mut qi_seq) = (vec![0.0; n], vec![0.0; n]);
        compute_q(&samples, &x, &y, &z, &mut qr_seq, &mut qi_seq);
        let (mut qr_par, mut qi_par) = (vec![0.0; n], vec![0.0; n]);
        par_compute_q(&samples, &x, &y, &z, &mut qr_par, &mut qi_par);

        let mut v = Validation::new(0.5);
        v.compare(&qr_seq, &qr_par);
        v.compare(&qi_seq, &qi_par);
        assert!(v.passed(), "{v}");
    }
}
