//! Dense linear algebra kernels.
//!
//! Matrices are flat row-major buffers of `n * n` elements. Every kernel exists as a sequential
//! loop nest and a `par_` variant distributing the outer loop (or its transposed form when the
//! output is accumulated across rows) over the rayon worker pool.

use rayon::prelude::*;

use crate::utils::Real;

// Scalar weights carried over from the classic benchmark definitions.
pub const GEMM_ALPHA: f64 = 32412.0;
pub const GEMM_BETA: f64 = 2123.0;
pub const GESUMMV_ALPHA: f64 = 43532.0;
pub const GESUMMV_BETA: f64 = 12313.0;
pub const SYRK_ALPHA: f64 = 12435.0;
pub const SYRK_BETA: f64 = 4546.0;

/// General matrix multiplication: `C = alpha * A * B + beta * C`.
pub fn gemm<T: Real>(n: usize, alpha: T, beta: T, a: &[T], b: &[T], c: &mut [T]) {
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] *= beta;
            for k in 0..n {
                c[i * n + j] += alpha * a[i * n + k] * b[k * n + j];
            }
        }
    }
}

/// Parallel GEMM: each task owns one row of `C`.
pub fn par_gemm<T: Real>(n: usize, alpha: T, beta: T, a: &[T], b: &[T], c: &mut [T]) {
    c.par_chunks_exact_mut(n)
        .zip(a.par_chunks_exact(n))
        .for_each(|(c_row, a_row)| {
            for j in 0..n {
                c_row[j] *= beta;
                for k in 0..n {
                    c_row[j] += alpha * a_row[k] * b[k * n + j];
                }
            }
        });
}

/// Two chained matrix multiplications: `C = A * B; E = C * D`.
pub fn mm2<T: Real>(n: usize, a: &[T], b: &[T], c: &mut [T], d: &[T], e: &mut [T]) {
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] = T::zero();
            for k in 0..n {
                c[i * n + j] += a[i * n + k] * b[k * n + j];
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            e[i * n + j] = T::zero();
            for k in 0..n {
                e[i * n + j] += c[i * n + k] * d[k * n + j];
            }
        }
    }
}

/// Parallel 2MM; the second product only starts once `C` is complete.
pub fn par_mm2<T: Real>(n: usize, a: &[T], b: &[T], c: &mut [T], d: &[T], e: &mut [T]) {
    c.par_chunks_exact_mut(n)
        .zip(a.par_chunks_exact(n))
        .for_each(|(c_row, a_row)| {
            for j in 0..n {
                c_row[j] = T::zero();
                for k in 0..n {
                    c_row[j] += a_row[k] * b[k * n + j];
                }
            }
        });

    e.par_chunks_exact_mut(n)
        .zip(c.par_chunks_exact(n))
        .for_each(|(e_row, c_row)| {
            for j in 0..n {
                e_row[j] = T::zero();
                for k in 0..n {
                    e_row[j] += c_row[k] * d[k * n + j];
                }
            }
        });
}

/// Three chained matrix multiplications: `E = A * B; F = C * D; G = E * F`.
#[allow(clippy::too_many_arguments)]
pub fn mm3<T: Real>(
    n: usize,
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    e: &mut [T],
    f: &mut [T],
    g: &mut [T],
) {
    for i in 0..n {
        for j in 0..n {
            e[i * n + j] = T::zero();
            for k in 0..n {
                e[i * n + j] += a[i * n + k] * b[k * n + j];
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            f[i * n + j] = T::zero();
            for k in 0..n {
                f[i * n + j] += c[i * n + k] * d[k * n + j];
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            g[i * n + j] = T::zero();
            for k in 0..n {
                g[i * n + j] += e[i * n + k] * f[k * n + j];
            }
        }
    }
}

/// Parallel 3MM; the final product waits for both intermediates.
#[allow(clippy::too_many_arguments)]
pub fn par_mm3<T: Real>(
    n: usize,
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    e: &mut [T],
    f: &mut [T],
    g: &mut [T],
) {
    e.par_chunks_exact_mut(n)
        .zip(a.par_chunks_exact(n))
        .for_each(|(e_row, a_row)| {
            for j in 0..n {
                e_row[j] = T::zero();
                for k in 0..n {
                    e_row[j] += a_row[k] * b[k * n + j];
                }
            }
        });

    f.par_chunks_exact_mut(n)
        .zip(c.par_chunks_exact(n))
        .for_each(|(f_row, c_row)| {
            for j in 0..n {
                f_row[j] = T::zero();
                for k in 0..n {
                    f_row[j] += c_row[k] * d[k * n + j];
                }
            }
        });

    g.par_chunks_exact_mut(n)
        .zip(e.par_chunks_exact(n))
        .for_each(|(g_row, e_row)| {
            for j in 0..n {
                g_row[j] = T::zero();
                for k in 0..n {
                    g_row[j] += e_row[k] * f[k * n + j];
                }
            }
        });
}

/// Matrix transpose and vector multiplication: `y = A^T * (A * x)`.
pub fn atax<T: Real>(n: usize, a: &[T], x: &[T], y: &mut [T], tmp: &mut [T]) {
    for yi in y.iter_mut() {
        *yi = T::zero();
    }

    for i in 0..n {
        tmp[i] = T::zero();
        for j in 0..n {
            tmp[i] += a[i * n + j] * x[j];
        }
        for j in 0..n {
            y[j] += a[i * n + j] * tmp[i];
        }
    }
}

/// Parallel ATAX. The second accumulation runs transposed so that each element of `y` is owned
/// by exactly one task; the per-element accumulation order is unchanged.
pub fn par_atax<T: Real>(n: usize, a: &[T], x: &[T], y: &mut [T], tmp: &mut [T]) {
    tmp.par_iter_mut().enumerate().for_each(|(i, t)| {
        let mut acc = T::zero();
        for j in 0..n {
            acc += a[i * n + j] * x[j];
        }
        *t = acc;
    });

    y.par_iter_mut().enumerate().for_each(|(j, yj)| {
        let mut acc = T::zero();
        for i in 0..n {
            acc += a[i * n + j] * tmp[i];
        }
        *yj = acc;
    });
}

/// BiCG sub-kernel of the BiCGStab linear solver: `s = A^T * r; q = A * p`.
pub fn bicg<T: Real>(n: usize, a: &[T], r: &[T], s: &mut [T], p: &[T], q: &mut [T]) {
    for si in s.iter_mut() {
        *si = T::zero();
    }

    for i in 0..n {
        q[i] = T::zero();
        for j in 0..n {
            s[j] += r[i] * a[i * n + j];
            q[i] += a[i * n + j] * p[j];
        }
    }
}

/// Parallel BiCG; the `s` accumulation runs transposed, `q` keeps its row form.
pub fn par_bicg<T: Real>(n: usize, a: &[T], r: &[T], s: &mut [T], p: &[T], q: &mut [T]) {
    s.par_iter_mut().enumerate().for_each(|(j, sj)| {
        let mut acc = T::zero();
        for i in 0..n {
            acc += r[i] * a[i * n + j];
        }
        *sj = acc;
    });

    q.par_iter_mut().enumerate().for_each(|(i, qi)| {
        let mut acc = T::zero();
        for j in 0..n {
            acc += a[i * n + j] * p[j];
        }
        *qi = acc;
    });
}

/// Matrix-vector product and transpose: `x1 += A * y1; x2 += A^T * y2`.
pub fn mvt<T: Real>(
    n: usize,
    a: &[T],
    x1: &mut [T],
    x2: &mut [T],
    y1: &[T],
    y2: &[T],
) {
    for i in 0..n {
        for j in 0..n {
            x1[i] += a[i * n + j] * y1[j];
        }
    }

    for i in 0..n {
        for j in 0..n {
            x2[i] += a[j * n + i] * y2[j];
        }
    }
}

/// Parallel MVT: both products distribute over the elements of their output vector.
pub fn par_mvt<T: Real>(
    n: usize,
    a: &[T],
    x1: &mut [T],
    x2: &mut [T],
    y1: &[T],
    y2: &[T],
) {
    x1.par_iter_mut().enumerate().for_each(|(i, xi)| {
        for j in 0..n {
            *xi += a[i * n + j] * y1[j];
        }
    });

    x2.par_iter_mut().enumerate().for_each(|(i, xi)| {
        for j in 0..n {
            *xi += a[j * n + i] * y2[j];
        }
    });
}

/// Scalar, vector and matrix multiplication: `y = alpha * A * x + beta * B * x`.
#[allow(clippy::too_many_arguments)]
pub fn gesummv<T: Real>(
    n: usize,
    alpha: T,
    beta: T,
    a: &[T],
    b: &[T],
    x: &[T],
    y: &mut [T],
    tmp: &mut [T],
) {
    for i in 0..n {
        tmp[i] = T::zero();
        y[i] = T::zero();
        for j in 0..n {
            tmp[i] = a[i * n + j] * x[j] + tmp[i];
            y[i] = b[i * n + j] * x[j] + y[i];
        }
        y[i] = alpha * tmp[i] + beta * y[i];
    }
}

/// Parallel GESUMMV: each task owns one element of `y` (and its `tmp` slot).
#[allow(clippy::too_many_arguments)]
pub fn par_gesummv<T: Real>(
    n: usize,
    alpha: T,
    beta: T,
    a: &[T],
    b: &[T],
    x: &[T],
    y: &mut [T],
    tmp: &mut [T],
) {
    y.par_iter_mut()
        .zip(tmp.par_iter_mut())
        .enumerate()
        .for_each(|(i, (yi, ti))| {
            *ti = T::zero();
            *yi = T::zero();
            for j in 0..n {
                *ti = a[i * n + j] * x[j] + *ti;
                *yi = b[i * n + j] * x[j] + *yi;
            }
            *yi = alpha * *ti + beta * *yi;
        });
}

/// Symmetric rank-k update: `C = alpha * A * A^T + beta * C`.
pub fn syrk<T: Real>(n: usize, alpha: T, beta: T, a: &[T], c: &mut [T]) {
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] *= beta;
        }
    }

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                c[i * n + j] += alpha * a[i * n + k] * a[j * n + k];
            }
        }
    }
}

/// Parallel SYRK: scale pass then accumulate pass, each owning rows of `C`.
pub fn par_syrk<T: Real>(n: usize, alpha: T, beta: T, a: &[T], c: &mut [T]) {
    c.par_chunks_exact_mut(n).for_each(|c_row| {
        for cij in c_row.iter_mut() {
            *cij *= beta;
        }
    });

    c.par_chunks_exact_mut(n).enumerate().for_each(|(i, c_row)| {
        for j in 0..n {
            for k in 0..n {
                c_row[j] += alpha * a[i * n + k] * a[j * n + k];
            }
        }
    });
}

/// Symmetric rank-2k update: `C = alpha * (A * B^T + B * A^T) + beta * C`.
pub fn syr2k<T: Real>(n: usize, alpha: T, beta: T, a: &[T], b: &[T], c: &mut [T]) {
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] *= beta;
        }
    }

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                c[i * n + j] += alpha * a[i * n + k] * b[j * n + k];
                c[i * n + j] += alpha * b[i * n + k] * a[j * n + k];
            }
        }
    }
}

/// Parallel SYR2K: scale pass then accumulate pass, each owning rows of `C`.
pub fn par_syr2k<T: Real>(n: usize, alpha: T, beta: T, a: &[T], b: &[T], c: &mut [T]) {
    c.par_chunks_exact_mut(n).for_each(|c_row| {
        for cij in c_row.iter_mut() {
            *cij *= beta;
        }
    });

    c.par_chunks_exact_mut(n).enumerate().for_each(|(i, c_row)| {
        for j in 0..n {
            for k in 0..n {
                c_row[j] += alpha * a[i * n + k] * b[j * n + k];
                c_row[j] += alpha * b[i * n + k] * a[j * n + k];
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::real;
    use crate::validate::Validation;

    fn matrix(n: usize, f: impl Fn(usize, usize) -> f64) -> Vec<f64> {
        (0..n * n).map(|idx| f(idx / n, idx % n)).collect()
    }

    fn vector(n: usize, f: impl Fn(usize) -> f64) -> Vec<f64> {
        (0..n).map(f).collect()
    }

    fn identity(n: usize) -> Vec<f64> {
        matrix(n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    #[test]
    fn gemm_with_identity_left_operand() {
        let n = 8;
        let a = identity(n);
        let b = matrix(n, |i, j| (i * j + 1) as f64 / n as f64);
        let c0 = matrix(n, |i, j| (i * j + 2) as f64 / n as f64);
        let (alpha, beta) = (2.0, 3.0);

        let mut c = c0.clone();
        gemm(n, alpha, beta, &a, &b, &mut c);

        for idx in 0..n * n {
            let expected = beta * c0[idx] + alpha * b[idx];
            assert!((c[idx] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn par_gemm_matches_sequential() {
        let n = 23;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let b = matrix(n, |i, j| (i * j + 1) as f64 / n as f64);
        let c0 = matrix(n, |i, j| (i * j + 2) as f64 / n as f64);
        let (alpha, beta): (f64, f64) = (real(GEMM_ALPHA), real(GEMM_BETA));

        let mut c_seq = c0.clone();
        gemm(n, alpha, beta, &a, &b, &mut c_seq);
        let mut c_par = c0;
        par_gemm(n, alpha, beta, &a, &b, &mut c_par);

        let mut v = Validation::new(0.5);
        v.compare(&c_seq, &c_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_mm2_matches_sequential() {
        let n = 17;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let b = matrix(n, |i, j| (i * (j + 1)) as f64 / n as f64);
        let d = matrix(n, |i, j| (i * (j + 2)) as f64 / n as f64);

        let (mut c_seq, mut e_seq) = (vec![0.0; n * n], vec![0.0; n * n]);
        mm2(n, &a, &b, &mut c_seq, &d, &mut e_seq);
        let (mut c_par, mut e_par) = (vec![0.0; n * n], vec![0.0; n * n]);
        par_mm2(n, &a, &b, &mut c_par, &d, &mut e_par);

        let mut v = Validation::new(1.5);
        v.compare(&c_seq, &c_par);
        v.compare(&e_seq, &e_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_mm3_matches_sequential() {
        let n = 13;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let b = matrix(n, |i, j| (i * (j + 1)) as f64 / n as f64);
        let c = matrix(n, |i, j| (i * (j + 3)) as f64 / n as f64);
        let d = matrix(n, |i, j| (i * (j + 2)) as f64 / n as f64);

        let mut seq = (vec![0.0; n * n], vec![0.0; n * n], vec![0.0; n * n]);
        mm3(n, &a, &b, &c, &d, &mut seq.0, &mut seq.1, &mut seq.2);
        let mut par = (vec![0.0; n * n], vec![0.0; n * n], vec![0.0; n * n]);
        par_mm3(n, &a, &b, &c, &d, &mut par.0, &mut par.1, &mut par.2);

        let mut v = Validation::new(0.5);
        v.compare(&seq.2, &par.2);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn atax_with_identity_is_input() {
        let n = 6;
        let a = identity(n);
        let x = vector(n, |i| i as f64 + 1.0);
        let (mut y, mut tmp) = (vec![0.0; n], vec![0.0; n]);

        atax(n, &a, &x, &mut y, &mut tmp);
        for i in 0..n {
            assert!((y[i] - x[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn par_atax_matches_sequential() {
        let n = 19;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let x = vector(n, |i| i as f64 * std::f64::consts::PI);

        let (mut y_seq, mut tmp_seq) = (vec![0.0; n], vec![0.0; n]);
        atax(n, &a, &x, &mut y_seq, &mut tmp_seq);
        let (mut y_par, mut tmp_par) = (vec![0.0; n], vec![0.0; n]);
        par_atax(n, &a, &x, &mut y_par, &mut tmp_par);

        let mut v = Validation::new(0.5);
        v.compare(&y_seq, &y_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_bicg_matches_sequential() {
        let n = 21;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let r = vector(n, |i| i as f64 * std::f64::consts::PI);
        let p = vector(n, |i| i as f64 * std::f64::consts::PI);

        let (mut s_seq, mut q_seq) = (vec![0.0; n], vec![0.0; n]);
        bicg(n, &a, &r, &mut s_seq, &p, &mut q_seq);
        let (mut s_par, mut q_par) = (vec![0.0; n], vec![0.0; n]);
        par_bicg(n, &a, &r, &mut s_par, &p, &mut q_par);

        let mut v = Validation::new(0.5);
        v.compare(&s_seq, &s_par);
        v.compare(&q_seq, &q_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_mvt_matches_sequential() {
        let n = 18;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let y1 = vector(n, |i| (i + 3) as f64 / n as f64);
        let y2 = vector(n, |i| (i + 4) as f64 / n as f64);
        let x1_0 = vector(n, |i| i as f64 / n as f64);
        let x2_0 = vector(n, |i| (i + 1) as f64 / n as f64);

        let (mut x1_seq, mut x2_seq) = (x1_0.clone(), x2_0.clone());
        mvt(n, &a, &mut x1_seq, &mut x2_seq, &y1, &y2);
        let (mut x1_par, mut x2_par) = (x1_0, x2_0);
        par_mvt(n, &a, &mut x1_par, &mut x2_par, &y1, &y2);

        let mut v = Validation::new(0.5);
        v.compare(&x1_seq, &x1_par);
        v.compare(&x2_seq, &x2_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_gesummv_matches_sequential() {
        let n = 16;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let b = matrix(n, |i, j| (i * j + 1) as f64 / n as f64);
        let x = vector(n, |i| i as f64 / n as f64);
        let (alpha, beta): (f64, f64) = (real(GESUMMV_ALPHA), real(GESUMMV_BETA));

        let (mut y_seq, mut tmp_seq) = (vec![0.0; n], vec![0.0; n]);
        gesummv(n, alpha, beta, &a, &b, &x, &mut y_seq, &mut tmp_seq);
        let (mut y_par, mut tmp_par) = (vec![0.0; n], vec![0.0; n]);
        par_gesummv(n, alpha, beta, &a, &b, &x, &mut y_par, &mut tmp_par);

        let mut v = Validation::new(0.5);
        v.compare(&y_seq, &y_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn par_syrk_matches_sequential() {
        let n = 15;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let c0 = matrix(n, |i, j| (i * j + 2) as f64 / n as f64);
        let (alpha, beta): (f64, f64) = (real(SYRK_ALPHA), real(SYRK_BETA));

        let mut c_seq = c0.clone();
        syrk(n, alpha, beta, &a, &mut c_seq);
        let mut c_par = c0;
        par_syrk(n, alpha, beta, &a, &mut c_par);

        let mut v = Validation::new(0.5);
        v.compare(&c_seq, &c_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn syrk_output_is_symmetric_for_symmetric_c() {
        let n = 9;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        // C starts symmetric, so alpha * A * A^T + beta * C stays symmetric.
        let mut c = matrix(n, |i, j| (i * j) as f64 / n as f64);
        syrk(n, 2.0, 3.0, &a, &mut c);

        for i in 0..n {
            for j in 0..n {
                assert!((c[i * n + j] - c[j * n + i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn par_syr2k_matches_sequential() {
        let n = 14;
        let a = matrix(n, |i, j| (i * j) as f64 / n as f64);
        let b = matrix(n, |i, j| (i * j + 1) as f64 / n as f64);
        let c0 = matrix(n, |i, j| (i * j + 2) as f64 / n as f64);
        let (alpha, beta): (f64, f64) = (real(SYRK_ALPHA), real(SYRK_BETA));

        let mut c_seq = c0.clone();
        syr2k(n, alpha, beta, &a, &b, &mut c_seq);
        let mut c_par = c0;
        par_syr2k(n, alpha, beta, &a, &b, &mut c_par);

        let mut v = Validation::new(0.5);
        v.compare(&c_seq, &c_par);
        assert!(v.passed(), "{v}");
    }
}
