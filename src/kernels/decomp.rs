//! Matrix decomposition kernels.
//!
//! Both kernels factor in place and keep an outer sequential loop: each step depends on the
//! previous one, so only the inner updates distribute over the worker pool.

use rayon::prelude::*;

use crate::utils::Real;

/// Gram-Schmidt QR decomposition of the square matrix `a` (reduced in place), producing the
/// triangular factor `r` and the orthonormal columns `q`.
pub fn gramschmidt<T: Real>(n: usize, a: &mut [T], r: &mut [T], q: &mut [T]) {
    for k in 0..n {
        let mut nrm = T::zero();
        for i in 0..n {
            nrm += a[i * n + k] * a[i * n + k];
        }
        r[k * n + k] = nrm.sqrt();

        for i in 0..n {
            q[i * n + k] = a[i * n + k] / r[k * n + k];
        }

        for j in k + 1..n {
            r[k * n + j] = T::zero();
            for i in 0..n {
                r[k * n + j] += q[i * n + k] * a[i * n + j];
            }
            for i in 0..n {
                a[i * n + j] = a[i * n + j] - q[i * n + k] * r[k * n + j];
            }
        }
    }
}

/// Parallel Gram-Schmidt.
///
/// Per elimination step `k`, the trailing projections split into two row-disjoint passes: first
/// every `r[k][j]` (computed before any column of `a` moves, exactly as the sequential
/// interleaving observes it), then the rank-1 update of the trailing columns of `a` distributed
/// over its rows.
pub fn par_gramschmidt<T: Real>(n: usize, a: &mut [T], r: &mut [T], q: &mut [T]) {
    for k in 0..n {
        let mut nrm = T::zero();
        for i in 0..n {
            nrm += a[i * n + k] * a[i * n + k];
        }
        r[k * n + k] = nrm.sqrt();

        let rkk = r[k * n + k];
        q.par_chunks_exact_mut(n)
            .zip(a.par_chunks_exact(n))
            .for_each(|(q_row, a_row)| {
                q_row[k] = a_row[k] / rkk;
            });

        {
            let (a, q) = (&*a, &*q);
            r[k * n + k + 1..(k + 1) * n]
                .par_iter_mut()
                .enumerate()
                .for_each(|(jj, rkj)| {
                    let j = k + 1 + jj;
                    let mut acc = T::zero();
                    for i in 0..n {
                        acc += q[i * n + k] * a[i * n + j];
                    }
                    *rkj = acc;
                });
        }

        let (r, q) = (&*r, &*q);
        a.par_chunks_exact_mut(n)
            .enumerate()
            .for_each(|(i, a_row)| {
                let qik = q[i * n + k];
                for j in k + 1..n {
                    a_row[j] = a_row[j] - qik * r[k * n + j];
                }
            });
    }
}

/// In-place LU decomposition without pivoting: afterwards `a` holds `U` on and above the
/// diagonal and the unit-lower-triangular `L` (diagonal implied) below it.
pub fn lud<T: Real>(n: usize, a: &mut [T]) {
    for i in 0..n {
        for j in i..n {
            let mut sum = a[i * n + j];
            for k in 0..i {
                sum -= a[i * n + k] * a[k * n + j];
            }
            a[i * n + j] = sum;
        }

        for j in i + 1..n {
            let mut sum = a[j * n + i];
            for k in 0..i {
                sum -= a[j * n + k] * a[k * n + i];
            }
            a[j * n + i] = sum / a[i * n + i];
        }
    }
}

/// Parallel LU decomposition.
///
/// Per pivot step, the matrix splits around row `i`: the pivot-row update distributes over its
/// trailing elements, the column update below the pivot distributes over the remaining rows.
pub fn par_lud<T: Real>(n: usize, a: &mut [T]) {
    for i in 0..n {
        let (above, rest) = a.split_at_mut(i * n);
        let above: &[T] = above;
        let (row_i, below) = rest.split_at_mut(n);
        let (left, right) = row_i.split_at_mut(i);
        let left: &[T] = left;

        right.par_iter_mut().enumerate().for_each(|(jj, aij)| {
            let j = i + jj;
            let mut sum = *aij;
            for k in 0..i {
                sum -= left[k] * above[k * n + j];
            }
            *aij = sum;
        });

        let pivot = right[0];
        below.par_chunks_exact_mut(n).for_each(|a_row| {
            let mut sum = a_row[i];
            for k in 0..i {
                sum -= a_row[k] * above[k * n + i];
            }
            a_row[i] = sum / pivot;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validation;

    /// Full-rank input: the benchmark's index profile plus a diagonal bump, so every
    /// elimination step has a well-defined column norm.
    fn gramschmidt_input(n: usize) -> Vec<f64> {
        (0..n * n)
            .map(|idx| {
                let (i, j) = (idx / n, idx % n);
                ((i + 1) * (j + 1)) as f64 / (n + 1) as f64 + if i == j { 1.0 } else { 0.0 }
            })
            .collect()
    }

    /// Diagonally dominant symmetric Toeplitz matrix, stable to factor without pivoting.
    fn lud_input(n: usize) -> Vec<f64> {
        let mut coe = vec![0.0_f64; 2 * n - 1];
        for j in 0..n {
            let c = 10.0 * (-0.001 * j as f64).exp();
            coe[n - 1 + j] = c;
            coe[n - 1 - j] = c;
        }
        (0..n * n)
            .map(|idx| {
                let (i, j) = (idx / n, idx % n);
                coe[n - 1 - i + j]
            })
            .collect()
    }

    #[test]
    fn gramschmidt_produces_orthonormal_columns() {
        let n = 8;
        let mut a = gramschmidt_input(n);
        let mut r = vec![0.0; n * n];
        let mut q = vec![0.0; n * n];
        gramschmidt(n, &mut a, &mut r, &mut q);

        // Q^T * Q should be the identity.
        for c1 in 0..n {
            for c2 in 0..n {
                let dot: f64 = (0..n).map(|i| q[i * n + c1] * q[i * n + c2]).sum();
                let expected = if c1 == c2 { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-6, "columns {c1}/{c2}: {dot}");
            }
        }
    }

    #[test]
    fn par_gramschmidt_matches_sequential() {
        let n = 20;
        let mut a_seq = gramschmidt_input(n);
        let (mut r_seq, mut q_seq) = (vec![0.0; n * n], vec![0.0; n * n]);
        gramschmidt(n, &mut a_seq, &mut r_seq, &mut q_seq);

        let mut a_par = gramschmidt_input(n);
        let (mut r_par, mut q_par) = (vec![0.0; n * n], vec![0.0; n * n]);
        par_gramschmidt(n, &mut a_par, &mut r_par, &mut q_par);

        let mut v = Validation::new(0.5);
        v.compare(&a_seq, &a_par);
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn lud_reconstructs_input() {
        let n = 10;
        let a0 = lud_input(n);
        let mut a = a0.clone();
        lud(n, &mut a);

        // Rebuild A from the packed factors: L has a unit diagonal, U sits on and above it.
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..=i.min(j) {
                    let l = if k == i { 1.0 } else { a[i * n + k] };
                    acc += l * a[k * n + j];
                }
                let reference = a0[i * n + j];
                assert!(
                    (acc - reference).abs() < 1e-6 * reference.abs().max(1.0),
                    "at ({i}, {j}): {acc} vs {reference}"
                );
            }
        }
    }

    #[test]
    fn par_lud_matches_sequential() {
        let n = 24;
        let mut a_seq = lud_input(n);
        lud(n, &mut a_seq);
        let mut a_par = lud_input(n);
        par_lud(n, &mut a_par);

        let mut v = Validation::new(0.5);
        v.compare(&a_seq, &a_par);
        assert!(v.passed(), "{v}");
    }
}
