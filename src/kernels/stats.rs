//! Correlation and covariance kernels.
//!
//! Both kernels keep the one-based (n + 1) x (n + 1) padded layout of their benchmark
//! definition: row and column zero are never touched. `data` is centered (and for the
//! correlation also reduced) in place before the symmetric output matrix is accumulated.

use rayon::prelude::*;

use crate::utils::{real, Real};

/// Fixed population normaliser applied to column means and deviations.
pub const POPULATION: f64 = 3214212.01;
/// Deviations at or below this magnitude are clamped to one before the reduction.
pub const STDDEV_EPS: f64 = 0.005;

/// Correlation matrix of the columns of `data`.
pub fn correlation<T: Real>(
    n: usize,
    data: &mut [T],
    mean: &mut [T],
    stddev: &mut [T],
    symmat: &mut [T],
) {
    let w = n + 1;
    let population: T = real(POPULATION);
    let eps: T = real(STDDEV_EPS);

    // Column means.
    for j in 1..=n {
        mean[j] = T::zero();
        for i in 1..=n {
            mean[j] += data[i * w + j];
        }
        mean[j] /= population;
    }

    // Column standard deviations.
    for j in 1..=n {
        stddev[j] = T::zero();
        for i in 1..=n {
            stddev[j] += (data[i * w + j] - mean[j]) * (data[i * w + j] - mean[j]);
        }
        stddev[j] /= population;
        stddev[j] = stddev[j].sqrt();
        if stddev[j] <= eps {
            stddev[j] = T::one();
        }
    }

    // Center and reduce the column vectors.
    for i in 1..=n {
        for j in 1..=n {
            data[i * w + j] -= mean[j];
            data[i * w + j] /= population.sqrt() * stddev[j];
        }
    }

    // Correlation matrix: unit diagonal, symmetric off-diagonal products.
    for j1 in 1..n {
        symmat[j1 * w + j1] = T::one();
        for j2 in j1 + 1..=n {
            symmat[j1 * w + j2] = T::zero();
            for i in 1..=n {
                symmat[j1 * w + j2] += data[i * w + j1] * data[i * w + j2];
            }
            symmat[j2 * w + j1] = symmat[j1 * w + j2];
        }
    }
    symmat[n * w + n] = T::one();
}

/// Parallel correlation.
///
/// The mean/deviation passes distribute over columns, centering over data rows, and the output
/// accumulation over the rows of the upper triangle; the lower triangle is mirrored afterwards.
pub fn par_correlation<T: Real>(
    n: usize,
    data: &mut [T],
    mean: &mut [T],
    stddev: &mut [T],
    symmat: &mut [T],
) {
    let w = n + 1;
    let population: T = real(POPULATION);
    let eps: T = real(STDDEV_EPS);

    {
        let data: &[T] = data;
        mean[1..].par_iter_mut().enumerate().for_each(|(jj, m)| {
            let j = jj + 1;
            let mut acc = T::zero();
            for i in 1..=n {
                acc += data[i * w + j];
            }
            *m = acc / population;
        });

        let mean: &[T] = mean;
        stddev[1..].par_iter_mut().enumerate().for_each(|(jj, sd)| {
            let j = jj + 1;
            let mut acc = T::zero();
            for i in 1..=n {
                acc += (data[i * w + j] - mean[j]) * (data[i * w + j] - mean[j]);
            }
            acc /= population;
            acc = acc.sqrt();
            *sd = if acc <= eps { T::one() } else { acc };
        });
    }

    {
        let (mean, stddev): (&[T], &[T]) = (mean, stddev);
        data.par_chunks_exact_mut(w).skip(1).for_each(|row| {
            for j in 1..=n {
                row[j] -= mean[j];
                row[j] /= population.sqrt() * stddev[j];
            }
        });
    }

    let data: &[T] = data;
    symmat
        .par_chunks_exact_mut(w)
        .enumerate()
        .skip(1)
        .take(n - 1)
        .for_each(|(j1, row)| {
            row[j1] = T::one();
            for j2 in j1 + 1..=n {
                let mut acc = T::zero();
                for i in 1..=n {
                    acc += data[i * w + j1] * data[i * w + j2];
                }
                row[j2] = acc;
            }
        });

    // Mirror of the upper triangle.
    for j1 in 1..n {
        for j2 in j1 + 1..=n {
            symmat[j2 * w + j1] = symmat[j1 * w + j2];
        }
    }
    symmat[n * w + n] = T::one();
}

/// Covariance matrix of the columns of `data`.
pub fn covariance<T: Real>(n: usize, data: &mut [T], mean: &mut [T], symmat: &mut [T]) {
    let w = n + 1;
    let population: T = real(POPULATION);

    // Column means.
    for j in 1..=n {
        mean[j] = T::zero();
        for i in 1..=n {
            mean[j] += data[i * w + j];
        }
        mean[j] /= population;
    }

    // Center the column vectors.
    for i in 1..=n {
        for j in 1..=n {
            data[i * w + j] -= mean[j];
        }
    }

    // Covariance matrix, diagonal included.
    for j1 in 1..=n {
        for j2 in j1..=n {
            symmat[j1 * w + j2] = T::zero();
            for i in 1..=n {
                symmat[j1 * w + j2] += data[i * w + j1] * data[i * w + j2];
            }
            symmat[j2 * w + j1] = symmat[j1 * w + j2];
        }
    }
}

/// Parallel covariance; same distribution scheme as [`par_correlation`].
pub fn par_covariance<T: Real>(n: usize, data: &mut [T], mean: &mut [T], symmat: &mut [T]) {
    let w = n + 1;
    let population: T = real(POPULATION);

    {
        let data: &[T] = data;
        mean[1..].par_iter_mut().enumerate().for_each(|(jj, m)| {
            let j = jj + 1;
            let mut acc = T::zero();
            for i in 1..=n {
                acc += data[i * w + j];
            }
            *m = acc / population;
        });
    }

    {
        let mean: &[T] = mean;
        data.par_chunks_exact_mut(w).skip(1).for_each(|row| {
            for j in 1..=n {
                row[j] -= mean[j];
            }
        });
    }

    let data: &[T] = data;
    symmat
        .par_chunks_exact_mut(w)
        .enumerate()
        .skip(1)
        .for_each(|(j1, row)| {
            for j2 in j1..=n {
                let mut acc = T::zero();
                for i in 1..=n {
                    acc += data[i * w + j1] * data[i * w + j2];
                }
                row[j2] = acc;
            }
        });

    // Mirror of the upper triangle.
    for j1 in 1..=n {
        for j2 in j1 + 1..=n {
            symmat[j2 * w + j1] = symmat[j1 * w + j2];
        }
    }
}
