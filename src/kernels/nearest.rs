//! Nearest-neighbor search kernels.
//!
//! Both kernels fill an n x n matrix of [`SelPoint`] records (a distance next to the index of
//! the point that produced it) and then sort rows ascending by distance. Entries that are never
//! written keep the [`UNSELECTED`] sentinel, which the sort pushes to the end of its row.

use rayon::prelude::*;

use crate::utils::{real, Real};

/// Distance assigned to entries no measurement was taken for.
pub const UNSELECTED: f64 = 100_000.0;

/// A 2-D point with integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A measured candidate: distance value and the index of the point it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelPoint<T> {
    pub position: i32,
    pub value: T,
}

impl<T: Real> SelPoint<T> {
    /// The sentinel record rows start from.
    pub fn unselected() -> Self {
        Self {
            position: 0,
            value: real(UNSELECTED),
        }
    }
}

fn distance<T: Real>(a: Point, b: Point) -> T {
    let x: T = real((a.x - b.x) as f64);
    let y: T = real((a.y - b.y) as f64);
    (x * x + y * y).sqrt()
}

fn sort_row<T: Real>(row: &mut [SelPoint<T>]) {
    row.sort_unstable_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
}

/// Distances from every point to each pivot; each pivot's row ends up sorted ascending.
///
/// `selected` has one row per point but only the first `pivots.len()` rows are populated; the
/// rest keep their initial records.
pub fn k_nearest<T: Real>(pivots: &[Point], points: &[Point], selected: &mut [SelPoint<T>]) {
    let n = points.len();

    for (i, &pivot) in pivots.iter().enumerate() {
        for (j, &point) in points.iter().enumerate() {
            selected[i * n + j] = SelPoint {
                position: j as i32,
                value: distance(pivot, point),
            };
        }
    }

    for i in 0..pivots.len() {
        sort_row(&mut selected[i * n..(i + 1) * n]);
    }
}

/// Parallel k-nearest: each task owns one pivot's row, for the distance pass and the sort alike.
pub fn par_k_nearest<T: Real>(pivots: &[Point], points: &[Point], selected: &mut [SelPoint<T>]) {
    let n = points.len();

    selected[..pivots.len() * n]
        .par_chunks_exact_mut(n)
        .enumerate()
        .for_each(|(i, row)| {
            let pivot = pivots[i];
            for (j, &point) in points.iter().enumerate() {
                row[j] = SelPoint {
                    position: j as i32,
                    value: distance(pivot, point),
                };
            }
        });

    selected[..pivots.len() * n]
        .par_chunks_exact_mut(n)
        .for_each(|row| sort_row(row));
}

/// Symmetric all-pairs distance matrix over one point set; every row ends up sorted ascending.
///
/// The diagonal (a point against itself) is never measured and keeps its initial record.
pub fn nearest_pairs<T: Real>(points: &[Point], selected: &mut [SelPoint<T>]) {
    let n = points.len();

    for i in 0..n {
        for j in i + 1..n {
            let d: T = distance(points[i], points[j]);
            selected[i * n + j] = SelPoint {
                position: j as i32,
                value: d,
            };
            selected[j * n + i] = SelPoint {
                position: i as i32,
                value: d,
            };
        }
    }

    for i in 0..n {
        sort_row(&mut selected[i * n..(i + 1) * n]);
    }
}

/// Parallel all-pairs variant: each task owns one full row and measures both directions of a
/// pair itself (the squared form makes the two directions bitwise identical), trading the
/// symmetric scatter for disjoint row writes.
pub fn par_nearest_pairs<T: Real>(points: &[Point], selected: &mut [SelPoint<T>]) {
    let n = points.len();

    selected
        .par_chunks_exact_mut(n)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, &point) in points.iter().enumerate() {
                if j != i {
                    row[j] = SelPoint {
                        position: j as i32,
                        value: distance(points[i], point),
                    };
                }
            }
        });

    selected
        .par_chunks_exact_mut(n)
        .for_each(|row| sort_row(row));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validation;

    fn pivot_set(n: usize) -> Vec<Point> {
        (0..n / 2)
            .map(|i| Point {
                x: i as i32 * 3,
                y: i as i32 * 2,
            })
            .collect()
    }

    fn point_set(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point {
                x: i as i32 * 3,
                y: i as i32 * 2,
            })
            .collect()
    }

    fn sentinel_matrix(n: usize) -> Vec<SelPoint<f32>> {
        vec![SelPoint::unselected(); n * n]
    }

    #[test]
    fn k_nearest_rows_are_sorted_and_start_at_zero_distance() {
        let n = 16;
        let (pivots, points) = (pivot_set(n), point_set(n));
        let mut selected = sentinel_matrix(n);
        k_nearest(&pivots, &points, &mut selected);

        for i in 0..pivots.len() {
            let row = &selected[i * n..(i + 1) * n];
            // Pivot i coincides with point i, so the nearest candidate is itself.
            assert_eq!(row[0].value, 0.0);
            assert_eq!(row[0].position, i as i32);
            for j in 1..n {
                assert!(row[j - 1].value <= row[j].value);
            }
        }
        // Non-pivot rows keep the sentinel.
        let tail = &selected[pivots.len() * n..];
        assert!(tail.iter().all(|s| s == &SelPoint::unselected()));
    }

    #[test]
    fn par_k_nearest_matches_sequential() {
        let n = 32;
        let (pivots, points) = (pivot_set(n), point_set(n));
        let mut seq = sentinel_matrix(n);
        k_nearest(&pivots, &points, &mut seq);
        let mut par = sentinel_matrix(n);
        par_k_nearest(&pivots, &points, &mut par);

        let mut v = Validation::new(0.05);
        for (s, p) in seq.iter().zip(par.iter()) {
            v.check(s.value, p.value);
            v.check(s.position as f32, p.position as f32);
        }
        assert!(v.passed(), "{v}");
    }

    #[test]
    fn nearest_pairs_is_symmetric_before_sorting_and_sorted_after() {
        let n = 12;
        let points: Vec<Point> = (0..n)
            .map(|i| Point {
                x: i as i32,
                y: i as i32 * 2,
            })
            .collect();
        let mut selected: Vec<SelPoint<f32>> = vec![SelPoint::unselected(); n * n];
        nearest_pairs(&points, &mut selected);

        for i in 0..n {
            let row = &selected[i * n..(i + 1) * n];
            for j in 1..n {
                assert!(row[j - 1].value <= row[j].value);
            }
            // The unmeasured self-entry carries the sentinel and lands at the end of the row.
            assert_eq!(row[n - 1].value, real::<f32>(UNSELECTED));
        }
    }

    #[test]
    fn par_nearest_pairs_matches_sequential() {
        let n = 24;
        let points: Vec<Point> = (0..n)
            .map(|i| Point {
                x: i as i32,
                y: i as i32 * 2,
            })
            .collect();
        let mut seq: Vec<SelPoint<f32>> = vec![SelPoint::unselected(); n * n];
        nearest_pairs(&points, &mut seq);
        let mut par: Vec<SelPoint<f32>> = vec![SelPoint::unselected(); n * n];
        par_nearest_pairs(&points, &mut par);

        let mut v = Validation::new(0.01);
        for (s, p) in seq.iter().zip(par.iter()) {
            v.check(s.value, p.value);
            v.check(s.position as f32, p.position as f32);
        }
        assert!(v.passed(), "{v}");
    }
}
