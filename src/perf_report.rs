//! Performance report related structures and functions.
//!
//! This module defines all the necessary data structures and functions needed to generate
//! performance reports out of the recorded execution times of the benchmarked kernels.

use crate::consts;

use statistical::{mean, standard_deviation};

use std::{fmt, io::Write};

/// List of implemented kernels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelKind {
    Conv2d,
    Conv3d,
    /// 2-D finite-difference time-domain; carries the number of time steps so the operation
    /// count can be derived.
    Fdtd2d {
        steps: usize,
    },
    Gemm,
    Mm2,
    Mm3,
    Atax,
    Bicg,
    Mvt,
    Gesummv,
    Syrk,
    Syr2k,
    Gramschmidt,
    Lud,
    Correlation,
    Covariance,
    KNearest,
    NearestPairs,
    Mriq,
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conv2d => write!(f, "conv2d"),
            Self::Conv3d => write!(f, "conv3d"),
            Self::Fdtd2d { .. } => write!(f, "fdtd2d"),
            Self::Gemm => write!(f, "gemm"),
            Self::Mm2 => write!(f, "2mm"),
            Self::Mm3 => write!(f, "3mm"),
            Self::Atax => write!(f, "atax"),
            Self::Bicg => write!(f, "bicg"),
            Self::Mvt => write!(f, "mvt"),
            Self::Gesummv => write!(f, "gesummv"),
            Self::Syrk => write!(f, "syrk"),
            Self::Syr2k => write!(f, "syr2k"),
            Self::Gramschmidt => write!(f, "gramschmidt"),
            Self::Lud => write!(f, "lud"),
            Self::Correlation => write!(f, "correlation"),
            Self::Covariance => write!(f, "covariance"),
            Self::KNearest => write!(f, "k-nearest"),
            Self::NearestPairs => write!(f, "nearest-pairs"),
            Self::Mriq => write!(f, "mriq"),
        }
    }
}

impl KernelKind {
    /// Percent-difference threshold used when cross-checking this kernel's seq/par outputs.
    pub fn error_threshold(&self) -> f64 {
        match self {
            Self::Mm2 => 1.5,
            Self::KNearest => 0.05,
            Self::NearestPairs => 0.01,
            _ => consts::ERROR_THRESHOLD,
        }
    }

    /// Nominal data footprint in bytes and operation count in FLOPs for a problem with `n`
    /// elements per dimension and `elem_size`-byte floating-point elements.
    ///
    /// These are analytic approximations of each loop nest (resident arrays, multiply/add count
    /// of the innermost bodies); they only feed the derived bandwidth/intensity/throughput
    /// columns of the report.
    pub fn traffic(&self, n: usize, elem_size: usize) -> (usize, usize) {
        // Fixed-layout nearest-neighbor records: an i32 index next to one element.
        let sel_size = elem_size + 4;
        let point_size = 8;

        match *self {
            Self::Conv2d => (2 * elem_size * n * n, 17 * n.saturating_sub(2).pow(2)),
            Self::Conv3d => (2 * elem_size * n * n * n, 29 * n.saturating_sub(2).pow(3)),
            Self::Fdtd2d { steps } => (
                elem_size * (3 * n * n + 2 * n + steps),
                11 * n * n * steps,
            ),
            Self::Gemm => (3 * elem_size * n * n, n * n * (2 * n + 3)),
            Self::Mm2 => (5 * elem_size * n * n, 4 * n * n * n),
            Self::Mm3 => (7 * elem_size * n * n, 6 * n * n * n),
            Self::Atax => (elem_size * (n * n + 3 * n), 4 * n * n),
            Self::Bicg => (elem_size * (n * n + 4 * n), 4 * n * n),
            Self::Mvt => (elem_size * (n * n + 6 * n), 4 * n * n),
            Self::Gesummv => (elem_size * (2 * n * n + 3 * n), 4 * n * n + 3 * n),
            Self::Syrk => (2 * elem_size * n * n, 3 * n * n * n + n * n),
            Self::Syr2k => (3 * elem_size * n * n, 6 * n * n * n + n * n),
            Self::Gramschmidt => (3 * elem_size * n * n, 2 * n * n * n),
            Self::Lud => (elem_size * n * n, 2 * n * n * n / 3),
            Self::Correlation => (
                2 * elem_size * (n + 1) * (n + 1),
                n * n * n + 7 * n * n,
            ),
            Self::Covariance => (
                2 * elem_size * (n + 1) * (n + 1),
                n * n * n + 3 * n * n,
            ),
            Self::KNearest => (
                sel_size * n * n + point_size * (n + n / 2),
                7 * (n / 2) * n,
            ),
            Self::NearestPairs => (
                sel_size * n * n + point_size * n,
                7 * n * n.saturating_sub(1) / 2,
            ),
            Self::Mriq => (12 * elem_size * n, 16 * n * n),
        }
    }
}

/// Possible kernel implementations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelVariant {
    Seq,
    Par,
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seq => write!(f, "sequential"),
            Self::Par => write!(f, "parallel"),
        }
    }
}

/// Performance information and statistics of a benchmark.
pub struct PerfReport {
    /// Benchmarked kernel.
    kernel: KernelKind,
    /// Implementation variant of the kernel.
    variant: KernelVariant,
    /// Number of elements per dimension.
    nb_elems_per_dim: usize,
    /// Size in bytes.
    nb_bytes: usize,
    /// Number of floating-point operations.
    nb_flops: usize,
    /// Minimum recorded runtime in milliseconds.
    min_time: f64,
    /// Median recorded runtime in milliseconds.
    median_time: f64,
    /// Maximum recorded runtime in milliseconds.
    max_time: f64,
    /// Average runtime in milliseconds.
    avg_time: f64,
    /// Runtime standard deviation.
    stddev_time: f64,
    /// Arithmetic intensity in FLOPs/byte.
    arithmetic_intensity: f64,
    /// Memory bandwidth in GiB/s.
    memory_bandwidth: f64,
    /// Computational performance in GFLOP/s.
    computational_performance: f64,
}

impl PerfReport {
    pub fn print_csv_header(output: &mut dyn Write) {
        writeln!(
            output,
            "kernel,variant,elems_per_dim,Bytes,FLOPs,min_runtime,median_runtime,max_runtime,avg_runtime,stddev,FLOPs/Byte,GiB/s,GFLOP/s"
        ).expect("Failed to write report's CSV header");
    }

    /// Creates a new `PerfReport` given a kernel, its variant, the number of elements per
    /// dimension, the element size in bytes and the recorded execution times (in seconds).
    pub fn new(
        kernel: KernelKind,
        variant: KernelVariant,
        nb_elems_per_dim: usize,
        elem_size: usize,
        durations: &mut [f64],
    ) -> Self {
        // Sort durations to avoid having to do two passes to get both min and max elements
        durations.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let min_time = *durations.first().expect("Failed to get minimum duration") * 1e3;
        let median_time = *durations
            .get(durations.len() / 2)
            .expect("Failed to get median duration")
            * 1e3;
        let max_time = *durations.last().expect("Failed to get maximum duration") * 1e3;
        let avg_time = mean(durations);
        let stddev_time = standard_deviation(durations, Some(avg_time));

        let (nb_bytes, nb_flops) = kernel.traffic(nb_elems_per_dim, elem_size);

        let memory_bandwidth = nb_bytes as f64 / 1024_f64.powi(3) / avg_time;
        let arithmetic_intensity = nb_flops as f64 / nb_bytes as f64;
        let computational_performance = nb_flops as f64 / (1024_f64.powi(3) * avg_time);

        let avg_time = avg_time * 1e3;

        Self {
            kernel,
            variant,
            nb_elems_per_dim,
            nb_bytes,
            nb_flops,
            min_time,
            median_time,
            max_time,
            avg_time,
            stddev_time,
            arithmetic_intensity,
            memory_bandwidth,
            computational_performance,
        }
    }
}

impl fmt::Display for PerfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{:18.15},{:18.15},{:18.15},{:18.15},{},{},{},{}",
            self.kernel,
            self.variant,
            self.nb_elems_per_dim,
            self.nb_bytes,
            self.nb_flops,
            self.min_time,
            self.median_time,
            self.max_time,
            self.avg_time,
            self.stddev_time,
            self.arithmetic_intensity,
            self.memory_bandwidth,
            self.computational_performance,
        )
    }
}
