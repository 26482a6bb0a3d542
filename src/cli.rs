//! Command-Line Interface related code.
//!
//! This module handles the parsing of CLI arguments using the [`clap`][1] crate.
//! It defines the availables runtime options and subcommands.
//!
//! [1]: https://crates.io/crates/clap

use crate::consts;

use clap::{Parser, Subcommand, ValueEnum};

use std::path::PathBuf;

/// Benchmarking of parallel numeric loop nests.
///
/// Each subcommand profiles one kernel in two renditions: a plain sequential loop nest and a
/// data-parallel variant running on the multi-core host. Both are timed over the requested
/// problem sizes and their outputs are cross-checked elementwise against the kernel's
/// percent-difference threshold.
#[derive(Clone, Debug, Parser)]
pub struct CliArgs {
    /// Number of meta-repetitions for the benchmark.
    #[arg(
        short,
        long,
        value_name = "META_REPS",
        default_value_t = consts::META_REPETITIONS,
        value_parser = clap::value_parser!(u8).range(2..u8::MAX.into()),
    )]
    pub meta_repetitions: u8,

    /// Number of repetitions of the tight loop.
    #[arg(
        short,
        long,
        value_name = "TIGHT_REPS",
        default_value_t = consts::TIGHT_LOOP_REPETITIONS,
        value_parser = clap::value_parser!(u16).range(1..u16::MAX.into()),
    )]
    pub tight_loop_repetitions: u16,

    /// Floating-point format the kernels run on.
    #[arg(short, long, value_enum, default_value_t = Precision::Single)]
    pub precision: Precision,

    /// Kernel command to run.
    #[command(subcommand)]
    pub kernel: KernelCmd,

    /// Output file, defaults to `stdout` if unspecified.
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Seed for the random number generator (RNG).
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Skip the seq/par cross-check (results are then consumed by a dead-code-elimination
    /// guard instead).
    #[arg(long)]
    pub skip_check: bool,
}

/// Floating-point precision selection (see [IEEE 754][1]).
///
/// [1]: https://en.wikipedia.org/wiki/IEEE_754
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Precision {
    /// 32-bit floating-point elements.
    Single,
    /// 64-bit floating-point elements.
    Double,
}

/// List of available kernels to profile.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum KernelCmd {
    /// Two dimensional (2D) convolution with a fixed 3x3 stencil.
    Conv2d {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Three dimensional (3D) convolution with a fixed 3x3x3 stencil.
    Conv3d {
        /// Sizes of the volumes.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// 2-D finite-difference time-domain kernel over ex/ey/hz fields.
    Fdtd2d {
        /// Sizes of the field grids.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,

        /// Number of simulated time steps.
        #[arg(long, default_value_t = consts::TIME_STEPS)]
        time_steps: usize,
    },
    /// General matrix multiplication: C = alpha * A * B + beta * C.
    Gemm {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Two chained matrix multiplications: C = A * B; E = C * D.
    #[command(name = "2mm")]
    Mm2 {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Three chained matrix multiplications: E = A * B; F = C * D; G = E * F.
    #[command(name = "3mm")]
    Mm3 {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Matrix transpose and vector multiplication: y = A^T * (A * x).
    Atax {
        /// Sizes of the matrix.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// BiCG sub-kernel of the BiCGStab linear solver: s = A^T * r; q = A * p.
    Bicg {
        /// Sizes of the matrix.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Matrix-vector product and transpose: x1 += A * y1; x2 += A^T * y2.
    Mvt {
        /// Sizes of the matrix.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Scalar, vector and matrix multiplication: y = alpha * A * x + beta * B * x.
    Gesummv {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Symmetric rank-k update: C = alpha * A * A^T + beta * C.
    Syrk {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Symmetric rank-2k update: C = alpha * (A * B^T + B * A^T) + beta * C.
    Syr2k {
        /// Sizes of the matrices.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Gram-Schmidt QR decomposition; A is reduced in place.
    Gramschmidt {
        /// Sizes of the matrix.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// In-place LU decomposition without pivoting.
    Lud {
        /// Sizes of the matrix.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Correlation matrix of a synthetic data set.
    Correlation {
        /// Numbers of variables/observations.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Covariance matrix of a synthetic data set.
    Covariance {
        /// Numbers of variables/observations.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Distances from every point to each pivot, each pivot's row sorted ascending.
    KNearest {
        /// Numbers of points (half of them serve as pivots).
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Symmetric all-pairs distance matrix, every row sorted ascending.
    NearestPairs {
        /// Numbers of points.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
    /// Non-uniform k-space sampling: Qr/Qi accumulated over all k-space samples.
    Mriq {
        /// Numbers of k-space samples and of sample coordinates.
        #[arg(short, long, required = true, num_args = 1..)]
        sizes: Vec<usize>,
    },
}

impl KernelCmd {
    /// The problem sizes requested for the selected kernel.
    pub fn sizes(&self) -> &[usize] {
        match self {
            Self::Conv2d { sizes }
            | Self::Conv3d { sizes }
            | Self::Fdtd2d { sizes, .. }
            | Self::Gemm { sizes }
            | Self::Mm2 { sizes }
            | Self::Mm3 { sizes }
            | Self::Atax { sizes }
            | Self::Bicg { sizes }
            | Self::Mvt { sizes }
            | Self::Gesummv { sizes }
            | Self::Syrk { sizes }
            | Self::Syr2k { sizes }
            | Self::Gramschmidt { sizes }
            | Self::Lud { sizes }
            | Self::Correlation { sizes }
            | Self::Covariance { sizes }
            | Self::KNearest { sizes }
            | Self::NearestPairs { sizes }
            | Self::Mriq { sizes } => sizes,
        }
    }
}
