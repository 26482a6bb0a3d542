//! loopmark - benchmarking of parallel numeric loop nests
//!
//! # About
//! loopmark times classic numerical loop nests (dense linear algebra, stencil computations,
//! convolution, correlation/covariance, nearest-neighbor search and non-uniform k-space
//! sampling) in two renditions each: a plain sequential loop nest, and a data-parallel variant
//! running on the multi-core host through [`rayon`][1]'s work-stealing pool.
//!
//! Each benchmark fills its input arrays with a deterministic synthetic pattern, measures both
//! variants over a configurable number of repetitions (inputs re-initialized before every
//! repetition) and cross-checks the two outputs elementwise against a per-kernel
//! percent-difference threshold. Timing statistics and derived metrics (arithmetic intensity,
//! memory bandwidth, computational performance) are emitted as CSV; validation verdicts go to
//! `stderr`.
//!
//! Profiling can be done on both single-precision and double-precision floating-point formats
//! (see [IEEE 754][2]).
//!
//! # Quickstart
//! ## Build
//! As any Rust-based project, loopmark is built and run with `cargo`:
//! ```sh
//! cargo build --release
//! ```
//!
//! ## Help
//! To see the available kernels and runtime options:
//! ```sh
//! cargo run --release -- help
//! ```
//!
//! ## Example run
//! To profile the GEMM kernel on multiple matrix sizes:
//! ```sh
//! cargo run --release -- gemm --sizes 256 512 1024
//! ```
//!
//! To run the 2-D stencil in double precision, without the cross-check:
//! ```sh
//! cargo run --release -- --precision double --skip-check conv2d --sizes 4096
//! ```
//!
//! ## Documentation
//! The crate's documentation is available using `cargo`:
//! ```sh
//! cargo doc --open
//! ```
//!
//! [1]: https://crates.io/crates/rayon
//! [2]: https://en.wikipedia.org/wiki/IEEE_754

pub mod cli;
pub mod consts;
pub mod drivers;
pub mod kernels;
pub mod perf_report;
pub mod utils;
pub mod validate;

use crate::cli::{CliArgs, Precision};

use clap::Parser;

fn main() {
    let args = CliArgs::parse();

    match args.precision {
        Precision::Single => drivers::dispatch::<f32>(args),
        Precision::Double => drivers::dispatch::<f64>(args),
    }
}
