//! Kernel implementations.
//!
//! This module contains the actual implementation of the benchmarked loop nests. Every kernel
//! comes in two renditions with numerically equivalent output: a plain sequential loop nest, and
//! a `par_`-prefixed data-parallel variant built on [`rayon`][1]'s parallel iterators.
//!
//! The parallel variants keep the per-element arithmetic (and accumulation order) of their
//! sequential reference; they only redistribute independent iterations over the worker pool, so
//! the two outputs agree up to platform floating-point behavior.
//!
//! [1]: https://crates.io/crates/rayon

pub mod decomp;
pub mod linalg;
pub mod mriq;
pub mod nearest;
pub mod stats;
pub mod stencil;
