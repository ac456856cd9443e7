//! Relaxation solvers for the discrete Poisson equation.
//!
//! This module provides the numerical engine: three update rules sharing
//! one stencil, and an outer loop that drives them to convergence.
//!
//! ## Discretization
//!
//! On a grid with spacing dx the Poisson equation ∇²V = -ρ becomes, for
//! every free cell,
//! ```text
//! V[c] = ( Σ V[neighbours of c] + ρ[c]·dx² ) / (2·rank)
//! ```
//!
//! ## Update rules
//!
//! - [`Method::Jacobi`] reads only the previous iterate
//! - [`Method::GaussSeidel`] sweeps in place, reading values already
//!   updated in the same pass
//! - [`Method::Sor`] extrapolates a Gauss-Seidel pass by the factor α
//!
//! Each pass returns the next iterate together with ΔV, the total absolute
//! change over free cells, which the [`Solver`] compares against the
//! tolerance ε.

mod config;
mod driver;
mod gauss_seidel;
mod jacobi;
mod method;
mod sor;

pub use config::{Continuation, SolverConfig};
pub use driver::{Solution, Solver};
pub use method::Method;

pub(crate) use gauss_seidel::gauss_seidel;
pub(crate) use jacobi::jacobi;
#[cfg(feature = "parallel")]
pub(crate) use jacobi::jacobi_parallel;
pub(crate) use sor::sor;

use ndarray::Array;

/// Double-update cycles run before the convergence test is consulted.
pub const DEFAULT_PRIMING_CYCLES: usize = 10;

/// Per-cell tolerance factor: ε = factor · N².
pub const TOLERANCE_SCALE: f64 = 1e-6;

/// Default SOR over-relaxation factor α.
pub const DEFAULT_OVER_RELAXATION: f64 = 1.5;

/// Default physical length of the domain along each axis.
pub const DEFAULT_DOMAIN_LENGTH: f64 = 2.0;

/// Default cap on cycles after priming.
pub const DEFAULT_MAX_CYCLES: usize = 100_000;

/// Result of one update pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep<D: ndarray::Dimension> {
    /// The next iterate
    pub potential: Array<f64, D>,
    /// Total absolute change over free cells
    pub delta: f64,
}

/// Default tolerance for a grid of extent `n`.
pub fn scaled_tolerance(n: usize) -> f64 {
    TOLERANCE_SCALE * (n * n) as f64
}

/// Σ|new − old| over free cells, in traversal order.
pub(crate) fn total_change<D: ndarray::Dimension>(
    old: &Array<f64, D>,
    new: &Array<f64, D>,
    fixed: &Array<bool, D>,
) -> f64 {
    old.iter()
        .zip(new.iter())
        .zip(fixed.iter())
        .filter(|&(_, &fixed)| !fixed)
        .fold(0.0, |delta, ((old, new), _)| delta + (new - old).abs())
}
