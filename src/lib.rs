//! # Relax Core
//!
//! Iterative finite-difference solvers for the electrostatic Poisson and
//! Laplace equations on square (2D) and cubic (3D) grids.
//!
//! This library provides:
//! - Jacobi, Gauss-Seidel and successive over-relaxation update rules
//!   sharing one dimension-generic stencil
//! - Explicit fixed-cell masks for boundaries, plates and electrodes
//! - A convergence driver with configurable loop condition and cycle cap
//! - Reference scenarios and derived electric fields
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`grid`] - Stencils, validated lattices and rank dispatch
//! - [`solver`] - Update rules and the convergence loop
//! - [`scenario`] - Reference initial conditions
//! - [`field`] - Electric field and cross-sections
//! - [`output`] - CSV export (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! relax --scenario capacitor --method sor --extent 61 --output-dir results
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use relax_core::{scenario, Method, Solver, SolverConfig};
//!
//! let lattice = scenario::capacitor(-1.0, 1.0, 31)?;
//! let solver = Solver::new(SolverConfig::new().with_method(Method::Sor))?;
//! let solution = solver.solve(&lattice)?;
//! println!("{} cycles, ΔV = {:.2e}", solution.cycles, solution.delta);
//! # Ok::<(), relax_core::RelaxError>(())
//! ```
//!
//! ## Relaxation Method
//!
//! Every pass replaces each free cell with the average of its axis
//! neighbours plus the scaled source term ρ·dx². The driver runs ten
//! priming cycles of two passes each, then keeps cycling until ΔV, the
//! total absolute change of a pass, drops below ε = 1e-6 · N².

pub mod error;
pub mod field;
pub mod grid;
pub mod scenario;
pub mod solver;

#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod output;

// Re-export main types for convenience
pub use error::{RelaxError, Result};
pub use grid::{Grid, Lattice, Problem, Stencil};
pub use solver::{Continuation, Method, Solution, Solver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmRelaxation;
