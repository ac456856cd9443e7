//! Error types for the relaxation solver.
//!
//! This module provides a unified error type [`RelaxError`] that covers
//! all error conditions that can occur while building a grid, configuring
//! a solver and running it to convergence.

use thiserror::Error;

/// Result type alias using [`RelaxError`].
pub type Result<T> = std::result::Result<T, RelaxError>;

/// Unified error type for all relaxation operations.
#[derive(Error, Debug)]
pub enum RelaxError {
    // ============ Configuration Errors ============
    /// Unknown relaxation method name
    #[error("Unsupported relaxation method '{name}' (expected jacobi, gauss-seidel or sor)")]
    UnsupportedMethod { name: String },

    /// Invalid solver or scenario parameter
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Configuration file could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============ Grid Errors ============
    /// Only two- and three-dimensional stencils are defined
    #[error("Unsupported grid dimensionality {rank} (only 2D and 3D grids are supported)")]
    UnsupportedDimensionality { rank: usize },

    /// Potential, source and mask disagree in shape, or the grid is not square/cubic
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// Grid has no interior cells to update
    #[error("Degenerate grid with extent {extent} (at least 3 points per axis are required)")]
    DegenerateGrid { extent: usize },

    // ============ Solver Errors ============
    /// Cycle cap reached, or ΔV diverged, before the change dropped below tolerance
    #[error("Relaxation did not converge after {cycles} cycles (ΔV: {delta:.2e}, tolerance: {tolerance:.2e})")]
    NonConvergence {
        cycles: usize,
        delta: f64,
        tolerance: f64,
    },

    // ============ I/O Errors ============
    /// Error writing a result file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RelaxError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    /// Create a non-convergence error
    pub fn non_convergence(cycles: usize, delta: f64, tolerance: f64) -> Self {
        Self::NonConvergence {
            cycles,
            delta,
            tolerance,
        }
    }

    /// Create a file write error
    pub fn file_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}
