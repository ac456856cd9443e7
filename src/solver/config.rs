//! Solver configuration.

use serde::Deserialize;

use crate::error::{RelaxError, Result};

use super::{
    scaled_tolerance, Method, DEFAULT_DOMAIN_LENGTH, DEFAULT_MAX_CYCLES, DEFAULT_OVER_RELAXATION,
    DEFAULT_PRIMING_CYCLES,
};

/// When the outer loop keeps cycling after priming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Continuation {
    /// Keep cycling while ΔV ≥ ε, i.e. until the change drops below tolerance.
    #[default]
    UntilConverged,
    /// Keep cycling while ΔV < ε.
    ///
    /// The historical loop condition. It exits on the first cycle that is
    /// not yet converged and never exits once the grid has converged.
    WhileConverged,
}

impl Continuation {
    /// Whether another cycle should run after one that reported `delta`.
    pub fn should_continue(&self, delta: f64, tolerance: f64) -> bool {
        match self {
            Continuation::UntilConverged => delta >= tolerance,
            Continuation::WhileConverged => delta < tolerance,
        }
    }
}

/// Configuration for the relaxation solver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Update rule.
    pub method: Method,
    /// Physical length of the domain along each axis; dx = L / (N - 1).
    pub domain_length: f64,
    /// Over-relaxation factor α (SOR only).
    pub over_relaxation: f64,
    /// Absolute tolerance on ΔV. `None` uses 1e-6 · N².
    pub tolerance: Option<f64>,
    /// Loop condition after priming.
    pub continuation: Continuation,
    /// Double-update cycles run before the loop condition is consulted.
    pub priming_cycles: usize,
    /// Cap on cycles after priming. `None` removes the cap.
    pub max_cycles: Option<usize>,
    /// Run Jacobi passes fork-join (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            domain_length: DEFAULT_DOMAIN_LENGTH,
            over_relaxation: DEFAULT_OVER_RELAXATION,
            tolerance: None,
            continuation: Continuation::default(),
            priming_cycles: DEFAULT_PRIMING_CYCLES,
            max_cycles: Some(DEFAULT_MAX_CYCLES),
            parallel: false,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the update rule.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the physical domain length.
    pub fn with_domain_length(mut self, domain_length: f64) -> Self {
        self.domain_length = domain_length;
        self
    }

    /// Set the SOR over-relaxation factor.
    ///
    /// - 1.0: plain Gauss-Seidel
    /// - 1.5 (default): reference configuration
    /// - approaching 2.0: faster on large grids, oscillatory early on
    pub fn with_over_relaxation(mut self, alpha: f64) -> Self {
        self.over_relaxation = alpha;
        self
    }

    /// Use an absolute tolerance instead of 1e-6 · N².
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set the loop condition.
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = continuation;
        self
    }

    /// Set the number of priming cycles.
    pub fn with_priming_cycles(mut self, cycles: usize) -> Self {
        self.priming_cycles = cycles;
        self
    }

    /// Set or remove the cycle cap.
    pub fn with_max_cycles(mut self, max_cycles: Option<usize>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Enable fork-join Jacobi passes.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tolerance for a grid of extent `n`.
    pub fn tolerance_for(&self, n: usize) -> f64 {
        self.tolerance.unwrap_or_else(|| scaled_tolerance(n))
    }

    /// Check parameters that would make every pass meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.domain_length.is_finite() || self.domain_length <= 0.0 {
            return Err(RelaxError::invalid_parameter(
                "domain_length",
                format!("must be finite and positive, got {}", self.domain_length),
            ));
        }
        if !self.over_relaxation.is_finite() {
            return Err(RelaxError::invalid_parameter(
                "over_relaxation",
                format!("must be finite, got {}", self.over_relaxation),
            ));
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(RelaxError::invalid_parameter(
                    "tolerance",
                    format!("must be finite and non-negative, got {}", tolerance),
                ));
            }
        }
        Ok(())
    }
}
