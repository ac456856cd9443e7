//! WASM bindings for Relax Core.
//!
//! Grids cross the boundary as flat, row-major `Float64Array`s of length
//! `N^rank`.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmRelaxation } from 'relax_core';
//!
//! await init();
//!
//! const n = 31;
//! const potential = new Float64Array(n * n);
//! const source = new Float64Array(n * n);
//! // ... set boundary and electrode values ...
//!
//! const run = new WasmRelaxation(potential, source, 2, "sor");
//! console.log(run.cycles, run.delta);
//! draw(run.potential());
//! ```

use ndarray::{ArrayD, IxDyn};
use wasm_bindgen::prelude::*;

use crate::error::RelaxError;
use crate::grid::{Grid, Problem};
use crate::solver::{
    Continuation, Method, Solution, Solver, SolverConfig, DEFAULT_DOMAIN_LENGTH,
    DEFAULT_OVER_RELAXATION,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A finished relaxation run.
///
/// The grid is solved once, in the constructor; the getters expose the
/// result and its convergence record.
#[wasm_bindgen]
pub struct WasmRelaxation {
    solution: Solution<Grid>,
    extent: usize,
}

#[wasm_bindgen]
impl WasmRelaxation {
    /// Relax a grid with the default configuration and the given method.
    ///
    /// # Arguments
    /// * `potential` - Initial potential, boundary values included
    /// * `source` - Charge density, same length as `potential`
    /// * `rank` - 2 for a square grid, 3 for a cube
    /// * `method` - `"jacobi"`, `"gauss-seidel"` or `"sor"`
    ///
    /// # Example
    /// ```javascript
    /// const run = new WasmRelaxation(potential, source, 2, "jacobi");
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(
        potential: &[f64],
        source: &[f64],
        rank: usize,
        method: &str,
    ) -> Result<WasmRelaxation, JsValue> {
        Self::with_config(potential, source, rank, method, DEFAULT_OVER_RELAXATION, None, false, false)
    }

    /// Relax a grid with a custom configuration.
    ///
    /// # Arguments
    /// * `alpha` - Over-relaxation factor, used by `"sor"` only
    /// * `tolerance` - ΔV threshold; `undefined` selects 1e-6 · N²
    /// * `historical_loop` - Keep cycling while ΔV is below the tolerance
    /// * `unit_magnitude_fixed` - Also fix every cell whose |V| is exactly 1
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen]
    pub fn with_config(
        potential: &[f64],
        source: &[f64],
        rank: usize,
        method: &str,
        alpha: f64,
        tolerance: Option<f64>,
        historical_loop: bool,
        unit_magnitude_fixed: bool,
    ) -> Result<WasmRelaxation, JsValue> {
        let method: Method = method.parse().map_err(to_js)?;
        let mut problem = build_problem(potential, source, rank).map_err(to_js)?;
        if unit_magnitude_fixed {
            problem.fix_unit_magnitude();
        }

        let mut config = SolverConfig::new()
            .with_method(method)
            .with_over_relaxation(alpha);
        if let Some(tolerance) = tolerance {
            config = config.with_tolerance(tolerance);
        }
        if historical_loop {
            config = config.with_continuation(Continuation::WhileConverged);
        }

        let solver = Solver::new(config).map_err(to_js)?;
        let solution = solver.solve_problem(&problem).map_err(to_js)?;

        Ok(WasmRelaxation {
            extent: problem.extent(),
            solution,
        })
    }

    /// The relaxed potential, flat and row-major.
    #[wasm_bindgen]
    pub fn potential(&self) -> Vec<f64> {
        self.solution.potential.clone().into_dyn().iter().copied().collect()
    }

    /// Double-update cycles run, priming included.
    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> usize {
        self.solution.cycles
    }

    /// ΔV of the last pass.
    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.solution.delta
    }

    /// Whether the run stopped below the tolerance.
    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.solution.converged()
    }

    /// Points along every axis.
    #[wasm_bindgen(getter)]
    pub fn extent(&self) -> usize {
        self.extent
    }
}

fn to_js(err: RelaxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Reshape flat buffers into a square or cubic problem.
fn build_problem(potential: &[f64], source: &[f64], rank: usize) -> crate::error::Result<Problem> {
    if !(2..=3).contains(&rank) {
        return Err(RelaxError::UnsupportedDimensionality { rank });
    }
    if source.len() != potential.len() {
        return Err(RelaxError::shape_mismatch(format!(
            "source has {} values but potential has {}",
            source.len(),
            potential.len()
        )));
    }

    let n = (potential.len() as f64).powf(1.0 / rank as f64).round() as usize;
    if n.pow(rank as u32) != potential.len() {
        return Err(RelaxError::shape_mismatch(format!(
            "{} values do not form a grid of rank {}",
            potential.len(),
            rank
        )));
    }

    let shape = IxDyn(&vec![n; rank]);
    let reshape = |values: &[f64]| {
        ArrayD::from_shape_vec(shape.clone(), values.to_vec())
            .map_err(|e| RelaxError::shape_mismatch(e.to_string()))
    };
    Problem::from_dyn(reshape(potential)?, reshape(source)?, None)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default physical side length of the domain.
#[wasm_bindgen]
pub fn default_domain_length() -> f64 {
    DEFAULT_DOMAIN_LENGTH
}
