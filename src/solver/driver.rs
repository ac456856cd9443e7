//! Outer relaxation loop.

use ndarray::{Array, Ix2, Ix3};

use crate::error::{RelaxError, Result};
use crate::grid::{Grid, Lattice, Problem, Stencil};

use super::{Continuation, SolverConfig, Sweep};

/// Converged (or capped) output of the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<G> {
    /// The last computed potential
    pub potential: G,
    /// ΔV reported by the last pass
    pub delta: f64,
    /// Tolerance the loop compared against
    pub tolerance: f64,
    /// Double-update cycles run, priming included
    pub cycles: usize,
    /// Update passes run (two per cycle)
    pub passes: usize,
}

impl<G> Solution<G> {
    /// Whether the last pass changed the grid by less than the tolerance.
    pub fn converged(&self) -> bool {
        self.delta < self.tolerance
    }

    /// Transform the potential, keeping the convergence record.
    pub fn map<H>(self, f: impl FnOnce(G) -> H) -> Solution<H> {
        Solution {
            potential: f(self.potential),
            delta: self.delta,
            tolerance: self.tolerance,
            cycles: self.cycles,
            passes: self.passes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Priming { remaining: usize },
    Iterating,
    Done,
}

/// Drives an update rule to convergence.
///
/// A run starts with `priming_cycles` unconditional double-update cycles,
/// then keeps cycling for as long as the configured [`Continuation`] holds.
/// The lattice passed in is never modified.
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }
}

impl Solver {
    /// Create a solver, validating the configuration.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run a single update pass over `current`.
    ///
    /// Fails with [`RelaxError::ShapeMismatch`] unless `current` has the
    /// lattice's shape.
    pub fn step<D: Stencil>(
        &self,
        lattice: &Lattice<D>,
        current: &Array<f64, D>,
    ) -> Result<Sweep<D>> {
        check_iterate(lattice, current)?;
        Ok(self.pass(lattice, current))
    }

    /// Run one double-update cycle; the second pass supplies grid and ΔV.
    pub fn cycle<D: Stencil>(
        &self,
        lattice: &Lattice<D>,
        current: &Array<f64, D>,
    ) -> Result<Sweep<D>> {
        check_iterate(lattice, current)?;
        Ok(self.double_pass(lattice, current))
    }

    fn pass<D: Stencil>(&self, lattice: &Lattice<D>, current: &Array<f64, D>) -> Sweep<D> {
        let dx = lattice.spacing(self.config.domain_length);
        self.config.method.sweep(
            lattice,
            current,
            dx * dx,
            self.config.over_relaxation,
            self.config.parallel,
        )
    }

    fn double_pass<D: Stencil>(&self, lattice: &Lattice<D>, current: &Array<f64, D>) -> Sweep<D> {
        let first = self.pass(lattice, current);
        self.pass(lattice, &first.potential)
    }

    /// Relax the lattice until the continuation rule stops the loop.
    ///
    /// Fails with [`RelaxError::NonConvergence`] when ΔV stops being finite
    /// or the cycle cap is hit under [`Continuation::UntilConverged`]. Under
    /// [`Continuation::WhileConverged`] hitting the cap means the grid is
    /// already within tolerance, so the last grid is returned.
    #[tracing::instrument(
        name = "Relaxation",
        skip_all,
        fields(method = %self.config.method, extent = lattice.extent())
    )]
    pub fn solve<D: Stencil>(&self, lattice: &Lattice<D>) -> Result<Solution<Array<f64, D>>> {
        let tolerance = self.config.tolerance_for(lattice.extent());
        let continuation = self.config.continuation;

        let mut potential = lattice.potential().clone();
        let mut delta = f64::INFINITY;
        let mut cycles = 0;
        let mut iterating = 0;

        let mut phase = if self.config.priming_cycles > 0 {
            Phase::Priming {
                remaining: self.config.priming_cycles,
            }
        } else {
            Phase::Iterating
        };

        loop {
            phase = match phase {
                Phase::Priming { remaining } => {
                    let sweep = self.double_pass(lattice, &potential);
                    potential = sweep.potential;
                    delta = sweep.delta;
                    cycles += 1;

                    if remaining > 1 {
                        Phase::Priming {
                            remaining: remaining - 1,
                        }
                    } else {
                        tracing::debug!(cycles, delta, "Priming finished");
                        Phase::Iterating
                    }
                }
                Phase::Iterating => {
                    // ΔV starts at infinity, so only a computed value counts.
                    if cycles > 0 && !delta.is_finite() {
                        tracing::warn!(cycles, delta, tolerance, "Relaxation diverged");
                        return Err(RelaxError::non_convergence(cycles, delta, tolerance));
                    }
                    if !continuation.should_continue(delta, tolerance) {
                        Phase::Done
                    } else if self.config.max_cycles.map_or(false, |cap| iterating >= cap) {
                        match continuation {
                            Continuation::UntilConverged => {
                                tracing::warn!(cycles, delta, tolerance, "Cycle cap reached");
                                return Err(RelaxError::non_convergence(cycles, delta, tolerance));
                            }
                            Continuation::WhileConverged => {
                                tracing::warn!(
                                    cycles,
                                    delta,
                                    tolerance,
                                    "Cycle cap reached while converged, stopping"
                                );
                                Phase::Done
                            }
                        }
                    } else {
                        let sweep = self.double_pass(lattice, &potential);
                        potential = sweep.potential;
                        delta = sweep.delta;
                        cycles += 1;
                        iterating += 1;
                        tracing::trace!(cycles, delta, "Relaxation cycle");
                        Phase::Iterating
                    }
                }
                Phase::Done => break,
            };
        }

        tracing::info!(cycles, delta, tolerance, "Relaxation finished");
        Ok(Solution {
            potential,
            delta,
            tolerance,
            cycles,
            passes: 2 * cycles,
        })
    }

    /// Run exactly `cycles` double-update cycles with no convergence test.
    pub fn relax_cycles<D: Stencil>(
        &self,
        lattice: &Lattice<D>,
        cycles: usize,
    ) -> Solution<Array<f64, D>> {
        let mut potential = lattice.potential().clone();
        let mut delta = f64::INFINITY;

        for cycle in 0..cycles {
            let sweep = self.double_pass(lattice, &potential);
            potential = sweep.potential;
            delta = sweep.delta;
            tracing::trace!(cycle, delta, "Relaxation cycle");
        }

        Solution {
            potential,
            delta,
            tolerance: self.config.tolerance_for(lattice.extent()),
            cycles,
            passes: 2 * cycles,
        }
    }

    /// [`Solver::solve`] for a problem of either rank.
    pub fn solve_problem(&self, problem: &Problem) -> Result<Solution<Grid>> {
        match problem {
            Problem::Planar(lattice) => Ok(self.solve::<Ix2>(lattice)?.map(Grid::Planar)),
            Problem::Volumetric(lattice) => Ok(self.solve::<Ix3>(lattice)?.map(Grid::Volumetric)),
        }
    }

    /// [`Solver::relax_cycles`] for a problem of either rank.
    pub fn relax_problem_cycles(&self, problem: &Problem, cycles: usize) -> Solution<Grid> {
        match problem {
            Problem::Planar(lattice) => self.relax_cycles(lattice, cycles).map(Grid::Planar),
            Problem::Volumetric(lattice) => {
                self.relax_cycles(lattice, cycles).map(Grid::Volumetric)
            }
        }
    }
}

fn check_iterate<D: Stencil>(lattice: &Lattice<D>, current: &Array<f64, D>) -> Result<()> {
    if current.shape() != lattice.potential().shape() {
        return Err(RelaxError::shape_mismatch(format!(
            "iterate has shape {:?} but the lattice has shape {:?}",
            current.shape(),
            lattice.potential().shape()
        )));
    }
    Ok(())
}
