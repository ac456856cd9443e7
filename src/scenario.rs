//! Reference initial conditions.
//!
//! Each constructor bakes boundary values, fixed cells and charge density
//! into a [`Lattice`] ready for the solver:
//!
//! | Scenario | Rank | Fixed cells | Source |
//! |----------|------|-------------|--------|
//! | [`capacitor`] | 2D | boundary (V=0) and two plates at V1, V2 | none |
//! | [`linear_box`] | 2D | left wall V1, right wall V2, linear top/bottom | none |
//! | [`point_charge`] | 3D | boundary (V=0) | one charge at the centre |

use std::fmt;
use std::str::FromStr;

use ndarray::{Ix2, Ix3};
use serde::Deserialize;

use crate::error::{RelaxError, Result};
use crate::grid::{Lattice, Problem};

/// Selects one of the reference initializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Scenario {
    /// Parallel-plate capacitor in a grounded box
    #[default]
    Capacitor,
    /// Box with two walls at fixed potential and linear walls between
    LinearBox,
    /// Single charge in a grounded cube
    PointCharge,
}

impl Scenario {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Capacitor => "capacitor",
            Scenario::LinearBox => "box",
            Scenario::PointCharge => "point-charge",
        }
    }

    /// Build the scenario with extent `n`.
    ///
    /// `v1`/`v2` are the two electrode potentials of the planar scenarios;
    /// `charge` is the source density of the point charge.
    pub fn build(&self, n: usize, v1: f64, v2: f64, charge: f64) -> Result<Problem> {
        match self {
            Scenario::Capacitor => capacitor(v1, v2, n).map(Problem::from),
            Scenario::LinearBox => linear_box(v1, v2, n).map(Problem::from),
            Scenario::PointCharge => point_charge(n, charge).map(Problem::from),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = RelaxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "capacitor" => Ok(Scenario::Capacitor),
            "box" | "linear-box" | "linear_box" => Ok(Scenario::LinearBox),
            "point-charge" | "point_charge" | "charge" => Ok(Scenario::PointCharge),
            other => Err(RelaxError::invalid_parameter(
                "scenario",
                format!("unknown scenario '{}' (expected capacitor, box or point-charge)", other),
            )),
        }
    }
}

impl TryFrom<String> for Scenario {
    type Error = RelaxError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Two parallel plates inside a grounded square.
///
/// The plates are the columns `n/3` (at `v1`) and `2n/3` (at `v2`),
/// spanning rows `3(n-1)/10 .. 7(n-1)/10`. Plate cells are fixed
/// explicitly in the mask.
pub fn capacitor(v1: f64, v2: f64, n: usize) -> Result<Lattice<Ix2>> {
    let mut lattice = Lattice::<Ix2>::zeros(n)?;

    let left = n / 3;
    let right = 2 * n / 3;
    for i in (3 * (n - 1) / 10)..(7 * (n - 1) / 10) {
        lattice.pin((i, left), v1);
        lattice.pin((i, right), v2);
    }

    Ok(lattice)
}

/// A square whose left column is held at `v1` and right column at `v2`.
///
/// The top and bottom rows are non-conducting walls along which the
/// potential varies linearly from `v1` to `v2`.
pub fn linear_box(v1: f64, v2: f64, n: usize) -> Result<Lattice<Ix2>> {
    let mut lattice = Lattice::<Ix2>::zeros(n)?;

    for i in 0..n {
        lattice.pin((i, 0), v1);
        lattice.pin((i, n - 1), v2);
    }

    let step = (v2 - v1) / (n - 1) as f64;
    for j in 1..n - 1 {
        let value = v1 + step * j as f64;
        lattice.pin((0, j), value);
        lattice.pin((n - 1, j), value);
    }

    Ok(lattice)
}

/// A grounded cube with `charge` at the centre cell `(n-1)/2` on each axis.
pub fn point_charge(n: usize, charge: f64) -> Result<Lattice<Ix3>> {
    let mut lattice = Lattice::<Ix3>::zeros(n)?;
    let c = (n - 1) / 2;
    lattice.set_source((c, c, c), charge);
    Ok(lattice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::solver::{Method, Solver, SolverConfig};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_capacitor_layout() {
        let lattice = capacitor(-1.0, 1.0, 31).unwrap();
        assert_eq!(lattice.potential()[(9, 10)], -1.0);
        assert_eq!(lattice.potential()[(20, 20)], 1.0);
        assert_eq!(lattice.potential()[(21, 20)], 0.0);
        assert_eq!(lattice.potential()[(8, 10)], 0.0);
        assert!(lattice.is_fixed((15, 10)));
        assert!(!lattice.is_fixed((15, 15)));
        assert_eq!(lattice.free_cells(), 29 * 29 - 24);
    }

    #[test]
    fn test_linear_box_walls() {
        let lattice = linear_box(-1.0, 1.0, 5).unwrap();
        let top: Vec<f64> = lattice.potential().row(0).to_vec();
        assert_eq!(top, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(lattice.potential().row(4).to_vec(), top);
        assert_eq!(lattice.potential()[(2, 0)], -1.0);
        assert_eq!(lattice.potential()[(2, 4)], 1.0);
    }

    #[test]
    fn test_point_charge_centre() {
        let lattice = point_charge(31, 1.0).unwrap();
        assert_eq!(lattice.source()[(15, 15, 15)], 1.0);
        assert_eq!(lattice.source().sum(), 1.0);
    }

    #[test]
    fn test_parse_scenarios() {
        assert_eq!("box".parse::<Scenario>().unwrap(), Scenario::LinearBox);
        assert_eq!("Point-Charge".parse::<Scenario>().unwrap(), Scenario::PointCharge);
        assert!("tokamak".parse::<Scenario>().is_err());
        assert_eq!(Scenario::PointCharge.build(5, 0.0, 0.0, 1.0).unwrap().rank(), 3);
    }

    #[test]
    fn test_capacitor_solution_is_antisymmetric() {
        let n = 31;
        let lattice = capacitor(-1.0, 1.0, n).unwrap();
        let solution = Solver::default().solve(&lattice).unwrap();
        let v = &solution.potential;
        assert!(solution.converged());

        let mid = 15;
        for i in 0..n {
            assert_abs_diff_eq!(v[(i, mid)], 0.0, epsilon = 1e-9);
            for d in 1..=mid {
                assert_abs_diff_eq!(v[(i, mid + d)], -v[(i, mid - d)], epsilon = 1e-9);
            }
        }
        assert!(v[(15, 12)] < 0.0);
        assert!(v[(15, 18)] > 0.0);
    }

    #[test]
    fn test_linear_box_rows_interpolate() {
        let n = 31;
        let lattice = linear_box(-1.0, 1.0, n).unwrap();
        let solution = Solver::default().solve(&lattice).unwrap();

        for row in solution.potential.rows() {
            for pair in row.to_vec().windows(2) {
                assert!(pair[1] > pair[0]);
            }
            for (j, &value) in row.iter().enumerate() {
                assert_abs_diff_eq!(value, -1.0 + 2.0 * j as f64 / 30.0, epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn test_point_charge_is_radially_symmetric() {
        let n = 31;
        let c = 15;
        let lattice = point_charge(n, 1.0).unwrap();
        let solver = Solver::new(SolverConfig::new().with_method(Method::Jacobi)).unwrap();
        let v = solver.relax_cycles(&lattice, 100).potential;

        for d in 1..=c {
            let reference = v[(c + d, c, c)];
            for value in [
                v[(c - d, c, c)],
                v[(c, c + d, c)],
                v[(c, c - d, c)],
                v[(c, c, c + d)],
                v[(c, c, c - d)],
            ] {
                assert_abs_diff_eq!(value, reference, epsilon = 1e-12);
            }
        }
        for d in 0..c {
            assert!(v[(c + d, c, c)] > v[(c + d + 1, c, c)]);
        }

        let plane = field::mid_plane(&v, 0).unwrap();
        let (peak, _) = plane
            .indexed_iter()
            .fold(((0, 0), f64::MIN), |best, (cell, &value)| {
                if value > best.1 {
                    (cell, value)
                } else {
                    best
                }
            });
        assert_eq!(peak, (c, c));
    }
}
