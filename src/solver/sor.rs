//! Successive over-relaxation.

use ndarray::{Array, Zip};

use crate::grid::{Lattice, Stencil};

use super::{gauss_seidel, Sweep};

/// One SOR pass: a Gauss-Seidel candidate extrapolated by `alpha`.
///
/// Free cells become `alpha * (candidate - current) + current`; fixed cells
/// keep their value. ΔV is measured between the extrapolated grid and
/// `current`. The factor should lie in `(1, 2)` to accelerate convergence
/// without destabilizing it; this is not checked.
pub(crate) fn sor<D: Stencil>(
    lattice: &Lattice<D>,
    current: &Array<f64, D>,
    dx2: f64,
    alpha: f64,
) -> Sweep<D> {
    let mut next = gauss_seidel(lattice, current, dx2).potential;

    Zip::from(&mut next)
        .and(current)
        .and(lattice.fixed())
        .for_each(|value, &old, &fixed| {
            if !fixed {
                *value = alpha * (*value - old) + old;
            }
        });

    let delta = super::total_change(current, &next, lattice.fixed());
    Sweep {
        potential: next,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Ix2;

    fn plates() -> Lattice<Ix2> {
        let mut lattice = Lattice::<Ix2>::zeros(9).unwrap();
        for i in 2..7 {
            lattice.pin((i, 3), -1.0);
            lattice.pin((i, 5), 1.0);
        }
        lattice
    }

    #[test]
    fn test_unit_factor_is_gauss_seidel() {
        let lattice = plates();
        let gs = gauss_seidel(&lattice, lattice.potential(), 0.0);
        let sor = sor(&lattice, lattice.potential(), 0.0, 1.0);
        assert_eq!(gs, sor);
    }

    #[test]
    fn test_extrapolates_free_cells() {
        let lattice = plates();
        let gs = gauss_seidel(&lattice, lattice.potential(), 0.0);
        let sweep = sor(&lattice, lattice.potential(), 0.0, 1.5);

        // Starting from zero, every free cell is scaled by alpha.
        for ((cell, &value), &candidate) in sweep.potential.indexed_iter().zip(gs.potential.iter()) {
            if !lattice.is_fixed(cell) {
                assert_abs_diff_eq!(value, 1.5 * candidate, epsilon = 1e-15);
            }
        }
        assert_abs_diff_eq!(sweep.delta, 1.5 * gs.delta, epsilon = 1e-12);
    }

    #[test]
    fn test_fixed_cells_are_not_extrapolated() {
        let lattice = plates();
        let mut current = lattice.potential().clone();
        for _ in 0..20 {
            current = sor(&lattice, &current, 0.0, 1.8).potential;
        }
        for i in 2..7 {
            assert_eq!(current[(i, 3)], -1.0);
            assert_eq!(current[(i, 5)], 1.0);
        }
        assert_eq!(current.row(0).sum(), 0.0);
    }
}
