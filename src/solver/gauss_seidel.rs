//! Gauss-Seidel relaxation.

use ndarray::Array;

use crate::grid::{relaxed_value, Lattice, Stencil};

use super::Sweep;

/// One in-place Gauss-Seidel pass over a copy of `current`.
///
/// Cells are visited in ascending order (i, then j, then k) and each write
/// is visible to the cells that follow, so lower-index neighbours are read
/// from this pass and higher-index neighbours from the previous one.
pub(crate) fn gauss_seidel<D: Stencil>(
    lattice: &Lattice<D>,
    current: &Array<f64, D>,
    dx2: f64,
) -> Sweep<D> {
    debug_assert_eq!(current.shape(), lattice.potential().shape());

    let source = lattice.source();
    let mut next = current.clone();
    let mut delta = 0.0;

    D::for_each_interior(lattice.extent(), |cell| {
        if lattice.is_fixed(cell) {
            return;
        }
        let old = next[cell];
        let value = relaxed_value(&next, source, cell, dx2);
        delta += (value - old).abs();
        next[cell] = value;
    });

    Sweep {
        potential: next,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::jacobi;
    use approx::assert_abs_diff_eq;
    use ndarray::{Ix2, Ix3};

    fn left_wall(n: usize) -> Lattice<Ix2> {
        let mut lattice = Lattice::<Ix2>::zeros(n).unwrap();
        for i in 0..n {
            lattice.pin((i, 0), 1.0);
        }
        lattice
    }

    #[test]
    fn test_updates_are_visible_within_pass() {
        let lattice = left_wall(4);
        let sweep = gauss_seidel(&lattice, lattice.potential(), 0.0);

        assert_eq!(sweep.potential[(1, 1)], 0.25);
        assert_eq!(sweep.potential[(1, 2)], 0.0625);
        assert_eq!(sweep.potential[(2, 1)], 0.3125);
        assert_eq!(sweep.potential[(2, 2)], 0.09375);
        assert_eq!(sweep.delta, 0.71875);

        // Jacobi leaves cells without a fixed neighbour untouched.
        let jacobi = jacobi(&lattice, lattice.potential(), 0.0);
        assert_eq!(jacobi.potential[(2, 2)], 0.0);
    }

    #[test]
    fn test_same_fixed_point_as_jacobi() {
        let lattice = left_wall(8);
        let mut gs = lattice.potential().clone();
        let mut jac = lattice.potential().clone();
        for _ in 0..2000 {
            gs = gauss_seidel(&lattice, &gs, 0.0).potential;
            jac = jacobi(&lattice, &jac, 0.0).potential;
        }
        for (a, b) in gs.iter().zip(jac.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sweep_order_3d() {
        let mut lattice = Lattice::<Ix3>::zeros(4).unwrap();
        lattice.pin((0, 1, 1), 6.0);
        let sweep = gauss_seidel(&lattice, lattice.potential(), 0.0);

        assert_eq!(sweep.potential[(1, 1, 1)], 1.0);
        // (1, 1, 2) follows (1, 1, 1) along k and sees its new value.
        assert_eq!(sweep.potential[(1, 1, 2)], 1.0 / 6.0);
        // (2, 1, 1) follows along i.
        assert_eq!(sweep.potential[(2, 1, 1)], 1.0 / 6.0);
    }
}
