//! Jacobi relaxation.

use ndarray::Array;

use crate::grid::{relaxed_value, Lattice, Stencil};

use super::Sweep;

/// One Jacobi pass over `current`.
///
/// Every free cell is replaced by the stencil average of the previous
/// iterate. Reads never see a value written in the same pass, so the result
/// does not depend on traversal order.
///
/// `current` must have the lattice's shape.
pub(crate) fn jacobi<D: Stencil>(lattice: &Lattice<D>, current: &Array<f64, D>, dx2: f64) -> Sweep<D> {
    debug_assert_eq!(current.shape(), lattice.potential().shape());

    let source = lattice.source();
    let mut next = current.clone();
    let mut delta = 0.0;

    D::for_each_interior(lattice.extent(), |cell| {
        if lattice.is_fixed(cell) {
            return;
        }
        let value = relaxed_value(current, source, cell, dx2);
        delta += (value - current[cell]).abs();
        next[cell] = value;
    });

    Sweep {
        potential: next,
        delta,
    }
}

/// Fork-join Jacobi pass.
///
/// Cells are relaxed concurrently with rayon; ΔV is accumulated afterwards
/// in traversal order, so the result is bit-identical to [`jacobi`].
#[cfg(feature = "parallel")]
pub(crate) fn jacobi_parallel<D: Stencil>(
    lattice: &Lattice<D>,
    current: &Array<f64, D>,
    dx2: f64,
) -> Sweep<D> {
    use rayon::prelude::*;

    debug_assert_eq!(current.shape(), lattice.potential().shape());

    let n = lattice.extent();
    let source = lattice.source();
    let mut next = current.as_standard_layout().into_owned();

    let (Some(values), Some(fixed)) = (next.as_slice_mut(), lattice.fixed().as_slice()) else {
        return jacobi(lattice, current, dx2);
    };

    values
        .par_iter_mut()
        .zip(fixed.par_iter())
        .enumerate()
        .for_each(|(offset, (value, &fixed))| {
            if !fixed {
                *value = relaxed_value(current, source, D::cell_at(offset, n), dx2);
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
    use ndarray::{Array2, Array3, Ix2, Ix3};

    fn plate_lattice() -> Lattice<Ix2> {
        let mut lattice = Lattice::<Ix2>::zeros(7).unwrap();
        for i in 0..7 {
            lattice.pin((i, 0), -1.0);
            lattice.pin((i, 6), 1.0);
        }
        lattice.pin((3, 3), 0.25);
        lattice
    }

    /// Jacobi pass applied in reverse traversal order.
    fn reversed_pass(lattice: &Lattice<Ix2>, current: &Array2<f64>, dx2: f64) -> Array2<f64> {
        let mut cells = Vec::new();
        Ix2::for_each_interior(lattice.extent(), |cell| cells.push(cell));

        let mut next = current.clone();
        for cell in cells.into_iter().rev() {
            if !lattice.is_fixed(cell) {
                next[cell] = relaxed_value(current, lattice.source(), cell, dx2);
            }
        }
        next
    }

    #[test]
    fn test_jacobi_single_pass() {
        let lattice = plate_lattice();
        let sweep = jacobi(&lattice, lattice.potential(), 0.0);

        // Cells next to the plates and the pinned centre pick up their values.
        assert_eq!(sweep.potential[(3, 1)], -0.25);
        assert_eq!(sweep.potential[(3, 5)], 0.25);
        assert_eq!(sweep.potential[(3, 2)], 0.0625);
        assert_eq!(sweep.potential[(2, 3)], 0.0625);
        assert_eq!(sweep.potential[(3, 3)], 0.25);
    }

    #[test]
    fn test_jacobi_order_independence() {
        let lattice = plate_lattice();
        let mut current = lattice.potential().clone();
        for _ in 0..5 {
            let forward = jacobi(&lattice, &current, 0.01);
            let backward = reversed_pass(&lattice, &current, 0.01);
            assert_eq!(forward.potential, backward);
            current = forward.potential;
        }
    }

    #[test]
    fn test_jacobi_does_not_touch_input() {
        let lattice = plate_lattice();
        let before = lattice.clone();
        let _ = jacobi(&lattice, lattice.potential(), 0.0);
        assert_eq!(lattice, before);
    }

    #[test]
    fn test_jacobi_source_term_3d() {
        let mut lattice = Lattice::<Ix3>::zeros(3).unwrap();
        lattice.set_source((1, 1, 1), 6.0);
        let sweep = jacobi(&lattice, lattice.potential(), 0.5);

        assert_eq!(sweep.potential[(1, 1, 1)], 0.5);
        assert_eq!(sweep.delta, 0.5);
    }

    #[test]
    fn test_jacobi_delta_sums_changes() {
        let lattice = plate_lattice();
        let sweep = jacobi(&lattice, lattice.potential(), 0.0);
        let expected: f64 = sweep
            .potential
            .iter()
            .zip(lattice.potential().iter())
            .map(|(new, old)| (new - old).abs())
            .sum();
        approx::assert_abs_diff_eq!(sweep.delta, expected, epsilon = 1e-12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let mut lattice = Lattice::<Ix3>::zeros(9).unwrap();
        lattice.set_source((4, 4, 4), 1.0);
        lattice.pin((2, 3, 4), 0.7);

        let mut sequential = lattice.potential().clone();
        let mut parallel: Array3<f64> = lattice.potential().clone();
        for _ in 0..10 {
            let a = jacobi(&lattice, &sequential, 0.1);
            let b = jacobi_parallel(&lattice, &parallel, 0.1);
            assert_eq!(a, b);
            sequential = a.potential;
            parallel = b.potential;
        }
    }
}
