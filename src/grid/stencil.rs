//! Axis-neighbour stencils for square and cubic grids.

use ndarray::{Array, Dimension, Ix2, Ix3, NdIndex};

/// A grid rank with a direct-neighbour finite-difference stencil.
///
/// Implemented for [`Ix2`] (4-point stencil) and [`Ix3`] (6-point stencil).
/// Every axis of a grid has the same extent `n`, interior cells are those
/// with every index in `1..n-1`.
pub trait Stencil: Dimension {
    /// Index of a single cell.
    type Cell: NdIndex<Self> + Copy + Send + Sync;

    /// Number of axes.
    const RANK: usize;

    /// Number of direct neighbours (the stencil denominator).
    const NEIGHBOURS: f64;

    /// Shape of a grid with extent `n` on every axis.
    fn cube(n: usize) -> Self;

    /// Convert an ndarray index pattern into a cell.
    fn cell(pattern: Self::Pattern) -> Self::Cell;

    /// Cell at `offset` in row-major (standard layout) order.
    fn cell_at(offset: usize, n: usize) -> Self::Cell;

    /// Whether the cell lies on any face of the grid.
    fn on_boundary(cell: Self::Cell, n: usize) -> bool;

    /// Visit interior cells in ascending order (i, then j, then k).
    fn for_each_interior<F: FnMut(Self::Cell)>(n: usize, f: F);

    /// Sum of the direct neighbours of an interior cell.
    fn neighbour_sum(grid: &Array<f64, Self>, cell: Self::Cell) -> f64;
}

impl Stencil for Ix2 {
    type Cell = (usize, usize);

    const RANK: usize = 2;
    const NEIGHBOURS: f64 = 4.0;

    fn cube(n: usize) -> Self {
        ndarray::Ix2(n, n)
    }

    fn cell(pattern: Self::Pattern) -> Self::Cell {
        pattern
    }

    fn cell_at(offset: usize, n: usize) -> Self::Cell {
        (offset / n, offset % n)
    }

    fn on_boundary((i, j): Self::Cell, n: usize) -> bool {
        i == 0 || j == 0 || i == n - 1 || j == n - 1
    }

    fn for_each_interior<F: FnMut(Self::Cell)>(n: usize, mut f: F) {
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                f((i, j));
            }
        }
    }

    fn neighbour_sum(grid: &Array<f64, Self>, (i, j): Self::Cell) -> f64 {
        grid[(i + 1, j)] + grid[(i - 1, j)] + grid[(i, j + 1)] + grid[(i, j - 1)]
    }
}

impl Stencil for Ix3 {
    type Cell = (usize, usize, usize);

    const RANK: usize = 3;
    const NEIGHBOURS: f64 = 6.0;

    fn cube(n: usize) -> Self {
        ndarray::Ix3(n, n, n)
    }

    fn cell(pattern: Self::Pattern) -> Self::Cell {
        pattern
    }

    fn cell_at(offset: usize, n: usize) -> Self::Cell {
        (offset / (n * n), (offset / n) % n, offset % n)
    }

    fn on_boundary((i, j, k): Self::Cell, n: usize) -> bool {
        i == 0 || j == 0 || k == 0 || i == n - 1 || j == n - 1 || k == n - 1
    }

    fn for_each_interior<F: FnMut(Self::Cell)>(n: usize, mut f: F) {
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                for k in 1..n - 1 {
                    f((i, j, k));
                }
            }
        }
    }

    fn neighbour_sum(grid: &Array<f64, Self>, (i, j, k): Self::Cell) -> f64 {
        grid[(i + 1, j, k)]
            + grid[(i - 1, j, k)]
            + grid[(i, j + 1, k)]
            + grid[(i, j - 1, k)]
            + grid[(i, j, k + 1)]
            + grid[(i, j, k - 1)]
    }
}

/// New value of an interior cell: neighbour average plus the scaled source.
pub(crate) fn relaxed_value<D: Stencil>(
    grid: &Array<f64, D>,
    source: &Array<f64, D>,
    cell: D::Cell,
    dx2: f64,
) -> f64 {
    (D::neighbour_sum(grid, cell) + source[cell] * dx2) / D::NEIGHBOURS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_interior_order_2d() {
        let mut visited = Vec::new();
        Ix2::for_each_interior(4, |cell| visited.push(cell));
        assert_eq!(visited, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_interior_count_3d() {
        let mut count = 0;
        Ix3::for_each_interior(5, |_| count += 1);
        assert_eq!(count, 27);
    }

    #[test]
    fn test_cell_at_matches_standard_layout() {
        let n = 4;
        for (offset, (pattern, _)) in Array3::<f64>::zeros((n, n, n)).indexed_iter().enumerate() {
            assert_eq!(Ix3::cell_at(offset, n), pattern);
        }
        assert_eq!(Ix2::cell_at(7, 3), (2, 1));
    }

    #[test]
    fn test_boundary_detection() {
        assert!(Ix2::on_boundary((0, 2), 5));
        assert!(Ix2::on_boundary((3, 4), 5));
        assert!(!Ix2::on_boundary((2, 3), 5));
        assert!(Ix3::on_boundary((1, 1, 0), 5));
        assert!(!Ix3::on_boundary((1, 2, 3), 5));
    }

    #[test]
    fn test_relaxed_value_2d() {
        let mut grid = Array2::<f64>::zeros((3, 3));
        grid[(0, 1)] = 1.0;
        grid[(2, 1)] = 2.0;
        grid[(1, 0)] = 3.0;
        grid[(1, 2)] = 6.0;
        let mut source = Array2::<f64>::zeros((3, 3));
        source[(1, 1)] = 100.0;

        let value = relaxed_value(&grid, &source, (1, 1), 0.04);
        assert_abs_diff_eq!(value, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relaxed_value_3d() {
        let grid = Array3::<f64>::from_elem((3, 3, 3), 1.5);
        let source = Array3::<f64>::zeros((3, 3, 3));
        let value = relaxed_value(&grid, &source, (1, 1, 1), 1.0);
        assert_abs_diff_eq!(value, 1.5, epsilon = 1e-12);
    }
}
