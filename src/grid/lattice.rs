//! Validated potential/source/mask triples.

use ndarray::{Array, Zip};

use crate::error::{RelaxError, Result};

use super::Stencil;

/// A square (2D) or cubic (3D) relaxation problem.
///
/// Holds the initial potential, the charge density source and the mask of
/// fixed cells. Boundary cells are always fixed; initializers may fix
/// additional interior cells such as capacitor plates. All three arrays
/// share the same extent `n >= 3` on every axis and are stored in standard
/// layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice<D: Stencil> {
    potential: Array<f64, D>,
    source: Array<f64, D>,
    fixed: Array<bool, D>,
    extent: usize,
}

impl<D: Stencil> Lattice<D> {
    /// Create a lattice whose only fixed cells are the boundary.
    pub fn new(potential: Array<f64, D>, source: Array<f64, D>) -> Result<Self> {
        let fixed = Array::from_elem(potential.raw_dim(), false);
        Self::with_fixed(potential, source, fixed)
    }

    /// Create a Laplace problem (zero source).
    pub fn laplace(potential: Array<f64, D>) -> Result<Self> {
        let source = Array::zeros(potential.raw_dim());
        Self::new(potential, source)
    }

    /// Create a lattice with an explicit mask of fixed cells.
    ///
    /// Boundary cells are added to the mask regardless of its contents.
    pub fn with_fixed(
        potential: Array<f64, D>,
        source: Array<f64, D>,
        mut fixed: Array<bool, D>,
    ) -> Result<Self> {
        let extent = validate_extent(potential.shape())?;

        if source.shape() != potential.shape() {
            return Err(RelaxError::shape_mismatch(format!(
                "source shape {:?} does not match potential shape {:?}",
                source.shape(),
                potential.shape()
            )));
        }
        if fixed.shape() != potential.shape() {
            return Err(RelaxError::shape_mismatch(format!(
                "fixed mask shape {:?} does not match potential shape {:?}",
                fixed.shape(),
                potential.shape()
            )));
        }

        for (pattern, cell_fixed) in fixed.indexed_iter_mut() {
            if D::on_boundary(D::cell(pattern), extent) {
                *cell_fixed = true;
            }
        }

        Ok(Self {
            potential: standard_layout(potential),
            source: standard_layout(source),
            fixed: standard_layout(fixed),
            extent,
        })
    }

    /// An all-zero problem of extent `n`.
    pub fn zeros(n: usize) -> Result<Self> {
        Self::laplace(Array::zeros(D::cube(n)))
    }

    /// Set a cell's potential and exclude it from updates.
    pub fn pin(&mut self, cell: D::Cell, value: f64) {
        self.potential[cell] = value;
        self.fixed[cell] = true;
    }

    /// Set the charge density at a cell.
    pub fn set_source(&mut self, cell: D::Cell, value: f64) {
        self.source[cell] = value;
    }

    /// Fix every cell whose magnitude is exactly 1.0.
    ///
    /// Reproduces the historical 2D plate rule as a one-off mask update.
    /// Returns the number of newly fixed cells.
    pub fn fix_unit_magnitude(&mut self) -> usize {
        let mut count = 0;
        Zip::from(&mut self.fixed)
            .and(&self.potential)
            .for_each(|fixed, &value| {
                if !*fixed && value.abs() == 1.0 {
                    *fixed = true;
                    count += 1;
                }
            });
        count
    }

    /// Number of points along every axis.
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Grid spacing for a domain of the given physical length.
    pub fn spacing(&self, domain_length: f64) -> f64 {
        domain_length / (self.extent - 1) as f64
    }

    /// Initial potential.
    pub fn potential(&self) -> &Array<f64, D> {
        &self.potential
    }

    /// Charge density.
    pub fn source(&self) -> &Array<f64, D> {
        &self.source
    }

    /// Mask of cells excluded from updates.
    pub fn fixed(&self) -> &Array<bool, D> {
        &self.fixed
    }

    /// Whether a cell is excluded from updates.
    pub fn is_fixed(&self, cell: D::Cell) -> bool {
        self.fixed[cell]
    }

    /// Number of cells updated by each pass.
    pub fn free_cells(&self) -> usize {
        self.fixed.iter().filter(|&&fixed| !fixed).count()
    }
}

/// Extent of a square/cubic shape, rejecting degenerate grids.
pub(crate) fn validate_extent(shape: &[usize]) -> Result<usize> {
    let extent = shape.first().copied().unwrap_or(0);
    if shape.iter().any(|&len| len != extent) {
        return Err(RelaxError::shape_mismatch(format!(
            "grid must have the same extent on every axis, got shape {:?}",
            shape
        )));
    }
    if extent < 3 {
        return Err(RelaxError::DegenerateGrid { extent });
    }
    Ok(extent)
}

fn standard_layout<A: Clone, D: Stencil>(array: Array<A, D>) -> Array<A, D> {
    if array.is_standard_layout() {
        array
    } else {
        array.as_standard_layout().into_owned()
    }
}
