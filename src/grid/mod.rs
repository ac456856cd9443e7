//! Grids, stencils and dimension dispatch.
//!
//! A relaxation problem is a [`Lattice`] over a rank implementing
//! [`Stencil`]: `Lattice<Ix2>` for planar problems and `Lattice<Ix3>` for
//! volumetric ones. Dynamically shaped inputs are matched to one of the two
//! ranks once, at construction, by [`Problem::from_dyn`]; every sweep after
//! that is statically typed.

mod lattice;
mod stencil;

pub use lattice::Lattice;
pub use stencil::Stencil;

pub(crate) use lattice::validate_extent;
pub(crate) use stencil::relaxed_value;

use ndarray::{Array2, Array3, ArrayD, Ix2, Ix3, IxDyn};

use crate::error::{RelaxError, Result};

/// A potential field of either supported rank.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    /// N×N field
    Planar(Array2<f64>),
    /// N×N×N field
    Volumetric(Array3<f64>),
}

impl Grid {
    /// Match a dynamically shaped array to a supported rank.
    pub fn from_dyn(array: ArrayD<f64>) -> Result<Self> {
        match array.ndim() {
            2 => {
                let array = into_rank::<f64, Ix2>(array)?;
                validate_extent(array.shape())?;
                Ok(Grid::Planar(array))
            }
            3 => {
                let array = into_rank::<f64, Ix3>(array)?;
                validate_extent(array.shape())?;
                Ok(Grid::Volumetric(array))
            }
            rank => Err(RelaxError::UnsupportedDimensionality { rank }),
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        match self {
            Grid::Planar(_) => 2,
            Grid::Volumetric(_) => 3,
        }
    }

    /// Number of points along every axis.
    pub fn extent(&self) -> usize {
        match self {
            Grid::Planar(array) => array.nrows(),
            Grid::Volumetric(array) => array.shape()[0],
        }
    }

    /// The planar field, if this grid is two-dimensional.
    pub fn as_planar(&self) -> Option<&Array2<f64>> {
        match self {
            Grid::Planar(array) => Some(array),
            Grid::Volumetric(_) => None,
        }
    }

    /// The volumetric field, if this grid is three-dimensional.
    pub fn as_volumetric(&self) -> Option<&Array3<f64>> {
        match self {
            Grid::Planar(_) => None,
            Grid::Volumetric(array) => Some(array),
        }
    }

    /// Convert back into a dynamically shaped array.
    pub fn into_dyn(self) -> ArrayD<f64> {
        match self {
            Grid::Planar(array) => array.into_dyn(),
            Grid::Volumetric(array) => array.into_dyn(),
        }
    }
}

/// A validated relaxation problem of either supported rank.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Planar(Lattice<Ix2>),
    Volumetric(Lattice<Ix3>),
}

impl Problem {
    /// Build a problem from dynamically shaped potential, source and
    /// optional fixed mask.
    ///
    /// Fails with [`RelaxError::UnsupportedDimensionality`] for ranks other
    /// than 2 and 3, and with [`RelaxError::ShapeMismatch`] when the arrays
    /// disagree.
    pub fn from_dyn(
        potential: ArrayD<f64>,
        source: ArrayD<f64>,
        fixed: Option<ArrayD<bool>>,
    ) -> Result<Self> {
        let rank = potential.ndim();
        if source.ndim() != rank {
            return Err(RelaxError::shape_mismatch(format!(
                "source has rank {} but potential has rank {}",
                source.ndim(),
                rank
            )));
        }
        let fixed = fixed.unwrap_or_else(|| ArrayD::from_elem(potential.raw_dim(), false));

        match rank {
            2 => Ok(Problem::Planar(Lattice::with_fixed(
                into_rank(potential)?,
                into_rank(source)?,
                into_rank(fixed)?,
            )?)),
            3 => Ok(Problem::Volumetric(Lattice::with_fixed(
                into_rank(potential)?,
                into_rank(source)?,
                into_rank(fixed)?,
            )?)),
            rank => Err(RelaxError::UnsupportedDimensionality { rank }),
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        match self {
            Problem::Planar(_) => 2,
            Problem::Volumetric(_) => 3,
        }
    }

    /// Number of points along every axis.
    pub fn extent(&self) -> usize {
        match self {
            Problem::Planar(lattice) => lattice.extent(),
            Problem::Volumetric(lattice) => lattice.extent(),
        }
    }

    /// [`Lattice::fix_unit_magnitude`] for either rank.
    pub fn fix_unit_magnitude(&mut self) -> usize {
        match self {
            Problem::Planar(lattice) => lattice.fix_unit_magnitude(),
            Problem::Volumetric(lattice) => lattice.fix_unit_magnitude(),
        }
    }
}

impl From<Lattice<Ix2>> for Problem {
    fn from(lattice: Lattice<Ix2>) -> Self {
        Problem::Planar(lattice)
    }
}

impl From<Lattice<Ix3>> for Problem {
    fn from(lattice: Lattice<Ix3>) -> Self {
        Problem::Volumetric(lattice)
    }
}

fn into_rank<A, D: Stencil>(array: ndarray::Array<A, IxDyn>) -> Result<ndarray::Array<A, D>> {
    let shape = array.shape().to_vec();
    array.into_dimensionality::<D>().map_err(|_| {
        RelaxError::shape_mismatch(format!(
            "array of shape {:?} is not of rank {}",
            shape,
            D::RANK
        ))
    })
}
