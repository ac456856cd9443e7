//! Quantities derived from a relaxed potential.
//!
//! - [`electric_field`]: E = -∇V by central differences
//! - [`mid_plane`] / [`cross_section`]: 2D sections of 3D results
//! - [`axis`]: physical coordinates of the grid points

use ndarray::{s, Array1, Array2, Array3, Axis, Zip};

use crate::error::{RelaxError, Result};
use crate::grid::{validate_extent, Grid};

/// Electric field components on a planar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricField {
    /// -∂V/∂x (along columns)
    pub ex: Array2<f64>,
    /// -∂V/∂y (along rows)
    pub ey: Array2<f64>,
}

impl ElectricField {
    /// Field magnitude at every point.
    pub fn magnitude(&self) -> Array2<f64> {
        Zip::from(&self.ex)
            .and(&self.ey)
            .map_collect(|&ex, &ey| ex.hypot(ey))
    }
}

/// Coordinates of `n` points spanning `[-length/2, length/2]`.
pub fn axis(n: usize, length: f64) -> Array1<f64> {
    Array1::linspace(-length / 2.0, length / 2.0, n)
}

/// Central-difference electric field of a planar potential.
///
/// `ex` is left at zero on the first and last column, `ey` on the first
/// and last row.
pub fn electric_field(potential: &Array2<f64>, domain_length: f64) -> Result<ElectricField> {
    let n = validate_extent(potential.shape())?;
    let h = domain_length / (n - 1) as f64;

    let mut ex = Array2::zeros((n, n));
    Zip::from(ex.slice_mut(s![.., 1..n - 1]))
        .and(potential.slice(s![.., 2..]))
        .and(potential.slice(s![.., ..n - 2]))
        .for_each(|e, &ahead, &behind| *e = -(ahead - behind) / (2.0 * h));

    let mut ey = Array2::zeros((n, n));
    Zip::from(ey.slice_mut(s![1..n - 1, ..]))
        .and(potential.slice(s![2.., ..]))
        .and(potential.slice(s![..n - 2, ..]))
        .for_each(|e, &ahead, &behind| *e = -(ahead - behind) / (2.0 * h));

    Ok(ElectricField { ex, ey })
}

/// The plane through the middle of a cubic grid, normal to `axis`.
pub fn mid_plane(volume: &Array3<f64>, axis: usize) -> Result<Array2<f64>> {
    if axis >= 3 {
        return Err(RelaxError::invalid_parameter(
            "axis",
            format!("a cubic grid has axes 0, 1 and 2, got {}", axis),
        ));
    }
    let n = validate_extent(volume.shape())?;
    Ok(volume.index_axis(Axis(axis), (n - 1) / 2).to_owned())
}

/// A planar view of any grid: itself in 2D, the mid-plane normal to `axis`
/// in 3D.
pub fn cross_section(grid: &Grid, axis: usize) -> Result<Array2<f64>> {
    match grid {
        Grid::Planar(plane) => Ok(plane.clone()),
        Grid::Volumetric(volume) => mid_plane(volume, axis),
    }
}
