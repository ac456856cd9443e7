//! CSV export of relaxed potentials and their fields.
//!
//! Values are written in `{:.15e}` notation so a reloaded grid matches the
//! solver output to the last digit.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

use crate::config::OutputConfig;
use crate::error::{RelaxError, Result};
use crate::field::{self, ElectricField};
use crate::grid::Grid;
use crate::solver::Solution;

/// File name of the exported potential.
pub const POTENTIAL_FILE: &str = "potential.csv";
/// File name of the exported field.
pub const FIELD_FILE: &str = "field.csv";

/// Write a planar grid as one CSV row per grid row, no header.
pub fn write_grid_csv<P: AsRef<Path>>(path: P, grid: &Array2<f64>) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    for row in grid.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.15e}", v)).collect();
        writeln!(file, "{}", cells.join(","))?;
    }

    file.flush()
}

/// Write the field as `x,y,ex,ey` records, one per grid point.
///
/// `x` follows the column index and `y` the row index.
pub fn write_field_csv<P: AsRef<Path>>(
    path: P,
    x: &Array1<f64>,
    y: &Array1<f64>,
    field: &ElectricField,
) -> io::Result<()> {
    let (rows, cols) = field.ex.dim();
    if x.len() != cols || y.len() != rows || field.ey.dim() != (rows, cols) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Axis lengths ({}, {}) don't match field shape ({}, {})",
                x.len(),
                y.len(),
                rows,
                cols
            ),
        ));
    }

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "x,y,ex,ey")?;

    for ((i, j), &ex) in field.ex.indexed_iter() {
        writeln!(
            file,
            "{:.15e},{:.15e},{:.15e},{:.15e}",
            x[j],
            y[i],
            ex,
            field.ey[(i, j)]
        )?;
    }

    file.flush()
}

/// Export a solution's potential and field into the configured directory.
///
/// Volumetric results are reduced to the mid-plane normal to
/// `config.slice_axis` first. Returns the written paths.
pub fn write_solution(
    config: &OutputConfig,
    solution: &Solution<Grid>,
    domain_length: f64,
) -> Result<Vec<PathBuf>> {
    let dir = &config.directory;
    fs::create_dir_all(dir).map_err(|e| RelaxError::file_write(dir.display().to_string(), e))?;

    let plane = field::cross_section(&solution.potential, config.slice_axis)?;
    let e_field = field::electric_field(&plane, domain_length)?;
    let axis = field::axis(plane.nrows(), domain_length);

    let potential_path = dir.join(POTENTIAL_FILE);
    write_grid_csv(&potential_path, &plane)
        .map_err(|e| RelaxError::file_write(potential_path.display().to_string(), e))?;

    let field_path = dir.join(FIELD_FILE);
    write_field_csv(&field_path, &axis, &axis, &e_field)
        .map_err(|e| RelaxError::file_write(field_path.display().to_string(), e))?;

    tracing::debug!(
        path = %dir.display(),
        extent = plane.nrows(),
        "Wrote potential and field"
    );

    Ok(vec![potential_path, field_path])
}
