//! Relaxation method selection.

use std::fmt;
use std::str::FromStr;

use ndarray::Array;
use serde::Deserialize;

use crate::error::RelaxError;
use crate::grid::{Lattice, Stencil};

use super::{gauss_seidel, jacobi, sor, Sweep};

/// Update rule applied on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    /// Reads only the previous iterate
    #[default]
    Jacobi,
    /// In-place sweep in ascending index order
    GaussSeidel,
    /// Gauss-Seidel extrapolated by the over-relaxation factor
    Sor,
}

impl Method {
    /// All supported methods.
    pub const ALL: [Method; 3] = [Method::Jacobi, Method::GaussSeidel, Method::Sor];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Jacobi => "jacobi",
            Method::GaussSeidel => "gauss-seidel",
            Method::Sor => "sor",
        }
    }

    /// Run one pass of this method.
    ///
    /// `alpha` is only read by [`Method::Sor`]. With `parallel` set and the
    /// `parallel` feature enabled, Jacobi passes are run fork-join.
    pub(crate) fn sweep<D: Stencil>(
        &self,
        lattice: &Lattice<D>,
        current: &Array<f64, D>,
        dx2: f64,
        alpha: f64,
        parallel: bool,
    ) -> Sweep<D> {
        match self {
            #[cfg(feature = "parallel")]
            Method::Jacobi if parallel => super::jacobi_parallel(lattice, current, dx2),
            Method::Jacobi => {
                let _ = parallel;
                jacobi(lattice, current, dx2)
            }
            Method::GaussSeidel => gauss_seidel(lattice, current, dx2),
            Method::Sor => sor(lattice, current, dx2, alpha),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = RelaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jacobi" => Ok(Method::Jacobi),
            "gs" | "gauss-seidel" | "gauss_seidel" | "gaussseidel" => Ok(Method::GaussSeidel),
            "sor" => Ok(Method::Sor),
            _ => Err(RelaxError::UnsupportedMethod {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = RelaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Ix2;

    #[test]
    fn test_parse_methods() {
        assert_eq!("jacobi".parse::<Method>().unwrap(), Method::Jacobi);
        assert_eq!("GS".parse::<Method>().unwrap(), Method::GaussSeidel);
        assert_eq!("Gauss-Seidel".parse::<Method>().unwrap(), Method::GaussSeidel);
        assert_eq!(" sor ".parse::<Method>().unwrap(), Method::Sor);
    }

    #[test]
    fn test_unsupported_method() {
        let err = "multigrid".parse::<Method>().unwrap_err();
        assert!(matches!(err, RelaxError::UnsupportedMethod { ref name } if name == "multigrid"));
    }

    #[test]
    fn test_name_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_sweep_dispatch() {
        let mut lattice = Lattice::<Ix2>::zeros(5).unwrap();
        lattice.pin((2, 0), 1.0);
        let current = lattice.potential();

        assert_eq!(
            Method::Jacobi.sweep(&lattice, current, 0.0, 1.5, false),
            jacobi(&lattice, current, 0.0)
        );
        assert_eq!(
            Method::Jacobi.sweep(&lattice, current, 0.0, 1.5, true),
            jacobi(&lattice, current, 0.0)
        );
        assert_eq!(
            Method::GaussSeidel.sweep(&lattice, current, 0.0, 1.5, false),
            gauss_seidel(&lattice, current, 0.0)
        );
        assert_eq!(
            Method::Sor.sweep(&lattice, current, 0.0, 1.5, false),
            sor(&lattice, current, 0.0, 1.5)
        );
    }
}
