//! Layered configuration for the `relax` binary.
//!
//! Values are resolved in order, later layers overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `RELAX_*` environment variables, `__` separating sections
//!    (e.g. `RELAX_SOLVER__METHOD=sor`)
//! 4. command-line flags
//!
//! ```toml
//! [scenario]
//! kind = "capacitor"
//! extent = 31
//!
//! [solver]
//! method = "sor"
//! over_relaxation = 1.5
//! continuation = "until-converged"
//!
//! [output]
//! directory = "results"
//! ```

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::error::{RelaxError, Result};
use crate::scenario::Scenario;
use crate::solver::SolverConfig;

/// Prefix of the environment variables read by [`RunConfig::load`].
const ENV_PREFIX: &str = "RELAX_";

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub scenario: ScenarioConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

/// Which initial condition to build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Reference scenario
    pub kind: Scenario,
    /// Points along every axis
    pub extent: usize,
    /// First electrode potential
    pub v1: f64,
    /// Second electrode potential
    pub v2: f64,
    /// Point charge density
    pub charge: f64,
    /// Run exactly this many double-update cycles instead of converging
    pub cycles: Option<usize>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            kind: Scenario::default(),
            extent: 31,
            v1: -1.0,
            v2: 1.0,
            charge: 1.0,
            cycles: None,
        }
    }
}

/// Where and what to write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the CSV files
    pub directory: PathBuf,
    /// Axis normal to the exported plane of 3D results
    pub slice_axis: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("results"),
            slice_axis: 0,
        }
    }
}

impl RunConfig {
    /// Load defaults, the optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, std::env::vars())
    }

    /// Load defaults, the optional file and the given environment variables.
    ///
    /// Only `RELAX_`-prefixed variables are read. The prefix is stripped
    /// here because `Environment` would otherwise expect the section
    /// separator (`RELAX__SOLVER__METHOD`) after it.
    pub fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: Map<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), value))
            })
            .collect();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::default().separator("__").source(Some(env)))
            .build()
            .map_err(|e| RelaxError::Config {
                message: e.to_string(),
            })?;

        settings.try_deserialize().map_err(|e| RelaxError::Config {
            message: format!("Failed to deserialize the config file: {}", e),
        })
    }
}
