//! Relax - Finite-difference electrostatics
//!
//! Builds a reference scenario, relaxes it and writes the potential and the
//! electric field as CSV.
//!
//! # Usage
//!
//! ```bash
//! relax --scenario capacitor --method sor --alpha 1.8 --extent 61
//! relax --config run.toml --output-dir results/box
//! RUST_LOG=relax_core=trace relax --scenario point-charge --cycles 100
//! ```

use std::path::PathBuf;

use clap::Parser;
use relax_core::{
    config::RunConfig, error::Result, output, scenario::Scenario, Continuation, Method, Solver,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Iterative Poisson and Laplace solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with [scenario], [solver] and [output] sections
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial condition: capacitor, box or point-charge
    #[arg(short, long)]
    scenario: Option<Scenario>,

    /// Update rule: jacobi, gauss-seidel (gs) or sor
    #[arg(short, long)]
    method: Option<Method>,

    /// Points along every axis
    #[arg(short = 'n', long)]
    extent: Option<usize>,

    /// Physical side length of the domain
    #[arg(long)]
    domain_length: Option<f64>,

    /// Over-relaxation factor for SOR
    #[arg(long)]
    alpha: Option<f64>,

    /// Convergence threshold on ΔV (default 1e-6 · N²)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Run exactly this many cycles instead of converging
    #[arg(long)]
    cycles: Option<usize>,

    /// Keep cycling while ΔV is below the tolerance
    #[arg(long)]
    historical_loop: bool,

    /// Stop after this many cycles
    #[arg(long)]
    max_cycles: Option<usize>,

    /// Use the fork-join Jacobi sweep
    #[arg(long)]
    parallel: bool,

    /// Directory receiving potential.csv and field.csv
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut RunConfig) {
        if let Some(kind) = self.scenario {
            config.scenario.kind = kind;
        }
        if let Some(extent) = self.extent {
            config.scenario.extent = extent;
        }
        if self.cycles.is_some() {
            config.scenario.cycles = self.cycles;
        }
        if let Some(method) = self.method {
            config.solver.method = method;
        }
        if let Some(length) = self.domain_length {
            config.solver.domain_length = length;
        }
        if let Some(alpha) = self.alpha {
            config.solver.over_relaxation = alpha;
        }
        if self.tolerance.is_some() {
            config.solver.tolerance = self.tolerance;
        }
        if self.historical_loop {
            config.solver.continuation = Continuation::WhileConverged;
        }
        if self.max_cycles.is_some() {
            config.solver.max_cycles = self.max_cycles;
        }
        if self.parallel {
            config.solver.parallel = true;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
    }
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = tracing_subscriber::fmt::Layer::new()
        .with_writer(std::io::stderr)
        .without_time();

    Registry::default().with(env_filter).with(fmt_layer).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    // Defaults, file, environment, then flags
    let mut config = RunConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let scenario = &config.scenario;
    let problem = scenario
        .kind
        .build(scenario.extent, scenario.v1, scenario.v2, scenario.charge)?;
    tracing::info!(
        scenario = %scenario.kind,
        rank = problem.rank(),
        extent = problem.extent(),
        method = %config.solver.method,
        "Built problem"
    );

    let solver = Solver::new(config.solver.clone())?;
    let solution = match scenario.cycles {
        Some(cycles) => solver.relax_problem_cycles(&problem, cycles),
        None => solver.solve_problem(&problem)?,
    };

    let written = output::write_solution(&config.output, &solution, config.solver.domain_length)?;
    tracing::info!(
        cycles = solution.cycles,
        delta = solution.delta,
        converged = solution.converged(),
        files = written.len(),
        directory = %config.output.directory.display(),
        "Finished"
    );

    Ok(())
}
