//! Command-line arguments and their mapping onto the scenario config.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ScenarioConfig};

/// Parsed CLI arguments.
///
/// The scenario comes from `--scenario`, else `--preset`, else the `demo`
/// preset; the remaining flags override individual fields of it.
#[derive(Debug, Parser)]
#[command(
    name = "meter-sim",
    version,
    about = "Simulate smart-meter telemetry and serve the latest readings",
    long_about = None
)]
pub struct CliOptions {
    /// Load scenario from a TOML config file
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (demo, small, stress)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the number of simulated meters
    #[arg(long)]
    pub meters: Option<usize>,

    /// Override the per-meter tick interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Override the meter id prefix
    #[arg(long, value_name = "PREFIX")]
    pub id_prefix: Option<String>,

    /// Interface address for the HTTP API
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// TCP port for the HTTP API
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Generate one reading per meter, print it, and exit
    #[arg(long)]
    pub once: bool,

    /// Write the final snapshot to a CSV file
    #[arg(long, value_name = "FILE")]
    pub telemetry_out: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Show a live terminal dashboard instead of serving HTTP
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,
}

impl CliOptions {
    /// Resolves the scenario source and applies every override flag.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the scenario file cannot be loaded or the
    /// preset is unknown. Field validation is left to
    /// [`ScenarioConfig::validate`].
    pub fn load_scenario(&self) -> Result<ScenarioConfig, ConfigError> {
        let mut scenario = if let Some(path) = &self.scenario {
            ScenarioConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            ScenarioConfig::from_preset(name)?
        } else {
            ScenarioConfig::demo()
        };
        self.apply_overrides(&mut scenario);
        Ok(scenario)
    }

    fn apply_overrides(&self, scenario: &mut ScenarioConfig) {
        if let Some(meters) = self.meters {
            scenario.simulation.meters = meters;
        }
        if let Some(interval_ms) = self.interval_ms {
            scenario.simulation.interval_ms = interval_ms;
        }
        if let Some(prefix) = &self.id_prefix {
            scenario.simulation.id_prefix = prefix.clone();
        }
        if let Some(bind) = &self.bind {
            scenario.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            scenario.server.port = port;
        }
        if let Some(filter) = &self.log {
            scenario.logging.filter = filter.clone();
        }
    }
}

/// Parses the process arguments, exiting with usage on error.
pub fn parse_args() -> CliOptions {
    CliOptions::parse()
}
