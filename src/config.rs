//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::meter::{DEFAULT_ID_PREFIX, LoadProfile};
use crate::sim::scheduler::{MAX_TICK_INTERVAL, Scheduler};
use crate::sim::store::StateStore;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the `demo` preset. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or pick a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Meter fleet and tick timing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Daily load curve shared by every meter.
    #[serde(default)]
    pub profile: LoadProfile,
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Log filtering.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Meter fleet and tick timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of simulated meters (must be > 0).
    pub meters: usize,
    /// Tick interval per meter in milliseconds (must be > 0).
    pub interval_ms: u64,
    /// Prefix for meter ids, e.g. `METER` gives `METER-001`.
    pub id_prefix: String,
    /// Fill the store with one synchronous pass before the first tick.
    pub warm_start: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            meters: 50,
            interval_ms: 2_000,
            id_prefix: "METER".to_string(),
            warm_start: true,
        }
    }
}

impl SimulationConfig {
    /// Tick interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface address to bind.
    pub bind: String,
    /// TCP port; `0` picks an ephemeral port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `bind:port` string suitable for a socket listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Log filtering.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.meters"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "small", "stress"];

    /// The default deployment: 50 meters reporting every two seconds.
    pub fn demo() -> Self {
        Self::default()
    }

    /// A handful of meters ticking every second, with generic ids.
    pub fn small() -> Self {
        Self {
            simulation: SimulationConfig {
                meters: 5,
                interval_ms: 1_000,
                id_prefix: DEFAULT_ID_PREFIX.to_string(),
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    /// A large fleet with a fast tick, for load testing readers.
    pub fn stress() -> Self {
        Self {
            simulation: SimulationConfig {
                meters: 5_000,
                interval_ms: 250,
                ..SimulationConfig::default()
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "small" => Ok(Self::small()),
            "stress" => Ok(Self::stress()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.meters == 0 {
            errors.push(ConfigError::new("simulation.meters", "must be > 0"));
        }
        if s.interval_ms == 0 {
            errors.push(ConfigError::new("simulation.interval_ms", "must be > 0"));
        } else if s.interval() > MAX_TICK_INTERVAL {
            errors.push(ConfigError::new(
                "simulation.interval_ms",
                format!("must be <= {}", MAX_TICK_INTERVAL.as_millis()),
            ));
        }
        if s.id_prefix.is_empty() || s.id_prefix.chars().any(char::is_whitespace) {
            errors.push(ConfigError::new(
                "simulation.id_prefix",
                "must be non-empty and contain no whitespace",
            ));
        }

        let p = &self.profile;
        let fields = [
            ("profile.amplitude_kwh", p.amplitude_kwh),
            ("profile.phase_shift_hr", p.phase_shift_hr),
            ("profile.base_load_kwh", p.base_load_kwh),
            ("profile.peak_threshold_kwh", p.peak_threshold_kwh),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be a finite number"));
            }
        }
        if p.min_usage() < 0.0 {
            errors.push(ConfigError::new(
                "profile.base_load_kwh",
                format!(
                    "must be >= |profile.amplitude_kwh| so readings stay non-negative \
                     (curve minimum is {:.2})",
                    p.min_usage()
                ),
            ));
        }

        if self.server.bind.trim().is_empty() {
            errors.push(ConfigError::new("server.bind", "must not be empty"));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError::new("logging.filter", "must not be empty"));
        }

        errors
    }

    /// Builds a scheduler over `store` with this scenario's prefix and profile.
    pub fn scheduler(&self, store: Arc<StateStore>) -> Scheduler {
        Scheduler::new(store)
            .with_prefix(self.simulation.id_prefix.clone())
            .with_profile(self.profile)
    }
}
