//! Application configuration loaded from TOML.
//!
//! Every section and field is optional; anything omitted takes its default.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:5000"
//!
//! [simulation]
//! tick_interval_ms = 2000
//! idle_poll_ms = 1000
//! # seed = 42
//!
//! [features]
//! alerts = true
//! forecasting = true
//!
//! [model]
//! path = "models/heart_model.toml"
//!
//! [thresholds]
//! heart_rate_high = 170
//! st_depression_high = 2.0
//! ```

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use cardiotwin_contracts::{
    error::{CardioError, CardioResult},
    thresholds::AlertThresholds,
};
use cardiotwin_core::config::{FeatureFlags, SimulationConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Path to the classifier artifact.
    pub path: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/heart_model.toml"),
        }
    }
}

/// The top-level structure deserialized from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerSection,
    pub simulation: SimulationConfig,
    pub features: FeatureFlags,
    pub model: ModelSection,
    /// Thresholds in force when the process starts.
    pub thresholds: AlertThresholds,
}

impl AppConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `CardioError::ConfigError` if the TOML is malformed, has
    /// unknown sections, or carries invalid values.
    pub fn from_toml_str(s: &str) -> CardioResult<Self> {
        let config: AppConfig = toml::from_str(s).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as configuration.
    pub fn from_file(path: &Path) -> CardioResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check cross-field invariants not expressible in the schema.
    pub fn validate(&self) -> CardioResult<()> {
        self.bind_addr()?;
        self.thresholds.validate().map_err(|e| CardioError::ConfigError {
            reason: format!("[thresholds] {}", e),
        })?;
        if self.simulation.tick_interval_ms == 0 {
            return Err(CardioError::ConfigError {
                reason: "[simulation] tick_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> CardioResult<SocketAddr> {
        self.server.bind.parse().map_err(|e| CardioError::ConfigError {
            reason: format!("[server] bind '{}' is not a socket address: {}", self.server.bind, e),
        })
    }

    /// The loop configuration with the feature flags folded in.
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            features: self.features,
            ..self.simulation.clone()
        }
    }
}
