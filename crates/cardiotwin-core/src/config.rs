//! Simulation cadence and optional features.
//!
//! Deserialized from the `[simulation]` and `[features]` sections of the
//! application's TOML configuration. Every field has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which optional parts of the tick run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Evaluate thresholds and append alerts on every tick.
    pub alerts: bool,
    /// Project and classify the forecast horizons on every tick.
    pub forecasting: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            alerts: true,
            forecasting: true,
        }
    }
}

/// Loop timing and RNG seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Pause between active ticks.
    pub tick_interval_ms: u64,
    /// Pause between running-flag checks while paused.
    pub idle_poll_ms: u64,
    /// Fixed RNG seed for reproducible runs. Entropy-seeded when absent.
    pub seed: Option<u64>,
    #[serde(skip)]
    pub features: FeatureFlags,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            idle_poll_ms: 1_000,
            seed: None,
            features: FeatureFlags::default(),
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}
