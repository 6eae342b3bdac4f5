//! Alert thresholds and partial-update validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CardioError, CardioResult};

/// A named threshold. Names double as JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKey {
    HeartRateHigh,
    HeartRateLow,
    BloodPressureHigh,
    BloodPressureLow,
    StDepressionHigh,
}

impl ThresholdKey {
    pub const ALL: [ThresholdKey; 5] = [
        Self::HeartRateHigh,
        Self::HeartRateLow,
        Self::BloodPressureHigh,
        Self::BloodPressureLow,
        Self::StDepressionHigh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::HeartRateHigh => "heart_rate_high",
            Self::HeartRateLow => "heart_rate_low",
            Self::BloodPressureHigh => "blood_pressure_high",
            Self::BloodPressureLow => "blood_pressure_low",
            Self::StDepressionHigh => "st_depression_high",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Bounds the alert evaluator compares each snapshot against.
///
/// Invariant: every value is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub heart_rate_high: f64,
    pub heart_rate_low: f64,
    pub blood_pressure_high: f64,
    pub blood_pressure_low: f64,
    pub st_depression_high: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            heart_rate_high: 170.0,
            heart_rate_low: 50.0,
            blood_pressure_high: 140.0,
            blood_pressure_low: 90.0,
            st_depression_high: 2.0,
        }
    }
}

impl AlertThresholds {
    pub fn get(&self, key: ThresholdKey) -> f64 {
        match key {
            ThresholdKey::HeartRateHigh => self.heart_rate_high,
            ThresholdKey::HeartRateLow => self.heart_rate_low,
            ThresholdKey::BloodPressureHigh => self.blood_pressure_high,
            ThresholdKey::BloodPressureLow => self.blood_pressure_low,
            ThresholdKey::StDepressionHigh => self.st_depression_high,
        }
    }

    fn set(&mut self, key: ThresholdKey, value: f64) {
        let slot = match key {
            ThresholdKey::HeartRateHigh => &mut self.heart_rate_high,
            ThresholdKey::HeartRateLow => &mut self.heart_rate_low,
            ThresholdKey::BloodPressureHigh => &mut self.blood_pressure_high,
            ThresholdKey::BloodPressureLow => &mut self.blood_pressure_low,
            ThresholdKey::StDepressionHigh => &mut self.st_depression_high,
        };
        *slot = value;
    }

    /// Check the non-negative invariant on every threshold.
    pub fn validate(&self) -> CardioResult<()> {
        for key in ThresholdKey::ALL {
            check_value(key, self.get(key))?;
        }
        Ok(())
    }

    /// Apply a partial update from a JSON object.
    ///
    /// Unknown keys are ignored. Values may be numbers or numeric strings.
    /// The update is all-or-nothing: every known key is validated first, and
    /// `self` is only modified when all of them pass. The first offending key
    /// (in map order) is named in the returned `InvalidInput`.
    ///
    /// Returns the keys that were changed.
    pub fn apply_update(&mut self, update: &Map<String, Value>) -> CardioResult<Vec<ThresholdKey>> {
        let mut staged = Vec::new();
        for (name, raw) in update {
            let Some(key) = ThresholdKey::from_name(name) else {
                continue;
            };
            let value = parse_threshold(key, raw)?;
            check_value(key, value)?;
            staged.push((key, value));
        }

        for (key, value) in &staged {
            self.set(*key, *value);
        }
        Ok(staged.into_iter().map(|(key, _)| key).collect())
    }
}

fn parse_threshold(key: ThresholdKey, raw: &Value) -> CardioResult<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| CardioError::invalid(format!("Invalid value for {}", key.name())))
}

fn check_value(key: ThresholdKey, value: f64) -> CardioResult<()> {
    if !value.is_finite() {
        return Err(CardioError::invalid(format!(
            "Invalid value for {}",
            key.name()
        )));
    }
    if value < 0.0 {
        return Err(CardioError::invalid(format!(
            "Negative values are not allowed for {}",
            key.name()
        )));
    }
    Ok(())
}
