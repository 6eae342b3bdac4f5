//! Patient attributes, the published vitals snapshot, and forecast entries.
//!
//! Field names follow the heart-disease dataset the classifier was trained on
//! (`trestbps`, `thalach`, `oldpeak`, ...) because they double as the JSON
//! keys the web client reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CardioError, CardioResult};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 11;

/// Feature names in the exact order the classifier expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope",
];

/// An ordered classifier input. See [`FEATURE_NAMES`] for the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Assemble a feature vector from the static attributes and the dynamic
    /// readings of one (current or projected) moment.
    pub fn assemble(attrs: &StaticAttributes, vitals: &DynamicVitals) -> Self {
        Self([
            attrs.age,
            attrs.sex,
            attrs.cp,
            vitals.trestbps,
            vitals.chol,
            attrs.fbs,
            attrs.restecg,
            vitals.thalach,
            vitals.exang,
            vitals.oldpeak,
            attrs.slope,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// The dynamic half of a feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicVitals {
    pub trestbps: f64,
    pub chol: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
}

// ── Static attributes ────────────────────────────────────────────────────────

/// Patient-level covariates held constant for a simulation run.
///
/// Stored as floats because that is what the classifier consumes; the web
/// client submits them as strings from form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticAttributes {
    pub age: f64,
    pub sex: f64,
    /// Chest-pain type.
    pub cp: f64,
    /// Fasting blood sugar > 120 mg/dl.
    pub fbs: f64,
    /// Resting ECG category.
    pub restecg: f64,
    /// Slope of the peak-exercise ST segment.
    pub slope: f64,
}

impl Default for StaticAttributes {
    fn default() -> Self {
        Self {
            age: 50.0,
            sex: 1.0,
            cp: 0.0,
            fbs: 0.0,
            restecg: 0.0,
            slope: 1.0,
        }
    }
}

impl StaticAttributes {
    /// Build attributes from a start-request body.
    ///
    /// - The body must be a non-empty JSON object.
    /// - Missing or `null` fields take their default.
    /// - Empty strings become `0`.
    /// - Numbers and numeric strings are accepted as-is.
    ///
    /// Any other value is rejected with `InvalidInput` naming the field.
    pub fn from_request(body: &Value) -> CardioResult<Self> {
        let map = match body {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(CardioError::invalid("No input data received")),
        };

        let defaults = Self::default();
        let field = |name: &str, default: f64| -> CardioResult<f64> {
            match map.get(name) {
                None | Some(Value::Null) => Ok(default),
                Some(value) => coerce_attribute(name, value),
            }
        };

        Ok(Self {
            age: field("age", defaults.age)?,
            sex: field("sex", defaults.sex)?,
            cp: field("cp", defaults.cp)?,
            fbs: field("fbs", defaults.fbs)?,
            restecg: field("restecg", defaults.restecg)?,
            slope: field("slope", defaults.slope)?,
        })
    }
}

fn coerce_attribute(name: &str, value: &Value) -> CardioResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| CardioError::invalid(format!("Invalid value for {}", name)))
}

// ── Risk label ───────────────────────────────────────────────────────────────

/// The classifier-derived label published with every snapshot and forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// No tick has completed yet.
    #[serde(rename = "Waiting...")]
    Waiting,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
    /// The classifier failed during the most recent tick.
    #[serde(rename = "Error")]
    Error,
}

impl RiskLabel {
    /// Map a binary classifier output to a label. `1` is the positive class.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Self::HighRisk
        } else {
            Self::LowRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting...",
            Self::HighRisk => "High Risk",
            Self::LowRisk => "Low Risk",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Forecast ─────────────────────────────────────────────────────────────────

/// One projected reading at a future offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Offset label such as `+30min`, `+6h`, `+1d`.
    pub time: String,
    pub trestbps: i64,
    pub thalach: i64,
    pub oldpeak: f64,
    pub prediction: RiskLabel,
}

// ── Snapshot ─────────────────────────────────────────────────────────────────

/// The currently published vitals and derived risk label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Resting systolic blood pressure, mmHg.
    pub trestbps: i64,
    /// Serum cholesterol, mg/dl. Held constant.
    pub chol: i64,
    /// Maximum heart rate, BPM.
    pub thalach: i64,
    /// Exercise-induced angina, 0 or 1.
    pub exang: i64,
    /// ST depression, rounded to two decimals.
    pub oldpeak: f64,
    pub prediction: RiskLabel,
    pub future_predictions: Vec<ForecastEntry>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            trestbps: 120,
            chol: 200,
            thalach: 150,
            exang: 0,
            oldpeak: 1.0,
            prediction: RiskLabel::Waiting,
            future_predictions: Vec::new(),
        }
    }
}

impl Snapshot {
    /// The dynamic readings of this snapshot as classifier inputs.
    pub fn dynamic_vitals(&self) -> DynamicVitals {
        DynamicVitals {
            trestbps: self.trestbps as f64,
            chol: self.chol as f64,
            thalach: self.thalach as f64,
            exang: self.exang as f64,
            oldpeak: self.oldpeak,
        }
    }

    /// Render the snapshot as plain JSON.
    ///
    /// Fails with `SerializationFailure` if any float is non-finite, since
    /// JSON has no representation for NaN or infinity.
    pub fn to_json_safe(&self) -> CardioResult<Value> {
        let floats = std::iter::once(("oldpeak", self.oldpeak)).chain(
            self.future_predictions
                .iter()
                .map(|entry| ("future_predictions.oldpeak", entry.oldpeak)),
        );
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(CardioError::SerializationFailure {
                    reason: format!("{} is not a finite number", field),
                });
            }
        }

        serde_json::to_value(self).map_err(|e| CardioError::SerializationFailure {
            reason: e.to_string(),
        })
    }
}
