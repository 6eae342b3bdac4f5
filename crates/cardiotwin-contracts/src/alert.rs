//! Alert records produced when a published reading crosses a threshold.

use serde::{Deserialize, Serialize};

/// Which vital an alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    HeartRate,
    BloodPressure,
    StDepression,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::BloodPressure => "blood_pressure",
            Self::StDepression => "st_depression",
        }
    }
}

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A single threshold violation.
///
/// Alerts are appended to the log and never removed. The only mutation is
/// flipping `acknowledged`, addressed by the alert's position in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Local wall-clock time, formatted `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub category: AlertCategory,
    pub message: String,
    pub severity: Severity,
    pub acknowledged: bool,
}

/// An alert paired with its ordinal position in the log.
///
/// Returned by the alert listing so clients know which index to acknowledge
/// even though acknowledged entries are filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedAlert {
    pub index: usize,
    #[serde(flatten)]
    pub alert: Alert,
}
