//! Threshold rules applied to every published snapshot.
//!
//! Rules are checked independently per vital. Within one vital the high and
//! low checks are exclusive: a reading cannot be both. A sustained violation
//! fires on every tick; there is no de-duplication.

use chrono::Local;

use cardiotwin_contracts::{
    alert::{Alert, AlertCategory, Severity},
    thresholds::AlertThresholds,
    vitals::Snapshot,
};

/// `strftime` pattern for alert timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Evaluate `snapshot` against `thresholds`, stamping alerts with the
/// current local time.
pub fn evaluate(snapshot: &Snapshot, thresholds: &AlertThresholds) -> Vec<Alert> {
    let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
    evaluate_at(snapshot, thresholds, &now)
}

/// Evaluate `snapshot` against `thresholds` with an explicit timestamp.
pub fn evaluate_at(snapshot: &Snapshot, thresholds: &AlertThresholds, timestamp: &str) -> Vec<Alert> {
    let mut fired = Vec::new();
    let alert = |category, severity, message: String| Alert {
        timestamp: timestamp.to_string(),
        category,
        message,
        severity,
        acknowledged: false,
    };

    let heart_rate = snapshot.thalach as f64;
    if heart_rate > thresholds.heart_rate_high {
        fired.push(alert(
            AlertCategory::HeartRate,
            Severity::High,
            format!("High heart rate detected: {} BPM", snapshot.thalach),
        ));
    } else if heart_rate < thresholds.heart_rate_low {
        fired.push(alert(
            AlertCategory::HeartRate,
            Severity::Medium,
            format!("Low heart rate detected: {} BPM", snapshot.thalach),
        ));
    }

    let blood_pressure = snapshot.trestbps as f64;
    if blood_pressure > thresholds.blood_pressure_high {
        fired.push(alert(
            AlertCategory::BloodPressure,
            Severity::High,
            format!("High blood pressure detected: {} mmHg", snapshot.trestbps),
        ));
    } else if blood_pressure < thresholds.blood_pressure_low {
        fired.push(alert(
            AlertCategory::BloodPressure,
            Severity::Medium,
            format!("Low blood pressure detected: {} mmHg", snapshot.trestbps),
        ));
    }

    if snapshot.oldpeak > thresholds.st_depression_high {
        fired.push(alert(
            AlertCategory::StDepression,
            Severity::Critical,
            format!("High ST depression detected: {:?}", snapshot.oldpeak),
        ));
    }

    fired
}
