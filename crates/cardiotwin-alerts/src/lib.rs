//! # cardiotwin-alerts
//!
//! Threshold-based alerting for the CardioTwin simulator.
//!
//! ## Overview
//!
//! On every tick the simulation loop hands the freshly published snapshot to
//! [`evaluate`], which compares it against the current [`AlertThresholds`]
//! and returns zero or more [`Alert`]s. Those are appended to an
//! [`AlertLog`], which clients read (unacknowledged entries only) and
//! acknowledge by index.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cardiotwin_alerts::{evaluate, AlertLog};
//!
//! let mut log = AlertLog::new();
//! log.append(evaluate(&snapshot, &thresholds));
//! log.acknowledge(0)?;
//! ```
//!
//! [`AlertThresholds`]: cardiotwin_contracts::thresholds::AlertThresholds
//! [`Alert`]: cardiotwin_contracts::alert::Alert

pub mod evaluator;
pub mod log;

pub use evaluator::{evaluate, evaluate_at, TIMESTAMP_FORMAT};
pub use log::AlertLog;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use cardiotwin_contracts::{
        alert::{AlertCategory, Severity},
        error::CardioError,
        thresholds::AlertThresholds,
        vitals::Snapshot,
    };

    use super::{evaluate, evaluate_at, AlertLog};

    // ── Helpers ───────────────────────────────────────────────────────────────

    const STAMP: &str = "2026-10-19 08:30:00";

    /// A snapshot sitting comfortably inside the default thresholds.
    fn calm() -> Snapshot {
        Snapshot {
            trestbps: 120,
            thalach: 100,
            oldpeak: 1.0,
            ..Snapshot::default()
        }
    }

    // ── Evaluator ─────────────────────────────────────────────────────────────

    #[test]
    fn test_calm_snapshot_fires_nothing() {
        assert!(evaluate_at(&calm(), &AlertThresholds::default(), STAMP).is_empty());
    }

    /// thalach 190 against a 170 ceiling fires exactly one high heart-rate alert.
    #[test]
    fn test_high_heart_rate() {
        let snapshot = Snapshot {
            thalach: 190,
            ..calm()
        };
        let alerts = evaluate_at(&snapshot, &AlertThresholds::default(), STAMP);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::HeartRate);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].message, "High heart rate detected: 190 BPM");
        assert_eq!(alerts[0].timestamp, STAMP);
        assert!(!alerts[0].acknowledged);
    }

    #[test]
    fn test_low_readings_are_medium() {
        let snapshot = Snapshot {
            thalach: 45,
            trestbps: 85,
            ..calm()
        };
        let alerts = evaluate_at(&snapshot, &AlertThresholds::default(), STAMP);

        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.severity == Severity::Medium));
        assert_eq!(alerts[0].message, "Low heart rate detected: 45 BPM");
        assert_eq!(alerts[1].message, "Low blood pressure detected: 85 mmHg");
    }

    /// High and low checks within one vital are exclusive, but categories
    /// fire independently of each other.
    #[test]
    fn test_categories_fire_independently() {
        let snapshot = Snapshot {
            thalach: 185,
            trestbps: 150,
            oldpeak: 2.5,
            ..calm()
        };
        // A low bound above the high bound would match both branches if they
        // were not exclusive.
        let thresholds = AlertThresholds {
            heart_rate_low: 200.0,
            ..AlertThresholds::default()
        };
        let alerts = evaluate_at(&snapshot, &thresholds, STAMP);

        let categories: Vec<_> = alerts.iter().map(|a| a.category).collect();
        assert_eq!(
            categories,
            vec![
                AlertCategory::HeartRate,
                AlertCategory::BloodPressure,
                AlertCategory::StDepression
            ]
        );
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[2].severity, Severity::Critical);
        assert_eq!(alerts[2].message, "High ST depression detected: 2.5");

        // Whole values keep their decimal point.
        let whole = Snapshot {
            oldpeak: 3.0,
            ..calm()
        };
        let alerts = evaluate_at(&whole, &AlertThresholds::default(), STAMP);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "High ST depression detected: 3.0");
    }

    /// Values equal to a bound do not fire: comparisons are strict.
    #[test]
    fn test_bounds_are_strict() {
        let snapshot = Snapshot {
            thalach: 170,
            trestbps: 90,
            oldpeak: 2.0,
            ..calm()
        };
        assert!(evaluate_at(&snapshot, &AlertThresholds::default(), STAMP).is_empty());
    }

    #[test]
    fn test_wall_clock_timestamp_format() {
        let snapshot = Snapshot {
            oldpeak: 3.0,
            ..calm()
        };
        let alerts = evaluate(&snapshot, &AlertThresholds::default());
        let stamp = &alerts[0].timestamp;

        assert_eq!(stamp.len(), 19, "unexpected timestamp: {stamp}");
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, super::TIMESTAMP_FORMAT).is_ok());
    }

    // ── Log ───────────────────────────────────────────────────────────────────

    fn log_with(n: usize) -> AlertLog {
        let snapshot = Snapshot {
            thalach: 190,
            ..calm()
        };
        let mut log = AlertLog::new();
        for _ in 0..n {
            log.append(evaluate_at(&snapshot, &AlertThresholds::default(), STAMP));
        }
        log
    }

    /// A sustained violation appends one alert per evaluation.
    #[test]
    fn test_no_deduplication() {
        let log = log_with(3);
        assert_eq!(log.len(), 3);
        assert_eq!(log.unacknowledged().len(), 3);
    }

    #[test]
    fn test_acknowledge_flips_only_target() {
        let mut log = log_with(3);
        log.acknowledge(1).unwrap();

        let flags: Vec<bool> = log.all().iter().map(|a| a.acknowledged).collect();
        assert_eq!(flags, vec![false, true, false]);

        let pending: Vec<usize> = log.unacknowledged().iter().map(|a| a.index).collect();
        assert_eq!(pending, vec![0, 2], "unacknowledged must keep append order and log indices");
    }

    #[test]
    fn test_acknowledge_single_alert_empties_listing() {
        let mut log = log_with(1);
        log.acknowledge(0).unwrap();

        assert!(log.unacknowledged().is_empty());
        assert_eq!(log.len(), 1, "acknowledging must not remove the entry");
        assert!(log.get(0).map(|a| a.acknowledged).unwrap_or(false));
        assert!(log.get(1).is_none());
    }

    #[test]
    fn test_acknowledge_out_of_range() {
        let mut log = log_with(1);
        let before = log.all().to_vec();

        match log.acknowledge(5) {
            Err(CardioError::OutOfRange { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 1);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
        assert_eq!(log.all(), before.as_slice(), "log must be unchanged");
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        let mut log = log_with(2);
        log.acknowledge(0).unwrap();
        log.acknowledge(0).unwrap();
        assert_eq!(log.unacknowledged().len(), 1);
    }
}
