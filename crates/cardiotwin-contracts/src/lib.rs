//! # cardiotwin-contracts
//!
//! Shared types and error definitions for the CardioTwin simulator.
//!
//! Every crate in the workspace imports from here. Beyond request parsing and
//! validation of these types, no simulation logic lives in this crate.

pub mod alert;
pub mod error;
pub mod thresholds;
pub mod vitals;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use alert::{Alert, AlertCategory, IndexedAlert, Severity};
    use error::CardioError;
    use thresholds::{AlertThresholds, ThresholdKey};
    use vitals::{FeatureVector, RiskLabel, Snapshot, StaticAttributes, FEATURE_NAMES};

    // ── StaticAttributes ─────────────────────────────────────────────────────

    #[test]
    fn start_body_applies_defaults_for_missing_fields() {
        let attrs = StaticAttributes::from_request(&json!({ "age": 60, "sex": 0 })).unwrap();
        assert_eq!(attrs.age, 60.0);
        assert_eq!(attrs.sex, 0.0);
        assert_eq!(attrs.cp, 0.0);
        assert_eq!(attrs.fbs, 0.0);
        assert_eq!(attrs.restecg, 0.0);
        assert_eq!(attrs.slope, 1.0);
    }

    #[test]
    fn start_body_coerces_empty_strings_to_zero() {
        let attrs =
            StaticAttributes::from_request(&json!({ "age": "", "sex": "", "slope": "" })).unwrap();
        assert_eq!(attrs.age, 0.0);
        assert_eq!(attrs.sex, 0.0);
        assert_eq!(attrs.slope, 0.0);
    }

    #[test]
    fn start_body_accepts_numeric_strings_from_form_inputs() {
        let attrs = StaticAttributes::from_request(&json!({
            "age": "63", "sex": "1", "cp": "3", "fbs": "0", "restecg": "0", "slope": "2"
        }))
        .unwrap();
        assert_eq!(attrs.age, 63.0);
        assert_eq!(attrs.cp, 3.0);
        assert_eq!(attrs.slope, 2.0);
    }

    #[test]
    fn start_body_null_field_takes_default() {
        let attrs = StaticAttributes::from_request(&json!({ "age": null, "cp": 2 })).unwrap();
        assert_eq!(attrs.age, 50.0);
        assert_eq!(attrs.cp, 2.0);
    }

    #[test]
    fn start_body_rejects_empty_or_missing_object() {
        for body in [json!({}), json!(null), json!([1, 2]), json!("age")] {
            match StaticAttributes::from_request(&body) {
                Err(CardioError::InvalidInput { reason }) => {
                    assert_eq!(reason, "No input data received");
                }
                other => panic!("expected InvalidInput for {body}, got {:?}", other),
            }
        }
    }

    #[test]
    fn start_body_rejects_non_numeric_value() {
        let err = StaticAttributes::from_request(&json!({ "age": "sixty" })).unwrap_err();
        assert!(err.to_string().contains("age"), "error should name the field: {err}");
    }

    // ── FeatureVector ────────────────────────────────────────────────────────

    #[test]
    fn feature_vector_follows_classifier_order() {
        let attrs = StaticAttributes {
            age: 1.0,
            sex: 2.0,
            cp: 3.0,
            fbs: 6.0,
            restecg: 7.0,
            slope: 11.0,
        };
        let snapshot = Snapshot {
            trestbps: 4,
            chol: 5,
            thalach: 8,
            exang: 9,
            oldpeak: 10.0,
            ..Snapshot::default()
        };
        let features = FeatureVector::assemble(&attrs, &snapshot.dynamic_vitals());
        let expected: Vec<f64> = (1..=11).map(|v| v as f64).collect();
        assert_eq!(features.as_slice(), expected.as_slice());
        assert_eq!(FEATURE_NAMES[3], "trestbps");
        assert_eq!(FEATURE_NAMES[10], "slope");
    }

    // ── Snapshot serialization ───────────────────────────────────────────────

    #[test]
    fn initial_snapshot_serializes_with_client_keys() {
        let value = Snapshot::default().to_json_safe().unwrap();
        assert_eq!(value["trestbps"], json!(120));
        assert_eq!(value["chol"], json!(200));
        assert_eq!(value["thalach"], json!(150));
        assert_eq!(value["exang"], json!(0));
        assert_eq!(value["oldpeak"], json!(1.0));
        assert_eq!(value["prediction"], json!("Waiting..."));
        assert_eq!(value["future_predictions"], json!([]));
    }

    #[test]
    fn non_finite_snapshot_is_a_serialization_failure() {
        let snapshot = Snapshot {
            oldpeak: f64::NAN,
            ..Snapshot::default()
        };
        assert!(matches!(
            snapshot.to_json_safe(),
            Err(CardioError::SerializationFailure { .. })
        ));
    }

    #[test]
    fn risk_label_renders_display_strings() {
        assert_eq!(serde_json::to_string(&RiskLabel::HighRisk).unwrap(), "\"High Risk\"");
        assert_eq!(RiskLabel::from_class(1), RiskLabel::HighRisk);
        assert_eq!(RiskLabel::from_class(0), RiskLabel::LowRisk);
        assert_eq!(RiskLabel::Error.to_string(), "Error");
    }

    // ── Alerts ───────────────────────────────────────────────────────────────

    #[test]
    fn indexed_alert_flattens_with_type_key() {
        let indexed = IndexedAlert {
            index: 3,
            alert: Alert {
                timestamp: "2026-01-01 10:00:00".to_string(),
                category: AlertCategory::StDepression,
                message: "High ST depression detected: 2.4".to_string(),
                severity: Severity::Critical,
                acknowledged: false,
            },
        };
        let value = serde_json::to_value(&indexed).unwrap();
        assert_eq!(value["index"], json!(3));
        assert_eq!(value["type"], json!("st_depression"));
        assert_eq!(value["severity"], json!("critical"));
        assert_eq!(value["acknowledged"], json!(false));
    }

    // ── Thresholds ───────────────────────────────────────────────────────────

    #[test]
    fn threshold_update_commits_valid_keys_and_ignores_unknown() {
        let mut thresholds = AlertThresholds::default();
        let update = json!({ "heart_rate_high": 180, "blood_pressure_low": "85.5", "spo2_low": 90 });
        let changed = thresholds.apply_update(update.as_object().unwrap()).unwrap();

        assert_eq!(thresholds.heart_rate_high, 180.0);
        assert_eq!(thresholds.blood_pressure_low, 85.5);
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&ThresholdKey::HeartRateHigh));
    }

    #[test]
    fn threshold_update_is_all_or_nothing() {
        let mut thresholds = AlertThresholds::default();
        let update = json!({ "heart_rate_high": 180, "blood_pressure_high": -5 });

        match thresholds.apply_update(update.as_object().unwrap()) {
            Err(CardioError::InvalidInput { reason }) => {
                assert_eq!(reason, "Negative values are not allowed for blood_pressure_high");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        // The valid key in the same request must not have been committed.
        assert_eq!(thresholds, AlertThresholds::default());
    }

    #[test]
    fn threshold_update_rejects_unparsable_value() {
        let mut thresholds = AlertThresholds::default();
        for bad in [json!("high"), json!(true), json!(null), json!([1])] {
            let update = json!({ "st_depression_high": bad });
            let err = thresholds.apply_update(update.as_object().unwrap()).unwrap_err();
            assert_eq!(
                err,
                CardioError::invalid("Invalid value for st_depression_high")
            );
        }
        assert_eq!(thresholds.st_depression_high, 2.0);
    }

    #[test]
    fn thresholds_serialize_as_flat_map() {
        let value = serde_json::to_value(AlertThresholds::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "heart_rate_high": 170.0,
                "heart_rate_low": 50.0,
                "blood_pressure_high": 140.0,
                "blood_pressure_low": 90.0,
                "st_depression_high": 2.0
            })
        );
    }

    #[test]
    fn negative_configured_threshold_fails_validation() {
        let thresholds = AlertThresholds {
            heart_rate_low: -1.0,
            ..AlertThresholds::default()
        };
        assert!(thresholds.validate().is_err());
        assert!(AlertThresholds::default().validate().is_ok());
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_out_of_range_display() {
        let err = CardioError::OutOfRange { index: 5, len: 1 };
        let msg = err.to_string();
        assert!(msg.contains("5"));
        assert!(msg.contains("1 alerts"));
    }

    #[test]
    fn error_model_load_display() {
        let err = CardioError::ModelLoad {
            reason: "missing weights".to_string(),
        };
        assert!(err.to_string().contains("model load failed"));
        assert!(err.to_string().contains("missing weights"));
    }
}
