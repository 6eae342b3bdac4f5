//! # cardiotwin-model
//!
//! Loads the risk classifier the simulation loop consults every tick.
//!
//! ## Overview
//!
//! This crate provides [`LinearClassifier`], which implements the
//! [`Classifier`](cardiotwin_core::traits::Classifier) trait. The model is
//! described by a TOML artifact (see [`artifact::ModelArtifact`]) holding a
//! standardised logistic regression. Training the model is out of scope; the
//! artifact is produced elsewhere and loaded once at startup. A load failure
//! is fatal to the process.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use cardiotwin_model::LinearClassifier;
//!
//! let model = LinearClassifier::from_file(Path::new("models/heart_model.toml"))?;
//! // Pass `Arc::new(model)` to `cardiotwin_core::Simulator::new(...)`.
//! ```

pub mod artifact;
pub mod linear;

pub use artifact::ModelArtifact;
pub use linear::LinearClassifier;

/// The artifact shipped with the workspace, embedded for tests and for the
/// TUI's default model.
pub const DEFAULT_MODEL_TOML: &str = include_str!("../../../models/heart_model.toml");

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use cardiotwin_contracts::{
        error::CardioError,
        vitals::{FeatureVector, Snapshot, StaticAttributes},
    };
    use cardiotwin_core::traits::Classifier;

    use crate::{LinearClassifier, DEFAULT_MODEL_TOML};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// An artifact whose only non-zero weight is on `thalach` (index 7).
    fn heart_rate_only(threshold: f64) -> String {
        format!(
            r#"
            name = "hr-only"
            threshold = {threshold}
            intercept = 0.0
            feature_means  = [0, 0, 0, 0, 0, 0, 0, 150, 0, 0, 0]
            feature_scales = [1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 1]
            weights        = [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]
        "#
        )
    }

    fn features_with_heart_rate(thalach: f64) -> FeatureVector {
        let mut features = FeatureVector::assemble(
            &StaticAttributes::default(),
            &Snapshot::default().dynamic_vitals(),
        );
        features.0[7] = thalach;
        features
    }

    // ── 1. loading ────────────────────────────────────────────────────────────

    #[test]
    fn test_default_artifact_loads() {
        let model = LinearClassifier::from_toml_str(DEFAULT_MODEL_TOML).unwrap();
        assert_eq!(model.name(), "heart-risk-logistic-v1");

        let features = FeatureVector::assemble(
            &StaticAttributes::default(),
            &Snapshot::default().dynamic_vitals(),
        );
        let class = model.predict(&features).unwrap();
        assert!(class == 0 || class == 1);
    }

    #[test]
    fn test_threshold_defaults_to_half() {
        let toml = heart_rate_only(0.5).replace("threshold = 0.5", "");
        let model = LinearClassifier::from_toml_str(&toml).unwrap();
        // Exactly at the mean: z = 0, p = 0.5, which meets the threshold.
        assert_eq!(model.predict(&features_with_heart_rate(150.0)).unwrap(), 1);
    }

    #[test]
    fn test_malformed_toml_is_model_load_error() {
        match LinearClassifier::from_toml_str("name = [unterminated") {
            Err(CardioError::ModelLoad { reason }) => {
                assert!(reason.contains("failed to parse model TOML"), "got: {reason}");
            }
            other => panic!("expected ModelLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_vector_length_rejected() {
        let toml = heart_rate_only(0.5).replace(
            "weights        = [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]",
            "weights        = [0, 0, 1]",
        );
        match LinearClassifier::from_toml_str(&toml) {
            Err(CardioError::ModelLoad { reason }) => {
                assert!(reason.contains("weights has 3 entries, expected 11"), "got: {reason}");
            }
            other => panic!("expected ModelLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_scale_rejected() {
        let toml = heart_rate_only(0.5).replace(
            "feature_scales = [1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 1]",
            "feature_scales = [1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1]",
        );
        let err = LinearClassifier::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("thalach"), "got: {err}");
    }

    #[test]
    fn test_threshold_out_of_bounds_rejected() {
        for threshold in ["0.0", "1.0", "1.5"] {
            let toml = heart_rate_only(0.5).replace("threshold = 0.5", &format!("threshold = {threshold}"));
            assert!(
                matches!(LinearClassifier::from_toml_str(&toml), Err(CardioError::ModelLoad { .. })),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file_is_model_load_error() {
        let err = LinearClassifier::from_file(std::path::Path::new("/nonexistent/model.toml"))
            .unwrap_err();
        assert!(matches!(err, CardioError::ModelLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/model.toml"));
    }

    // ── 2. prediction ─────────────────────────────────────────────────────────

    #[test]
    fn test_prediction_follows_weight_sign() {
        let model = LinearClassifier::from_toml_str(&heart_rate_only(0.5)).unwrap();
        assert_eq!(model.predict(&features_with_heart_rate(190.0)).unwrap(), 1);
        assert_eq!(model.predict(&features_with_heart_rate(110.0)).unwrap(), 0);

        let high = model.probability(&features_with_heart_rate(190.0)).unwrap();
        let low = model.probability(&features_with_heart_rate(110.0)).unwrap();
        assert!(high > 0.95 && low < 0.05, "high={high} low={low}");
    }

    #[test]
    fn test_stricter_threshold_needs_more_evidence() {
        let model = LinearClassifier::from_toml_str(&heart_rate_only(0.9)).unwrap();
        // z = 1, p ≈ 0.73: positive at 0.5 but not at 0.9.
        assert_eq!(model.predict(&features_with_heart_rate(160.0)).unwrap(), 0);
        assert_eq!(model.predict(&features_with_heart_rate(180.0)).unwrap(), 1);
    }

    #[test]
    fn test_non_finite_feature_is_prediction_failure() {
        let model = LinearClassifier::from_toml_str(&heart_rate_only(0.5)).unwrap();
        match model.predict(&features_with_heart_rate(f64::NAN)) {
            Err(CardioError::PredictionFailure { reason }) => {
                assert!(reason.contains("thalach"), "got: {reason}");
            }
            other => panic!("expected PredictionFailure, got {:?}", other),
        }
    }
}
