//! On-disk model artifact schema.
//!
//! A `ModelArtifact` is deserialized from TOML and describes a logistic
//! regression over standardised features. Vectors are listed in classifier
//! feature order (age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
//! oldpeak, slope).
//!
//! Example:
//! ```toml
//! name = "heart-risk-logistic"
//! threshold = 0.5
//! intercept = -0.1
//! feature_means  = [54.0, 0.7, 1.0, 130.0, 245.0, 0.15, 0.5, 150.0, 0.3, 1.0, 1.4]
//! feature_scales = [9.0, 0.46, 1.0, 17.0, 51.0, 0.36, 0.5, 23.0, 0.47, 1.16, 0.6]
//! weights        = [0.3, 0.6, 0.8, 0.3, 0.2, 0.1, 0.1, -0.5, 0.7, 0.8, -0.4]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Identifier written to the startup log.
    pub name: String,

    /// Probability at or above which the positive class is returned.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    pub intercept: f64,

    /// Per-feature centring applied before weighting.
    pub feature_means: Vec<f64>,

    /// Per-feature scale applied after centring. Must be non-zero.
    pub feature_scales: Vec<f64>,

    pub weights: Vec<f64>,
}

fn default_threshold() -> f64 {
    0.5
}
