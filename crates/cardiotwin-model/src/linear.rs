//! Logistic-regression classifier built from a `ModelArtifact`.
//!
//! `LinearClassifier` loads an artifact from a TOML string or file, checks its
//! shape once, and implements the `Classifier` trait from cardiotwin-core.
//!
//! Prediction:
//!
//! 1. Standardise each feature: `(x - mean) / scale`.
//! 2. `z = intercept + Σ weight · standardised`.
//! 3. `p = 1 / (1 + e^-z)`; return `1` if `p >= threshold`, else `0`.

use std::path::Path;

use tracing::{debug, info};

use cardiotwin_contracts::{
    error::{CardioError, CardioResult},
    vitals::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES},
};
use cardiotwin_core::traits::Classifier;

use crate::artifact::ModelArtifact;

/// A validated, ready-to-use logistic model.
///
/// ```rust,ignore
/// use cardiotwin_model::LinearClassifier;
///
/// let model = LinearClassifier::from_file(Path::new("models/heart_model.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    name: String,
    threshold: f64,
    intercept: f64,
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    weights: [f64; FEATURE_COUNT],
}

impl LinearClassifier {
    /// Parse `s` as a TOML model artifact.
    ///
    /// Returns `CardioError::ModelLoad` if the TOML is malformed or the
    /// artifact fails validation.
    pub fn from_toml_str(s: &str) -> CardioResult<Self> {
        let artifact: ModelArtifact = toml::from_str(s).map_err(|e| CardioError::ModelLoad {
            reason: format!("failed to parse model TOML: {}", e),
        })?;
        Self::from_artifact(artifact)
    }

    /// Read the file at `path` and parse it as a model artifact.
    pub fn from_file(path: &Path) -> CardioResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CardioError::ModelLoad {
            reason: format!("failed to read model file '{}': {}", path.display(), e),
        })?;
        let model = Self::from_toml_str(&contents)?;
        info!(
            model = %model.name,
            path = %path.display(),
            threshold = model.threshold,
            "classifier loaded"
        );
        Ok(model)
    }

    /// Validate an artifact and fix its vectors to the feature count.
    pub fn from_artifact(artifact: ModelArtifact) -> CardioResult<Self> {
        let means = fixed_vector("feature_means", &artifact.feature_means)?;
        let scales = fixed_vector("feature_scales", &artifact.feature_scales)?;
        let weights = fixed_vector("weights", &artifact.weights)?;

        if let Some(i) = scales.iter().position(|s| *s == 0.0) {
            return Err(CardioError::ModelLoad {
                reason: format!("feature_scales[{}] ({}) must be non-zero", i, FEATURE_NAMES[i]),
            });
        }
        if !artifact.intercept.is_finite() {
            return Err(CardioError::ModelLoad {
                reason: "intercept must be finite".to_string(),
            });
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(CardioError::ModelLoad {
                reason: format!("threshold {} must lie strictly between 0 and 1", artifact.threshold),
            });
        }

        Ok(Self {
            name: artifact.name,
            threshold: artifact.threshold,
            intercept: artifact.intercept,
            means,
            scales,
            weights,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positive-class probability for `features`.
    pub fn probability(&self, features: &FeatureVector) -> CardioResult<f64> {
        if let Some(i) = features.0.iter().position(|x| !x.is_finite()) {
            return Err(CardioError::PredictionFailure {
                reason: format!("feature '{}' is not a finite number", FEATURE_NAMES[i]),
            });
        }

        let z = features
            .0
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .zip(self.weights.iter())
            .fold(self.intercept, |acc, ((x, (mean, scale)), weight)| {
                acc + weight * (x - mean) / scale
            });

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> CardioResult<u8> {
        let p = self.probability(features)?;
        debug!(model = %self.name, probability = p, "classified feature vector");
        Ok(u8::from(p >= self.threshold))
    }
}

fn fixed_vector(field: &str, values: &[f64]) -> CardioResult<[f64; FEATURE_COUNT]> {
    let fixed: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| CardioError::ModelLoad {
        reason: format!(
            "{} has {} entries, expected {}",
            field,
            values.len(),
            FEATURE_COUNT
        ),
    })?;
    if let Some(i) = fixed.iter().position(|v| !v.is_finite()) {
        return Err(CardioError::ModelLoad {
            reason: format!("{}[{}] ({}) is not finite", field, i, FEATURE_NAMES[i]),
        });
    }
    Ok(fixed)
}
