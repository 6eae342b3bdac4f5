//! The classifier seam.
//!
//! The simulator treats the risk model as an opaque binary predictor. It is
//! consulted once per tick for the current reading and once per forecast
//! horizon, always while the store's data section is held, so
//! implementations should return quickly.

use std::sync::Arc;

use cardiotwin_contracts::{error::CardioResult, vitals::FeatureVector};

/// A trained binary risk classifier.
///
/// Implementations are loaded once at startup and shared read-only with the
/// simulation thread.
pub trait Classifier: Send + Sync {
    /// Classify one feature vector, returning `1` for the positive (high
    /// risk) class and `0` otherwise.
    ///
    /// A returned error is treated as `PredictionFailure` by the loop: the
    /// tick publishes an `"Error"` label and the loop carries on.
    fn predict(&self, features: &FeatureVector) -> CardioResult<u8>;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn predict(&self, features: &FeatureVector) -> CardioResult<u8> {
        (**self).predict(features)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, features: &FeatureVector) -> CardioResult<u8> {
        (**self).predict(features)
    }
}
