//! Mapping from `CardioError` to HTTP responses.
//!
//! Client mistakes become `400 {"error": ...}`; anything else is a `500`
//! with a generic body. `PredictionFailure` never reaches this layer in
//! practice because the loop recovers it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use cardiotwin_contracts::error::CardioError;

/// A handler error. Wraps `CardioError` so it can be returned from axum
/// handlers with `?`.
#[derive(Debug)]
pub struct ApiError(pub CardioError);

impl From<CardioError> for ApiError {
    fn from(err: CardioError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CardioError::InvalidInput { .. } | CardioError::OutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the `error` field of the response body.
    pub fn message(&self) -> String {
        match &self.0 {
            CardioError::InvalidInput { reason } => reason.clone(),
            CardioError::OutOfRange { .. } => "Invalid alert index".to_string(),
            CardioError::SerializationFailure { .. } => {
                "Failed to generate prediction data".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!(error = %self.0, "request rejected");
        } else {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
