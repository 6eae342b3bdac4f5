//! HTTP routes over the shared [`StateStore`].
//!
//! Endpoints:
//!   POST /start                          → set patient attributes, start the loop
//!   GET  /prediction                     → latest snapshot with forecasts
//!   GET  /alerts                         → unacknowledged alerts with their log index
//!   POST /alerts/:index/acknowledge      → mark one alert acknowledged
//!   GET  /thresholds                     → current alert thresholds
//!   POST /thresholds                     → partial, all-or-nothing threshold update
//!   GET  /health                         → liveness probe
//!
//! Handlers hold a store lock only for the copy-out or the single mutation
//! they perform.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::debug;

use cardiotwin_contracts::{
    alert::IndexedAlert,
    error::{CardioError, CardioResult},
    thresholds::AlertThresholds,
    vitals::StaticAttributes,
};
use cardiotwin_core::StateStore;

use crate::error::ApiError;

type AppState = Arc<StateStore>;

/// Build the application router. CORS is permissive so a browser dashboard
/// served from another origin can poll it.
pub fn router(store: AppState) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/prediction", get(prediction))
        .route("/alerts", get(alerts))
        .route("/alerts/:index/acknowledge", post(acknowledge))
        .route("/thresholds", get(get_thresholds).post(set_thresholds))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

// ── Body parsing ──────────────────────────────────────────────────────────────

/// Parse a request body as JSON. An empty body is reported the same way as
/// an empty object so both reach the caller as "No input data received".
fn json_body(body: &Bytes) -> CardioResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| CardioError::invalid(format!("Malformed JSON body: {}", e)))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn start(State(store): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let value = json_body(&body)?;
    let attributes = StaticAttributes::from_request(&value)?;
    store.start(attributes);
    Ok(Json(json!({ "message": "Simulation started" })))
}

async fn prediction(State(store): State<AppState>) -> Result<Json<Value>, ApiError> {
    let snapshot = store.snapshot();
    let body = snapshot.to_json_safe()?;
    Ok(Json(body))
}

async fn alerts(State(store): State<AppState>) -> Json<Vec<IndexedAlert>> {
    let listing = store.alerts();
    debug!(count = listing.len(), "listing unacknowledged alerts");
    Json(listing)
}

async fn acknowledge(
    State(store): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let index: usize = index
        .parse()
        .map_err(|_| CardioError::invalid("Invalid alert index"))?;
    store.acknowledge_alert(index)?;
    Ok(Json(json!({ "message": "Alert acknowledged" })))
}

async fn get_thresholds(State(store): State<AppState>) -> Json<AlertThresholds> {
    Json(store.thresholds())
}

async fn set_thresholds(
    State(store): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let update = match json_body(&body)? {
        Value::Object(map) => map,
        _ => return Err(CardioError::invalid("Threshold update must be a JSON object").into()),
    };
    let thresholds = store.update_thresholds(&update)?;
    Ok(Json(json!({
        "message": "Thresholds updated",
        "thresholds": thresholds,
    })))
}

async fn health(State(store): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "running": store.is_running(),
        "alert_count": store.alert_count(),
    }))
}
