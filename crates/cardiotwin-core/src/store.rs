//! The state store: single owner of everything the loop and the query
//! surface share.
//!
//! State is split into two independently locked sections:
//!
//! - **data**: snapshot, static attributes, running flag, smoothing memory
//! - **alerts**: thresholds and the alert log
//!
//! The simulation tick takes the data section and, while holding it, the
//! alert section. Query operations take exactly one section. Lock order is
//! always data → alerts, so the two paths cannot deadlock.
//!
//! Accessors return owned copies; callers never hold a reference into the
//! store across a scheduling boundary.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::info;

use cardiotwin_alerts::AlertLog;
use cardiotwin_contracts::{
    alert::IndexedAlert,
    error::CardioResult,
    thresholds::AlertThresholds,
    vitals::{Snapshot, StaticAttributes},
};

use crate::smoothing::PreviousValues;

// ── Sections ──────────────────────────────────────────────────────────────────

/// Everything the loop rewrites on a tick.
#[derive(Debug, Clone, Default)]
pub struct DataSection {
    pub snapshot: Snapshot,
    pub attributes: StaticAttributes,
    /// One-way latch: set by `start`, never cleared.
    pub running: bool,
    pub previous: PreviousValues,
}

/// Thresholds and the log they feed.
#[derive(Debug, Clone, Default)]
pub struct AlertSection {
    pub thresholds: AlertThresholds,
    pub log: AlertLog,
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Shared simulator state. Wrap in an `Arc` and hand clones to the loop and
/// the HTTP layer.
#[derive(Debug, Default)]
pub struct StateStore {
    data: Mutex<DataSection>,
    alerts: Mutex<AlertSection>,
}

impl StateStore {
    /// A paused store with the given initial thresholds.
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            data: Mutex::new(DataSection::default()),
            alerts: Mutex::new(AlertSection {
                thresholds,
                log: AlertLog::new(),
            }),
        }
    }

    /// Lock the data section.
    ///
    /// A panic while the lock was held leaves the section in whatever state
    /// the last completed assignment produced; every field is independently
    /// valid, so the poison is cleared rather than propagated.
    pub fn lock_data(&self) -> MutexGuard<'_, DataSection> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the alert section. Must not be called while already holding it.
    pub fn lock_alerts(&self) -> MutexGuard<'_, AlertSection> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Control ───────────────────────────────────────────────────────────────

    /// Set the static attributes and latch the running flag, as one update.
    pub fn start(&self, attributes: StaticAttributes) {
        let mut data = self.lock_data();
        data.attributes = attributes;
        data.running = true;
        info!(
            age = attributes.age,
            sex = attributes.sex,
            cp = attributes.cp,
            fbs = attributes.fbs,
            restecg = attributes.restecg,
            slope = attributes.slope,
            "simulation started"
        );
    }

    pub fn is_running(&self) -> bool {
        self.lock_data().running
    }

    pub fn attributes(&self) -> StaticAttributes {
        self.lock_data().attributes
    }

    /// A copy of the currently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.lock_data().snapshot.clone()
    }

    // ── Alerts ────────────────────────────────────────────────────────────────

    /// Unacknowledged alerts in append order.
    pub fn alerts(&self) -> Vec<IndexedAlert> {
        self.lock_alerts().log.unacknowledged()
    }

    /// Total alerts ever logged, acknowledged or not.
    pub fn alert_count(&self) -> usize {
        self.lock_alerts().log.len()
    }

    pub fn acknowledge_alert(&self, index: usize) -> CardioResult<()> {
        self.lock_alerts().log.acknowledge(index)
    }

    // ── Thresholds ────────────────────────────────────────────────────────────

    pub fn thresholds(&self) -> AlertThresholds {
        self.lock_alerts().thresholds
    }

    /// Apply a partial threshold update. All-or-nothing; returns the
    /// thresholds in force afterwards.
    pub fn update_thresholds(&self, update: &Map<String, Value>) -> CardioResult<AlertThresholds> {
        let mut section = self.lock_alerts();
        let changed = section.thresholds.apply_update(update)?;
        if !changed.is_empty() {
            let names: Vec<&str> = changed.iter().map(|key| key.name()).collect();
            info!(keys = ?names, "alert thresholds updated");
        }
        Ok(section.thresholds)
    }
}
