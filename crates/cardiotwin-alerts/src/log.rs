//! The append-only alert log.
//!
//! Entries are only ever pushed; the single permitted mutation is flipping an
//! entry's `acknowledged` flag by its ordinal position. The log is not
//! capped and grows for the lifetime of the process.
//!
//! `AlertLog` does no locking of its own. The state store keeps it behind the
//! same mutex as the thresholds it is evaluated against.

use tracing::info;

use cardiotwin_contracts::{
    alert::{Alert, IndexedAlert},
    error::{CardioError, CardioResult},
};

#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    entries: Vec<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of alerts in order. Returns the new log length.
    pub fn append(&mut self, alerts: impl IntoIterator<Item = Alert>) -> usize {
        self.entries.extend(alerts);
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.entries.get(index)
    }

    /// Every alert ever logged, in append order.
    pub fn all(&self) -> &[Alert] {
        &self.entries
    }

    /// Alerts not yet acknowledged, in append order, with their log index.
    pub fn unacknowledged(&self) -> Vec<IndexedAlert> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, alert)| !alert.acknowledged)
            .map(|(index, alert)| IndexedAlert {
                index,
                alert: alert.clone(),
            })
            .collect()
    }

    /// Mark the alert at `index` as acknowledged.
    ///
    /// Acknowledging an already-acknowledged alert succeeds and changes
    /// nothing. Fails with `OutOfRange` if `index` is past the end of the log.
    pub fn acknowledge(&mut self, index: usize) -> CardioResult<()> {
        let len = self.entries.len();
        let alert = self
            .entries
            .get_mut(index)
            .ok_or(CardioError::OutOfRange { index, len })?;
        alert.acknowledged = true;

        info!(
            index,
            category = alert.category.as_str(),
            "alert acknowledged"
        );
        Ok(())
    }
}
