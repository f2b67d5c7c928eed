//! Snapshot management
//!
//! This module keeps the previous scoring pass's pillar scores so the next
//! pass can detect trends. The contract is read-then-roll: trend detection
//! reads `previous()` first, then `roll()` replaces the stored snapshots
//! with the scores just computed.

use crate::types::{PerformanceSnapshot, PillarAlignment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store for the previous scoring pass's pillar snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStore {
    /// Snapshots from the most recent pass
    snapshots: Vec<PerformanceSnapshot>,
    /// Date of the pass that produced them
    recorded_on: Option<NaiveDate>,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots from the previous pass, in recorded order
    pub fn previous(&self) -> &[PerformanceSnapshot] {
        &self.snapshots
    }

    /// Date of the pass that produced the stored snapshots
    pub fn recorded_on(&self) -> Option<NaiveDate> {
        self.recorded_on
    }

    /// Replace the stored snapshots with the scores of the pass computed
    /// `on` the given date. Earlier snapshots are dropped, not merged; a
    /// pillar deleted by the user simply stops carrying a baseline.
    pub fn roll(&mut self, alignments: &[PillarAlignment], on: NaiveDate) {
        self.snapshots = alignments
            .iter()
            .map(|a| PerformanceSnapshot {
                pillar_id: a.pillar_id.clone(),
                score: a.score,
            })
            .collect();
        self.recorded_on = Some(on);
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when no pass has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop all stored snapshots
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.recorded_on = None;
    }

    /// Load store state from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize store state to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
