//! Pipeline orchestration
//!
//! This module provides the public API for the lifealign engine.
//! It wires the full path from an input document to an encoded report.

use crate::aggregator::compute_alignments_on;
use crate::error::EngineError;
use crate::report::ReportEncoder;
use crate::schema::InputAdapter;
use crate::snapshot::SnapshotStore;
use crate::types::{ComputeAlignmentsInput, PillarAlignment};
use chrono::{Local, NaiveDate};

/// Score an align.input.v1 document and return the encoded report JSON.
///
/// Pipeline stages:
/// 1. InputAdapter - Parse the document and pick the scoring range
/// 2. compute_alignments_on - Score, trend, and classify each pillar
/// 3. ReportEncoder - Encode the versioned report payload
///
/// Snapshots for trend detection come from the document itself. Use
/// `AlignmentEngine` to carry snapshots across invocations instead.
pub fn alignments_from_json(input_json: &str) -> Result<String, EngineError> {
    alignments_from_json_on(input_json, Local::now().date_naive())
}

/// Score an input document treating `today` as the current calendar date.
pub fn alignments_from_json_on(input_json: &str, today: NaiveDate) -> Result<String, EngineError> {
    let doc = InputAdapter::parse_document(input_json)?;
    let input = InputAdapter::to_compute_input_on(doc, today);
    let alignments = compute_alignments_on(&input, today);
    let encoder = ReportEncoder::new();
    encoder.encode_to_json(&alignments, &input.range)
}

/// Stateful engine that carries snapshots across scoring passes.
///
/// Use this when the host runs periodic reviews: each pass reads the
/// previous pass's snapshots for trend detection, then rolls the store
/// forward to the scores just computed.
pub struct AlignmentEngine {
    snapshots: SnapshotStore,
    encoder: ReportEncoder,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignmentEngine {
    /// Create an engine with an empty snapshot store
    pub fn new() -> Self {
        Self {
            snapshots: SnapshotStore::new(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Score typed input and roll the snapshot store forward.
    ///
    /// Once the engine has recorded a pass, its own snapshots replace
    /// whatever the input carries; the input's snapshots only seed the very
    /// first pass.
    pub fn review(
        &mut self,
        input: &ComputeAlignmentsInput,
        today: NaiveDate,
    ) -> Vec<PillarAlignment> {
        let mut working = input.clone();
        if !self.snapshots.is_empty() {
            working.snapshots = self.snapshots.previous().to_vec();
        }

        let alignments = compute_alignments_on(&working, today);
        self.snapshots.roll(&alignments, today);
        alignments
    }

    /// Score an input document JSON, returning the encoded report JSON
    pub fn review_json(&mut self, input_json: &str) -> Result<String, EngineError> {
        self.review_json_on(input_json, Local::now().date_naive())
    }

    /// Score an input document JSON treating `today` as the current
    /// calendar date
    pub fn review_json_on(
        &mut self,
        input_json: &str,
        today: NaiveDate,
    ) -> Result<String, EngineError> {
        let doc = InputAdapter::parse_document(input_json)?;
        let input = InputAdapter::to_compute_input_on(doc, today);
        let alignments = self.review(&input, today);
        self.encoder.encode_to_json(&alignments, &input.range)
    }

    /// Load snapshot state from JSON
    pub fn load_snapshots(&mut self, json: &str) -> Result<(), EngineError> {
        self.snapshots =
            SnapshotStore::from_json(json).map_err(|e| EngineError::ParseError(e.to_string()))?;
        Ok(())
    }

    /// Save snapshot state to JSON
    pub fn save_snapshots(&self) -> Result<String, EngineError> {
        self.snapshots
            .to_json()
            .map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    /// Number of snapshots held from the last pass
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Drop all snapshot state
    pub fn clear_snapshots(&mut self) {
        self.snapshots.clear();
    }
}
