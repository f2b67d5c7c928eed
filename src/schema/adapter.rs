//! Adapter for align.input.v1 documents
//!
//! This module parses the host application's export into a typed document
//! and bridges it to the engine's `ComputeAlignmentsInput`, applying the
//! default trailing window when the document carries no explicit range.

use crate::error::EngineError;
use crate::schema::input::{AlignmentInputDocument, RecordIssue, INPUT_SCHEMA_VERSION};
use crate::types::ComputeAlignmentsInput;
use crate::window;
use chrono::{Local, NaiveDate};

/// Adapter for converting input documents to engine input
pub struct InputAdapter;

impl InputAdapter {
    /// Parse a JSON input document. Unknown schema versions are rejected
    /// here, before any scoring runs.
    pub fn parse_document(json: &str) -> Result<AlignmentInputDocument, EngineError> {
        let doc: AlignmentInputDocument = serde_json::from_str(json)?;
        if doc.schema_version != INPUT_SCHEMA_VERSION {
            return Err(EngineError::SchemaVersion {
                expected: INPUT_SCHEMA_VERSION.to_string(),
                actual: doc.schema_version,
            });
        }
        Ok(doc)
    }

    /// Bridge a parsed document to engine input. The document's explicit
    /// range wins; otherwise the default trailing window ending on `today`
    /// applies.
    pub fn to_compute_input_on(
        doc: AlignmentInputDocument,
        today: NaiveDate,
    ) -> ComputeAlignmentsInput {
        let range = doc.range.unwrap_or_else(|| window::default_range_on(today));
        ComputeAlignmentsInput {
            pillars: doc.pillars,
            standards: doc.standards,
            habits: doc.habits,
            logs: doc.logs,
            reflections: doc.reflections,
            snapshots: doc.snapshots,
            range,
        }
    }

    /// Bridge a parsed document using the local calendar date
    pub fn to_compute_input(doc: AlignmentInputDocument) -> ComputeAlignmentsInput {
        Self::to_compute_input_on(doc, Local::now().date_naive())
    }

    /// Validate every record in the document, returning one issue per
    /// failing record. Document-level checks (schema version, range
    /// direction) live in `AlignmentInputDocument::validate`.
    pub fn validate_records(doc: &AlignmentInputDocument) -> Vec<RecordIssue> {
        doc.record_issues()
    }
}
