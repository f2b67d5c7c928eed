//! Lifealign - Client-side alignment engine for standards and habit logs
//!
//! Lifealign scores how closely logged habit completions track the standards a
//! person has declared for each life pillar, through a deterministic pipeline:
//! window selection → per-standard scoring → pillar aggregation → trend and
//! state classification → report encoding.
//!
//! ## Modules
//!
//! - **Scoring Pipeline**: Turn pillars, standards, habits, and logs into per-pillar alignments
//! - **Snapshot Store**: Persist prior scores so the next pass can read a trend

pub mod aggregator;
pub mod classify;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod scorer;
pub mod snapshot;
pub mod types;
pub mod window;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::EngineError;
pub use pipeline::{alignments_from_json, alignments_from_json_on, AlignmentEngine};

// Schema exports
pub use schema::{AlignmentInputDocument, InputAdapter, ValidationError, INPUT_SCHEMA_VERSION};

// Scoring exports
pub use aggregator::{compute_alignments, compute_alignments_on};
pub use types::{AlignmentState, PillarAlignment, StandardAlignment, Trend};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "lifealign";
