//! Report encoding
//!
//! This module encodes pillar alignments into the versioned JSON payload the
//! host dashboard and advisory surfaces consume. The payload carries
//! producer metadata so downstream consumers can tell which engine instance
//! and version computed it.

use crate::error::EngineError;
use crate::types::{AlignmentReport, DateRange, PillarAlignment, ReportProducer, ReportSummary};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "align.report.v1";

/// Encoder for alignment report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode pillar alignments into a report payload
    pub fn encode(&self, pillars: &[PillarAlignment], range: &DateRange) -> AlignmentReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        AlignmentReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            range: *range,
            summary: build_summary(pillars),
            pillars: pillars.to_vec(),
        }
    }

    /// Encode to a pretty JSON string
    pub fn encode_to_json(
        &self,
        pillars: &[PillarAlignment],
        range: &DateRange,
    ) -> Result<String, EngineError> {
        let report = self.encode(pillars, range);
        serde_json::to_string_pretty(&report).map_err(EngineError::JsonError)
    }
}

/// Summary block: pillar count plus the rounded mean of pillar scores,
/// 0 when the report has no pillars.
fn build_summary(pillars: &[PillarAlignment]) -> ReportSummary {
    let mean_score = if pillars.is_empty() {
        0
    } else {
        let sum: u32 = pillars.iter().map(|p| u32::from(p.score)).sum();
        (f64::from(sum) / pillars.len() as f64).round() as u8
    };

    ReportSummary {
        pillar_count: pillars.len(),
        mean_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlignmentState, Trend};
    use chrono::NaiveDate;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_alignment(pillar_id: &str, score: u8) -> PillarAlignment {
        PillarAlignment {
            pillar_id: pillar_id.to_string(),
            pillar_name: format!("pillar {}", pillar_id),
            pillar_color: "#f59e0b".to_string(),
            score,
            state: AlignmentState::Drifting,
            trend: Trend::Flat,
            standards: vec![],
            habit_count: 1,
            completed_today: 0,
        }
    }

    fn test_range() -> DateRange {
        DateRange {
            from: d(2024, 1, 1),
            to: d(2024, 1, 28),
        }
    }

    #[test]
    fn test_encode_report() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let pillars = vec![make_alignment("p1", 72), make_alignment("p2", 35)];

        let report = encoder.encode(&pillars, &test_range());

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, ENGINE_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.range, test_range());
        assert_eq!(report.summary.pillar_count, 2);
        // (72 + 35) / 2 = 53.5, rounded to 54
        assert_eq!(report.summary.mean_score, 54);
        assert_eq!(report.pillars.len(), 2);
        assert_eq!(report.pillars[0].pillar_id, "p1");
    }

    #[test]
    fn test_empty_report_summary() {
        let encoder = ReportEncoder::new();
        let report = encoder.encode(&[], &test_range());

        assert_eq!(report.summary.pillar_count, 0);
        assert_eq!(report.summary.mean_score, 0);
        assert!(report.pillars.is_empty());
    }

    #[test]
    fn test_encode_to_json_uses_host_field_names() {
        let encoder = ReportEncoder::new();
        let pillars = vec![make_alignment("p1", 72)];

        let json = encoder.encode_to_json(&pillars, &test_range()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["reportVersion"], "align.report.v1");
        assert!(parsed["computedAtUtc"].is_string());
        assert_eq!(parsed["producer"]["name"], "lifealign");
        assert_eq!(parsed["range"]["from"], "2024-01-01");
        assert_eq!(parsed["range"]["to"], "2024-01-28");
        assert_eq!(parsed["summary"]["pillarCount"], 1);
        assert_eq!(parsed["summary"]["meanScore"], 72);
        assert_eq!(parsed["pillars"][0]["pillarId"], "p1");
        assert_eq!(parsed["pillars"][0]["state"], "drifting");
        assert_eq!(parsed["pillars"][0]["trend"], "flat");
        assert_eq!(parsed["pillars"][0]["habitCount"], 1);
    }
}
