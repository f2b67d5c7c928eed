//! align.input.v1 schema definition
//!
//! One JSON envelope carrying the host store's records: pillars, standards,
//! habits, completion logs, reflections, and previous-period snapshots,
//! plus an optional explicit scoring range. The engine itself never rejects
//! data; validation here is the strict path for callers that want malformed
//! exports caught before scoring degrades them to zeros.

use crate::types::{
    DateRange, Habit, HabitLog, PerformanceSnapshot, Pillar, Reflection, Standard,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current input schema version
pub const INPUT_SCHEMA_VERSION: &str = "align.input.v1";

/// Weekly habit targets above this fail validation
pub const MAX_TARGET_DAYS_PER_WEEK: u32 = 7;

/// The main align.input.v1 document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentInputDocument {
    /// Schema version identifier
    pub schema_version: String,
    /// When the host exported the document (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at_utc: Option<DateTime<Utc>>,
    /// Explicit scoring range; the default trailing window applies when
    /// absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    #[serde(default)]
    pub pillars: Vec<Pillar>,
    #[serde(default)]
    pub standards: Vec<Standard>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub logs: Vec<HabitLog>,
    #[serde(default)]
    pub reflections: Vec<Reflection>,
    #[serde(default)]
    pub snapshots: Vec<PerformanceSnapshot>,
}

impl Default for AlignmentInputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignmentInputDocument {
    /// Create an empty document with the current schema version
    pub fn new() -> Self {
        Self {
            schema_version: INPUT_SCHEMA_VERSION.to_string(),
            exported_at_utc: None,
            range: None,
            pillars: Vec::new(),
            standards: Vec::new(),
            habits: Vec::new(),
            logs: Vec::new(),
            reflections: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Validate the document: schema version, explicit range direction, and
    /// every record. Stops at the first violation; use
    /// `InputAdapter::validate_records` for a full indexed report.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != INPUT_SCHEMA_VERSION {
            return Err(ValidationError::InvalidSchemaVersion {
                expected: INPUT_SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        if let Some(range) = &self.range {
            if range.from > range.to {
                return Err(ValidationError::InvertedRange {
                    from: range.from,
                    to: range.to,
                });
            }
        }

        match self.record_issues().into_iter().next() {
            Some(issue) => Err(issue.error),
            None => Ok(()),
        }
    }

    /// Check every record, returning one issue per failing record in
    /// collection order: pillars, standards, habits, logs.
    ///
    /// Snapshots are exempt on purpose: a snapshot may reference a pillar
    /// the user has since deleted, and trend detection simply ignores it.
    /// Reflections never participate in scoring and are not checked either.
    pub fn record_issues(&self) -> Vec<RecordIssue> {
        let mut issues = Vec::new();
        let pillar_ids: HashSet<&str> = self.pillars.iter().map(|p| p.id.as_str()).collect();
        let habit_ids: HashSet<&str> = self.habits.iter().map(|h| h.id.as_str()).collect();

        for (index, pillar) in self.pillars.iter().enumerate() {
            if pillar.id.is_empty() {
                issues.push(RecordIssue {
                    index,
                    record: "pillar",
                    id: None,
                    error: ValidationError::EmptyId {
                        record: "pillar".to_string(),
                        index,
                    },
                });
            }
        }

        for (index, standard) in self.standards.iter().enumerate() {
            if standard.id.is_empty() {
                issues.push(RecordIssue {
                    index,
                    record: "standard",
                    id: None,
                    error: ValidationError::EmptyId {
                        record: "standard".to_string(),
                        index,
                    },
                });
            } else if !pillar_ids.contains(standard.pillar_id.as_str()) {
                issues.push(RecordIssue {
                    index,
                    record: "standard",
                    id: Some(standard.id.clone()),
                    error: ValidationError::UnknownPillar {
                        record: "standard".to_string(),
                        id: standard.id.clone(),
                        pillar_id: standard.pillar_id.clone(),
                    },
                });
            }
        }

        for (index, habit) in self.habits.iter().enumerate() {
            if habit.id.is_empty() {
                issues.push(RecordIssue {
                    index,
                    record: "habit",
                    id: None,
                    error: ValidationError::EmptyId {
                        record: "habit".to_string(),
                        index,
                    },
                });
                continue;
            }
            if !pillar_ids.contains(habit.pillar_id.as_str()) {
                issues.push(RecordIssue {
                    index,
                    record: "habit",
                    id: Some(habit.id.clone()),
                    error: ValidationError::UnknownPillar {
                        record: "habit".to_string(),
                        id: habit.id.clone(),
                        pillar_id: habit.pillar_id.clone(),
                    },
                });
            }
            if habit.target_days_per_week > MAX_TARGET_DAYS_PER_WEEK {
                issues.push(RecordIssue {
                    index,
                    record: "habit",
                    id: Some(habit.id.clone()),
                    error: ValidationError::TargetAboveWeek {
                        id: habit.id.clone(),
                        target: habit.target_days_per_week,
                    },
                });
            }
        }

        for (index, log) in self.logs.iter().enumerate() {
            if log.id.is_empty() {
                issues.push(RecordIssue {
                    index,
                    record: "log",
                    id: None,
                    error: ValidationError::EmptyId {
                        record: "log".to_string(),
                        index,
                    },
                });
            } else if !habit_ids.contains(log.habit_id.as_str()) {
                issues.push(RecordIssue {
                    index,
                    record: "log",
                    id: Some(log.id.clone()),
                    error: ValidationError::UnknownHabit {
                        id: log.id.clone(),
                        habit_id: log.habit_id.clone(),
                    },
                });
            }
        }

        issues
    }
}

/// One record that failed validation
#[derive(Debug, Clone)]
pub struct RecordIssue {
    /// Position within the record's collection
    pub index: usize,
    /// Collection the record came from
    pub record: &'static str,
    /// Record id, when the record has one
    pub id: Option<String>,
    pub error: ValidationError,
}

/// Validation errors for input documents
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Inverted range: from {from} is after to {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("{record} at index {index} has an empty id")]
    EmptyId { record: String, index: usize },

    #[error("{record} '{id}' references unknown pillar '{pillar_id}'")]
    UnknownPillar {
        record: String,
        id: String,
        pillar_id: String,
    },

    #[error("log '{id}' references unknown habit '{habit_id}'")]
    UnknownHabit { id: String, habit_id: String },

    #[error("habit '{id}' has weekly target {target}, above the maximum of 7")]
    TargetAboveWeek { id: String, target: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_document() -> AlignmentInputDocument {
        let mut doc = AlignmentInputDocument::new();
        doc.pillars.push(Pillar {
            id: "p1".to_string(),
            name: "Health".to_string(),
            color: "#4f46e5".to_string(),
        });
        doc.standards.push(Standard {
            id: "s1".to_string(),
            pillar_id: "p1".to_string(),
            name: "Strength training".to_string(),
            target: 4.0,
            unit: "workouts / week".to_string(),
        });
        doc.habits.push(Habit {
            id: "h1".to_string(),
            pillar_id: "p1".to_string(),
            name: "Lift".to_string(),
            target_days_per_week: 4,
            archived: false,
        });
        doc.logs.push(HabitLog {
            id: "l1".to_string(),
            habit_id: "h1".to_string(),
            date: d(2024, 1, 3),
            completed: true,
        });
        doc
    }

    #[test]
    fn test_valid_document_passes() {
        let doc = make_document();
        assert!(doc.validate().is_ok());
        assert!(doc.record_issues().is_empty());
    }

    #[test]
    fn test_wrong_schema_version_is_rejected() {
        let mut doc = make_document();
        doc.schema_version = "align.input.v0".to_string();

        match doc.validate() {
            Err(ValidationError::InvalidSchemaVersion { expected, actual }) => {
                assert_eq!(expected, INPUT_SCHEMA_VERSION);
                assert_eq!(actual, "align.input.v0");
            }
            other => panic!("expected schema version error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut doc = make_document();
        doc.range = Some(DateRange {
            from: d(2024, 1, 28),
            to: d(2024, 1, 1),
        });

        assert!(matches!(
            doc.validate(),
            Err(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_zero_length_range_is_valid() {
        let mut doc = make_document();
        doc.range = Some(DateRange {
            from: d(2024, 1, 15),
            to: d(2024, 1, 15),
        });

        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_unknown_pillar_reference() {
        let mut doc = make_document();
        doc.standards[0].pillar_id = "ghost".to_string();

        let issues = doc.record_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record, "standard");
        assert_eq!(issues[0].index, 0);
        assert_eq!(issues[0].id.as_deref(), Some("s1"));
        assert!(matches!(
            issues[0].error,
            ValidationError::UnknownPillar { .. }
        ));
    }

    #[test]
    fn test_unknown_habit_reference() {
        let mut doc = make_document();
        doc.logs[0].habit_id = "ghost".to_string();

        let issues = doc.record_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record, "log");
        assert!(matches!(
            issues[0].error,
            ValidationError::UnknownHabit { .. }
        ));
    }

    #[test]
    fn test_target_above_seven_days() {
        let mut doc = make_document();
        doc.habits[0].target_days_per_week = 9;

        let issues = doc.record_issues();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].error,
            ValidationError::TargetAboveWeek { target: 9, .. }
        ));
    }

    #[test]
    fn test_empty_ids_reported_with_index() {
        let mut doc = make_document();
        doc.pillars.push(Pillar {
            id: String::new(),
            name: "Nameless".to_string(),
            color: "#000000".to_string(),
        });

        let issues = doc.record_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record, "pillar");
        assert_eq!(issues[0].index, 1);
    }

    #[test]
    fn test_multiple_issues_collected_in_order() {
        let mut doc = make_document();
        doc.standards[0].pillar_id = "ghost".to_string();
        doc.habits[0].target_days_per_week = 8;
        doc.logs[0].habit_id = "ghost".to_string();

        let issues = doc.record_issues();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].record, "standard");
        assert_eq!(issues[1].record, "habit");
        assert_eq!(issues[2].record, "log");
    }

    #[test]
    fn test_serialize_uses_host_field_names() {
        let mut doc = make_document();
        doc.exported_at_utc = Some("2024-02-01T12:00:00Z".parse().unwrap());
        doc.range = Some(DateRange {
            from: d(2024, 1, 1),
            to: d(2024, 1, 28),
        });

        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"schemaVersion\": \"align.input.v1\""));
        assert!(json.contains("\"exportedAtUtc\""));
        assert!(json.contains("\"pillarId\""));
        assert!(json.contains("\"targetDaysPerWeek\""));
    }

    #[test]
    fn test_deserialize_document() {
        let json = r##"{
            "schemaVersion": "align.input.v1",
            "range": {"from": "2024-01-01", "to": "2024-01-28"},
            "pillars": [{"id": "p1", "name": "Health", "color": "#fff"}],
            "habits": [{
                "id": "h1",
                "pillarId": "p1",
                "name": "Lift",
                "targetDaysPerWeek": 4
            }],
            "logs": [{
                "id": "l1",
                "habitId": "h1",
                "date": "2024-01-03",
                "completed": true
            }]
        }"##;

        let doc: AlignmentInputDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.schema_version, INPUT_SCHEMA_VERSION);
        assert_eq!(doc.pillars.len(), 1);
        assert_eq!(doc.habits[0].target_days_per_week, 4);
        // Absent collections default to empty
        assert!(doc.standards.is_empty());
        assert!(doc.snapshots.is_empty());
        // Unarchived by default
        assert!(!doc.habits[0].archived);
        assert!(doc.validate().is_ok());
    }
}
