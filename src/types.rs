//! Core types for the lifealign engine
//!
//! This module defines the records supplied by the host application's store,
//! the date-range type scoring operates over, and the derived alignment
//! records the engine hands back to the dashboard and advisory consumers.
//!
//! Wire format note: the host store lives in a JavaScript client, so every
//! record (de)serializes with camelCase field names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user-declared life domain (e.g. "Health", "Craft") that scopes
/// standards and habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pillar {
    pub id: String,
    /// Display name
    pub name: String,
    /// Display color (CSS color string, passed through untouched)
    pub color: String,
}

/// A quantified target behavior under one pillar (e.g. "4 workouts / week").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    pub id: String,
    /// Owning pillar
    pub pillar_id: String,
    /// Declared behavior text (e.g. "Strength training")
    pub name: String,
    /// Target value (e.g. 4.0)
    pub target: f64,
    /// Target unit for display (e.g. "workouts / week")
    pub unit: String,
}

/// A trackable recurring practice under one pillar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    /// Owning pillar
    pub pillar_id: String,
    /// Display name
    pub name: String,
    /// How many days per week the habit is meant to be completed
    pub target_days_per_week: u32,
    /// Archived habits are excluded from scoring
    #[serde(default)]
    pub archived: bool,
}

/// One dated completion record for a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: String,
    /// Habit this log belongs to
    pub habit_id: String,
    /// Local calendar date of the completion
    pub date: NaiveDate,
    /// Whether the habit was actually completed on that date
    pub completed: bool,
}

/// A free-form journal entry, optionally tied to a pillar. Reflections do
/// not participate in scoring; they ride along for the caller's convenience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: String,
    /// Optional owning pillar
    #[serde(default)]
    pub pillar_id: Option<String>,
    /// Local calendar date the reflection was written
    pub date: NaiveDate,
    pub content: String,
}

/// A previously computed pillar score, used as the baseline for trend
/// detection. The engine never recomputes the previous period; it compares
/// against whatever snapshots the caller supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    /// Pillar the snapshot belongs to
    pub pillar_id: String,
    /// Score at the time the snapshot was taken (0-100)
    pub score: u8,
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day of the range (inclusive)
    pub from: NaiveDate,
    /// Last day of the range (inclusive)
    pub to: NaiveDate,
}

impl DateRange {
    /// True when `date` falls within the range, both endpoints inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Direction of a pillar's score relative to its previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

/// Qualitative alignment state of a pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentState {
    Aligned,
    Improving,
    Drifting,
    Regressing,
    Avoiding,
}

impl AlignmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentState::Aligned => "aligned",
            AlignmentState::Improving => "improving",
            AlignmentState::Drifting => "drifting",
            AlignmentState::Regressing => "regressing",
            AlignmentState::Avoiding => "avoiding",
        }
    }
}

/// How one standard compares against observed habit completions.
///
/// Recomputed from scratch on every engine call; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardAlignment {
    /// The standard being measured
    pub standard: Standard,
    /// Observed completions per week, averaged across the pillar's habits
    /// and rounded to one decimal. Display-only: the score is driven by the
    /// pooled completed/expected ratio, not by this figure.
    pub observed_per_week: f64,
    /// Target value echoed from the standard
    pub target: f64,
    /// Attainment score (0-100)
    pub score: u8,
    /// Human-readable summary (e.g. "3.5 / 4 workouts / week")
    pub label: String,
}

/// Per-pillar alignment result, the engine's primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarAlignment {
    pub pillar_id: String,
    pub pillar_name: String,
    pub pillar_color: String,
    /// Attainment score (0-100)
    pub score: u8,
    /// Qualitative state derived from score and trend
    pub state: AlignmentState,
    /// Direction relative to the previous snapshot
    pub trend: Trend,
    /// Per-standard breakdown, in input standard order. Empty when the
    /// pillar has no standards and was scored by the habit fallback.
    pub standards: Vec<StandardAlignment>,
    /// Number of non-archived habits under the pillar
    pub habit_count: usize,
    /// Number of the pillar's habits with a completed log dated today
    pub completed_today: usize,
}

/// Everything the engine needs for one scoring pass.
///
/// The engine reads these collections and never mutates them; derived
/// records are built fresh each call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeAlignmentsInput {
    pub pillars: Vec<Pillar>,
    pub standards: Vec<Standard>,
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
    #[serde(default)]
    pub reflections: Vec<Reflection>,
    /// Previous-period scores for trend detection
    #[serde(default)]
    pub snapshots: Vec<PerformanceSnapshot>,
    /// Scoring window, both endpoints inclusive
    pub range: DateRange,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Aggregate figures across all pillars in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub pillar_count: usize,
    /// Rounded mean of the pillar scores, 0 when there are no pillars
    pub mean_score: u8,
}

/// Complete alignment report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub range: DateRange,
    pub summary: ReportSummary,
    pub pillars: Vec<PillarAlignment>,
}
