//! Pillar aggregation
//!
//! This module is the engine's primary entry point. For every pillar it:
//! 1. Filters the pillar's standards and non-archived habits
//! 2. Scores each standard, or falls back to pooled habit scoring when the
//!    pillar declares no standards
//! 3. Classifies trend against the previous snapshot and the qualitative
//!    alignment state
//!
//! Output order always matches input pillar order.

use crate::classify::{classify_state, compute_trend};
use crate::scorer::{completed_in_range, compute_score, StandardScorer};
use crate::types::{
    ComputeAlignmentsInput, DateRange, Habit, HabitLog, PillarAlignment, Standard,
    StandardAlignment,
};
use crate::window::weeks_spanned;
use chrono::{Local, NaiveDate};

/// Compute per-pillar alignment, treating `today` as the current calendar
/// date (used only for the completed-today count).
///
/// Deterministic and side-effect free: identical input and `today` always
/// produce identical output, the input collections are never mutated, and
/// every derived record is built fresh on each call.
pub fn compute_alignments_on(
    input: &ComputeAlignmentsInput,
    today: NaiveDate,
) -> Vec<PillarAlignment> {
    let mut results = Vec::new();

    for pillar in &input.pillars {
        let standards: Vec<&Standard> = input
            .standards
            .iter()
            .filter(|s| s.pillar_id == pillar.id)
            .collect();
        let habits: Vec<&Habit> = input
            .habits
            .iter()
            .filter(|h| h.pillar_id == pillar.id && !h.archived)
            .collect();

        let (score, standard_alignments) = if !standards.is_empty() {
            let mut alignments = Vec::new();
            for standard in standards {
                alignments.push(StandardScorer::score(
                    standard,
                    &habits,
                    &input.logs,
                    &input.range,
                ));
            }
            (mean_score(&alignments), alignments)
        } else if !habits.is_empty() {
            (pooled_score(&habits, &input.logs, &input.range), Vec::new())
        } else {
            (0, Vec::new())
        };

        let trend = compute_trend(score, &input.snapshots, &pillar.id);
        let state = classify_state(score, trend);

        results.push(PillarAlignment {
            pillar_id: pillar.id.clone(),
            pillar_name: pillar.name.clone(),
            pillar_color: pillar.color.clone(),
            score,
            state,
            trend,
            standards: standard_alignments,
            habit_count: habits.len(),
            completed_today: completed_today(&habits, &input.logs, today),
        });
    }

    results
}

/// Compute per-pillar alignment using the local calendar date as today.
pub fn compute_alignments(input: &ComputeAlignmentsInput) -> Vec<PillarAlignment> {
    compute_alignments_on(input, Local::now().date_naive())
}

/// Rounded mean of the per-standard scores.
fn mean_score(alignments: &[StandardAlignment]) -> u8 {
    if alignments.is_empty() {
        return 0;
    }
    let sum: u32 = alignments.iter().map(|a| u32::from(a.score)).sum();
    (f64::from(sum) / alignments.len() as f64).round() as u8
}

/// Fallback for pillars with habits but no declared standards: pool every
/// habit's completions against pooled weekly targets, with no per-standard
/// breakdown.
fn pooled_score(habits: &[&Habit], logs: &[HabitLog], range: &DateRange) -> u8 {
    let weeks = weeks_spanned(range);
    let mut total_completed: u32 = 0;
    let mut total_expected: f64 = 0.0;
    for habit in habits {
        total_completed += completed_in_range(habit, logs, range);
        total_expected += f64::from(habit.target_days_per_week) * f64::from(weeks);
    }
    compute_score(total_completed, total_expected)
}

/// Number of the pillar's habits with a completed log dated `today`. A habit
/// counts once no matter how many logs it has for the day.
fn completed_today(habits: &[&Habit], logs: &[HabitLog], today: NaiveDate) -> usize {
    habits
        .iter()
        .filter(|habit| {
            logs.iter()
                .any(|log| log.habit_id == habit.id && log.completed && log.date == today)
        })
        .count()
}
