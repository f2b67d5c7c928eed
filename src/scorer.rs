//! Per-standard scoring
//!
//! This module measures one standard against observed habit completions:
//! - Expected completions from weekly targets and the week count
//! - Observed completions from logs inside the scoring window
//! - Attainment score (0-100) plus the display label the host renders

use crate::types::{DateRange, Habit, HabitLog, Standard, StandardAlignment};
use crate::window::weeks_spanned;

/// Scorer for a single standard
pub struct StandardScorer;

impl StandardScorer {
    /// Score one standard against the pillar's habits and the log set.
    ///
    /// `habits` is the already pillar-filtered, non-archived habit list for
    /// the standard's pillar. A pillar with no habits scores 0 with a
    /// "0 / target unit" label rather than erroring.
    pub fn score(
        standard: &Standard,
        habits: &[&Habit],
        logs: &[HabitLog],
        range: &DateRange,
    ) -> StandardAlignment {
        if habits.is_empty() {
            return StandardAlignment {
                standard: standard.clone(),
                observed_per_week: 0.0,
                target: standard.target,
                score: 0,
                label: format_label(0.0, standard),
            };
        }

        let weeks = weeks_spanned(range);
        let mut total_completed: u32 = 0;
        let mut total_expected: f64 = 0.0;
        for habit in habits {
            total_completed += completed_in_range(habit, logs, range);
            total_expected += f64::from(habit.target_days_per_week) * f64::from(weeks);
        }

        let score = compute_score(total_completed, total_expected);
        let observed = compute_observed_per_week(total_completed, weeks, habits.len());

        StandardAlignment {
            standard: standard.clone(),
            observed_per_week: observed,
            target: standard.target,
            score,
            label: format_label(observed, standard),
        }
    }
}

/// Count the habit's completed logs that fall inside the range.
pub(crate) fn completed_in_range(habit: &Habit, logs: &[HabitLog], range: &DateRange) -> u32 {
    logs.iter()
        .filter(|log| log.habit_id == habit.id && log.completed && range.contains(log.date))
        .count() as u32
}

/// Attainment score: completed / expected, scaled to 0-100, clamped, then
/// rounded. Zero expected completions score 0.
pub(crate) fn compute_score(completed: u32, expected: f64) -> u8 {
    if expected <= 0.0 {
        return 0;
    }
    let rate = f64::from(completed) / expected;
    (rate * 100.0).clamp(0.0, 100.0).round() as u8
}

/// Display-only completion rate: completions per week averaged across the
/// pillar's habits, rounded to one decimal. The attainment score pools
/// completions against pooled targets instead, so the two figures diverge
/// when habits carry different weekly targets.
fn compute_observed_per_week(completed: u32, weeks: u32, habit_count: usize) -> f64 {
    if habit_count == 0 {
        return 0.0;
    }
    round1(f64::from(completed) / f64::from(weeks) / habit_count as f64)
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Label in the host's "observed / target unit" form, e.g.
/// "3.5 / 4 workouts / week". Whole numbers render without a decimal part,
/// matching how the host displays JS numbers.
fn format_label(observed: f64, standard: &Standard) -> String {
    format!("{} / {} {}", observed, standard.target, standard.unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_standard(target: f64, unit: &str) -> Standard {
        Standard {
            id: "s1".to_string(),
            pillar_id: "p1".to_string(),
            name: "Strength training".to_string(),
            target,
            unit: unit.to_string(),
        }
    }

    fn make_habit(id: &str, target_days_per_week: u32) -> Habit {
        Habit {
            id: id.to_string(),
            pillar_id: "p1".to_string(),
            name: format!("habit {}", id),
            target_days_per_week,
            archived: false,
        }
    }

    /// Logs `per_week` completions in each of `weeks` consecutive weeks,
    /// starting from `start`.
    fn make_weekly_logs(habit_id: &str, start: NaiveDate, per_week: u32, weeks: u32) -> Vec<HabitLog> {
        let mut logs = Vec::new();
        for week in 0..weeks {
            for day in 0..per_week {
                logs.push(HabitLog {
                    id: format!("l-{}-{}-{}", habit_id, week, day),
                    habit_id: habit_id.to_string(),
                    date: start + Duration::days(i64::from(week * 7 + day)),
                    completed: true,
                });
            }
        }
        logs
    }

    // Monday 2024-01-01 through Sunday 2024-01-28: exactly 4 weeks
    fn four_week_range() -> DateRange {
        DateRange {
            from: d(2024, 1, 1),
            to: d(2024, 1, 28),
        }
    }

    #[test]
    fn test_perfect_attainment() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);
        let logs = make_weekly_logs("h1", d(2024, 1, 1), 4, 4);
        assert_eq!(logs.len(), 16);

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        assert_eq!(alignment.score, 100);
        assert_eq!(alignment.observed_per_week, 4.0);
        assert_eq!(alignment.target, 4.0);
        assert_eq!(alignment.label, "4 / 4 workouts / week");
    }

    #[test]
    fn test_half_attainment() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);
        let logs = make_weekly_logs("h1", d(2024, 1, 1), 2, 4);

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        assert_eq!(alignment.score, 50);
        assert_eq!(alignment.observed_per_week, 2.0);
        assert_eq!(alignment.label, "2 / 4 workouts / week");
    }

    #[test]
    fn test_score_clamped_at_100() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);
        // 7 completions a week against a target of 4
        let logs = make_weekly_logs("h1", d(2024, 1, 1), 7, 4);

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        assert_eq!(alignment.score, 100);
        assert_eq!(alignment.observed_per_week, 7.0);
    }

    #[test]
    fn test_no_habits_scores_zero_with_target_label() {
        let standard = make_standard(4.0, "workouts / week");

        let alignment = StandardScorer::score(&standard, &[], &[], &four_week_range());

        assert_eq!(alignment.score, 0);
        assert_eq!(alignment.observed_per_week, 0.0);
        assert_eq!(alignment.label, "0 / 4 workouts / week");
    }

    #[test]
    fn test_zero_weekly_target_scores_zero() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 0);
        let logs = make_weekly_logs("h1", d(2024, 1, 1), 3, 4);

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        assert_eq!(alignment.score, 0);
    }

    #[test]
    fn test_only_completed_logs_in_range_count() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);

        let mut logs = make_weekly_logs("h1", d(2024, 1, 1), 2, 4);
        // Not completed
        logs.push(HabitLog {
            id: "skip-1".to_string(),
            habit_id: "h1".to_string(),
            date: d(2024, 1, 5),
            completed: false,
        });
        // Outside the range
        logs.push(HabitLog {
            id: "late-1".to_string(),
            habit_id: "h1".to_string(),
            date: d(2024, 2, 5),
            completed: true,
        });
        // Different habit
        logs.push(HabitLog {
            id: "other-1".to_string(),
            habit_id: "h2".to_string(),
            date: d(2024, 1, 5),
            completed: true,
        });

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        // Still only the 8 completed in-range logs
        assert_eq!(alignment.score, 50);
    }

    #[test]
    fn test_one_more_completion_never_lowers_the_score() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);
        let range = four_week_range();

        let mut previous = 0u8;
        for n in 0..=20u32 {
            let logs: Vec<HabitLog> = (0..n)
                .map(|i| HabitLog {
                    id: format!("l{}", i),
                    habit_id: "h1".to_string(),
                    // Several per day is fine; each completed log counts
                    date: d(2024, 1, 1) + Duration::days(i64::from(i % 28)),
                    completed: true,
                })
                .collect();

            let alignment = StandardScorer::score(&standard, &[&habit], &logs, &range);
            assert!(
                alignment.score >= previous,
                "score dropped from {} to {} at {} logs",
                previous,
                alignment.score,
                n
            );
            previous = alignment.score;
        }
    }

    #[test]
    fn test_observed_is_rounded_to_one_decimal() {
        let standard = make_standard(4.0, "workouts / week");
        let habit = make_habit("h1", 4);
        // 5 completions over 4 weeks: 1.25 per week, displayed as 1.3
        let logs = make_weekly_logs("h1", d(2024, 1, 1), 1, 4)
            .into_iter()
            .chain(std::iter::once(HabitLog {
                id: "extra".to_string(),
                habit_id: "h1".to_string(),
                date: d(2024, 1, 2),
                completed: true,
            }))
            .collect::<Vec<_>>();

        let alignment = StandardScorer::score(&standard, &[&habit], &logs, &four_week_range());

        assert_eq!(alignment.observed_per_week, 1.3);
        assert_eq!(alignment.label, "1.3 / 4 workouts / week");
    }

    #[test]
    fn test_observed_diverges_from_score_with_mixed_targets() {
        let standard = make_standard(4.0, "sessions / week");
        let light = make_habit("h1", 1);
        let heavy = make_habit("h2", 7);
        let mut logs = make_weekly_logs("h1", d(2024, 1, 1), 1, 4);
        logs.extend(make_weekly_logs("h2", d(2024, 1, 1), 1, 4));

        let alignment =
            StandardScorer::score(&standard, &[&light, &heavy], &logs, &four_week_range());

        // Pooled: 8 completed / 32 expected = 25
        assert_eq!(alignment.score, 25);
        // Averaged display rate: 8 / 4 weeks / 2 habits = 1.0
        assert_eq!(alignment.observed_per_week, 1.0);
    }

    #[test]
    fn test_compute_score_zero_expected() {
        assert_eq!(compute_score(0, 0.0), 0);
        assert_eq!(compute_score(12, 0.0), 0);
    }

    #[test]
    fn test_compute_score_rounds_to_nearest() {
        // 1/3 = 33.33.. -> 33, 2/3 = 66.66.. -> 67
        assert_eq!(compute_score(1, 3.0), 33);
        assert_eq!(compute_score(2, 3.0), 67);
    }
}
