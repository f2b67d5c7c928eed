//! Trend and state classification
//!
//! This module turns a pillar's current score into qualitative signals:
//! - Trend: direction relative to the previous period's snapshot
//! - AlignmentState: the five-state label the dashboard and advisory
//!   surfaces render

use crate::types::{AlignmentState, PerformanceSnapshot, Trend};

/// Score movement must exceed this many points (strictly) to register as a
/// trend; a change of exactly 5 is still Flat.
pub const TREND_THRESHOLD: i32 = 5;

/// Minimum score for Aligned
pub const ALIGNED_FLOOR: u8 = 80;
/// Minimum score for Improving (also requires an upward trend)
pub const IMPROVING_FLOOR: u8 = 60;
/// Minimum score for Drifting
pub const DRIFTING_FLOOR: u8 = 40;

/// Compare the current score against the previous period's snapshot for the
/// same pillar.
///
/// The first snapshot with a matching pillar id wins; a pillar with no
/// snapshot (first run, or newly created) reads as Flat rather than Up.
pub fn compute_trend(current: u8, snapshots: &[PerformanceSnapshot], pillar_id: &str) -> Trend {
    match snapshots.iter().find(|s| s.pillar_id == pillar_id) {
        Some(previous) => {
            let diff = i32::from(current) - i32::from(previous.score);
            if diff > TREND_THRESHOLD {
                Trend::Up
            } else if diff < -TREND_THRESHOLD {
                Trend::Down
            } else {
                Trend::Flat
            }
        }
        None => Trend::Flat,
    }
}

/// Classify a pillar's qualitative state from its score and trend.
///
/// First match wins, and the order is part of the contract: a score of 80+
/// is Aligned even while falling, and a rising trend cannot promote a score
/// below 60 past Drifting.
pub fn classify_state(score: u8, trend: Trend) -> AlignmentState {
    if score >= ALIGNED_FLOOR {
        AlignmentState::Aligned
    } else if score >= IMPROVING_FLOOR && trend == Trend::Up {
        AlignmentState::Improving
    } else if score >= DRIFTING_FLOOR {
        AlignmentState::Drifting
    } else if trend == Trend::Down {
        AlignmentState::Regressing
    } else {
        AlignmentState::Avoiding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_snapshot(pillar_id: &str, score: u8) -> PerformanceSnapshot {
        PerformanceSnapshot {
            pillar_id: pillar_id.to_string(),
            score,
        }
    }

    #[test]
    fn test_trend_without_snapshot_is_flat() {
        assert_eq!(compute_trend(90, &[], "p1"), Trend::Flat);

        let snapshots = vec![make_snapshot("other", 10)];
        assert_eq!(compute_trend(90, &snapshots, "p1"), Trend::Flat);
    }

    #[test]
    fn test_trend_threshold_is_strict() {
        let snapshots = vec![make_snapshot("p1", 50)];

        // Exactly +5 / -5 is still flat
        assert_eq!(compute_trend(55, &snapshots, "p1"), Trend::Flat);
        assert_eq!(compute_trend(45, &snapshots, "p1"), Trend::Flat);

        // One past the threshold flips the trend
        assert_eq!(compute_trend(56, &snapshots, "p1"), Trend::Up);
        assert_eq!(compute_trend(44, &snapshots, "p1"), Trend::Down);
    }

    #[test]
    fn test_trend_uses_first_matching_snapshot() {
        let snapshots = vec![make_snapshot("p1", 50), make_snapshot("p1", 90)];
        assert_eq!(compute_trend(60, &snapshots, "p1"), Trend::Up);
    }

    #[test]
    fn test_state_each_band() {
        assert_eq!(classify_state(95, Trend::Flat), AlignmentState::Aligned);
        assert_eq!(classify_state(80, Trend::Flat), AlignmentState::Aligned);
        assert_eq!(classify_state(65, Trend::Up), AlignmentState::Improving);
        assert_eq!(classify_state(60, Trend::Up), AlignmentState::Improving);
        assert_eq!(classify_state(65, Trend::Flat), AlignmentState::Drifting);
        assert_eq!(classify_state(40, Trend::Flat), AlignmentState::Drifting);
        assert_eq!(classify_state(39, Trend::Down), AlignmentState::Regressing);
        assert_eq!(classify_state(39, Trend::Flat), AlignmentState::Avoiding);
        assert_eq!(classify_state(0, Trend::Up), AlignmentState::Avoiding);
    }

    #[test]
    fn test_state_order_gives_high_scores_precedence() {
        // 80+ stays Aligned even while falling
        assert_eq!(classify_state(85, Trend::Down), AlignmentState::Aligned);
        // Below 60, an upward trend cannot reach Improving
        assert_eq!(classify_state(55, Trend::Up), AlignmentState::Drifting);
    }

    #[test]
    fn test_state_band_edges() {
        assert_eq!(classify_state(79, Trend::Flat), AlignmentState::Drifting);
        assert_eq!(classify_state(79, Trend::Up), AlignmentState::Improving);
        assert_eq!(classify_state(59, Trend::Up), AlignmentState::Drifting);
    }
}
