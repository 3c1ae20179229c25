//! Progressive pass classification
//!
//! A completed pass is *progressive* when it brings the ball substantially
//! closer to the attacked goal centre (absolute or relative reduction), and a
//! *deep completion* when it enters the final third from outside it with a
//! small minimum gain. Either flag makes the pass count once in aggregates.

use serde::{Deserialize, Serialize};

use crate::config::ProgressiveConfig;
use crate::engine::pitch::{distance_to_goal_center, AttackDirection, MatchOrientation, PitchPoint};
use crate::models::MatchEvent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassClassification {
    pub progressive: bool,
    pub deep_completion: bool,
    /// Reduction in distance to the goal centre, meters (negative = backward)
    pub distance_gain_m: f64,
}

impl PassClassification {
    #[inline]
    pub fn is_counted(&self) -> bool {
        self.progressive || self.deep_completion
    }
}

/// Classify a pass from `start` to `end` made by a team attacking `direction`.
pub fn classify_pass(
    start: PitchPoint,
    end: PitchPoint,
    direction: AttackDirection,
    config: &ProgressiveConfig,
) -> PassClassification {
    let start = start.canonical(direction);
    let end = end.canonical(direction);

    let before = distance_to_goal_center(start.to_meters());
    let after = distance_to_goal_center(end.to_meters());
    let gain = before - after;
    let ratio = if before > 0.0 { gain / before } else { 0.0 };

    let progressive = gain > config.min_reduction_m || ratio > config.min_reduction_ratio;
    let deep_completion = end.y < config.final_third_depth
        && start.y >= config.final_third_depth
        && gain >= config.deep_completion_min_gain_m;

    PassClassification { progressive, deep_completion, distance_gain_m: gain }
}

/// Classification of a pass event, or `None` unless it is a completed pass
/// with both start and end positions.
pub fn classify_pass_event(
    event: &MatchEvent,
    orientation: &MatchOrientation,
    config: &ProgressiveConfig,
) -> Option<PassClassification> {
    let pass = event.as_pass().filter(|p| p.successful)?;
    let start = event.position?;
    let end = pass.end?;
    Some(classify_pass(start, end, orientation.direction_for(event), config))
}

/// Passes in `events` that are progressive or deep completions.
pub fn count_progressive_passes(
    events: &[MatchEvent],
    orientation: &MatchOrientation,
    config: &ProgressiveConfig,
) -> usize {
    events
        .iter()
        .filter_map(|e| classify_pass_event(e, orientation, config))
        .filter(PassClassification::is_counted)
        .count()
}
