//! Expected goals (xG)
//!
//! Piecewise-linear distance baseline, scaled by a goal-mouth angle factor and
//! context multipliers (penalty box, set piece, body part). All geometry is in
//! the canonical frame: the shot's coordinates must already be mirrored so the
//! attacked goal sits on the `y = 0` line.

use super::pitch::{
    distance_to_goal_center, goal_angle_degrees, in_penalty_box, AttackDirection,
    MatchOrientation, PitchPoint,
};
use crate::models::{BodyPart, MatchEvent, ShotType};

/// Fixed penalty value, independent of position.
pub const PENALTY_XG: f64 = 0.76;

const MIN_ANGLE_FACTOR: f64 = 0.3;
const MAX_ANGLE_DEG: f64 = 90.0;

const PENALTY_BOX_MULTIPLIER: f64 = 1.20;
const SET_PIECE_MULTIPLIER: f64 = 1.10;
const HEADER_MULTIPLIER: f64 = 0.65;
const OTHER_BODY_PART_MULTIPLIER: f64 = 0.45;

/// Baseline by distance to the goal centre (meters).
fn distance_baseline(d: f64) -> f64 {
    if d < 5.0 {
        0.52 - 0.06 * d
    } else if d < 10.0 {
        0.38 - 0.026 * (d - 5.0)
    } else if d < 16.5 {
        0.24 - 0.018 * (d - 10.0)
    } else if d < 22.0 {
        0.12 - 0.011 * (d - 16.5)
    } else if d < 30.0 {
        0.06 - 0.005 * (d - 22.0)
    } else if d < 40.0 {
        0.02 - 0.0015 * (d - 30.0)
    } else {
        (0.005 - 0.0001 * (d - 40.0)).max(0.0005)
    }
}

/// Wider goal-mouth angles mean a more central, closer position; the factor
/// decays as the angle opens past 15 degrees.
fn angle_factor(angle_deg: f64) -> f64 {
    let a = if angle_deg.is_finite() { angle_deg.min(MAX_ANGLE_DEG) } else { 0.0 };
    let factor = if a <= 15.0 {
        1.0
    } else if a <= 30.0 {
        1.0 - (a - 15.0) / 15.0 * 0.15
    } else if a <= 45.0 {
        0.85 - (a - 30.0) / 15.0 * 0.20
    } else {
        0.65 - (a - 45.0) / 45.0 * 0.35
    };
    factor.max(MIN_ANGLE_FACTOR)
}

/// xG of a shot at a canonical-frame position. Always within [0, 1].
pub fn calculate_xg(position: PitchPoint, shot_type: ShotType, body_part: BodyPart) -> f64 {
    if shot_type == ShotType::Penalty {
        return PENALTY_XG;
    }

    let m = position.to_meters();
    let mut xg = distance_baseline(distance_to_goal_center(m));
    xg *= angle_factor(goal_angle_degrees(m));

    if in_penalty_box(m) {
        xg *= PENALTY_BOX_MULTIPLIER;
    }
    if shot_type == ShotType::SetPiece {
        xg *= SET_PIECE_MULTIPLIER;
    }
    match body_part {
        BodyPart::Head => xg *= HEADER_MULTIPLIER,
        BodyPart::Other => xg *= OTHER_BODY_PART_MULTIPLIER,
        BodyPart::Foot => {}
    }

    xg.clamp(0.0, 1.0)
}

/// Model xG of a shot event, mirrored by the direction its team attacked.
///
/// `None` for non-shots and for positionless non-penalty shots.
pub fn expected_goals_directional(event: &MatchEvent, direction: AttackDirection) -> Option<f64> {
    let shot = event.as_shot()?;
    if shot.shot_type == ShotType::Penalty {
        return Some(PENALTY_XG);
    }
    let position = event.position?.canonical(direction);
    Some(calculate_xg(position, shot.shot_type, shot.body_part))
}

/// Stored xG when it is a finite number (zero included), else the model value.
pub fn resolved_xg(event: &MatchEvent, orientation: &MatchOrientation) -> Option<f64> {
    event.as_shot()?;
    event
        .stored_xg()
        .or_else(|| expected_goals_directional(event, orientation.direction_for(event)))
}

/// Sum of resolved xG over the shots in `events`. Other kinds are ignored.
pub fn total_xg(events: &[MatchEvent], orientation: &MatchOrientation) -> f64 {
    events.iter().filter_map(|e| resolved_xg(e, orientation)).sum()
}
