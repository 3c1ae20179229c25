//! Pitch geometry
//!
//! Event coordinates arrive normalized to 0..100 on both axes:
//! - `x`: across the pitch (touchline to touchline, 68m)
//! - `y`: along the pitch (goal line to goal line, 105m)
//!
//! The canonical frame puts the attacked goal on the `y = 0` goal line.
//! Every direction-dependent computation goes through [`AttackDirection`]
//! so that side swaps at half-time stay representable.

use crate::models::{MatchEvent, TeamSide};
use serde::{Deserialize, Serialize};

/// Pitch dimensions
pub mod field {
    /// Pitch length in meters (goal line to goal line, maps `y`)
    pub const LENGTH_M: f64 = 105.0;
    /// Pitch width in meters (touchline to touchline, maps `x`)
    pub const WIDTH_M: f64 = 68.0;
    /// Upper bound of normalized coordinates
    pub const NORMALIZED_MAX: f64 = 100.0;
}

/// Goal dimensions (FIFA standard)
pub mod goal {
    use super::field;

    /// Goal width in meters
    pub const WIDTH_M: f64 = 7.32;
    /// Goal centre across the pitch (meters from the left touchline)
    pub const CENTER_X_M: f64 = field::WIDTH_M / 2.0;
    /// Left post x (meters)
    pub const LEFT_POST_X_M: f64 = CENTER_X_M - WIDTH_M / 2.0;
    /// Right post x (meters)
    pub const RIGHT_POST_X_M: f64 = CENTER_X_M + WIDTH_M / 2.0;
}

/// Penalty area dimensions
pub mod penalty_box {
    use super::field;

    /// Depth from the goal line (meters)
    pub const DEPTH_M: f64 = 16.5;
    /// Width across the pitch (meters)
    pub const WIDTH_M: f64 = 40.32;
    /// Left edge x (meters)
    pub const MIN_X_M: f64 = (field::WIDTH_M - WIDTH_M) / 2.0;
    /// Right edge x (meters)
    pub const MAX_X_M: f64 = (field::WIDTH_M + WIDTH_M) / 2.0;
}

/// A validated position in normalized (0..100) pitch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    /// Returns `None` unless both coordinates are finite and within 0..=100.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        if is_valid_coordinate(x) && is_valid_coordinate(y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Build from optional raw values; a missing axis makes the point absent.
    pub fn from_raw(x: Option<f64>, y: Option<f64>) -> Option<Self> {
        Self::new(x?, y?)
    }

    #[inline]
    pub fn to_meters(self) -> MeterPos {
        to_meters(self)
    }

    /// Mirror into the canonical frame (attacked goal at `y = 0`).
    #[inline]
    pub fn canonical(self, direction: AttackDirection) -> Self {
        direction.to_canonical(self)
    }
}

/// A position in meters: `x` across (0..68), `y` along (0..105).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterPos {
    pub x: f64,
    pub y: f64,
}

/// Which goal line a team attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackDirection {
    /// Attacks the goal on the `y = 0` line
    TowardLow,
    /// Attacks the goal on the `y = 100` line
    TowardHigh,
}

impl AttackDirection {
    pub fn flipped(self) -> Self {
        match self {
            AttackDirection::TowardLow => AttackDirection::TowardHigh,
            AttackDirection::TowardHigh => AttackDirection::TowardLow,
        }
    }

    /// Mirror a point so that this direction's target goal sits at `y = 0`.
    #[inline]
    pub fn to_canonical(self, p: PitchPoint) -> PitchPoint {
        match self {
            AttackDirection::TowardLow => p,
            AttackDirection::TowardHigh => PitchPoint { x: p.x, y: field::NORMALIZED_MAX - p.y },
        }
    }

    /// Centre of the attacked goal, in meters (uncanonicalized frame).
    pub fn target_goal_center_m(self) -> MeterPos {
        match self {
            AttackDirection::TowardLow => MeterPos { x: goal::CENTER_X_M, y: 0.0 },
            AttackDirection::TowardHigh => MeterPos { x: goal::CENTER_X_M, y: field::LENGTH_M },
        }
    }

    /// True when `p` lies within `depth` normalized units of the attacked goal
    /// line (strictly).
    #[inline]
    pub fn within_attacking_depth(self, p: PitchPoint, depth: f64) -> bool {
        self.to_canonical(p).y < depth
    }
}

/// Minute from which an event belongs to the second half.
pub const SECOND_HALF_START_MINUTE: u32 = 45;

/// Attack directions of both teams in the first half, plus whether the sides
/// swap for the second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOrientation {
    pub home: AttackDirection,
    pub away: AttackDirection,
    #[serde(default)]
    pub swap_at_half_time: bool,
}

impl Default for MatchOrientation {
    /// Home attacks toward `y = 0`, away toward `y = 100`, no swap.
    fn default() -> Self {
        Self {
            home: AttackDirection::TowardLow,
            away: AttackDirection::TowardHigh,
            swap_at_half_time: false,
        }
    }
}

impl MatchOrientation {
    pub fn with_half_time_swap(mut self) -> Self {
        self.swap_at_half_time = true;
        self
    }

    /// First-half direction of `team`.
    pub fn direction_of(&self, team: TeamSide) -> AttackDirection {
        match team {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    /// Direction of `team` at `minute`. Events without a minute count as
    /// first half.
    pub fn direction_at(&self, team: TeamSide, minute: Option<u32>) -> AttackDirection {
        let direction = self.direction_of(team);
        match minute {
            Some(m) if self.swap_at_half_time && m >= SECOND_HALF_START_MINUTE => {
                direction.flipped()
            }
            _ => direction,
        }
    }

    /// Direction the event's team was attacking when the event happened.
    /// A direction recorded on a pass wins over the match-level orientation.
    pub fn direction_for(&self, event: &MatchEvent) -> AttackDirection {
        event
            .as_pass()
            .and_then(|p| p.attack_direction)
            .unwrap_or_else(|| self.direction_at(event.team, event.minute))
    }

    /// Sides after the half-time swap.
    pub fn swapped(self) -> Self {
        Self { home: self.home.flipped(), away: self.away.flipped(), ..self }
    }
}

#[inline]
pub fn is_valid_coordinate(v: f64) -> bool {
    v.is_finite() && (0.0..=field::NORMALIZED_MAX).contains(&v)
}

/// Normalized -> meters (`xm = x/100*68`, `ym = y/100*105`).
#[inline]
pub fn to_meters(p: PitchPoint) -> MeterPos {
    MeterPos {
        x: p.x / field::NORMALIZED_MAX * field::WIDTH_M,
        y: p.y / field::NORMALIZED_MAX * field::LENGTH_M,
    }
}

/// Meters -> normalized. The result is not range-checked.
#[inline]
pub fn to_normalized(m: MeterPos) -> PitchPoint {
    PitchPoint {
        x: m.x / field::WIDTH_M * field::NORMALIZED_MAX,
        y: m.y / field::LENGTH_M * field::NORMALIZED_MAX,
    }
}

#[inline]
pub fn distance(a: MeterPos, b: MeterPos) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance to the centre of the goal on the `y = 0` line (canonical frame).
#[inline]
pub fn distance_to_goal_center(m: MeterPos) -> f64 {
    distance(m, MeterPos { x: goal::CENTER_X_M, y: 0.0 })
}

/// Angle subtended by the goal mouth, in degrees, via the law of cosines.
///
/// Canonical frame. Standing on a post is degenerate and yields 0.
pub fn goal_angle_degrees(m: MeterPos) -> f64 {
    let to_left = distance(m, MeterPos { x: goal::LEFT_POST_X_M, y: 0.0 });
    let to_right = distance(m, MeterPos { x: goal::RIGHT_POST_X_M, y: 0.0 });
    let denom = 2.0 * to_left * to_right;
    if denom <= f64::EPSILON {
        return 0.0;
    }

    let cos = (to_left * to_left + to_right * to_right - goal::WIDTH_M * goal::WIDTH_M) / denom;
    let angle = cos.clamp(-1.0, 1.0).acos().to_degrees();
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}

/// Penalty-box membership (canonical frame, edges inclusive).
#[inline]
pub fn in_penalty_box(m: MeterPos) -> bool {
    m.y <= penalty_box::DEPTH_M && m.x >= penalty_box::MIN_X_M && m.x <= penalty_box::MAX_X_M
}
