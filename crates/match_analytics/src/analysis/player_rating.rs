//! Player match rating on a 0..10 scale.

use serde::{Deserialize, Serialize};

use super::round_dp;
use super::shot_stats::pass_accuracy;
use crate::engine::pitch::MatchOrientation;
use crate::engine::xg::total_xg;
use crate::models::{EventType, MatchEvent, PlayerId, ShotOutcome};

const BASE_RATING: f64 = 5.0;
const GOAL_BONUS: f64 = 1.2;
const ASSIST_BONUS: f64 = 0.8;
const XG_BONUS: f64 = 0.5;
const ACCURACY_THRESHOLD: f64 = 80.0;
const ACCURACY_BONUS_PER_POINT: f64 = 0.02;
const TACKLE_BONUS: f64 = 0.3;
const INTERCEPTION_BONUS: f64 = 0.25;
const ACTIVITY_TOUCHES: usize = 50;
const ACTIVITY_BONUS: f64 = 0.3;

/// Per-player tallies the rating is computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRatingInput {
    pub goals: u32,
    pub assists: u32,
    pub xg: f64,
    /// Pass accuracy in percent; `None` when the player made no passes
    pub pass_accuracy: Option<f64>,
    pub tackles: u32,
    pub interceptions: u32,
    pub touches: usize,
}

impl PlayerRatingInput {
    /// Tally one player's events. An assist is a completed pass whose
    /// `assist_id` names a goal in `events`.
    pub fn from_events(
        events: &[MatchEvent],
        player_id: PlayerId,
        orientation: &MatchOrientation,
    ) -> Self {
        let own: Vec<MatchEvent> =
            events.iter().filter(|e| e.player_id == Some(player_id)).cloned().collect();
        let count = |t: EventType| own.iter().filter(|e| e.event_type() == t).count() as u32;

        let goals = own
            .iter()
            .filter(|e| e.as_shot().is_some_and(|s| s.outcome == ShotOutcome::Goal))
            .count() as u32;
        let is_goal_id = |id: u64| {
            events.iter().any(|e| {
                e.id == Some(id) && e.as_shot().is_some_and(|s| s.outcome == ShotOutcome::Goal)
            })
        };
        let assists = own
            .iter()
            .filter_map(|e| e.as_pass().filter(|p| p.successful))
            .filter(|p| p.assist_id.is_some_and(is_goal_id))
            .count() as u32;
        let has_passes = own.iter().any(|e| e.as_pass().is_some());

        Self {
            goals,
            assists,
            xg: total_xg(&own, orientation),
            pass_accuracy: has_passes.then(|| pass_accuracy(&own)),
            tackles: count(EventType::Tackle),
            interceptions: count(EventType::Interception),
            touches: count(EventType::Touch) as usize,
        }
    }
}

/// Rating rounded to one decimal and clamped to [0, 10].
pub fn calculate_player_rating(input: &PlayerRatingInput) -> f64 {
    let mut rating = BASE_RATING;
    rating += f64::from(input.goals) * GOAL_BONUS;
    rating += f64::from(input.assists) * ASSIST_BONUS;
    if input.xg.is_finite() {
        rating += input.xg * XG_BONUS;
    }
    if let Some(acc) = input.pass_accuracy.filter(|a| *a > ACCURACY_THRESHOLD) {
        rating += (acc - ACCURACY_THRESHOLD) * ACCURACY_BONUS_PER_POINT;
    }
    rating += f64::from(input.tackles) * TACKLE_BONUS;
    rating += f64::from(input.interceptions) * INTERCEPTION_BONUS;
    if input.touches > ACTIVITY_TOUCHES {
        rating += ACTIVITY_BONUS;
    }
    round_dp(rating, 1).clamp(0.0, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassDetails, ShotDetails, TeamSide};

    #[test]
    fn test_baseline_rating() {
        assert_eq!(calculate_player_rating(&PlayerRatingInput::default()), 5.0);
    }

    #[test]
    fn test_rating_components() {
        let input = PlayerRatingInput {
            goals: 1,
            assists: 1,
            xg: 0.6,
            pass_accuracy: Some(90.0),
            tackles: 2,
            interceptions: 2,
            touches: 51,
        };
        // 5 + 1.2 + 0.8 + 0.3 + 0.2 + 0.6 + 0.5 + 0.3
        assert_eq!(calculate_player_rating(&input), 8.9);
    }

    #[test]
    fn test_accuracy_at_threshold_adds_nothing() {
        let input = PlayerRatingInput { pass_accuracy: Some(80.0), touches: 50, ..Default::default() };
        assert_eq!(calculate_player_rating(&input), 5.0);
    }

    #[test]
    fn test_rating_is_capped() {
        let input = PlayerRatingInput { goals: 5, ..Default::default() };
        assert_eq!(calculate_player_rating(&input), 10.0);
    }

    #[test]
    fn test_from_events() {
        let orientation = MatchOrientation::default();
        let goal = MatchEvent::shot(
            TeamSide::Home,
            ShotDetails { outcome: ShotOutcome::Goal, ..ShotDetails::default() },
        )
        .with_id(100)
        .with_player(9)
        .with_xg(0.4);
        let assist = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { assist_id: Some(100), receiver_id: Some(9), ..PassDetails::default() },
        )
        .with_player(7);
        let misplaced = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { successful: false, ..PassDetails::default() },
        )
        .with_player(7);
        let tackle = MatchEvent::simple(TeamSide::Home, EventType::Tackle).with_player(7);
        let events = vec![goal, assist, misplaced, tackle];

        let striker = PlayerRatingInput::from_events(&events, 9, &orientation);
        assert_eq!(striker.goals, 1);
        assert_eq!(striker.xg, 0.4);
        assert_eq!(striker.pass_accuracy, None);

        let creator = PlayerRatingInput::from_events(&events, 7, &orientation);
        assert_eq!(creator.assists, 1);
        assert_eq!(creator.tackles, 1);
        assert_eq!(creator.pass_accuracy, Some(50.0));
        // 5 + 0.8 + 0.3
        assert_eq!(calculate_player_rating(&creator), 6.1);
    }
}
