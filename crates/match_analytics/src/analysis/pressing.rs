//! Pressing metrics: PPDA and high regains.

use crate::config::PressingConfig;
use crate::engine::pitch::MatchOrientation;
use crate::models::{EventType, MatchEvent, TeamSide};

/// Passes allowed per defensive action, rounded to one decimal.
///
/// Zero defensive actions yields the pass count itself rather than infinity.
pub fn ppda(opponent_passes: usize, defensive_actions: usize) -> f64 {
    if defensive_actions == 0 {
        return opponent_passes as f64;
    }
    (opponent_passes as f64 / defensive_actions as f64 * 10.0).round() / 10.0
}

/// PPDA of `team`: the opponent's completed passes over `team`'s tackles and
/// interceptions.
pub fn team_ppda(events: &[MatchEvent], team: TeamSide) -> f64 {
    let opponent = team.opponent();
    let opponent_passes =
        events.iter().filter(|e| e.team == opponent && e.is_completed_pass()).count();
    let defensive_actions = events
        .iter()
        .filter(|e| e.team == team && e.event_type().is_defensive_action())
        .count();
    ppda(opponent_passes, defensive_actions)
}

/// Recoveries by `team` within `config.high_regain_depth` of the goal it
/// attacks. Positionless recoveries are not counted.
pub fn count_high_regains(
    events: &[MatchEvent],
    team: TeamSide,
    orientation: &MatchOrientation,
    config: &PressingConfig,
) -> usize {
    events
        .iter()
        .filter(|e| e.team == team && e.event_type() == EventType::Recovery)
        .filter(|e| {
            e.position.is_some_and(|p| {
                orientation.direction_for(e).within_attacking_depth(p, config.high_regain_depth)
            })
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PassDetails;

    #[test]
    fn test_ppda_zero_defensive_actions() {
        assert_eq!(ppda(17, 0), 17.0);
        assert_eq!(ppda(0, 0), 0.0);
    }

    #[test]
    fn test_ppda_rounding() {
        assert_eq!(ppda(10, 4), 2.5);
        assert_eq!(ppda(10, 3), 3.3);
        assert_eq!(ppda(0, 5), 0.0);
    }

    #[test]
    fn test_team_ppda_counts_completed_opponent_passes() {
        let failed = PassDetails { successful: false, ..PassDetails::default() };
        let events = vec![
            MatchEvent::pass(TeamSide::Away, PassDetails::default()),
            MatchEvent::pass(TeamSide::Away, PassDetails::default()),
            MatchEvent::pass(TeamSide::Away, PassDetails::default()),
            MatchEvent::pass(TeamSide::Away, failed),
            MatchEvent::pass(TeamSide::Home, PassDetails::default()),
            MatchEvent::simple(TeamSide::Home, EventType::Tackle),
            MatchEvent::simple(TeamSide::Home, EventType::Interception),
            MatchEvent::simple(TeamSide::Home, EventType::Duel),
        ];
        assert_eq!(team_ppda(&events, TeamSide::Home), 1.5);
        // away made no defensive actions: falls back to home's pass count
        assert_eq!(team_ppda(&events, TeamSide::Away), 1.0);
    }

    #[test]
    fn test_high_regains_by_direction() {
        let orientation = MatchOrientation::default();
        let config = PressingConfig::default();
        let events = vec![
            MatchEvent::simple(TeamSide::Home, EventType::Recovery).at(50.0, 30.0),
            MatchEvent::simple(TeamSide::Home, EventType::Recovery).at(50.0, 40.0),
            MatchEvent::simple(TeamSide::Home, EventType::Recovery),
            MatchEvent::simple(TeamSide::Home, EventType::Tackle).at(50.0, 10.0),
            MatchEvent::simple(TeamSide::Away, EventType::Recovery).at(50.0, 70.0),
            MatchEvent::simple(TeamSide::Away, EventType::Recovery).at(50.0, 30.0),
        ];
        assert_eq!(count_high_regains(&events, TeamSide::Home, &orientation, &config), 1);
        assert_eq!(count_high_regains(&events, TeamSide::Away, &orientation, &config), 1);

        let swapped = orientation.swapped();
        assert_eq!(count_high_regains(&events, TeamSide::Away, &swapped, &config), 1);
        assert_eq!(count_high_regains(&events, TeamSide::Home, &swapped, &config), 0);
    }
}
