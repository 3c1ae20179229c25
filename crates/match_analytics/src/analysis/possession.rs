//! Time-weighted possession
//!
//! Each pass or touch stands for an estimated number of seconds on the ball.
//! Completed passes weigh more than touches, progressive ones more still,
//! failed passes almost nothing. Events deep in the attacking half get a
//! floor. Shares are the teams' fractions of the summed time.

use serde::{Deserialize, Serialize};

use super::progressive::classify_pass_event;
use crate::config::{PossessionConfig, ProgressiveConfig};
use crate::engine::pitch::MatchOrientation;
use crate::models::{EventKind, MatchEvent};

/// Possession percentages; `home + away == 100` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PossessionShare {
    pub home: f64,
    pub away: f64,
}

impl PossessionShare {
    pub const EVEN: Self = Self { home: 50.0, away: 50.0 };
}

impl Default for PossessionShare {
    fn default() -> Self {
        Self::EVEN
    }
}

/// Seconds of possession credited for one event; `None` for kinds that do
/// not contribute (only passes and touches do).
pub fn possession_seconds(
    event: &MatchEvent,
    orientation: &MatchOrientation,
    config: &PossessionConfig,
    progressive: &ProgressiveConfig,
) -> Option<f64> {
    let mut secs = match &event.kind {
        EventKind::Touch(_) => config.touch_secs,
        EventKind::Pass(p) if !p.successful => config.failed_pass_secs,
        EventKind::Pass(_) => {
            let counted = classify_pass_event(event, orientation, progressive)
                .is_some_and(|c| c.is_counted());
            if counted {
                config.progressive_pass_secs
            } else {
                config.pass_secs
            }
        }
        _ => return None,
    };

    if let Some(pos) = event.position {
        let depth = orientation.direction_for(event).to_canonical(pos).y;
        if depth < config.final_third_depth {
            secs = secs.max(config.final_third_floor_secs);
        }
        if depth < config.penalty_area_depth {
            secs = secs.max(config.penalty_area_floor_secs);
        }
    }
    Some(secs)
}

fn team_seconds(
    events: &[MatchEvent],
    orientation: &MatchOrientation,
    config: &PossessionConfig,
    progressive: &ProgressiveConfig,
) -> f64 {
    events
        .iter()
        .filter_map(|e| possession_seconds(e, orientation, config, progressive))
        .sum()
}

/// Possession split between the two event lists. Empty or degenerate input
/// gives 50/50.
pub fn calculate_possession(
    home_events: &[MatchEvent],
    away_events: &[MatchEvent],
    orientation: &MatchOrientation,
    config: &PossessionConfig,
    progressive: &ProgressiveConfig,
) -> PossessionShare {
    let home = team_seconds(home_events, orientation, config, progressive);
    let away = team_seconds(away_events, orientation, config, progressive);
    let total = home + away;

    if !total.is_finite() || total <= 0.0 {
        return PossessionShare::EVEN;
    }
    let home_pct = home / total * 100.0;
    if !home_pct.is_finite() {
        return PossessionShare::EVEN;
    }

    let home_pct = (home_pct * 10.0).round() / 10.0;
    let away_pct = ((100.0 - home_pct) * 10.0).round() / 10.0;
    PossessionShare { home: home_pct, away: away_pct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pitch::PitchPoint;
    use crate::models::{EventType, PassDetails, TeamSide};

    fn defaults() -> (MatchOrientation, PossessionConfig, ProgressiveConfig) {
        (MatchOrientation::default(), PossessionConfig::default(), ProgressiveConfig::default())
    }

    fn secs(event: &MatchEvent) -> Option<f64> {
        let (o, c, p) = defaults();
        possession_seconds(event, &o, &c, &p)
    }

    #[test]
    fn test_empty_is_even() {
        let (o, c, p) = defaults();
        assert_eq!(calculate_possession(&[], &[], &o, &c, &p), PossessionShare::EVEN);
    }

    #[test]
    fn test_event_weights() {
        let touch = MatchEvent::simple(TeamSide::Home, EventType::Touch).at(50.0, 60.0);
        assert_eq!(secs(&touch), Some(1.2));

        let failed = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { successful: false, ..PassDetails::default() },
        )
        .at(50.0, 60.0);
        assert_eq!(secs(&failed), Some(0.4));

        let square = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { end: PitchPoint::new(60.0, 60.0), ..PassDetails::default() },
        )
        .at(50.0, 60.0);
        assert_eq!(secs(&square), Some(2.2));

        let forward = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { end: PitchPoint::new(50.0, 20.0), ..PassDetails::default() },
        )
        .at(50.0, 80.0);
        assert_eq!(secs(&forward), Some(2.5));

        let tackle = MatchEvent::simple(TeamSide::Home, EventType::Tackle).at(50.0, 60.0);
        assert_eq!(secs(&tackle), None);
    }

    #[test]
    fn test_attacking_floors_respect_direction() {
        let home_box = MatchEvent::simple(TeamSide::Home, EventType::Touch).at(50.0, 10.0);
        assert_eq!(secs(&home_box), Some(2.0));

        let home_third = MatchEvent::simple(TeamSide::Home, EventType::Touch).at(50.0, 25.0);
        assert_eq!(secs(&home_third), Some(1.8));

        let away_box = MatchEvent::simple(TeamSide::Away, EventType::Touch).at(50.0, 90.0);
        assert_eq!(secs(&away_box), Some(2.0));

        // the away team defends this end
        let away_own_box = MatchEvent::simple(TeamSide::Away, EventType::Touch).at(50.0, 10.0);
        assert_eq!(secs(&away_own_box), Some(1.2));

        // a failed pass in the box is lifted to the floor
        let failed = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { successful: false, ..PassDetails::default() },
        )
        .at(50.0, 5.0);
        assert_eq!(secs(&failed), Some(2.0));
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let (o, c, p) = defaults();
        let home: Vec<MatchEvent> =
            (0..3).map(|_| MatchEvent::simple(TeamSide::Home, EventType::Touch).at(50.0, 50.0)).collect();
        let away = vec![MatchEvent::simple(TeamSide::Away, EventType::Touch).at(50.0, 50.0)];

        let share = calculate_possession(&home, &away, &o, &c, &p);
        assert_eq!(share.home, 75.0);
        assert_eq!(share.away, 25.0);

        let only_home = calculate_possession(&home, &[], &o, &c, &p);
        assert_eq!(only_home, PossessionShare { home: 100.0, away: 0.0 });
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let (o, c, p) = defaults();
        // 1.2 vs 2.2: 35.294...% / 64.705...%
        let home = vec![MatchEvent::simple(TeamSide::Home, EventType::Touch).at(50.0, 50.0)];
        let away = vec![MatchEvent::pass(
            TeamSide::Away,
            PassDetails { end: PitchPoint::new(60.0, 50.0), ..PassDetails::default() },
        )
        .at(50.0, 50.0)];

        let share = calculate_possession(&home, &away, &o, &c, &p);
        assert_eq!(share.home, 35.3);
        assert_eq!(share.away, 64.7);
    }
}
