use serde::{Deserialize, Serialize};

use super::round_dp;
use crate::engine::pitch::MatchOrientation;
use crate::engine::xg::resolved_xg;
use crate::models::{MatchEvent, ShotOutcome};

/// Shot summary for one team.
///
/// `on_target` counts goals and saves only; goals are a subset of it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotStats {
    pub total: usize,
    pub on_target: usize,
    pub goals: usize,
    /// Two decimals
    pub total_xg: f64,
    /// Two decimals
    pub average_xg: f64,
    /// Goals per shot in percent, one decimal
    pub conversion_rate: f64,
}

/// Shot stats over the shot events in `events`; other kinds are ignored.
pub fn calculate_shot_stats(events: &[MatchEvent], orientation: &MatchOrientation) -> ShotStats {
    let shots: Vec<&MatchEvent> = events.iter().filter(|e| e.as_shot().is_some()).collect();
    if shots.is_empty() {
        return ShotStats::default();
    }

    let total = shots.len();
    let mut on_target = 0;
    let mut goals = 0;
    let mut total_xg = 0.0;
    for shot in &shots {
        if let Some(details) = shot.as_shot() {
            if details.outcome.is_on_target() {
                on_target += 1;
            }
            if details.outcome == ShotOutcome::Goal {
                goals += 1;
            }
        }
        total_xg += resolved_xg(shot, orientation).unwrap_or(0.0);
    }

    let conversion_rate = round_dp(goals as f64 / total as f64 * 100.0, 1);

    ShotStats {
        total,
        on_target,
        goals,
        total_xg: round_dp(total_xg, 2),
        average_xg: round_dp(total_xg / total as f64, 2),
        conversion_rate,
    }
}

/// Completed share of the pass events in `events`, percent with one decimal.
/// No passes gives 0.
pub fn pass_accuracy(events: &[MatchEvent]) -> f64 {
    let (completed, total) = events
        .iter()
        .filter_map(MatchEvent::as_pass)
        .fold((0usize, 0usize), |(c, t), p| (c + usize::from(p.successful), t + 1));
    if total == 0 {
        return 0.0;
    }
    round_dp(completed as f64 / total as f64 * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, PassDetails, ShotDetails, TeamSide};
    use insta::assert_json_snapshot;

    fn shot(outcome: ShotOutcome, xg: f64) -> MatchEvent {
        MatchEvent::shot(TeamSide::Home, ShotDetails { outcome, ..ShotDetails::default() })
            .at(50.0, 12.0)
            .with_xg(xg)
    }

    #[test]
    fn test_goal_and_miss() {
        let stats = calculate_shot_stats(
            &[shot(ShotOutcome::Goal, 0.3), shot(ShotOutcome::OffTarget, 0.1)],
            &MatchOrientation::default(),
        );
        assert_json_snapshot!(stats, @r###"
        {
          "total": 2,
          "on_target": 1,
          "goals": 1,
          "total_xg": 0.4,
          "average_xg": 0.2,
          "conversion_rate": 50.0
        }
        "###);
    }

    #[test]
    fn test_empty_shots() {
        assert_eq!(calculate_shot_stats(&[], &MatchOrientation::default()), ShotStats::default());
    }

    #[test]
    fn test_on_target_excludes_post_and_blocked() {
        let stats = calculate_shot_stats(
            &[
                shot(ShotOutcome::Saved, 0.1),
                shot(ShotOutcome::Post, 0.1),
                shot(ShotOutcome::Blocked, 0.1),
                MatchEvent::simple(TeamSide::Home, EventType::Touch),
            ],
            &MatchOrientation::default(),
        );
        assert_eq!(stats.total, 3);
        assert_eq!(stats.on_target, 1);
        assert_eq!(stats.goals, 0);
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.total_xg, 0.3);
        assert_eq!(stats.average_xg, 0.1);
    }

    #[test]
    fn test_missing_xg_uses_model() {
        let modelled = MatchEvent::shot(TeamSide::Home, ShotDetails::default()).at(50.0, 8.0);
        let stats = calculate_shot_stats(&[modelled], &MatchOrientation::default());
        assert!(stats.total_xg > 0.0);
        assert_eq!(stats.total_xg, stats.average_xg);
    }

    #[test]
    fn test_stored_zero_xg_is_kept() {
        let stats = calculate_shot_stats(
            &[shot(ShotOutcome::OffTarget, 0.0), shot(ShotOutcome::Goal, 0.3)],
            &MatchOrientation::default(),
        );
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_xg, 0.3);
        assert_eq!(stats.average_xg, 0.15);
    }

    #[test]
    fn test_pass_accuracy() {
        let ok = MatchEvent::pass(TeamSide::Home, PassDetails::default());
        let bad = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { successful: false, ..PassDetails::default() },
        );
        assert_eq!(pass_accuracy(&[]), 0.0);
        assert_eq!(pass_accuracy(&[ok.clone(), ok.clone(), bad.clone()]), 66.7);
        assert_eq!(pass_accuracy(&[ok, MatchEvent::simple(TeamSide::Home, EventType::Touch)]), 100.0);
        assert_eq!(pass_accuracy(&[bad]), 0.0);
    }
}
