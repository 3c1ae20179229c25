//! # Player Comparison
//!
//! Per-player attacking and defensive volume, normalised per 90 minutes and
//! ranked against players in the same position bucket.
//!
//! ## Metrics
//! - `xg`: stored or modelled xG of the player's shots
//! - `xa`: xA of the player's passes (team-level linking, see `expected_assists`)
//! - `progressive_passes`: progressive passes and deep completions
//! - `passes_into_final_third`: completed passes ending in the final third
//!   that started outside it
//! - `carries`, `duels`: event counts
//! - `pressures`: tackles plus interceptions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::expected_assists::calculate_xa;
use super::progressive::classify_pass_event;
use crate::config::AnalyticsConfig;
use crate::engine::pitch::MatchOrientation;
use crate::engine::xg::resolved_xg;
use crate::models::{EventType, MatchEvent, Player, PlayerId, PositionBucket, TeamSide};

/// Minutes assumed for players without an explicit entry.
pub const DEFAULT_MINUTES_PLAYED: f64 = 90.0;

// ============================================================================
// Metric Set
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub xg: f64,
    pub xa: f64,
    pub progressive_passes: f64,
    pub passes_into_final_third: f64,
    pub carries: f64,
    pub pressures: f64,
    pub duels: f64,
}

impl ComparisonMetrics {
    const LEN: usize = 7;

    fn to_array(self) -> [f64; Self::LEN] {
        [
            self.xg,
            self.xa,
            self.progressive_passes,
            self.passes_into_final_third,
            self.carries,
            self.pressures,
            self.duels,
        ]
    }

    fn from_array(v: [f64; Self::LEN]) -> Self {
        Self {
            xg: v[0],
            xa: v[1],
            progressive_passes: v[2],
            passes_into_final_third: v[3],
            carries: v[4],
            pressures: v[5],
            duels: v[6],
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_array(self.to_array().map(f))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub player_id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<String>,
    pub bucket: PositionBucket,
    pub minutes_played: f64,
    pub totals: ComparisonMetrics,
    pub per90: ComparisonMetrics,
    /// 0..100 against the same bucket, from per-90 values
    pub percentiles: ComparisonMetrics,
}

// ============================================================================
// Helpers
// ============================================================================

/// Share of `values` strictly below `value`, as a rounded percentage.
///
/// Uses the index of the first sorted value `>= value`; 100 when every value
/// is smaller, 0 for empty input or a non-finite `value`.
pub fn percentile_rank(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() || !value.is_finite() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    match sorted.iter().position(|v| *v >= value) {
        Some(index) => (index as f64 / sorted.len() as f64 * 100.0).round(),
        None => 100.0,
    }
}

fn per90_factor(minutes: f64) -> f64 {
    if minutes.is_finite() && minutes > 0.0 {
        90.0 / minutes
    } else {
        1.0
    }
}

fn ends_in_final_third(
    event: &MatchEvent,
    orientation: &MatchOrientation,
    final_third_depth: f64,
) -> bool {
    let Some(pass) = event.as_pass().filter(|p| p.successful) else {
        return false;
    };
    let Some(end) = pass.end else { return false };
    let direction = orientation.direction_for(event);
    let started_outside =
        event.position.map_or(true, |start| start.canonical(direction).y >= final_third_depth);
    end.canonical(direction).y < final_third_depth && started_outside
}

/// xA per passer, linking each team's passes to its own shots.
fn xa_by_player(
    events: &[MatchEvent],
    orientation: &MatchOrientation,
    config: &AnalyticsConfig,
) -> HashMap<PlayerId, f64> {
    let mut by_player = HashMap::new();
    for team in [TeamSide::Home, TeamSide::Away] {
        let passes: Vec<MatchEvent> = events
            .iter()
            .filter(|e| e.team == team && e.as_pass().is_some())
            .cloned()
            .collect();
        let shots: Vec<MatchEvent> = events
            .iter()
            .filter(|e| e.team == team && e.as_shot().is_some())
            .cloned()
            .collect();
        let result = calculate_xa(&passes, &shots, orientation, &config.xa);
        for credit in result.passes {
            if let Some(player) = passes[credit.pass_index].player_id {
                *by_player.entry(player).or_insert(0.0) += credit.xa;
            }
        }
    }
    by_player
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare every roster player. `minutes_played` overrides the 90-minute
/// default per player. Output keeps roster order.
pub fn compare_players(
    events: &[MatchEvent],
    players: &[Player],
    minutes_played: &HashMap<PlayerId, f64>,
    orientation: &MatchOrientation,
    config: &AnalyticsConfig,
) -> Vec<PlayerComparison> {
    let xa = xa_by_player(events, orientation, config);
    let final_third = config.progressive.final_third_depth;

    let mut rows: Vec<PlayerComparison> = players
        .iter()
        .map(|player| {
            let own: Vec<&MatchEvent> =
                events.iter().filter(|e| e.player_id == Some(player.id)).collect();
            let count = |pred: &dyn Fn(&MatchEvent) -> bool| {
                own.iter().filter(|e| pred(e)).count() as f64
            };

            let totals = ComparisonMetrics {
                xg: own
                    .iter()
                    .filter(|e| e.as_shot().is_some())
                    .filter_map(|e| resolved_xg(e, orientation))
                    .sum(),
                xa: xa.get(&player.id).copied().unwrap_or(0.0),
                progressive_passes: count(&|e| {
                    classify_pass_event(e, orientation, &config.progressive)
                        .is_some_and(|c| c.is_counted())
                }),
                passes_into_final_third: count(&|e| {
                    ends_in_final_third(e, orientation, final_third)
                }),
                carries: count(&|e| e.event_type() == EventType::Carry),
                pressures: count(&|e| e.event_type().is_defensive_action()),
                duels: count(&|e| e.event_type() == EventType::Duel),
            };

            let minutes = minutes_played.get(&player.id).copied().unwrap_or(DEFAULT_MINUTES_PLAYED);
            let factor = per90_factor(minutes);

            PlayerComparison {
                player_id: player.id,
                name: player.name.clone(),
                position: player.position.clone(),
                bucket: player.bucket(),
                minutes_played: minutes,
                totals,
                per90: totals.map(|v| v * factor),
                percentiles: ComparisonMetrics::default(),
            }
        })
        .collect();

    let mut by_bucket: BTreeMap<PositionBucket, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        by_bucket.entry(row.bucket).or_default().push(i);
    }

    for members in by_bucket.values() {
        let columns: Vec<[f64; ComparisonMetrics::LEN]> =
            members.iter().map(|&i| rows[i].per90.to_array()).collect();
        for &i in members {
            let own = rows[i].per90.to_array();
            let mut ranks = [0.0; ComparisonMetrics::LEN];
            for (m, rank) in ranks.iter_mut().enumerate() {
                let values: Vec<f64> = columns.iter().map(|c| c[m]).collect();
                *rank = percentile_rank(own[m], &values);
            }
            rows[i].percentiles = ComparisonMetrics::from_array(ranks);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pitch::PitchPoint;
    use crate::models::{PassDetails, ShotDetails};

    #[test]
    fn test_percentile_rank() {
        let values = [3.0, 1.0, 2.0, 4.0];
        assert_eq!(percentile_rank(1.0, &values), 0.0);
        assert_eq!(percentile_rank(3.0, &values), 50.0);
        assert_eq!(percentile_rank(2.5, &values), 50.0);
        assert_eq!(percentile_rank(5.0, &values), 100.0);
        assert_eq!(percentile_rank(1.0, &[]), 0.0);
        assert_eq!(percentile_rank(f64::NAN, &values), 0.0);
    }

    #[test]
    fn test_ties_share_the_lowest_rank() {
        assert_eq!(percentile_rank(0.0, &[0.0, 0.0, 0.0]), 0.0);
    }

    fn forward_pass(player: PlayerId, from_y: f64, to_y: f64) -> MatchEvent {
        MatchEvent::pass(
            TeamSide::Home,
            PassDetails { end: PitchPoint::new(50.0, to_y), ..PassDetails::default() },
        )
        .at(50.0, from_y)
        .with_player(player)
    }

    #[test]
    fn test_totals_and_per90() {
        let players = vec![
            Player::new(8, "Eight").with_position("Midfielder"),
            Player::new(9, "Nine").with_position("Striker"),
        ];
        let shot = MatchEvent::shot(TeamSide::Home, ShotDetails::default())
            .at(50.0, 10.0)
            .with_player(9)
            .with_xg(0.3);
        let events = vec![
            forward_pass(8, 80.0, 20.0),
            forward_pass(8, 50.0, 45.0),
            forward_pass(8, 30.0, 28.0),
            MatchEvent::simple(TeamSide::Home, EventType::Carry).with_player(8),
            MatchEvent::simple(TeamSide::Home, EventType::Tackle).with_player(8),
            MatchEvent::simple(TeamSide::Home, EventType::Interception).with_player(8),
            MatchEvent::simple(TeamSide::Home, EventType::Duel).with_player(9),
            shot,
        ];
        let minutes = HashMap::from([(8, 45.0)]);
        let rows = compare_players(
            &events,
            &players,
            &minutes,
            &MatchOrientation::default(),
            &AnalyticsConfig::default(),
        );

        assert_eq!(rows.len(), 2);
        let eight = &rows[0];
        assert_eq!(eight.bucket, PositionBucket::MF);
        assert_eq!(eight.totals.progressive_passes, 1.0);
        // the third pass starts inside the final third
        assert_eq!(eight.totals.passes_into_final_third, 1.0);
        assert_eq!(eight.totals.carries, 1.0);
        assert_eq!(eight.totals.pressures, 2.0);
        assert_eq!(eight.per90.pressures, 4.0);

        let nine = &rows[1];
        assert_eq!(nine.minutes_played, DEFAULT_MINUTES_PLAYED);
        assert!((nine.totals.xg - 0.3).abs() < 1e-12);
        assert_eq!(nine.totals.duels, 1.0);
        assert_eq!(nine.per90, nine.totals);
    }

    #[test]
    fn test_percentiles_within_bucket() {
        let players = vec![
            Player::new(1, "A").with_position("Centre-Back"),
            Player::new(2, "B").with_position("Left-Back"),
            Player::new(3, "C").with_position("Striker"),
        ];
        let duel = |p: PlayerId| MatchEvent::simple(TeamSide::Home, EventType::Duel).with_player(p);
        let events = vec![duel(1), duel(1), duel(2), duel(3), duel(3), duel(3)];
        let rows = compare_players(
            &events,
            &players,
            &HashMap::new(),
            &MatchOrientation::default(),
            &AnalyticsConfig::default(),
        );
        assert_eq!(rows[0].percentiles.duels, 50.0);
        assert_eq!(rows[1].percentiles.duels, 0.0);
        // alone in the FW bucket
        assert_eq!(rows[2].percentiles.duels, 0.0);
    }

    #[test]
    fn test_xa_is_credited_to_the_passer() {
        let players = vec![Player::new(7, "Seven"), Player::new(9, "Nine")];
        let pass = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { timestamp: Some(100.0), receiver_id: Some(9), ..PassDetails::default() },
        )
        .at(50.0, 40.0)
        .with_player(7);
        let shot = MatchEvent::shot(
            TeamSide::Home,
            ShotDetails { timestamp: Some(105.0), ..ShotDetails::default() },
        )
        .at(50.0, 10.0)
        .with_player(9)
        .with_xg(0.25);
        let rows = compare_players(
            &[pass, shot],
            &players,
            &HashMap::new(),
            &MatchOrientation::default(),
            &AnalyticsConfig::default(),
        );
        assert_eq!(rows[0].totals.xa, 0.25);
        assert_eq!(rows[1].totals.xa, 0.0);
    }
}
