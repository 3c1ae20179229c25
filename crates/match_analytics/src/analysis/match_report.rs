//! # Match Report
//!
//! Runs every team-level analysis over one match and collects the results
//! into a single serializable report.
//!
//! ## Reproducibility
//! Heatmap jitter is the only randomness. With a seed, one ChaCha8 stream
//! drives all four grids of a match (home, away heatmaps then shot maps), so
//! equal inputs and seeds give equal reports.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::expected_assists::calculate_xa;
use super::pass_network::{build_pass_network, PassNetworkFilters, PassNetworkGraph};
use super::player_rating::{calculate_player_rating, PlayerRatingInput};
use super::possession::{calculate_possession, PossessionShare};
use super::pressing::{count_high_regains, team_ppda};
use super::progressive::count_progressive_passes;
use super::shot_stats::{calculate_shot_stats, pass_accuracy, ShotStats};
use super::{round_dp, TeamMetrics};
use crate::config::{AnalyticsConfig, HeatmapConfig};
use crate::engine::heatmap::{generate_heatmap_with_rng, HeatmapEvent, HeatmapGrid};
use crate::engine::pitch::MatchOrientation;
use crate::engine::xg::total_xg;
use crate::models::{EventType, MatchEvent, Player, PlayerId, TeamSide};

// ============================================================================
// Report Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTypeCounts {
    pub shots: usize,
    pub passes: usize,
    pub touches: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventCounts {
    pub total: usize,
    pub by_type: EventTypeCounts,
    pub successful_passes: TeamMetrics<usize>,
    pub touches: TeamMetrics<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRatingEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Two decimals
    pub xg: TeamMetrics<f64>,
    pub xa: TeamMetrics<f64>,
    pub possession: PossessionShare,
    pub shots: TeamMetrics<ShotStats>,
    /// `None` when a team has too few located events
    pub heatmaps: TeamMetrics<Option<HeatmapGrid>>,
    pub shot_maps: TeamMetrics<Option<HeatmapGrid>>,
    pub ppda: TeamMetrics<f64>,
    pub high_regains: TeamMetrics<usize>,
    pub progressive_passes: TeamMetrics<usize>,
    pub pass_accuracy: TeamMetrics<f64>,
    pub pass_networks: TeamMetrics<PassNetworkGraph>,
    /// Roster order
    pub player_ratings: Vec<PlayerRatingEntry>,
    pub events: EventCounts,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seed: Option<u64>,
}

/// One match of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchInput {
    pub events: Vec<MatchEvent>,
    pub players: Vec<Player>,
    pub orientation: MatchOrientation,
    /// Falls back to the match's index in the batch
    pub seed: Option<u64>,
}

// ============================================================================
// Assembly
// ============================================================================

fn team_events(events: &[MatchEvent], team: TeamSide) -> Vec<MatchEvent> {
    events.iter().filter(|e| e.team == team).cloned().collect()
}

fn of_type(events: &[MatchEvent], event_type: EventType) -> Vec<MatchEvent> {
    events.iter().filter(|e| e.event_type() == event_type).cloned().collect()
}

/// Located passes, touches, defensive actions and recoveries.
fn activity_points(events: &[MatchEvent], config: &HeatmapConfig) -> Vec<HeatmapEvent> {
    events
        .iter()
        .filter_map(|e| {
            let p = e.position?;
            let weight = match e.event_type() {
                EventType::Pass | EventType::Touch | EventType::Recovery => 1.0,
                t if t.is_defensive_action() => config.defensive_action_weight,
                _ => return None,
            };
            Some(HeatmapEvent::weighted(p.x, p.y, weight))
        })
        .collect()
}

fn shot_points(events: &[MatchEvent]) -> Vec<HeatmapEvent> {
    events
        .iter()
        .filter(|e| e.as_shot().is_some())
        .filter_map(|e| e.position.map(|p| HeatmapEvent::new(p.x, p.y)))
        .collect()
}

fn count_events(events: &[MatchEvent], home: &[MatchEvent], away: &[MatchEvent]) -> EventCounts {
    let count =
        |list: &[MatchEvent], t: EventType| list.iter().filter(|e| e.event_type() == t).count();
    let completed = |list: &[MatchEvent]| list.iter().filter(|e| e.is_completed_pass()).count();
    EventCounts {
        total: events.len(),
        by_type: EventTypeCounts {
            shots: count(events, EventType::Shot),
            passes: count(events, EventType::Pass),
            touches: count(events, EventType::Touch),
        },
        successful_passes: TeamMetrics::new(completed(home), completed(away)),
        touches: TeamMetrics::new(count(home, EventType::Touch), count(away, EventType::Touch)),
    }
}

fn build_report<R: Rng + ?Sized>(
    events: &[MatchEvent],
    players: &[Player],
    config: &AnalyticsConfig,
    orientation: &MatchOrientation,
    rng: &mut R,
) -> MatchReport {
    let by_team = TeamMetrics::from_fn(|team| team_events(events, team));
    let passes = TeamMetrics::from_fn(|team| of_type(by_team.get(team), EventType::Pass));
    let shots = TeamMetrics::from_fn(|team| of_type(by_team.get(team), EventType::Shot));

    let xg = TeamMetrics::from_fn(|team| round_dp(total_xg(shots.get(team), orientation), 2));
    let xa = TeamMetrics::from_fn(|team| {
        calculate_xa(passes.get(team), shots.get(team), orientation, &config.xa).total_xa
    });

    let possession = calculate_possession(
        &by_team.home,
        &by_team.away,
        orientation,
        &config.possession,
        &config.progressive,
    );

    // rng draws: home then away, heatmaps before shot maps
    let heatmap_points =
        TeamMetrics::from_fn(|team| activity_points(by_team.get(team), &config.heatmap));
    let shot_map_points = TeamMetrics::from_fn(|team| shot_points(shots.get(team)));
    let heatmaps = TeamMetrics::from_fn(|team| {
        generate_heatmap_with_rng(heatmap_points.get(team), &config.heatmap, &mut *rng)
    });
    let shot_maps = TeamMetrics::from_fn(|team| {
        generate_heatmap_with_rng(shot_map_points.get(team), &config.heatmap, &mut *rng)
    });

    let player_ratings = players
        .iter()
        .map(|p| PlayerRatingEntry {
            player_id: p.id,
            name: p.name.clone(),
            rating: calculate_player_rating(&PlayerRatingInput::from_events(
                events,
                p.id,
                orientation,
            )),
        })
        .collect();

    MatchReport {
        xg,
        xa,
        possession,
        shots: TeamMetrics::from_fn(|team| calculate_shot_stats(shots.get(team), orientation)),
        heatmaps,
        shot_maps,
        ppda: TeamMetrics::from_fn(|team| team_ppda(events, team)),
        high_regains: TeamMetrics::from_fn(|team| {
            count_high_regains(events, team, orientation, &config.pressing)
        }),
        progressive_passes: TeamMetrics::from_fn(|team| {
            count_progressive_passes(passes.get(team), orientation, &config.progressive)
        }),
        pass_accuracy: TeamMetrics::from_fn(|team| pass_accuracy(passes.get(team))),
        pass_networks: TeamMetrics::from_fn(|team| {
            build_pass_network(events, players, team, &PassNetworkFilters::default())
        }),
        player_ratings,
        events: count_events(events, &by_team.home, &by_team.away),
        seed: None,
    }
}

/// Full report for one match. A `seed` makes the heatmaps reproducible;
/// without one jitter comes from the thread RNG.
pub fn analyze_match(
    events: &[MatchEvent],
    players: &[Player],
    config: &AnalyticsConfig,
    orientation: &MatchOrientation,
    seed: Option<u64>,
) -> MatchReport {
    info!(events = events.len(), players = players.len(), ?seed, "analyzing match");

    let mut report = match seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            build_report(events, players, config, orientation, &mut rng)
        }
        None => build_report(events, players, config, orientation, &mut rand::thread_rng()),
    };
    report.seed = seed;

    debug!(
        xg_home = report.xg.home,
        xg_away = report.xg.away,
        possession_home = report.possession.home,
        "match analyzed"
    );
    report
}

/// Reports for a batch of matches, computed in parallel. Output order
/// follows input order.
pub fn analyze_matches(matches: &[MatchInput], config: &AnalyticsConfig) -> Vec<MatchReport> {
    info!(matches = matches.len(), "analyzing match batch");
    matches
        .par_iter()
        .enumerate()
        .map(|(index, m)| {
            let seed = m.seed.unwrap_or(index as u64);
            analyze_match(&m.events, &m.players, config, &m.orientation, Some(seed))
        })
        .collect()
}
