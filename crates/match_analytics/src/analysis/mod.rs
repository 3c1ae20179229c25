//! # Analysis Module
//!
//! Derived match statistics on top of the typed event model.
//!
//! ## Submodules
//!
//! - `progressive` - progressive pass / deep completion classifier
//! - `expected_assists` - pass -> shot linking and xA
//! - `pass_network` - passer/receiver graph and per-player summary
//! - `possession` - time-weighted possession
//! - `pressing` - PPDA and high regains
//! - `shot_stats` - shot totals, conversion and pass accuracy
//! - `player_rating` - 0..10 match rating
//! - `player_comparison` - per-90 values and bucket percentiles
//! - `match_report` - everything above for both teams in one pass

pub mod expected_assists;
pub mod match_report;
pub mod pass_network;
pub mod player_comparison;
pub mod player_rating;
pub mod possession;
pub mod pressing;
pub mod progressive;
pub mod shot_stats;

use serde::{Deserialize, Serialize};

use crate::models::TeamSide;

pub use expected_assists::{calculate_xa, PassXa, XaResult};
pub use match_report::{analyze_match, analyze_matches, EventCounts, MatchInput, MatchReport};
pub use pass_network::{
    build_pass_network, player_pass_summary, DirectionFilter, HalfFilter, PassEdge,
    PassNetworkFilters, PassNetworkGraph, PassNetworkNode, PlayerPassSummary,
};
pub use player_comparison::{compare_players, percentile_rank, ComparisonMetrics, PlayerComparison};
pub use player_rating::{calculate_player_rating, PlayerRatingInput};
pub use possession::{calculate_possession, PossessionShare};
pub use pressing::{count_high_regains, ppda, team_ppda};
pub use progressive::{classify_pass, count_progressive_passes, PassClassification};
pub use shot_stats::{calculate_shot_stats, pass_accuracy, ShotStats};

/// One value per team.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamMetrics<T> {
    pub home: T,
    pub away: T,
}

impl<T> TeamMetrics<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    /// Build both sides from a per-team closure, home first.
    pub fn from_fn(mut f: impl FnMut(TeamSide) -> T) -> Self {
        let home = f(TeamSide::Home);
        let away = f(TeamSide::Away);
        Self { home, away }
    }

    pub fn get(&self, team: TeamSide) -> &T {
        match team {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
