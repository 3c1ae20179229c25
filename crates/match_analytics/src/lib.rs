//! # match_analytics - Football Match Event Analytics Engine
//!
//! Turns spatial-temporal match events (shots, passes, touches, defensive
//! actions) plus roster data into derived statistics.
//!
//! ## Features
//! - Distance/angle xG model and pass -> shot xA linking
//! - Progressive pass and deep completion classification
//! - Time-weighted possession, PPDA, high regains, shot stats, ratings
//! - Gaussian density heatmaps with injectable, seedable jitter
//! - Pass networks and per-90 player comparison
//! - Detector output clean-up and a JSON facade
//!
//! Every computation is a pure function of its inputs. Coordinates are
//! normalized to 0..100 and every spatial computation takes an explicit
//! attack direction (`MatchOrientation`).

pub mod analysis;
pub mod api;
pub mod config;
pub mod detection;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API functions
pub use api::{analyze_match_json, pass_network_json};
pub use error::{AnalyticsError, Result};

pub use analysis::{
    analyze_match, analyze_matches, build_pass_network, calculate_player_rating,
    calculate_possession, calculate_shot_stats, calculate_xa, compare_players,
    count_progressive_passes, MatchInput, MatchReport, PassNetworkFilters, PassNetworkGraph,
    TeamMetrics,
};
pub use config::AnalyticsConfig;
pub use detection::{postprocess_detections, PostprocessConfig, RawDetection};
pub use engine::{
    calculate_xg, generate_heatmap, generate_heatmap_seeded, AttackDirection, HeatmapGrid,
    MatchOrientation, PitchPoint,
};
pub use models::{
    parse_events_json, parse_events_value, EventType, MatchEvent, Player, TeamSide,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
