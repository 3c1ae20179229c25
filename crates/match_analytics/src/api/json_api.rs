//! JSON facade: request string in, response string out.
//!
//! Records are taken in their persistence shape (see `models::ingest`), so
//! callers can forward stored rows without mapping them first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::analysis::match_report::{analyze_match, MatchReport};
use crate::analysis::pass_network::{build_pass_network, PassNetworkFilters, PassNetworkGraph};
use crate::config::AnalyticsConfig;
use crate::engine::pitch::MatchOrientation;
use crate::error::Result;
use crate::models::{parse_events_value, parse_players_value, Player, TeamSide};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct MatchAnalysisRequest {
    /// Array of raw event records
    pub events: Value,
    #[serde(default)]
    pub players: Option<Value>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Falls back to `AnalyticsConfig::from_env_or_default()`
    #[serde(default)]
    pub config: Option<AnalyticsConfig>,
    #[serde(default)]
    pub orientation: MatchOrientation,
}

#[derive(Debug, Serialize)]
pub struct MatchAnalysisResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub report: MatchReport,
}

#[derive(Debug, Deserialize)]
pub struct PassNetworkRequest {
    pub events: Value,
    #[serde(default)]
    pub players: Option<Value>,
    pub team: TeamSide,
    #[serde(default)]
    pub filters: PassNetworkFilters,
}

#[derive(Debug, Serialize)]
pub struct PassNetworkResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub network: PassNetworkGraph,
}

fn players_from(value: Option<&Value>) -> Result<Vec<Player>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => parse_players_value("players", v),
    }
}

/// Analyze one match given as JSON.
///
/// Errors on malformed JSON, a non-array `events` or `players`, and an
/// invalid `config`. Bad individual records are skipped.
pub fn analyze_match_json(request_json: &str) -> Result<String> {
    let request: MatchAnalysisRequest = serde_json::from_str(request_json)?;

    let events = parse_events_value("events", &request.events)?;
    let players = players_from(request.players.as_ref())?;
    let config = match request.config {
        Some(config) => {
            config.validate()?;
            config
        }
        None => AnalyticsConfig::from_env_or_default(),
    };

    info!(events = events.len(), players = players.len(), "match analysis request");
    let report = analyze_match(&events, &players, &config, &request.orientation, request.seed);

    let response = MatchAnalysisResponse { schema_version: SCHEMA_VERSION, report };
    Ok(serde_json::to_string(&response)?)
}

/// Pass network of one team, given as JSON.
pub fn pass_network_json(request_json: &str) -> Result<String> {
    let request: PassNetworkRequest = serde_json::from_str(request_json)?;

    let events = parse_events_value("events", &request.events)?;
    let players = players_from(request.players.as_ref())?;
    let network = build_pass_network(&events, &players, request.team, &request.filters);

    let response = PassNetworkResponse { schema_version: SCHEMA_VERSION, network };
    Ok(serde_json::to_string(&response)?)
}
