//! Raw record ingestion
//!
//! Persistence hands over loosely typed records: coordinates may be null or
//! strings, `metadata` may be an object or a JSON-encoded string. This module
//! is the only place that looks at that shape. Everything downstream works on
//! typed [`MatchEvent`]s.
//!
//! Bad per-record data never fails the batch. A record is either converted,
//! converted with the bad field dropped, or skipped (logged at debug level).
//! The only hard failure is a non-array where an array of records is required.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::events::{
    BodyPart, EventContext, EventKind, EventType, MatchEvent, PassDetails, PlayerId, ShotDetails,
    ShotOutcome, ShotType, TeamSide,
};
use super::player::Player;
use crate::engine::pitch::{AttackDirection, PitchPoint};
use crate::error::{AnalyticsError, Result};

/// A persistence-shaped event record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchEvent {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, alias = "player_id")]
    pub player_id: Option<Value>,
    #[serde(default)]
    pub player: Option<Value>,
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    #[serde(default)]
    pub minute: Option<Value>,
    #[serde(default)]
    pub xg: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Lenient number extraction: numbers and numeric strings, finite only.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn value_as_id(value: &Value) -> Option<u64> {
    let n = value_as_f64(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Metadata is either an object, a JSON string holding an object, or absent.
/// `Err(())` means a string that does not decode to an object.
fn decode_metadata(raw: Option<&Value>) -> std::result::Result<Map<String, Value>, ()> {
    match raw {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Map::new()),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(()),
        },
        Some(_) => Err(()),
    }
}

fn meta_f64(meta: &Map<String, Value>, key: &str) -> Option<f64> {
    meta.get(key).and_then(value_as_f64)
}

fn meta_id(meta: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| meta.get(*k).and_then(value_as_id))
}

fn meta_str<'a>(meta: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(Value::as_str)
}

/// Only an explicit `false` marks a pass unsuccessful.
fn meta_successful(meta: &Map<String, Value>) -> bool {
    match meta.get("successful") {
        Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().eq_ignore_ascii_case("false"),
        _ => true,
    }
}

fn parse_attack_direction(raw: &str) -> Option<AttackDirection> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "toward_low" | "r2l" | "right-to-left" => Some(AttackDirection::TowardLow),
        "toward_high" | "l2r" | "left-to-right" => Some(AttackDirection::TowardHigh),
        _ => None,
    }
}

impl RawMatchEvent {
    /// Convert into a typed event, or `None` when the record is unusable.
    pub fn into_event(self) -> Option<MatchEvent> {
        let Some(event_type) = self.event_type.as_deref().and_then(EventType::parse) else {
            debug!(event_type = ?self.event_type, "skipping record with unknown event type");
            return None;
        };
        let Some(team) = self.team.as_deref().and_then(TeamSide::parse) else {
            debug!(team = ?self.team, "skipping record with unknown team");
            return None;
        };

        let meta = match decode_metadata(self.metadata.as_ref()) {
            Ok(meta) => meta,
            Err(()) if matches!(event_type, EventType::Shot | EventType::Pass) => {
                debug!(?event_type, "skipping record with undecodable metadata");
                return None;
            }
            Err(()) => Map::new(),
        };

        let position = PitchPoint::from_raw(
            self.x.as_ref().and_then(value_as_f64),
            self.y.as_ref().and_then(value_as_f64),
        );
        let minute = self
            .minute
            .as_ref()
            .and_then(value_as_f64)
            .filter(|m| *m >= 0.0)
            .map(|m| m.floor() as u32);
        let player_id: Option<PlayerId> = self
            .player_id
            .as_ref()
            .and_then(value_as_id)
            .or_else(|| self.player.as_ref().and_then(|p| p.get("id")).and_then(value_as_id));
        let timestamp = meta_f64(&meta, "timestamp");

        let kind = match event_type {
            EventType::Shot => EventKind::Shot(ShotDetails {
                shot_type: meta_str(&meta, "shotType").map(ShotType::parse).unwrap_or_default(),
                outcome: meta_str(&meta, "outcome").map(ShotOutcome::parse).unwrap_or_default(),
                body_part: meta_str(&meta, "bodyPart").map(BodyPart::parse).unwrap_or_default(),
                timestamp,
                possession_id: meta.get("possessionId").and_then(value_as_string),
            }),
            EventType::Pass => EventKind::Pass(PassDetails {
                end: PitchPoint::from_raw(meta_f64(&meta, "endX"), meta_f64(&meta, "endY")),
                successful: meta_successful(&meta),
                receiver_id: meta_id(&meta, &["receiverId", "toId", "toPlayerId"]),
                assist_id: meta_id(&meta, &["assistId"]),
                possession_id: meta.get("possessionId").and_then(value_as_string),
                timestamp,
                attack_direction: meta_str(&meta, "attackDirection")
                    .or_else(|| meta_str(&meta, "direction"))
                    .and_then(parse_attack_direction),
            }),
            other => EventKind::with_context(
                other,
                EventContext {
                    timestamp,
                    sub_type: meta_str(&meta, "subType").map(str::to_string),
                    confidence: meta_f64(&meta, "confidence"),
                },
            ),
        };

        let xg = match event_type {
            EventType::Shot => self.xg.as_ref().and_then(value_as_f64),
            _ => None,
        };

        Some(MatchEvent {
            id: self.id.as_ref().and_then(value_as_id),
            team,
            player_id,
            position,
            minute,
            xg,
            kind,
        })
    }
}

/// Convert a JSON array of raw records. Non-object or unusable elements are
/// skipped; a non-array value is a caller error.
pub fn parse_events_value(field: &str, value: &Value) -> Result<Vec<MatchEvent>> {
    let Value::Array(items) = value else {
        return Err(AnalyticsError::not_an_array(field, value));
    };

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        match RawMatchEvent::deserialize(item) {
            Ok(raw) => events.extend(raw.into_event()),
            Err(err) => debug!(%err, "skipping malformed event record"),
        }
    }

    if events.len() < items.len() {
        debug!(kept = events.len(), total = items.len(), "ingested event records");
    }
    Ok(events)
}

pub fn parse_events_json(json: &str) -> Result<Vec<MatchEvent>> {
    let value: Value = serde_json::from_str(json)?;
    parse_events_value("events", &value)
}

/// Convert a JSON array of roster entries (`id`, `name`, `number`, `position`).
pub fn parse_players_value(field: &str, value: &Value) -> Result<Vec<Player>> {
    let Value::Array(items) = value else {
        return Err(AnalyticsError::not_an_array(field, value));
    };

    let players = items
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(value_as_id)?;
            let name = item.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            let number =
                item.get("number").and_then(value_as_id).and_then(|n| u32::try_from(n).ok());
            let position = item.get("position").and_then(Value::as_str).map(str::to_string);
            Some(Player { id, name, number, position })
        })
        .collect();
    Ok(players)
}
