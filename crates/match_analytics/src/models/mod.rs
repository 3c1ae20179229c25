//! Data models
//!
//! - `events`: typed match events (one payload per event kind)
//! - `player`: roster entries and position buckets
//! - `ingest`: conversion from persistence-shaped JSON records

pub mod events;
pub mod ingest;
pub mod player;

pub use events::{
    BodyPart, EventContext, EventId, EventKind, EventType, MatchEvent, PassDetails, PlayerId,
    ShotDetails, ShotOutcome, ShotType, TeamSide,
};
pub use ingest::{parse_events_json, parse_events_value, parse_players_value, RawMatchEvent};
pub use player::{archetype_position, Player, PositionBucket};
