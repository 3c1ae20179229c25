use serde::{Deserialize, Serialize};

use crate::engine::pitch::{AttackDirection, PitchPoint};

pub type PlayerId = u64;
pub type EventId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Some(TeamSide::Home),
            "away" => Some(TeamSide::Away),
            _ => None,
        }
    }
}

/// Event taxonomy without payload, for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Shot,
    Pass,
    Touch,
    Tackle,
    Interception,
    Duel,
    Carry,
    Dribble,
    Recovery,
}

impl EventType {
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "shot" => EventType::Shot,
            "pass" => EventType::Pass,
            "touch" => EventType::Touch,
            "tackle" => EventType::Tackle,
            "interception" => EventType::Interception,
            "duel" => EventType::Duel,
            "carry" => EventType::Carry,
            "dribble" => EventType::Dribble,
            "recovery" => EventType::Recovery,
            _ => return None,
        };
        Some(kind)
    }

    /// Tackles and interceptions (the PPDA denominator).
    pub fn is_defensive_action(self) -> bool {
        matches!(self, EventType::Tackle | EventType::Interception)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    #[default]
    OpenPlay,
    SetPiece,
    Penalty,
}

impl ShotType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "set_piece" => ShotType::SetPiece,
            "penalty" => ShotType::Penalty,
            _ => ShotType::OpenPlay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Goal,
    Saved,
    Blocked,
    #[default]
    OffTarget,
    Post,
}

impl ShotOutcome {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "goal" => ShotOutcome::Goal,
            "saved" => ShotOutcome::Saved,
            "blocked" => ShotOutcome::Blocked,
            "post" => ShotOutcome::Post,
            _ => ShotOutcome::OffTarget,
        }
    }

    /// Goals are a subset of shots on target; posts are not on target.
    pub fn is_on_target(self) -> bool {
        matches!(self, ShotOutcome::Goal | ShotOutcome::Saved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    #[default]
    Foot,
    Head,
    Other,
}

impl BodyPart {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "head" | "header" => BodyPart::Head,
            "other" => BodyPart::Other,
            _ => BodyPart::Foot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotDetails {
    pub shot_type: ShotType,
    pub outcome: ShotOutcome,
    pub body_part: BodyPart,
    /// Seconds into the match
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub possession_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassDetails {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end: Option<PitchPoint>,
    pub successful: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub receiver_id: Option<PlayerId>,
    /// Event id of the shot this pass is recorded as assisting
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assist_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub possession_id: Option<String>,
    /// Seconds into the match
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<f64>,
    /// Attack direction recorded with the pass, when the source knows it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attack_direction: Option<AttackDirection>,
}

impl Default for PassDetails {
    fn default() -> Self {
        Self {
            end: None,
            successful: true,
            receiver_id: None,
            assist_id: None,
            possession_id: None,
            timestamp: None,
            attack_direction: None,
        }
    }
}

/// Metadata shared by event kinds without a dedicated payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
}

/// Typed per-kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Shot(ShotDetails),
    Pass(PassDetails),
    Touch(EventContext),
    Tackle(EventContext),
    Interception(EventContext),
    Duel(EventContext),
    Carry(EventContext),
    Dribble(EventContext),
    Recovery(EventContext),
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Shot(_) => EventType::Shot,
            EventKind::Pass(_) => EventType::Pass,
            EventKind::Touch(_) => EventType::Touch,
            EventKind::Tackle(_) => EventType::Tackle,
            EventKind::Interception(_) => EventType::Interception,
            EventKind::Duel(_) => EventType::Duel,
            EventKind::Carry(_) => EventType::Carry,
            EventKind::Dribble(_) => EventType::Dribble,
            EventKind::Recovery(_) => EventType::Recovery,
        }
    }

    /// Payload for a non-shot, non-pass kind.
    pub fn with_context(event_type: EventType, context: EventContext) -> Self {
        match event_type {
            EventType::Shot => EventKind::Shot(ShotDetails {
                timestamp: context.timestamp,
                ..ShotDetails::default()
            }),
            EventType::Pass => EventKind::Pass(PassDetails {
                timestamp: context.timestamp,
                ..PassDetails::default()
            }),
            EventType::Touch => EventKind::Touch(context),
            EventType::Tackle => EventKind::Tackle(context),
            EventType::Interception => EventKind::Interception(context),
            EventType::Duel => EventKind::Duel(context),
            EventType::Carry => EventKind::Carry(context),
            EventType::Dribble => EventKind::Dribble(context),
            EventType::Recovery => EventKind::Recovery(context),
        }
    }

    fn timestamp(&self) -> Option<f64> {
        match self {
            EventKind::Shot(d) => d.timestamp,
            EventKind::Pass(d) => d.timestamp,
            EventKind::Touch(c)
            | EventKind::Tackle(c)
            | EventKind::Interception(c)
            | EventKind::Duel(c)
            | EventKind::Carry(c)
            | EventKind::Dribble(c)
            | EventKind::Recovery(c) => c.timestamp,
        }
    }
}

/// One match event after ingestion.
///
/// `position` is present only when both coordinates were finite and within
/// 0..=100; everything spatial skips positionless events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<EventId>,
    pub team: TeamSide,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<PitchPoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub minute: Option<u32>,
    /// Stored xG (shots only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub xg: Option<f64>,
    pub kind: EventKind,
}

impl MatchEvent {
    pub fn new(team: TeamSide, kind: EventKind) -> Self {
        Self { id: None, team, player_id: None, position: None, minute: None, xg: None, kind }
    }

    pub fn shot(team: TeamSide, details: ShotDetails) -> Self {
        Self::new(team, EventKind::Shot(details))
    }

    pub fn pass(team: TeamSide, details: PassDetails) -> Self {
        Self::new(team, EventKind::Pass(details))
    }

    pub fn simple(team: TeamSide, event_type: EventType) -> Self {
        Self::new(team, EventKind::with_context(event_type, EventContext::default()))
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }

    /// Invalid coordinates leave the event positionless.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = PitchPoint::new(x, y);
        self
    }

    pub fn with_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn with_xg(mut self, xg: f64) -> Self {
        self.xg = Some(xg);
        self
    }

    #[inline]
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn as_shot(&self) -> Option<&ShotDetails> {
        match &self.kind {
            EventKind::Shot(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_pass(&self) -> Option<&PassDetails> {
        match &self.kind {
            EventKind::Pass(d) => Some(d),
            _ => None,
        }
    }

    /// A pass not explicitly marked unsuccessful.
    pub fn is_completed_pass(&self) -> bool {
        self.as_pass().is_some_and(|p| p.successful)
    }

    /// Seconds into the match: recorded timestamp, else `minute * 60`.
    pub fn timestamp_secs(&self) -> Option<f64> {
        self.kind
            .timestamp()
            .filter(|t| t.is_finite())
            .or_else(|| self.minute.map(|m| f64::from(m) * 60.0))
    }

    /// Stored xG when it is a usable number.
    pub fn stored_xg(&self) -> Option<f64> {
        self.xg.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_side_parse() {
        assert_eq!(TeamSide::parse(" Home "), Some(TeamSide::Home));
        assert_eq!(TeamSide::parse("AWAY"), Some(TeamSide::Away));
        assert_eq!(TeamSide::parse("neutral"), None);
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
    }

    #[test]
    fn test_shot_outcome_on_target() {
        assert!(ShotOutcome::Goal.is_on_target());
        assert!(ShotOutcome::Saved.is_on_target());
        assert!(!ShotOutcome::Post.is_on_target());
        assert!(!ShotOutcome::Blocked.is_on_target());
        assert_eq!(ShotOutcome::parse("wide"), ShotOutcome::OffTarget);
    }

    #[test]
    fn test_timestamp_fallback_to_minute() {
        let pass = MatchEvent::pass(TeamSide::Home, PassDetails::default()).with_minute(12);
        assert_eq!(pass.timestamp_secs(), Some(720.0));

        let timed = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { timestamp: Some(725.5), ..PassDetails::default() },
        )
        .with_minute(12);
        assert_eq!(timed.timestamp_secs(), Some(725.5));

        let nan = MatchEvent::pass(
            TeamSide::Home,
            PassDetails { timestamp: Some(f64::NAN), ..PassDetails::default() },
        );
        assert_eq!(nan.timestamp_secs(), None);
    }

    #[test]
    fn test_invalid_position_is_dropped() {
        let event = MatchEvent::simple(TeamSide::Away, EventType::Touch).at(120.0, 40.0);
        assert!(event.position.is_none());
        let event = MatchEvent::simple(TeamSide::Away, EventType::Touch).at(20.0, 40.0);
        assert!(event.position.is_some());
    }

    #[test]
    fn test_event_kind_serde_tag() {
        let event = MatchEvent::simple(TeamSide::Home, EventType::Tackle).at(10.0, 20.0);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "tackle");
        let back: MatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
