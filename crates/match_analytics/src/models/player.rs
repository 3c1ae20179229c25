use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::events::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub number: Option<u32>,
    /// Free-text position label ("Centre-Back", "ST", ...)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), number: None, position: None }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn bucket(&self) -> PositionBucket {
        PositionBucket::from_label(self.position.as_deref())
    }
}

/// Coarse position group used for like-for-like percentile comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionBucket {
    GK,
    DF,
    MF,
    FW,
}

static POSITION_BUCKETS: Lazy<HashMap<&'static str, PositionBucket>> = Lazy::new(|| {
    use PositionBucket::*;
    HashMap::from([
        ("GK", GK),
        ("Goalkeeper", GK),
        ("DF", DF),
        ("Defender", DF),
        ("Centre-Back", DF),
        ("Left-Back", DF),
        ("Right-Back", DF),
        ("Wing-Back", DF),
        ("MF", MF),
        ("Midfielder", MF),
        ("Central Midfielder", MF),
        ("Defensive Midfielder", MF),
        ("Attacking Midfielder", MF),
        ("Left Midfielder", MF),
        ("Right Midfielder", MF),
        ("Winger", MF),
        ("FW", FW),
        ("Forward", FW),
        ("Striker", FW),
        ("Centre-Forward", FW),
        ("Second Striker", FW),
    ])
});

impl PositionBucket {
    /// Unknown or missing labels fall into midfield.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|l| POSITION_BUCKETS.get(l.trim()).copied())
            .unwrap_or(PositionBucket::MF)
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionBucket::GK => "GK",
            PositionBucket::DF => "DF",
            PositionBucket::MF => "MF",
            PositionBucket::FW => "FW",
        }
    }
}

/// Default on-pitch spots by position code, as `(along, across)` in 0..1.
///
/// The first component runs along the pitch from the player's own goal, the
/// second across it. This is the transpose of the event frame, where `x` runs
/// across and `y` along, and the table carries no attack direction.
///
/// Order matters: the first code contained in the label wins.
const ARCHETYPE_POSITIONS: [(&str, (f64, f64)); 20] = [
    ("GK", (0.08, 0.5)),
    ("LB", (0.22, 0.25)),
    ("LCB", (0.18, 0.4)),
    ("CB", (0.18, 0.5)),
    ("RCB", (0.26, 0.5)),
    ("RB", (0.22, 0.75)),
    ("LDM", (0.38, 0.4)),
    ("DM", (0.38, 0.5)),
    ("RDM", (0.38, 0.6)),
    ("LCM", (0.48, 0.35)),
    ("CM", (0.48, 0.5)),
    ("RCM", (0.48, 0.65)),
    ("LAM", (0.60, 0.4)),
    ("AM", (0.60, 0.5)),
    ("RAM", (0.60, 0.6)),
    ("LW", (0.62, 0.22)),
    ("RW", (0.62, 0.78)),
    ("LF", (0.74, 0.4)),
    ("ST", (0.74, 0.5)),
    ("RF", (0.74, 0.6)),
];

const CENTRE_SPOT: (f64, f64) = (0.5, 0.5);

/// Fallback node position for a player with no located events, as
/// `(along, across)` like the archetype table.
pub fn archetype_position(label: Option<&str>) -> (f64, f64) {
    let Some(label) = label else {
        return CENTRE_SPOT;
    };
    let upper = label.to_ascii_uppercase();
    ARCHETYPE_POSITIONS
        .iter()
        .find(|(code, _)| upper.contains(code))
        .map(|(_, pos)| *pos)
        .unwrap_or(CENTRE_SPOT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_from_label() {
        assert_eq!(PositionBucket::from_label(Some("Goalkeeper")), PositionBucket::GK);
        assert_eq!(PositionBucket::from_label(Some(" Centre-Back ")), PositionBucket::DF);
        assert_eq!(PositionBucket::from_label(Some("Striker")), PositionBucket::FW);
        assert_eq!(PositionBucket::from_label(Some("Winger")), PositionBucket::MF);
        assert_eq!(PositionBucket::from_label(Some("Libero")), PositionBucket::MF);
        assert_eq!(PositionBucket::from_label(None), PositionBucket::MF);
    }

    #[test]
    fn test_archetype_position() {
        assert_eq!(archetype_position(Some("CB")), (0.18, 0.5));
        assert_eq!(archetype_position(Some("lcb")), (0.18, 0.4));
        assert_eq!(archetype_position(Some("GK")), (0.08, 0.5));
        assert_eq!(archetype_position(Some("ST")), (0.74, 0.5));
        // along the pitch first, across second
        let (lb_along, lb_across) = archetype_position(Some("LB"));
        let (rb_along, rb_across) = archetype_position(Some("RB"));
        assert_eq!(lb_along, rb_along);
        assert!(lb_across < rb_across);
        assert_eq!(archetype_position(Some("Sweeper")), CENTRE_SPOT);
        assert_eq!(archetype_position(None), CENTRE_SPOT);
    }

    #[test]
    fn test_player_bucket() {
        let player = Player::new(9, "Nine").with_number(9).with_position("Centre-Forward");
        assert_eq!(player.bucket(), PositionBucket::FW);
    }
}
