//! # Pass Network
//!
//! Directed passer -> receiver graph for one team, with average on-ball
//! positions per player.
//!
//! ## Semantics
//! - Passes need a passer and a minute; the half and direction filters apply
//!   before anything is counted.
//! - `attempted` counts every pass on an edge, `count` the completed ones.
//! - Node position: mean start point of the player's passes (0..1). Players
//!   without a located pass fall back to their position archetype, which is
//!   laid out `(along, across)` rather than in the event frame.
//! - Edges below `min_count` or touching players outside the selected subset
//!   are pruned, then nodes left without edges (and not selected) go too.
//!
//! Nodes keep roster order and edges are sorted by `(from, to)`, so equal
//! inputs serialize identically.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::engine::pitch::{field, AttackDirection, SECOND_HALF_START_MINUTE};
use crate::models::{archetype_position, MatchEvent, Player, PlayerId, TeamSide};

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfFilter {
    /// Minute < 45
    First,
    /// Minute >= 45
    Second,
    #[default]
    All,
}

impl HalfFilter {
    fn accepts(self, minute: u32) -> bool {
        match self {
            HalfFilter::First => minute < SECOND_HALF_START_MINUTE,
            HalfFilter::Second => minute >= SECOND_HALF_START_MINUTE,
            HalfFilter::All => true,
        }
    }
}

/// Filter on the attack direction recorded with each pass. Passes without a
/// recorded direction only pass `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionFilter {
    #[default]
    All,
    TowardLow,
    TowardHigh,
}

impl DirectionFilter {
    fn accepts(self, recorded: Option<AttackDirection>) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::TowardLow => recorded == Some(AttackDirection::TowardLow),
            DirectionFilter::TowardHigh => recorded == Some(AttackDirection::TowardHigh),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PassNetworkFilters {
    pub half: HalfFilter,
    /// Minimum completed passes for an edge to survive (0 keeps all)
    pub min_count: u32,
    /// Restrict to these players; empty means everyone
    pub players: Vec<PlayerId>,
    pub direction: DirectionFilter,
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassNetworkNode {
    pub id: PlayerId,
    pub shirt_number: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<String>,
    /// 0..1 across the pitch; along the pitch for archetype fallbacks
    pub x: f64,
    /// 0..1 along the pitch; across the pitch for archetype fallbacks
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassEdge {
    pub from: PlayerId,
    pub to: PlayerId,
    /// Completed passes
    pub count: u32,
    /// All passes, `attempted >= count`
    pub attempted: u32,
    /// `count / attempted`
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassNetworkGraph {
    pub team: TeamSide,
    pub nodes: Vec<PassNetworkNode>,
    pub edges: Vec<PassEdge>,
    /// Passes that survived the half and direction filters
    pub total_passes: usize,
}

impl PassNetworkGraph {
    pub fn empty(team: TeamSide) -> Self {
        Self { team, nodes: Vec::new(), edges: Vec::new(), total_passes: 0 }
    }

    pub fn node(&self, id: PlayerId) -> Option<&PassNetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Default)]
struct PositionSum {
    x: f64,
    y: f64,
    count: u32,
}

/// Build `team`'s pass network from the pass events in `events`.
pub fn build_pass_network(
    events: &[MatchEvent],
    players: &[Player],
    team: TeamSide,
    filters: &PassNetworkFilters,
) -> PassNetworkGraph {
    let passes: Vec<(&MatchEvent, PlayerId)> = events
        .iter()
        .filter(|e| e.team == team)
        .filter_map(|e| {
            let pass = e.as_pass()?;
            let passer = e.player_id?;
            let minute = e.minute?;
            (filters.half.accepts(minute) && filters.direction.accepts(pass.attack_direction))
                .then_some((e, passer))
        })
        .collect();

    if passes.is_empty() {
        return PassNetworkGraph::empty(team);
    }

    let mut edge_map: BTreeMap<(PlayerId, PlayerId), (u32, u32)> = BTreeMap::new();
    let mut positions: HashMap<PlayerId, PositionSum> = HashMap::new();

    for (event, passer) in &passes {
        if let Some(p) = event.position {
            let sum = positions.entry(*passer).or_default();
            sum.x += p.x / field::NORMALIZED_MAX;
            sum.y += p.y / field::NORMALIZED_MAX;
            sum.count += 1;
        }

        let Some(pass) = event.as_pass() else { continue };
        let Some(receiver) = pass.receiver_id.filter(|r| r != passer) else {
            continue;
        };
        let (count, attempted) = edge_map.entry((*passer, receiver)).or_default();
        *attempted += 1;
        if pass.successful {
            *count += 1;
        }
    }

    let selected: Option<HashSet<PlayerId>> =
        (!filters.players.is_empty()).then(|| filters.players.iter().copied().collect());
    let is_selected = |id: PlayerId| selected.as_ref().map_or(true, |s| s.contains(&id));

    let edges: Vec<PassEdge> = edge_map
        .into_iter()
        .filter(|(_, (count, _))| *count >= filters.min_count)
        .filter(|((from, to), _)| is_selected(*from) && is_selected(*to))
        .map(|((from, to), (count, attempted))| PassEdge {
            from,
            to,
            count,
            attempted,
            accuracy: f64::from(count) / f64::from(attempted),
        })
        .collect();

    let connected: HashSet<PlayerId> = edges.iter().flat_map(|e| [e.from, e.to]).collect();
    let explicitly_selected = |id: PlayerId| selected.as_ref().is_some_and(|s| s.contains(&id));

    let nodes = players
        .iter()
        .filter(|p| is_selected(p.id))
        .filter(|p| connected.contains(&p.id) || explicitly_selected(p.id))
        .map(|p| {
            let (x, y) = positions
                .get(&p.id)
                .filter(|s| s.count > 0)
                .map(|s| (s.x / f64::from(s.count), s.y / f64::from(s.count)))
                .unwrap_or_else(|| archetype_position(p.position.as_deref()));
            PassNetworkNode {
                id: p.id,
                shirt_number: p.number.unwrap_or(0),
                name: p.name.clone(),
                position: p.position.clone(),
                x,
                y,
            }
        })
        .collect();

    PassNetworkGraph { team, nodes, edges, total_passes: passes.len() }
}

// ============================================================================
// Player Summary
// ============================================================================

const TOP_PARTNERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPartner {
    pub id: PlayerId,
    pub name: String,
    pub number: u32,
    pub count: u32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPassSummary {
    pub player_id: PlayerId,
    /// Completed passes sent along surviving edges
    pub total_sent: u32,
    pub total_received: u32,
    /// Completed / attempted over the player's outgoing edges (0 with none)
    pub accuracy: f64,
    pub top_receivers: Vec<PassPartner>,
    pub top_senders: Vec<PassPartner>,
}

fn top_partners<'a>(
    edges: impl Iterator<Item = (&'a PassEdge, PlayerId)>,
    players: &[Player],
) -> Vec<PassPartner> {
    let mut partners: Vec<PassPartner> = edges
        .map(|(edge, id)| {
            let player = players.iter().find(|p| p.id == id);
            PassPartner {
                id,
                name: player.map_or_else(|| format!("Player {id}"), |p| p.name.clone()),
                number: player.and_then(|p| p.number).unwrap_or(0),
                count: edge.count,
                accuracy: edge.accuracy,
            }
        })
        .collect();
    partners.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
    partners.truncate(TOP_PARTNERS);
    partners
}

/// Sent/received totals and favourite partners of one player in `graph`.
/// `None` when the player is not on the roster.
pub fn player_pass_summary(
    graph: &PassNetworkGraph,
    players: &[Player],
    player_id: PlayerId,
) -> Option<PlayerPassSummary> {
    players.iter().find(|p| p.id == player_id)?;

    let sent: Vec<&PassEdge> = graph.edges.iter().filter(|e| e.from == player_id).collect();
    let received: Vec<&PassEdge> = graph.edges.iter().filter(|e| e.to == player_id).collect();

    let total_sent: u32 = sent.iter().map(|e| e.count).sum();
    let total_received: u32 = received.iter().map(|e| e.count).sum();
    let attempted: u32 = sent.iter().map(|e| e.attempted).sum();
    let accuracy = if attempted > 0 { f64::from(total_sent) / f64::from(attempted) } else { 0.0 };

    Some(PlayerPassSummary {
        player_id,
        total_sent,
        total_received,
        accuracy,
        top_receivers: top_partners(sent.iter().map(|e| (*e, e.to)), players),
        top_senders: top_partners(received.iter().map(|e| (*e, e.from)), players),
    })
}

// ============================================================================
// Tests
// ============================================================================
