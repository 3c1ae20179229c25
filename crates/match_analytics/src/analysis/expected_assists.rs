//! Expected assists (xA)
//!
//! Links each completed pass to the shot it most plausibly set up and credits
//! the pass with that shot's xG.
//!
//! Linking order per pass:
//! 1. `assist_id` naming an eligible shot's event id links directly, as long
//!    as that shot falls inside the window (or either side is untimed).
//! 2. Otherwise the earliest eligible shot in `[t + start, t + end]` seconds
//!    after the pass. With `require_same_possession`, shots from a different
//!    possession sequence are skipped when both sides carry a possession id.
//!
//! Eligible shots have a position and positive xG (stored, else modelled).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::round_dp;
use crate::config::{XaAttribution, XaConfig};
use crate::engine::pitch::MatchOrientation;
use crate::engine::xg::resolved_xg;
use crate::models::{EventId, MatchEvent};

/// xA credited to one completed, positioned pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassXa {
    /// Index into the pass slice given to [`calculate_xa`]
    pub pass_index: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pass_id: Option<EventId>,
    pub xa: f64,
    /// Index into the shot slice of the linked shot
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shot_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shot_id: Option<EventId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XaResult {
    /// Sum of per-pass xA, two decimals
    pub total_xa: f64,
    pub passes: Vec<PassXa>,
}

impl XaResult {
    pub fn linked(&self) -> impl Iterator<Item = &PassXa> {
        self.passes.iter().filter(|p| p.shot_index.is_some())
    }
}

struct EligibleShot<'a> {
    index: usize,
    event: &'a MatchEvent,
    timestamp: Option<f64>,
    xg: f64,
}

impl EligibleShot<'_> {
    fn possession_id(&self) -> Option<&str> {
        self.event.as_shot().and_then(|s| s.possession_id.as_deref())
    }
}

fn eligible_shots<'a>(
    shots: &'a [MatchEvent],
    orientation: &MatchOrientation,
) -> Vec<EligibleShot<'a>> {
    let mut eligible: Vec<EligibleShot<'a>> = shots
        .iter()
        .enumerate()
        .filter(|(_, e)| e.position.is_some())
        .filter_map(|(index, event)| {
            let xg = resolved_xg(event, orientation).filter(|xg| *xg > 0.0)?;
            Some(EligibleShot { index, event, timestamp: event.timestamp_secs(), xg })
        })
        .collect();
    // stable: equal timestamps keep input order; untimed shots go last
    eligible.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    eligible
}

fn same_possession(pass: Option<&str>, shot: Option<&str>) -> bool {
    match (pass, shot) {
        (Some(p), Some(s)) => p == s,
        _ => true,
    }
}

/// Link one team's passes to its shots and credit xA.
///
/// Only completed passes with a position appear in the result; a pass with
/// no timestamp and no usable `assist_id` gets xA 0.
pub fn calculate_xa(
    passes: &[MatchEvent],
    shots: &[MatchEvent],
    orientation: &MatchOrientation,
    config: &XaConfig,
) -> XaResult {
    let shots = eligible_shots(shots, orientation);
    let by_id: HashMap<EventId, usize> =
        shots.iter().enumerate().filter_map(|(i, s)| s.event.id.map(|id| (id, i))).collect();

    // (pass index, pass timestamp, linked position in `shots`)
    let mut links: Vec<(usize, Option<f64>, Option<usize>)> = Vec::new();

    for (pass_index, event) in passes.iter().enumerate() {
        let Some(pass) = event.as_pass().filter(|p| p.successful) else {
            continue;
        };
        if event.position.is_none() {
            continue;
        }
        let timestamp = event.timestamp_secs();

        let window = timestamp.map(|t| (t + config.window_start_secs, t + config.window_end_secs));
        let in_window = |ts: f64| window.is_some_and(|(start, end)| ts >= start && ts <= end);

        let direct = pass
            .assist_id
            .and_then(|id| by_id.get(&id).copied())
            .filter(|&i| window.is_none() || shots[i].timestamp.map_or(true, in_window));
        let linked = direct.or_else(|| {
            window?;
            shots.iter().position(|shot| {
                shot.timestamp.is_some_and(in_window)
                    && (!config.require_same_possession
                        || same_possession(pass.possession_id.as_deref(), shot.possession_id()))
            })
        });
        links.push((pass_index, timestamp, linked));
    }

    if config.attribution == XaAttribution::LastPassOnly {
        // keep the latest pass per shot; ties go to the later pass in input order
        let mut latest: HashMap<usize, (f64, usize)> = HashMap::new();
        for (slot, (_, ts, linked)) in links.iter().enumerate() {
            if let Some(shot) = linked {
                let ts = ts.unwrap_or(f64::NEG_INFINITY);
                let entry = latest.entry(*shot).or_insert((ts, slot));
                if ts >= entry.0 {
                    *entry = (ts, slot);
                }
            }
        }
        for (slot, link) in links.iter_mut().enumerate() {
            if let Some(shot) = link.2 {
                if latest.get(&shot).map(|(_, s)| *s) != Some(slot) {
                    link.2 = None;
                }
            }
        }
    }

    let passes_xa: Vec<PassXa> = links
        .into_iter()
        .map(|(pass_index, _, linked)| {
            let shot = linked.map(|i| &shots[i]);
            PassXa {
                pass_index,
                pass_id: passes[pass_index].id,
                xa: shot.map_or(0.0, |s| s.xg),
                shot_index: shot.map(|s| s.index),
                shot_id: shot.and_then(|s| s.event.id),
            }
        })
        .collect();

    let total: f64 = passes_xa.iter().map(|p| p.xa).sum();
    XaResult { total_xa: round_dp(total, 2), passes: passes_xa }
}
