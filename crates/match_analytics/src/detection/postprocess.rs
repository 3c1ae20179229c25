//! # Detection Post-Processing
//!
//! Turns noisy detector output into a sparse list of Pass/Shot/Goal/Touch
//! events.
//!
//! ## Algorithm
//! 1. Normalize labels by substring (goal > shot/shoot > pass > touch);
//!    unknown labels are dropped
//! 2. Upgrade passes to goals or shots from ball speed, goal distance and
//!    class score margins
//! 3. Drop detections below `min_confidence`; clamp time to the video
//! 4. Sort by (time asc, priority desc, confidence desc)
//! 5. Merge same-kind neighbours closer than the kind's minimum gap
//! 6. Within `cross_class_gap_secs`, a higher-priority kind suppresses
//!    lower ones; equal kinds keep the more confident
//! 7. Keep the best `top_k_per_window` per `window_secs` window
//! 8. Final sort by time

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{AnalyticsError, Result};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectedKind {
    Pass,
    Shot,
    Goal,
    Touch,
}

impl DetectedKind {
    /// Goal 3, Shot 2, Pass 1, Touch 0
    pub fn priority(self) -> u8 {
        match self {
            DetectedKind::Goal => 3,
            DetectedKind::Shot => 2,
            DetectedKind::Pass => 1,
            DetectedKind::Touch => 0,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("goal") {
            Some(DetectedKind::Goal)
        } else if label.contains("shot") || label.contains("shoot") {
            Some(DetectedKind::Shot)
        } else if label.contains("pass") {
            Some(DetectedKind::Pass)
        } else if label.contains("touch") {
            Some(DetectedKind::Touch)
        } else {
            None
        }
    }
}

/// Optional detector signals used to upgrade passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionExtras {
    pub ball_speed_kmh: Option<f64>,
    pub goal_distance_m: Option<f64>,
    pub ball_in_goal: Option<bool>,
    pub shot_score: Option<f64>,
    pub pass_score: Option<f64>,
    pub goal_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub time_sec: f64,
    pub label: String,
    /// 0..1
    pub confidence: f64,
    #[serde(default)]
    pub extras: Option<DetectionExtras>,
}

impl RawDetection {
    pub fn new(time_sec: f64, label: impl Into<String>, confidence: f64) -> Self {
        Self { time_sec, label: label.into(), confidence, extras: None }
    }

    pub fn with_extras(mut self, extras: DetectionExtras) -> Self {
        self.extras = Some(extras);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanEvent {
    pub time_sec: f64,
    pub kind: DetectedKind,
    pub confidence: f64,
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    pub min_confidence: f64,
    pub min_gap_goal_secs: f64,
    pub min_gap_shot_secs: f64,
    pub min_gap_pass_secs: f64,
    pub min_gap_touch_secs: f64,
    pub cross_class_gap_secs: f64,
    pub window_secs: f64,
    pub top_k_per_window: usize,
    /// Class score lead that upgrades a pass
    pub score_margin: f64,
    pub goal_max_distance_m: f64,
    pub goal_min_speed_kmh: f64,
    pub shot_max_distance_m: f64,
    pub shot_min_speed_kmh: f64,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.65,
            min_gap_goal_secs: 5.0,
            min_gap_shot_secs: 3.0,
            min_gap_pass_secs: 2.0,
            min_gap_touch_secs: 1.0,
            cross_class_gap_secs: 2.0,
            window_secs: 60.0,
            top_k_per_window: 2,
            score_margin: 0.15,
            goal_max_distance_m: 11.0,
            goal_min_speed_kmh: 42.0,
            shot_max_distance_m: 26.0,
            shot_min_speed_kmh: 34.0,
        }
    }
}

impl PostprocessConfig {
    pub fn min_gap_secs(&self, kind: DetectedKind) -> f64 {
        match kind {
            DetectedKind::Goal => self.min_gap_goal_secs,
            DetectedKind::Shot => self.min_gap_shot_secs,
            DetectedKind::Pass => self.min_gap_pass_secs,
            DetectedKind::Touch => self.min_gap_touch_secs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "min_confidence must be within 0..=1, got {}",
                self.min_confidence
            )));
        }
        if !(self.window_secs.is_finite() && self.window_secs > 0.0) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "window_secs must be positive, got {}",
                self.window_secs
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Steps
// ============================================================================

fn upgrade_pass(
    detection: &RawDetection,
    base: DetectedKind,
    cfg: &PostprocessConfig,
) -> DetectedKind {
    if base != DetectedKind::Pass {
        return base;
    }
    let none = DetectionExtras::default();
    let extras = detection.extras.as_ref().unwrap_or(&none);
    let speed = extras.ball_speed_kmh.unwrap_or(0.0);
    let dist = extras.goal_distance_m.unwrap_or(999.0);
    let in_goal = extras.ball_in_goal.unwrap_or(false);
    let pass_score = extras.pass_score.unwrap_or(0.0);
    let shot_score = extras.shot_score.unwrap_or(0.0);
    let goal_score = extras.goal_score.unwrap_or(0.0);

    if in_goal
        || (dist < cfg.goal_max_distance_m && speed > cfg.goal_min_speed_kmh)
        || goal_score - pass_score >= cfg.score_margin
    {
        return DetectedKind::Goal;
    }
    if (speed > cfg.shot_min_speed_kmh && dist < cfg.shot_max_distance_m)
        || shot_score - pass_score >= cfg.score_margin
    {
        return DetectedKind::Shot;
    }
    base
}

fn dedupe_same_kind(events: Vec<CleanEvent>, cfg: &PostprocessConfig) -> Vec<CleanEvent> {
    let mut out: Vec<CleanEvent> = Vec::with_capacity(events.len());
    for ev in events {
        if let Some(last) = out.last_mut() {
            let close = (ev.time_sec - last.time_sec).abs() < cfg.min_gap_secs(ev.kind);
            if ev.kind == last.kind && close {
                if ev.confidence > last.confidence {
                    *last = ev;
                }
                continue;
            }
        }
        out.push(ev);
    }
    out
}

fn resolve_cross_class(events: Vec<CleanEvent>, cfg: &PostprocessConfig) -> Vec<CleanEvent> {
    let mut out: Vec<CleanEvent> = Vec::with_capacity(events.len());
    for ev in events {
        let mut keep = true;
        let mut replace = None;
        for (i, kept) in out.iter().enumerate() {
            if (ev.time_sec - kept.time_sec).abs() > cfg.cross_class_gap_secs {
                continue;
            }
            if kept.kind.priority() > ev.kind.priority() {
                keep = false;
                break;
            }
            if kept.kind.priority() == ev.kind.priority() {
                if kept.confidence >= ev.confidence {
                    keep = false;
                } else {
                    replace = Some(i);
                }
                break;
            }
        }
        if let Some(i) = replace {
            out.remove(i);
        }
        if keep {
            out.push(ev);
        }
    }
    out
}

fn top_k_per_window(events: Vec<CleanEvent>, cfg: &PostprocessConfig) -> Vec<CleanEvent> {
    let mut windows: BTreeMap<i64, Vec<CleanEvent>> = BTreeMap::new();
    for ev in events {
        let window = (ev.time_sec / cfg.window_secs).floor() as i64;
        windows.entry(window).or_default().push(ev);
    }
    windows
        .into_values()
        .flat_map(|mut bucket| {
            bucket.sort_by(|a, b| {
                b.confidence
                    .total_cmp(&a.confidence)
                    .then_with(|| b.kind.priority().cmp(&a.kind.priority()))
            });
            bucket.truncate(cfg.top_k_per_window);
            bucket
        })
        .collect()
}

// ============================================================================
// Entry Point
// ============================================================================

/// Clean detector output for a video of `video_duration_secs` seconds.
pub fn postprocess_detections(
    raw: &[RawDetection],
    video_duration_secs: f64,
    config: &PostprocessConfig,
) -> Vec<CleanEvent> {
    let duration = video_duration_secs.max(0.0);
    let mut events: Vec<CleanEvent> = raw
        .iter()
        .filter_map(|d| {
            let base = DetectedKind::from_label(&d.label)?;
            Some(CleanEvent {
                time_sec: d.time_sec.min(duration).max(0.0),
                kind: upgrade_pass(d, base, config),
                confidence: d.confidence,
            })
        })
        .filter(|e| e.confidence >= config.min_confidence && e.time_sec.is_finite())
        .collect();

    events.sort_by(|a, b| {
        a.time_sec
            .total_cmp(&b.time_sec)
            .then_with(|| b.kind.priority().cmp(&a.kind.priority()))
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });

    let before = events.len();
    let events = dedupe_same_kind(events, config);
    let events = resolve_cross_class(events, config);
    let mut events = top_k_per_window(events, config);
    events.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));

    debug!(raw = raw.len(), candidates = before, kept = events.len(), "detections post-processed");
    events
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &[RawDetection]) -> Vec<CleanEvent> {
        postprocess_detections(raw, 5400.0, &PostprocessConfig::default())
    }

    fn kinds(events: &[CleanEvent]) -> Vec<DetectedKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(DetectedKind::from_label("GOAL_scored"), Some(DetectedKind::Goal));
        assert_eq!(DetectedKind::from_label("shooting"), Some(DetectedKind::Shot));
        assert_eq!(DetectedKind::from_label("long_pass"), Some(DetectedKind::Pass));
        assert_eq!(DetectedKind::from_label("Touch"), Some(DetectedKind::Touch));
        assert_eq!(DetectedKind::from_label("throw-in"), None);
    }

    #[test]
    fn test_low_confidence_and_unknown_dropped() {
        let out = run(&[
            RawDetection::new(10.0, "pass", 0.64),
            RawDetection::new(20.0, "corner", 0.99),
            RawDetection::new(30.0, "pass", 0.65),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].time_sec, 30.0);
    }

    #[test]
    fn test_pass_upgrades() {
        let cfg = PostprocessConfig::default();
        let pass = |extras: DetectionExtras| RawDetection::new(1.0, "pass", 0.9).with_extras(extras);

        let in_goal = pass(DetectionExtras { ball_in_goal: Some(true), ..Default::default() });
        assert_eq!(upgrade_pass(&in_goal, DetectedKind::Pass, &cfg), DetectedKind::Goal);

        let close_fast = pass(DetectionExtras {
            ball_speed_kmh: Some(45.0),
            goal_distance_m: Some(10.0),
            ..Default::default()
        });
        assert_eq!(upgrade_pass(&close_fast, DetectedKind::Pass, &cfg), DetectedKind::Goal);

        let shot_speed = pass(DetectionExtras {
            ball_speed_kmh: Some(40.0),
            goal_distance_m: Some(20.0),
            ..Default::default()
        });
        assert_eq!(upgrade_pass(&shot_speed, DetectedKind::Pass, &cfg), DetectedKind::Shot);

        let shot_margin = pass(DetectionExtras {
            shot_score: Some(0.6),
            pass_score: Some(0.4),
            ..Default::default()
        });
        assert_eq!(upgrade_pass(&shot_margin, DetectedKind::Pass, &cfg), DetectedKind::Shot);

        let plain = pass(DetectionExtras::default());
        assert_eq!(upgrade_pass(&plain, DetectedKind::Pass, &cfg), DetectedKind::Pass);

        // only passes are upgraded
        assert_eq!(upgrade_pass(&in_goal, DetectedKind::Touch, &cfg), DetectedKind::Touch);
    }

    #[test]
    fn test_time_clamped_to_video() {
        let out = postprocess_detections(
            &[RawDetection::new(-3.0, "touch", 0.9), RawDetection::new(120.0, "goal", 0.9)],
            100.0,
            &PostprocessConfig::default(),
        );
        let times: Vec<f64> = out.iter().map(|e| e.time_sec).collect();
        assert_eq!(times, vec![0.0, 100.0]);
    }

    #[test]
    fn test_same_kind_dedupe_keeps_most_confident() {
        let out = run(&[
            RawDetection::new(10.0, "pass", 0.7),
            RawDetection::new(11.0, "pass", 0.9),
            RawDetection::new(13.5, "pass", 0.8),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].time_sec, out[0].confidence), (11.0, 0.9));
        assert_eq!(out[1].time_sec, 13.5);
    }

    #[test]
    fn test_higher_class_suppresses_nearby_lower() {
        let out = run(&[
            RawDetection::new(30.0, "shot", 0.7),
            RawDetection::new(31.5, "touch", 0.95),
            RawDetection::new(34.0, "touch", 0.95),
        ]);
        assert_eq!(kinds(&out), vec![DetectedKind::Shot, DetectedKind::Touch]);
        assert_eq!(out[1].time_sec, 34.0);
    }

    #[test]
    fn test_top_two_per_window() {
        let out = run(&[
            RawDetection::new(5.0, "touch", 0.70),
            RawDetection::new(15.0, "pass", 0.90),
            RawDetection::new(25.0, "shot", 0.80),
            RawDetection::new(35.0, "touch", 0.75),
            RawDetection::new(65.0, "touch", 0.66),
        ]);
        let times: Vec<f64> = out.iter().map(|e| e.time_sec).collect();
        assert_eq!(times, vec![15.0, 25.0, 65.0]);
    }

    #[test]
    fn test_validate() {
        assert!(PostprocessConfig::default().validate().is_ok());
        let bad = PostprocessConfig { window_secs: 0.0, ..Default::default() };
        assert!(matches!(bad.validate(), Err(AnalyticsError::InvalidConfig(_))));
    }
}
