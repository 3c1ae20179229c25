use serde::{Deserialize, Serialize};

use super::{ensure, ensure_non_negative};
use crate::error::Result;

/// Density grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Grid rows (along the pitch)
    pub rows: usize,
    /// Grid columns (across the pitch)
    pub cols: usize,
    /// Gaussian kernel standard deviation, in cells
    pub sigma: f64,
    /// Fewer usable events than this yields no grid
    pub min_events: usize,
    /// Break up stacked duplicate coordinates with a small random offset
    pub jitter_enabled: bool,
    /// Jitter half-range bounds, in percent units
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Contrast clip percentiles over the non-zero cells
    pub clip_low_percentile: f64,
    pub clip_high_percentile: f64,
    /// Weight of tackles and interceptions in match-report heatmaps
    pub defensive_action_weight: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            rows: 52,
            cols: 80,
            sigma: 1.8,
            min_events: 5,
            jitter_enabled: true,
            jitter_min: 0.5,
            jitter_max: 1.0,
            clip_low_percentile: 0.05,
            clip_high_percentile: 0.95,
            defensive_action_weight: 1.1,
        }
    }
}

impl HeatmapConfig {
    /// Kernel support radius in cells (3 sigma).
    pub fn kernel_radius(&self) -> i64 {
        (3.0 * self.sigma).ceil() as i64
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure(self.rows > 0 && self.cols > 0, || {
            format!("heatmap grid must be non-empty, got {}x{}", self.rows, self.cols)
        })?;
        ensure(self.sigma.is_finite() && self.sigma > 0.0, || {
            format!("heatmap sigma must be > 0, got {}", self.sigma)
        })?;
        ensure_non_negative("heatmap.jitter_min", self.jitter_min)?;
        ensure(self.jitter_max.is_finite() && self.jitter_max >= self.jitter_min, || {
            format!("heatmap jitter_max {} below jitter_min {}", self.jitter_max, self.jitter_min)
        })?;
        ensure(
            (0.0..1.0).contains(&self.clip_low_percentile)
                && (0.0..1.0).contains(&self.clip_high_percentile)
                && self.clip_low_percentile <= self.clip_high_percentile,
            || {
                format!(
                    "heatmap clip percentiles must satisfy 0 <= low <= high < 1, got {} / {}",
                    self.clip_low_percentile, self.clip_high_percentile
                )
            },
        )?;
        ensure_non_negative("heatmap.defensive_action_weight", self.defensive_action_weight)
    }
}
