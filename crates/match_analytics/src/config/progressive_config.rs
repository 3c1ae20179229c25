use serde::{Deserialize, Serialize};

use super::{ensure, ensure_depth, ensure_non_negative};
use crate::error::Result;

/// Progressive pass and deep completion thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressiveConfig {
    /// Minimum reduction in distance to goal (meters, exclusive)
    pub min_reduction_m: f64,
    /// Minimum reduction relative to the starting distance (exclusive)
    pub min_reduction_ratio: f64,
    /// Canonical depth of the final third (normalized units)
    pub final_third_depth: f64,
    /// Minimum gain for a deep completion (meters, inclusive)
    pub deep_completion_min_gain_m: f64,
}

impl Default for ProgressiveConfig {
    fn default() -> Self {
        Self {
            min_reduction_m: 12.0,
            min_reduction_ratio: 0.25,
            final_third_depth: 33.3,
            deep_completion_min_gain_m: 5.0,
        }
    }
}

impl ProgressiveConfig {
    pub fn strict() -> Self {
        Self { min_reduction_m: 15.0, min_reduction_ratio: 0.30, ..Self::default() }
    }

    pub fn lenient() -> Self {
        Self { min_reduction_m: 10.0, min_reduction_ratio: 0.20, ..Self::default() }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure_non_negative("progressive.min_reduction_m", self.min_reduction_m)?;
        ensure(
            self.min_reduction_ratio.is_finite() && (0.0..=1.0).contains(&self.min_reduction_ratio),
            || format!("progressive ratio must be within [0, 1], got {}", self.min_reduction_ratio),
        )?;
        ensure_depth("progressive.final_third_depth", self.final_third_depth)?;
        ensure_non_negative("progressive.deep_completion_min_gain_m", self.deep_completion_min_gain_m)
    }
}
