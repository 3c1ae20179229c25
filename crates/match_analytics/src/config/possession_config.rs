use serde::{Deserialize, Serialize};

use super::{ensure_depth, ensure_non_negative};
use crate::error::Result;

/// Seconds of ball time credited per event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionConfig {
    pub touch_secs: f64,
    pub pass_secs: f64,
    pub progressive_pass_secs: f64,
    pub failed_pass_secs: f64,
    /// Canonical depth of the attacking final third (normalized units)
    pub final_third_depth: f64,
    pub final_third_floor_secs: f64,
    /// Canonical depth of the penalty area (normalized units)
    pub penalty_area_depth: f64,
    pub penalty_area_floor_secs: f64,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            touch_secs: 1.2,
            pass_secs: 2.2,
            progressive_pass_secs: 2.5,
            failed_pass_secs: 0.4,
            final_third_depth: 30.0,
            final_third_floor_secs: 1.8,
            penalty_area_depth: 15.0,
            penalty_area_floor_secs: 2.0,
        }
    }
}

impl PossessionConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        ensure_non_negative("possession.touch_secs", self.touch_secs)?;
        ensure_non_negative("possession.pass_secs", self.pass_secs)?;
        ensure_non_negative("possession.progressive_pass_secs", self.progressive_pass_secs)?;
        ensure_non_negative("possession.failed_pass_secs", self.failed_pass_secs)?;
        ensure_non_negative("possession.final_third_floor_secs", self.final_third_floor_secs)?;
        ensure_non_negative("possession.penalty_area_floor_secs", self.penalty_area_floor_secs)?;
        ensure_depth("possession.final_third_depth", self.final_third_depth)?;
        ensure_depth("possession.penalty_area_depth", self.penalty_area_depth)
    }
}
