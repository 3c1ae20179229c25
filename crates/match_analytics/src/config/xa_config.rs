use serde::{Deserialize, Serialize};

use super::{ensure, ensure_non_negative};
use crate::error::Result;

/// How a shot's xG is credited to the passes linked to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XaAttribution {
    /// Every linked pass receives the full xG of its shot
    #[default]
    PerPass,
    /// Only the latest linked pass before each shot keeps credit
    LastPassOnly,
}

/// Pass-to-shot linking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XaConfig {
    /// Earliest shot time after the pass (seconds, inclusive)
    pub window_start_secs: f64,
    /// Latest shot time after the pass (seconds, inclusive)
    pub window_end_secs: f64,
    /// Reject links where pass and shot carry different possession ids
    pub require_same_possession: bool,
    pub attribution: XaAttribution,
}

impl Default for XaConfig {
    fn default() -> Self {
        Self {
            window_start_secs: 2.0,
            window_end_secs: 15.0,
            require_same_possession: false,
            attribution: XaAttribution::PerPass,
        }
    }
}

impl XaConfig {
    pub fn strict() -> Self {
        Self { window_end_secs: 10.0, require_same_possession: true, ..Self::default() }
    }

    pub fn lenient() -> Self {
        Self {
            window_start_secs: 1.0,
            window_end_secs: 20.0,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure_non_negative("xa.window_start_secs", self.window_start_secs)?;
        ensure(
            self.window_end_secs.is_finite() && self.window_end_secs >= self.window_start_secs,
            || {
                format!(
                    "xa window end {} precedes start {}",
                    self.window_end_secs, self.window_start_secs
                )
            },
        )
    }
}
