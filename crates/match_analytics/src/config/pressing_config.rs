use serde::{Deserialize, Serialize};

use super::ensure_depth;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressingConfig {
    /// Recoveries closer than this to the attacked goal line (canonical,
    /// normalized units) count as high regains
    pub high_regain_depth: f64,
}

impl Default for PressingConfig {
    fn default() -> Self {
        Self { high_regain_depth: 40.0 }
    }
}

impl PressingConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        ensure_depth("pressing.high_regain_depth", self.high_regain_depth)
    }
}
