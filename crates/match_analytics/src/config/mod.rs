//! # Analytics Configuration
//!
//! Every tunable constant of the engine lives here, grouped per component.
//! Defaults reproduce the calibrated model; presets shift the thresholds for
//! stricter or looser event classification.
//!
//! ## Usage
//! ```rust
//! use match_analytics::config::AnalyticsConfig;
//!
//! let config = AnalyticsConfig::default();
//! let strict = AnalyticsConfig::strict();
//! let from_env = AnalyticsConfig::from_env_or_default();
//! assert!(config.validate().is_ok() && strict.validate().is_ok() && from_env.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `MA_ANALYTICS_PROFILE`: preset name (`default`, `strict`, `lenient`)

mod heatmap_config;
mod possession_config;
mod pressing_config;
mod progressive_config;
mod xa_config;

pub use heatmap_config::HeatmapConfig;
pub use possession_config::PossessionConfig;
pub use pressing_config::PressingConfig;
pub use progressive_config::ProgressiveConfig;
pub use xa_config::{XaAttribution, XaConfig};

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::error::{AnalyticsError, Result};

/// Environment variable selecting a preset
pub const PROFILE_ENV_VAR: &str = "MA_ANALYTICS_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub heatmap: HeatmapConfig,
    pub xa: XaConfig,
    pub possession: PossessionConfig,
    pub progressive: ProgressiveConfig,
    pub pressing: PressingConfig,
}

impl AnalyticsConfig {
    /// Tighter classification: fewer passes count as progressive, shorter
    /// assist window, deeper high-regain zone.
    pub fn strict() -> Self {
        Self {
            heatmap: HeatmapConfig { min_events: 10, ..HeatmapConfig::default() },
            xa: XaConfig::strict(),
            possession: PossessionConfig::default(),
            progressive: ProgressiveConfig::strict(),
            pressing: PressingConfig { high_regain_depth: 33.3 },
        }
    }

    /// Looser classification for sparse, manually tagged data.
    pub fn lenient() -> Self {
        Self {
            heatmap: HeatmapConfig { min_events: 3, ..HeatmapConfig::default() },
            xa: XaConfig::lenient(),
            possession: PossessionConfig::default(),
            progressive: ProgressiveConfig::lenient(),
            pressing: PressingConfig { high_regain_depth: 45.0 },
        }
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "lenient" => Some(Self::lenient()),
            _ => None,
        }
    }

    /// Load the preset named by `MA_ANALYTICS_PROFILE`, or the default.
    pub fn from_env_or_default() -> Self {
        let profile = env::var(PROFILE_ENV_VAR).unwrap_or_default();
        Self::from_profile(&profile).unwrap_or_else(|| {
            warn!(profile = %profile, "unknown {PROFILE_ENV_VAR}, using default config");
            Self::default()
        })
    }

    /// Parse a (possibly partial) YAML document; missing fields keep defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.heatmap.validate()?;
        self.xa.validate()?;
        self.possession.validate()?;
        self.progressive.validate()?;
        self.pressing.validate()
    }
}

/// Shared helpers for sub-config validation.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidConfig(message()))
    }
}

pub(crate) fn ensure_depth(name: &str, value: f64) -> Result<()> {
    ensure(value.is_finite() && value > 0.0 && value <= 100.0, || {
        format!("{name} must be within (0, 100], got {value}")
    })
}

pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    ensure(value.is_finite() && value >= 0.0, || format!("{name} must be >= 0, got {value}"))
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.heatmap.rows, 52);
        assert_eq!(cfg.heatmap.cols, 80);
        assert!((cfg.xa.window_end_secs - 15.0).abs() < 1e-9);
        assert!((cfg.possession.touch_secs - 1.2).abs() < 1e-9);
        assert!((cfg.progressive.min_reduction_m - 12.0).abs() < 1e-9);
        assert!((cfg.pressing.high_regain_depth - 40.0).abs() < 1e-9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_strict_is_tighter_than_lenient() {
        let strict = AnalyticsConfig::strict();
        let lenient = AnalyticsConfig::lenient();
        assert!(strict.progressive.min_reduction_m > lenient.progressive.min_reduction_m);
        assert!(strict.xa.window_end_secs < lenient.xa.window_end_secs);
        assert!(strict.pressing.high_regain_depth < lenient.pressing.high_regain_depth);
        assert!(strict.validate().is_ok());
        assert!(lenient.validate().is_ok());
    }

    #[test]
    fn test_from_profile() {
        assert_eq!(AnalyticsConfig::from_profile("STRICT"), Some(AnalyticsConfig::strict()));
        assert_eq!(AnalyticsConfig::from_profile(""), Some(AnalyticsConfig::default()));
        assert_eq!(AnalyticsConfig::from_profile("arcade"), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = AnalyticsConfig::from_yaml_str(
            "heatmap:\n  rows: 26\n  cols: 40\nxa:\n  attribution: last_pass_only\n",
        )
        .unwrap();
        assert_eq!(cfg.heatmap.rows, 26);
        assert_eq!(cfg.heatmap.cols, 40);
        assert!((cfg.heatmap.sigma - 1.8).abs() < 1e-9);
        assert_eq!(cfg.xa.attribution, XaAttribution::LastPassOnly);
        assert_eq!(cfg.possession, PossessionConfig::default());
    }

    #[test]
    fn test_invalid_yaml_values_rejected() {
        let err = AnalyticsConfig::from_yaml_str("heatmap:\n  rows: 0\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig(_)));

        let err = AnalyticsConfig::from_yaml_str("xa:\n  window_start_secs: 20\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig(_)));

        let err = AnalyticsConfig::from_yaml_str("heatmap: [1, 2]").unwrap_err();
        assert!(matches!(err, AnalyticsError::Yaml(_)));
    }

    #[test]
    fn test_serialization() {
        let cfg = AnalyticsConfig::lenient();
        let json = serde_json::to_string(&cfg).expect("Should serialize");
        let parsed: AnalyticsConfig = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(parsed, cfg);
    }
}
