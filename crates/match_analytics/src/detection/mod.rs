//! # Detection Module
//!
//! Clean-up of raw video detector output before it becomes match events.
//!
//! - `postprocess` - label normalization, pass upgrades, dedupe and windowing

pub mod postprocess;

pub use postprocess::{
    postprocess_detections, CleanEvent, DetectedKind, DetectionExtras, PostprocessConfig,
    RawDetection,
};
