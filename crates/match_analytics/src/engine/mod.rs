//! Spatial primitives: pitch geometry, shot valuation and density grids.

pub mod heatmap;
pub mod pitch;
pub mod xg;

pub use heatmap::{
    generate_heatmap, generate_heatmap_seeded, generate_heatmap_with_rng, HeatmapEvent,
    HeatmapGrid,
};
pub use pitch::{AttackDirection, MatchOrientation, MeterPos, PitchPoint};
pub use xg::{calculate_xg, expected_goals_directional, resolved_xg, total_xg, PENALTY_XG};
