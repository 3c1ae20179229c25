//! Heatmap density estimator
//!
//! Events are splatted onto a `rows x cols` grid with a truncated Gaussian
//! kernel, then contrast-normalized: clip to the p5..p95 range of the
//! non-zero cells, rescale to 0..1 and take the square root.
//!
//! Grid orientation: column index runs across the pitch (`x`), row index
//! along it (`y`). Values are stored row-major.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pitch::{field, is_valid_coordinate};
use crate::config::HeatmapConfig;

/// One weighted sample. Coordinates are normalized (0..100); out-of-range or
/// non-finite coordinates are dropped, non-finite weights count as 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEvent {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weight: Option<f64>,
}

impl HeatmapEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, weight: None }
    }

    pub fn weighted(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight: Some(weight) }
    }

    fn effective_weight(&self) -> f64 {
        self.weight.filter(|w| w.is_finite()).unwrap_or(1.0)
    }
}

/// Normalized density grid, every value within [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` values
    pub values: Vec<f64>,
}

impl HeatmapGrid {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, values: vec![0.0; rows * cols] }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.values.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Nested rows, for consumers that expect `number[][]`.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// (row, col, value) of the hottest cell.
    pub fn peak(&self) -> Option<(usize, usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, v)| (idx / self.cols, idx % self.cols, *v))
    }
}

/// Uniform offset in ±r with r drawn from [jitter_min, jitter_max].
fn jitter<R: Rng + ?Sized>(value: f64, config: &HeatmapConfig, rng: &mut R) -> f64 {
    let range = config.jitter_min + rng.gen::<f64>() * (config.jitter_max - config.jitter_min);
    let offset = (rng.gen::<f64>() - 0.5) * 2.0 * range;
    (value + offset).clamp(0.0, field::NORMALIZED_MAX)
}

fn splat(grid: &mut HeatmapGrid, x: f64, y: f64, weight: f64, config: &HeatmapConfig) {
    let center_col = (x / field::NORMALIZED_MAX * grid.cols as f64).floor() as i64;
    let center_row = (y / field::NORMALIZED_MAX * grid.rows as f64).floor() as i64;
    let radius = config.kernel_radius();
    let two_sigma_sq = 2.0 * config.sigma * config.sigma;

    for dy in -radius..=radius {
        let row = center_row + dy;
        if row < 0 || row >= grid.rows as i64 {
            continue;
        }
        for dx in -radius..=radius {
            let col = center_col + dx;
            if col < 0 || col >= grid.cols as i64 {
                continue;
            }
            let dist_sq = (dx * dx + dy * dy) as f64;
            if dist_sq.sqrt() > radius as f64 {
                continue;
            }
            let idx = row as usize * grid.cols + col as usize;
            grid.values[idx] += weight * (-dist_sq / two_sigma_sq).exp();
        }
    }
}

/// Clip to the configured percentiles of the positive cells, rescale, sqrt.
/// `false` when no cell is positive.
fn normalize(grid: &mut HeatmapGrid, config: &HeatmapConfig) -> bool {
    let mut positive: Vec<f64> = grid.values.iter().copied().filter(|v| *v > 0.0).collect();
    if positive.is_empty() {
        return false;
    }
    positive.sort_by(f64::total_cmp);

    let n = positive.len();
    let pick = |q: f64| positive[((n as f64 * q).floor() as usize).min(n - 1)];
    let low = pick(config.clip_low_percentile);
    let high = pick(config.clip_high_percentile);
    let span = if high - low > 0.0 { high - low } else { 1.0 };

    for v in grid.values.iter_mut() {
        *v = ((v.clamp(low, high) - low) / span).sqrt();
    }
    true
}

/// Build a heatmap using the supplied random source for jitter.
///
/// Returns `None` when fewer than `config.min_events` events have usable
/// coordinates, or when the accumulated density is nowhere positive.
pub fn generate_heatmap_with_rng<R: Rng + ?Sized>(
    events: &[HeatmapEvent],
    config: &HeatmapConfig,
    rng: &mut R,
) -> Option<HeatmapGrid> {
    let usable: Vec<&HeatmapEvent> = events
        .iter()
        .filter(|e| is_valid_coordinate(e.x) && is_valid_coordinate(e.y))
        .collect();

    if usable.len() < config.min_events || config.rows == 0 || config.cols == 0 {
        debug!(usable = usable.len(), required = config.min_events, "not enough events for heatmap");
        return None;
    }

    let mut grid = HeatmapGrid::zeros(config.rows, config.cols);
    for event in usable {
        let (x, y) = if config.jitter_enabled {
            (jitter(event.x, config, rng), jitter(event.y, config, rng))
        } else {
            (event.x, event.y)
        };
        splat(&mut grid, x, y, event.effective_weight(), config);
    }

    if !normalize(&mut grid, config) {
        debug!("heatmap density is nowhere positive");
        return None;
    }
    Some(grid)
}

/// Reproducible heatmap: jitter drawn from a ChaCha8 stream seeded with `seed`.
pub fn generate_heatmap_seeded(
    events: &[HeatmapEvent],
    config: &HeatmapConfig,
    seed: u64,
) -> Option<HeatmapGrid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_heatmap_with_rng(events, config, &mut rng)
}

/// Heatmap with a fresh thread-local random source per call.
pub fn generate_heatmap(events: &[HeatmapEvent], config: &HeatmapConfig) -> Option<HeatmapGrid> {
    generate_heatmap_with_rng(events, config, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked(n: usize, x: f64, y: f64) -> Vec<HeatmapEvent> {
        (0..n).map(|_| HeatmapEvent::new(x, y)).collect()
    }

    #[test]
    fn test_insufficient_events() {
        let config = HeatmapConfig::default();
        assert!(generate_heatmap_seeded(&stacked(4, 50.0, 50.0), &config, 1).is_none());

        // invalid coordinates do not count toward the minimum
        let mut events = stacked(4, 50.0, 50.0);
        events.push(HeatmapEvent::new(f64::NAN, 10.0));
        events.push(HeatmapEvent::new(120.0, 10.0));
        assert!(generate_heatmap_seeded(&events, &config, 1).is_none());
    }

    #[test]
    fn test_single_peak_without_jitter() {
        let config = HeatmapConfig::default().without_jitter();
        let grid = generate_heatmap_seeded(&stacked(5, 50.0, 50.0), &config, 0).unwrap();

        assert_eq!(grid.rows, 52);
        assert_eq!(grid.cols, 80);
        assert_eq!(grid.values.len(), 52 * 80);
        assert!(grid.values.iter().all(|v| (0.0..=1.0).contains(v)));

        let (_, _, value) = grid.peak().unwrap();
        assert!((value - 1.0).abs() < 1e-12);
        assert_eq!(grid.get(26, 40), Some(1.0));

        // the p95 clip saturates only the kernel core around the stacked point
        for (idx, v) in grid.values.iter().enumerate() {
            if *v >= 1.0 {
                let (r, c) = ((idx / grid.cols) as f64, (idx % grid.cols) as f64);
                let d = ((r - 26.0).powi(2) + (c - 40.0).powi(2)).sqrt();
                assert!(d < 1.5, "saturated cell ({r}, {c}) too far from the peak");
            }
        }

        // far from the kernel everything is zero
        assert_eq!(grid.get(0, 0), Some(0.0));
        // symmetric falloff around the peak
        let left = grid.get(26, 38).unwrap();
        let right = grid.get(26, 42).unwrap();
        assert!((left - right).abs() < 1e-12);
        assert!(left < value);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let config = HeatmapConfig::default();
        let events: Vec<HeatmapEvent> =
            (0..20).map(|i| HeatmapEvent::new(i as f64 * 5.0, 100.0 - i as f64 * 4.0)).collect();

        let a = generate_heatmap_seeded(&events, &config, 42).unwrap();
        let b = generate_heatmap_seeded(&events, &config, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_weight_counts_as_one() {
        let config = HeatmapConfig::default().without_jitter();
        let plain = stacked(5, 30.0, 70.0);
        let mut odd = stacked(4, 30.0, 70.0);
        odd.push(HeatmapEvent::weighted(30.0, 70.0, f64::NAN));

        let a = generate_heatmap_seeded(&plain, &config, 0).unwrap();
        let b = generate_heatmap_seeded(&odd, &config, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_weights_yield_none() {
        let config = HeatmapConfig::default().without_jitter();
        let events: Vec<HeatmapEvent> =
            (0..6).map(|i| HeatmapEvent::weighted(10.0 * i as f64, 50.0, 0.0)).collect();
        assert!(generate_heatmap_seeded(&events, &config, 0).is_none());
    }

    #[test]
    fn test_edge_coordinates_stay_in_grid() {
        let config = HeatmapConfig::default();
        let events = vec![
            HeatmapEvent::new(0.0, 0.0),
            HeatmapEvent::new(100.0, 100.0),
            HeatmapEvent::new(0.0, 100.0),
            HeatmapEvent::new(100.0, 0.0),
            HeatmapEvent::new(50.0, 50.0),
        ];
        let grid = generate_heatmap_seeded(&events, &config, 7).unwrap();
        assert!(grid.values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(grid.to_rows().len(), 52);
        assert!(grid.to_rows().iter().all(|r| r.len() == 80));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Normalized output never leaves [0, 1]
            #[test]
            fn prop_values_in_unit_interval(
                points in prop::collection::vec((0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..5.0), 5..40),
                seed in any::<u64>()
            ) {
                let events: Vec<HeatmapEvent> = points
                    .into_iter()
                    .map(|(x, y, w)| HeatmapEvent::weighted(x, y, w))
                    .collect();
                if let Some(grid) = generate_heatmap_seeded(&events, &HeatmapConfig::default(), seed) {
                    prop_assert!(grid.values.iter().all(|v| (0.0..=1.0).contains(v)));
                }
            }
        }
    }
}
