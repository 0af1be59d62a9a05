//! Adaptive non-uniform integration grids.
//!
//! The double integral spends its points where the four-wave-mixing
//! efficiency is large: a uniform dense band around the phase-matched region,
//! flanked by two geometrically expanding regions that coarsen towards the
//! integration limit. Expansion is anchored to the side of the dense band
//! farther from zero so coverage out to the limit is guaranteed on the wider
//! side.

use crate::kernel::{ConfigError, ExecError, KernelBuild};
use crate::model::traits::AdaptiveGrid1D;
use gn_rs_core::num_rs::arange;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Bounds and step of the densely sampled sub-band of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseBand {
    /// Lower edge in THz.
    pub low: f64,
    /// Upper edge in THz.
    pub up: f64,
    /// Uniform step in THz.
    pub step: f64,
}

impl DenseBand {
    /// Build a dense band from a raw window, applying the edge policy.
    ///
    /// Exact-zero edges are nudged one minimum step away from zero so the
    /// geometric expansion never starts from a zero-width base, then the
    /// window is clamped to `[-fmax, fmax]`. The step is derived from a
    /// ceiling-rounded point count, so it never exceeds `min_step`. A window
    /// that collapses to zero width keeps its edges but carries a
    /// non-finite step; such a band contributes no dense samples.
    pub fn from_window(low: f64, up: f64, fmax: f64, min_step: f64) -> Self {
        let low = if low == 0.0 { -min_step } else { low };
        let up = if up == 0.0 { min_step } else { up };
        let low = if low < -fmax { -fmax } else { low };
        let up = if up > fmax { fmax } else { up };
        let width = (up - low).abs();
        let count = (width / min_step).ceil();
        Self {
            low,
            up,
            step: width / count,
        }
    }
}

/// Constructor config for [`AdaptiveGridKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveGridConfig {
    /// Overall optical bandwidth in THz.
    pub bandwidth: f64,
    /// Upper limit of the integration domain in THz.
    pub fmax: f64,
    /// Step-size ceiling for the log-spaced regions in THz.
    pub max_step: f64,
}

/// Trait-first adaptive frequency-grid kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveGridKernel {
    bandwidth: f64,
    fmax: f64,
    max_step: f64,
}

impl KernelBuild for AdaptiveGridKernel {
    type Config = AdaptiveGridConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.bandwidth.is_finite() || config.bandwidth <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "bandwidth",
                reason: "optical bandwidth must be finite and positive",
            });
        }
        if !config.fmax.is_finite() || config.fmax <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fmax",
                reason: "integration limit must be finite and positive",
            });
        }
        if !config.max_step.is_finite()
            || config.max_step <= 0.0
            || config.max_step >= config.bandwidth / 2.0
        {
            return Err(ConfigError::InvalidArgument {
                arg: "max_step",
                reason: "step ceiling must be positive and below half the bandwidth",
            });
        }
        Ok(Self {
            bandwidth: config.bandwidth,
            fmax: config.fmax,
            max_step: config.max_step,
        })
    }
}

/// Point count of one geometric expansion covering `ratio` with step ratio
/// `k`, ceiling-rounded. Exhausted or undefined expansions count zero.
fn log_count(ratio: f64, k: f64) -> i64 {
    let n = (ratio.ln() / k.ln() + 1.0).ceil();
    if n.is_finite() && n > 0.0 {
        n as i64
    } else {
        0
    }
}

impl AdaptiveGrid1D for AdaptiveGridKernel {
    /// Build the grid for evaluation frequency `f` around `dense`.
    ///
    /// The first dense point is dropped at the seam with the preceding log
    /// region; seams are not deduplicated otherwise. The branch on the sign
    /// of `f` selects which side of the dense band anchors the plain
    /// geometric expansion and which carries the shifted one.
    fn run_alloc(&self, f: f64, dense: DenseBand) -> Result<Vec<f64>, ExecError> {
        let half = self.bandwidth / 2.0;
        let k = half / (half - self.max_step);
        let dense_pts = arange(dense.low, dense.up, dense.step);
        let mut grid = Vec::with_capacity(dense_pts.len() + 16);

        if f < 0.0 {
            let n_short = log_count(self.fmax / dense.low.abs(), k);
            let lift = dense.up.abs() - dense.up;
            let k_long =
                (half + (dense.up.abs() - dense.low)) / (half - self.max_step + lift);
            let n_long = log_count((self.fmax + lift) / dense.up.abs(), k_long);

            for j in (1..=n_short).rev() {
                grid.push(-(dense.low.abs() * k.powi(j as i32 - 1)));
            }
            grid.extend(dense_pts.iter().skip(1).copied());
            for j in 1..=n_long {
                grid.push(dense.up.abs() * k_long.powi(j as i32 - 1) - lift);
            }
        } else {
            let n_short = log_count(self.fmax / dense.up.abs(), k);
            let lift = dense.low.abs() + dense.low;
            let k_long = (half + lift) / (half - self.max_step + lift);
            let n_long = log_count((self.fmax + lift) / dense.low.abs(), k_long);

            for j in (1..=n_long).rev() {
                grid.push(-(dense.low.abs() * k_long.powi(j as i32 - 1)) + lift);
            }
            grid.extend(dense_pts.iter().skip(1).copied());
            for j in 1..=n_short {
                grid.push(dense.up * k.powi(j as i32 - 1));
            }
        }
        Ok(grid)
    }
}

/// Non-uniform frequency grid for fast GN-model integration: a dense band
/// sided by two log-spaced regions extending to the integration limit.
///
/// Mirrors the kernel with the dense band passed as raw bounds and step;
/// invalid grid parameters yield an empty vector. Use [`AdaptiveGridKernel`]
/// directly to observe the rejection reason.
pub fn adaptive_freq_grid(
    f: f64,
    bandwidth: f64,
    fmax: f64,
    max_step: f64,
    dense_low: f64,
    dense_up: f64,
    dense_step: f64,
) -> Vec<f64> {
    let kernel = match AdaptiveGridKernel::try_new(AdaptiveGridConfig {
        bandwidth,
        fmax,
        max_step,
    }) {
        Ok(kernel) => kernel,
        Err(_) => return Vec::new(),
    };
    kernel
        .run_alloc(
            f,
            DenseBand {
                low: dense_low,
                up: dense_up,
                step: dense_step,
            },
        )
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    const BANDWIDTH: f64 = 4.75;
    const FMAX: f64 = 4.718;
    const MAX_STEP: f64 = 0.0125;
    const MIN_STEP: f64 = 0.0005;

    fn kernel() -> AdaptiveGridKernel {
        AdaptiveGridKernel::try_new(AdaptiveGridConfig {
            bandwidth: BANDWIDTH,
            fmax: FMAX,
            max_step: MAX_STEP,
        })
        .expect("valid config")
    }

    fn grid_for(f: f64) -> Vec<f64> {
        let dense = DenseBand::from_window(f - 0.035, f + 0.035, FMAX, MIN_STEP);
        kernel().run_alloc(f, dense).expect("grid")
    }

    #[test]
    fn grid_is_strictly_increasing_for_both_branches() {
        for f in [-0.025, 0.0, 0.025, 1.3] {
            let grid = grid_for(f);
            assert!(grid.len() > 100, "grid unexpectedly small for f={f}");
            assert!(
                grid.iter().tuple_windows().all(|(a, b)| a < b),
                "grid not strictly increasing for f={f}"
            );
        }
    }

    #[test]
    fn grid_covers_the_integration_domain_within_rounding() {
        // Ceiling-rounded point counts overshoot fmax by at most one
        // geometric step of the expansion that reaches it.
        for f in [-0.025, 0.025] {
            let grid = grid_for(f);
            let first = grid[0];
            let last = *grid.last().expect("non-empty");
            assert!(first <= -FMAX && first >= -FMAX * 1.05);
            assert!(last >= FMAX && last <= FMAX * 1.05);
        }
    }

    #[test]
    fn grid_contains_at_least_the_dense_segment() {
        let dense = DenseBand::from_window(-0.035, 0.035, FMAX, MIN_STEP);
        let dense_len = ((dense.up - dense.low) / dense.step).ceil() as usize;
        let grid = kernel().run_alloc(0.0, dense).expect("grid");
        assert!(grid.len() >= dense_len);
    }

    #[test]
    fn dense_steps_never_exceed_the_requested_step() {
        let dense = DenseBand::from_window(-0.0351, 0.0349, FMAX, MIN_STEP);
        assert!(dense.step <= MIN_STEP);
        let expected = (dense.up - dense.low) / ((dense.up - dense.low) / MIN_STEP).ceil();
        assert_abs_diff_eq!(dense.step, expected, epsilon = 1e-15);
    }

    #[test]
    fn zero_edges_are_nudged_one_minimum_step_away() {
        let band = DenseBand::from_window(0.0, 0.07, FMAX, MIN_STEP);
        assert_eq!(band.low, -MIN_STEP);

        let band = DenseBand::from_window(-0.07, 0.0, FMAX, MIN_STEP);
        assert_eq!(band.up, MIN_STEP);
    }

    #[test]
    fn windows_are_clamped_to_the_integration_limit() {
        let band = DenseBand::from_window(-10.0, 10.0, FMAX, MIN_STEP);
        assert_eq!(band.low, -FMAX);
        assert_eq!(band.up, FMAX);
    }

    #[test]
    fn collapsed_windows_yield_no_dense_samples_but_keep_log_regions() {
        let band = DenseBand::from_window(0.5, 0.5, FMAX, MIN_STEP);
        assert!(!band.step.is_finite());
        let grid = kernel().run_alloc(0.5, band).expect("grid");
        assert!(!grid.is_empty());
        assert!(grid.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn config_rejects_step_ceiling_at_or_above_half_bandwidth() {
        assert!(AdaptiveGridKernel::try_new(AdaptiveGridConfig {
            bandwidth: 1.0,
            fmax: 1.0,
            max_step: 0.5,
        })
        .is_err());
        assert!(AdaptiveGridKernel::try_new(AdaptiveGridConfig {
            bandwidth: 1.0,
            fmax: 1.0,
            max_step: 0.0,
        })
        .is_err());
    }

    #[test]
    fn convenience_wrapper_matches_kernel() {
        let dense = DenseBand::from_window(-0.035, 0.035, FMAX, MIN_STEP);
        let via_fn = adaptive_freq_grid(
            0.0, BANDWIDTH, FMAX, MAX_STEP, dense.low, dense.up, dense.step,
        );
        let via_kernel = kernel().run_alloc(0.0, dense).expect("grid");
        assert_eq!(via_fn, via_kernel);

        assert!(adaptive_freq_grid(0.0, -1.0, FMAX, MAX_STEP, -0.1, 0.1, 0.01).is_empty());
    }
}
