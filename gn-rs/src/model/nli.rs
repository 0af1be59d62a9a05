//! The incoherent GN-model double integral.
//!
//! For each evaluation frequency the engine builds an adaptive outer grid,
//! and per outer sample an adaptive inner grid restricted to the upper
//! triangle of the symmetric mixing domain (a factor of two restores the
//! lower half). The integrand is the triple product of the comb spectrum
//! weighted by the four-wave-mixing efficiency; both dimensions integrate
//! with the trapezoidal rule. Span loss is assumed compensated and is not
//! re-applied inside the integral.

use crate::kernel::{ConfigError, ExecError, KernelBuild, WriteBuf1D};
use crate::model::traits::{AdaptiveGrid1D, NliPsd1D};
use crate::model::{
    AdaptiveGridConfig, AdaptiveGridKernel, CombPsdConfig, CombPsdKernel, DenseBand,
    FwmEfficiencyConfig, FwmEfficiencyKernel,
};
use gn_rs_core::num_rs::trapz;
use itertools::Itertools;
use ndarray::ArrayView1;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Accuracy and evaluation parameters of the GN integral.
#[derive(Debug, Clone, PartialEq)]
pub struct NliModelParams {
    /// FWM-efficiency threshold in dB; offsets whose efficiency falls below
    /// it are left to the coarse log-spaced sampling.
    pub min_fwm_db: f64,
    /// Maximum number of integration points per frequency slot (sets the
    /// minimum step, i.e. the accuracy ceiling).
    pub n_grid: usize,
    /// Minimum number of integration points per frequency slot (sets the
    /// maximum step, i.e. the cost floor).
    pub n_grid_min: usize,
    /// Frequencies in THz at which the NLI PSD is requested.
    pub eval_freq: Vec<f64>,
}

/// Constructor config for [`NliPsdKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct NliPsdConfig {
    /// Fiber dispersion coefficient in ps/THz/km.
    pub beta2: f64,
    /// Span length in km.
    pub span_length: f64,
    /// Fiber loss coefficient in dB/km.
    pub loss_db: f64,
    /// Fiber nonlinear coefficient in 1/W/km.
    pub gamma: f64,
    /// Transmitted channel comb.
    pub channels: CombPsdConfig,
    /// Declared channel count; must match the channel arrays.
    pub n_channels: usize,
    /// Accuracy and evaluation parameters.
    pub model: NliModelParams,
}

/// Trait-first nonlinear-interference PSD kernel.
///
/// Construction validates the channel set and accuracy parameters and
/// derives every quantity the integral reuses: the linear loss coefficient,
/// the integration limit, the grid steps, and the half-width of the
/// phase-matched dense region. The computation itself is a pure function of
/// the kernel; identical kernels produce bit-identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct NliPsdKernel {
    comb: CombPsdKernel,
    fwm: FwmEfficiencyKernel,
    grid: AdaptiveGridKernel,
    eval_freq: Vec<f64>,
    gamma: f64,
    /// Upper limit of the integration domain in THz.
    fmax: f64,
    /// Dense-region integration step in THz.
    min_step: f64,
    /// Half-width of the dense region around an evaluation frequency.
    f_dense_start: f64,
    /// `sqrt(alpha^2 / (4 pi^4 beta2^2) * (min_fwm_inv - 1))`, the numerator
    /// of the phase-matching half-width at a given pump offset.
    phase_match: f64,
}

impl NliPsdKernel {
    /// Frequencies at which the NLI PSD is evaluated, in config order.
    pub fn eval_freq(&self) -> &[f64] {
        &self.eval_freq
    }

    /// One full double integral at evaluation frequency `f`.
    fn evaluate_at(&self, f: f64) -> f64 {
        let dense = DenseBand::from_window(
            f - self.f_dense_start,
            f + self.f_dense_start,
            self.fmax,
            self.min_step,
        );
        let f1_grid = match self.grid.run_alloc(f, dense) {
            Ok(grid) => grid,
            Err(_) => return f64::NAN,
        };
        let g1: Vec<f64> = f1_grid.iter().map(|&f1| self.comb.sample(f1)).collect();
        let mut partial = vec![0.0; f1_grid.len()];

        for (i, &f1) in f1_grid.iter().enumerate() {
            let (low, up) = if f1 == f {
                // Degenerate phase matching: no offset restricts the window.
                (-self.fmax, self.fmax)
            } else {
                let f_lim = self.phase_match / (f1 - f) + f;
                (f_lim.min(-f_lim), f_lim.max(-f_lim))
            };
            let inner_dense = DenseBand::from_window(low, up, self.fmax, self.min_step);
            let f2_grid = match self.grid.run_alloc(f, inner_dense) {
                Ok(grid) => grid,
                Err(_) => {
                    partial[i] = f64::NAN;
                    continue;
                }
            };

            // Upper triangle of the symmetric (f1, f2) domain only; the
            // factor of two below accounts for the mirrored half.
            let f2: Vec<f64> = f2_grid.into_iter().filter(|&f2| f2 >= f1).collect();
            if f2.is_empty() {
                continue;
            }

            let mut any_nonzero = false;
            let g: Vec<f64> = f2
                .iter()
                .map(|&f2| {
                    let product = self.comb.sample(f2) * self.comb.sample(f1 + f2 - f) * g1[i];
                    any_nonzero |= product != 0.0;
                    product
                })
                .collect();
            if !any_nonzero {
                continue;
            }

            let weighted: Vec<f64> = f2
                .iter()
                .zip(g.iter())
                .map(|(&f2, &g)| self.fwm.sample((f1 - f) * (f2 - f)) * g)
                .collect();
            partial[i] = trapz(ArrayView1::from(&weighted[..]), ArrayView1::from(&f2[..]))
                .map(|inner| 2.0 * inner)
                .unwrap_or(f64::NAN);
        }

        let outer = trapz(
            ArrayView1::from(&partial[..]),
            ArrayView1::from(&f1_grid[..]),
        )
        .unwrap_or(f64::NAN);
        16.0 / 27.0 * self.gamma * self.gamma * outer
    }
}

impl KernelBuild for NliPsdKernel {
    type Config = NliPsdConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let n = config.channels.center_freq.len();
        if config.n_channels != n {
            return Err(ConfigError::LengthMismatch {
                arg: "n_channels",
                expected: n,
                got: config.n_channels,
            });
        }
        if config.model.n_grid_min == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "n_grid_min",
                reason: "at least one integration point per slot is required",
            });
        }
        if config.model.n_grid_min > config.model.n_grid {
            return Err(ConfigError::InvalidArgument {
                arg: "n_grid_min",
                reason: "minimum point count must not exceed n_grid",
            });
        }
        if config.model.eval_freq.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "eval_freq" });
        }

        // Validates channel-array lengths and per-channel factors.
        let comb = CombPsdKernel::try_new(config.channels.clone())?;
        let ch = &config.channels;
        if n < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "center_freq",
                reason: "at least two channels are required",
            });
        }

        let alpha = config.loss_db / 20.0 / core::f64::consts::LOG10_E;
        let min_fwm_inv = 10f64.powf(config.model.min_fwm_db / 10.0);
        let fmax = (ch.center_freq[n - 1] - ch.symbol_rate[n - 1] / 2.0)
            - (ch.center_freq[0] - ch.symbol_rate[0] / 2.0);
        let f2eval = ch
            .center_freq
            .iter()
            .tuple_windows()
            .map(|(a, b)| b - a)
            .fold(f64::NEG_INFINITY, f64::max);
        let bandwidth = f2eval * n as f64;
        let min_step = f2eval / config.model.n_grid as f64;
        let max_step = f2eval / config.model.n_grid_min as f64;

        let pi = core::f64::consts::PI;
        let phase_match = (alpha * alpha / (4.0 * pi.powi(4) * config.beta2 * config.beta2)
            * (min_fwm_inv - 1.0))
            .sqrt();
        let f_dense_start = (phase_match / f2eval).abs();

        let fwm = FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha,
            span_length: config.span_length,
            beta2: config.beta2,
        })?;
        let grid = AdaptiveGridKernel::try_new(AdaptiveGridConfig {
            bandwidth,
            fmax,
            max_step,
        })?;

        Ok(Self {
            comb,
            fwm,
            grid,
            eval_freq: config.model.eval_freq,
            gamma: config.gamma,
            fmax,
            min_step,
            f_dense_start,
            phase_match,
        })
    }
}

impl NliPsd1D for NliPsdKernel {
    fn run_into<O>(&self, nli: &mut O) -> Result<(), ExecError>
    where
        O: WriteBuf1D<f64> + ?Sized,
    {
        let out = nli.write_slice_mut().map_err(ExecError::from)?;
        if out.len() != self.eval_freq.len() {
            return Err(ExecError::LengthMismatch {
                arg: "nli",
                expected: self.eval_freq.len(),
                got: out.len(),
            });
        }

        #[cfg(feature = "parallel")]
        out.par_iter_mut()
            .zip(self.eval_freq.par_iter())
            .for_each(|(out, &f)| *out = self.evaluate_at(f));

        #[cfg(not(feature = "parallel"))]
        out.iter_mut()
            .zip(self.eval_freq.iter())
            .for_each(|(out, &f)| *out = self.evaluate_at(f));

        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<f64>, ExecError> {
        #[cfg(feature = "parallel")]
        {
            Ok(self
                .eval_freq
                .par_iter()
                .map(|&f| self.evaluate_at(f))
                .collect())
        }

        #[cfg(not(feature = "parallel"))]
        {
            Ok(self
                .eval_freq
                .iter()
                .map(|&f| self.evaluate_at(f))
                .collect())
        }
    }
}

/// NLI power spectral density in W/THz of a WDM comb after one fiber span,
/// one value per requested evaluation frequency.
///
/// `n_channels` must match the channel-array lengths. Invalid inputs yield an
/// empty vector; use [`NliPsdKernel`] directly to observe the rejection
/// reason.
#[allow(clippy::too_many_arguments)]
pub fn gn_nli_psd(
    beta2: f64,
    span_length: f64,
    loss_db: f64,
    gamma: f64,
    center_freq: &[f64],
    symbol_rate: &[f64],
    roll_off: &[f64],
    power: &[f64],
    n_channels: usize,
    model: &NliModelParams,
) -> Vec<f64> {
    let kernel = match NliPsdKernel::try_new(NliPsdConfig {
        beta2,
        span_length,
        loss_db,
        gamma,
        channels: CombPsdConfig {
            center_freq: center_freq.to_vec(),
            symbol_rate: symbol_rate.to_vec(),
            roll_off: roll_off.to_vec(),
            power: power.to_vec(),
        },
        n_channels,
        model: model.clone(),
    }) {
        Ok(kernel) => kernel,
        Err(_) => return Vec::new(),
    };
    kernel.run_alloc().unwrap_or_default()
}
