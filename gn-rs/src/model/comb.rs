//! Raised-cosine WDM comb spectrum.

use crate::kernel::{ConfigError, ExecError, KernelBuild, ReadBuf1D, WriteBuf1D};
use crate::model::traits::CombPsd1D;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Constructor config for [`CombPsdKernel`]: one entry per channel, all four
/// arrays index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct CombPsdConfig {
    /// Channel center frequencies in THz, monotonically increasing.
    pub center_freq: Vec<f64>,
    /// Channel symbol rates in TBaud.
    pub symbol_rate: Vec<f64>,
    /// Channel roll-off factors in `[0, 1)`.
    pub roll_off: Vec<f64>,
    /// Channel launch powers in W.
    pub power: Vec<f64>,
}

/// One validated channel with its precomputed band edges.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Channel {
    center: f64,
    /// Symbol period `1/rs` in ps.
    ts: f64,
    roll_off: f64,
    /// Half-width of the flat region, `(1 - roll_off) * rs / 2`.
    passband: f64,
    /// Half-width of the occupied band, `(1 + roll_off) * rs / 2`.
    stopband: f64,
    /// Flat-top PSD `power / rs` in W/THz.
    amplitude: f64,
}

/// Trait-first raised-cosine comb PSD kernel.
///
/// The comb PSD is the superposition of all channel spectra: flat at
/// `power/rs` inside each passband, raised-cosine tapered across the
/// transition band, zero beyond the stopband. The evaluation is pure and
/// defined for every finite query frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct CombPsdKernel {
    channels: Vec<Channel>,
}

impl CombPsdKernel {
    /// Number of channels in the comb.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub(super) fn sample(&self, f: f64) -> f64 {
        let mut psd = 0.0;
        for ch in &self.channels {
            let ff = (f - ch.center).abs();
            let tf = ff - ch.passband;
            if tf <= 0.0 {
                psd += ch.amplitude;
            } else if ch.roll_off > 0.0 && ff <= ch.stopband {
                let taper = core::f64::consts::PI * ch.ts / ch.roll_off * tf;
                psd += ch.amplitude * 0.5 * (1.0 + taper.cos());
            }
        }
        psd
    }
}

impl KernelBuild for CombPsdKernel {
    type Config = CombPsdConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let n = config.center_freq.len();
        if n == 0 {
            return Err(ConfigError::EmptyInput { arg: "center_freq" });
        }
        if config.symbol_rate.len() != n {
            return Err(ConfigError::LengthMismatch {
                arg: "symbol_rate",
                expected: n,
                got: config.symbol_rate.len(),
            });
        }
        if config.roll_off.len() != n {
            return Err(ConfigError::LengthMismatch {
                arg: "roll_off",
                expected: n,
                got: config.roll_off.len(),
            });
        }
        if config.power.len() != n {
            return Err(ConfigError::LengthMismatch {
                arg: "power",
                expected: n,
                got: config.power.len(),
            });
        }

        let mut channels = Vec::with_capacity(n);
        for i in 0..n {
            let rs = config.symbol_rate[i];
            let roll_off = config.roll_off[i];
            if !rs.is_finite() || rs <= 0.0 {
                return Err(ConfigError::InvalidArgument {
                    arg: "symbol_rate",
                    reason: "symbol rates must be positive",
                });
            }
            if !(0.0..1.0).contains(&roll_off) {
                return Err(ConfigError::InvalidArgument {
                    arg: "roll_off",
                    reason: "roll-off factors must lie in [0, 1)",
                });
            }
            channels.push(Channel {
                center: config.center_freq[i],
                ts: 1.0 / rs,
                roll_off,
                passband: (1.0 - roll_off) * rs / 2.0,
                stopband: (1.0 + roll_off) * rs / 2.0,
                amplitude: config.power[i] / rs,
            });
        }
        Ok(Self { channels })
    }
}

impl CombPsd1D for CombPsdKernel {
    fn run_into<I, O>(&self, freqs: &I, psd: &mut O) -> Result<(), ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
        O: WriteBuf1D<f64> + ?Sized,
    {
        let freqs = freqs.read_slice().map_err(ExecError::from)?;
        let out = psd.write_slice_mut().map_err(ExecError::from)?;
        if out.len() != freqs.len() {
            return Err(ExecError::LengthMismatch {
                arg: "psd",
                expected: freqs.len(),
                got: out.len(),
            });
        }
        out.iter_mut()
            .zip(freqs.iter())
            .for_each(|(out, f)| *out = self.sample(*f));
        Ok(())
    }

    fn run_alloc<I>(&self, freqs: &I) -> Result<Vec<f64>, ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
    {
        let freqs = freqs.read_slice().map_err(ExecError::from)?;
        Ok(freqs.iter().map(|f| self.sample(*f)).collect())
    }
}

/// PSD in W/THz of a raised-cosine WDM comb evaluated at `freqs`.
///
/// One value per query frequency; an invalid channel description yields an
/// empty vector. Use [`CombPsdKernel`] directly to observe the rejection
/// reason.
pub fn raised_cosine_comb(
    freqs: &[f64],
    symbol_rate: &[f64],
    roll_off: &[f64],
    center_freq: &[f64],
    power: &[f64],
) -> Vec<f64> {
    let kernel = match CombPsdKernel::try_new(CombPsdConfig {
        center_freq: center_freq.to_vec(),
        symbol_rate: symbol_rate.to_vec(),
        roll_off: roll_off.to_vec(),
        power: power.to_vec(),
    }) {
        Ok(kernel) => kernel,
        Err(_) => return Vec::new(),
    };
    kernel.run_alloc(freqs).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_channel(roll_off: f64) -> CombPsdKernel {
        CombPsdKernel::try_new(CombPsdConfig {
            center_freq: vec![193.4],
            symbol_rate: vec![0.032],
            roll_off: vec![roll_off],
            power: vec![0.001],
        })
        .expect("valid config")
    }

    #[test]
    fn rectangular_channel_is_flat_inside_and_zero_outside() {
        let kernel = single_channel(0.0);
        let flat = 0.001 / 0.032;
        let half_width = 0.032 / 2.0;

        assert_abs_diff_eq!(kernel.sample(193.4), flat, epsilon = 1e-15);
        assert_abs_diff_eq!(kernel.sample(193.4 + half_width), flat, epsilon = 1e-15);
        assert_eq!(kernel.sample(193.4 + half_width + 1e-9), 0.0);
        assert_eq!(kernel.sample(190.0), 0.0);
    }

    #[test]
    fn raised_cosine_channel_is_continuous_at_band_edges() {
        let kernel = single_channel(0.05);
        let passband = (1.0 - 0.05) * 0.032 / 2.0;
        let stopband = (1.0 + 0.05) * 0.032 / 2.0;
        let flat = 0.001 / 0.032;

        // Just inside / just outside the passband edge.
        let below = kernel.sample(193.4 + passband - 1e-9);
        let above = kernel.sample(193.4 + passband + 1e-9);
        assert_abs_diff_eq!(below, flat, epsilon = 1e-10);
        assert_abs_diff_eq!(above, flat, epsilon = 1e-4);

        // The taper reaches zero exactly at the stopband edge.
        let edge = kernel.sample(193.4 + stopband);
        assert_abs_diff_eq!(edge, 0.0, epsilon = 1e-12);
        assert_eq!(kernel.sample(193.4 + stopband + 1e-9), 0.0);

        // Half power at the mid-transition point.
        let mid = kernel.sample(193.4 + 0.032 / 2.0);
        assert_abs_diff_eq!(mid, flat / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn spectrum_is_symmetric_about_the_channel_center() {
        let kernel = single_channel(0.05);
        for df in [0.0, 0.005, 0.0152, 0.0158, 0.0168] {
            assert_abs_diff_eq!(
                kernel.sample(193.4 + df),
                kernel.sample(193.4 - df),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn channels_superpose() {
        let kernel = CombPsdKernel::try_new(CombPsdConfig {
            center_freq: vec![-0.05, 0.0, 0.05],
            symbol_rate: vec![0.032; 3],
            roll_off: vec![0.0; 3],
            power: vec![0.001; 3],
        })
        .expect("valid config");

        // Disjoint rectangular channels never overlap.
        assert_abs_diff_eq!(kernel.sample(0.0), 0.001 / 0.032, epsilon = 1e-15);
        assert_eq!(kernel.sample(0.025), 0.0);
    }

    #[test]
    fn run_into_checks_output_shape() {
        let kernel = single_channel(0.0);
        let freqs = [193.39, 193.40, 193.41];
        let mut psd = vec![0.0; 2];
        let err = kernel
            .run_into(&freqs, &mut psd)
            .expect_err("mismatched output length should error");
        assert!(matches!(err, ExecError::LengthMismatch { .. }));
    }

    #[test]
    fn config_rejects_length_mismatch_and_bad_factors() {
        let err = CombPsdKernel::try_new(CombPsdConfig {
            center_freq: vec![0.0, 0.05],
            symbol_rate: vec![0.032],
            roll_off: vec![0.0, 0.0],
            power: vec![0.001, 0.001],
        })
        .expect_err("length mismatch");
        assert!(matches!(err, ConfigError::LengthMismatch { .. }));

        let err = CombPsdKernel::try_new(CombPsdConfig {
            center_freq: vec![0.0],
            symbol_rate: vec![0.032],
            roll_off: vec![1.0],
            power: vec![0.001],
        })
        .expect_err("roll-off out of range");
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));

        let err = CombPsdKernel::try_new(CombPsdConfig {
            center_freq: vec![],
            symbol_rate: vec![],
            roll_off: vec![],
            power: vec![],
        })
        .expect_err("empty channel set");
        assert!(matches!(err, ConfigError::EmptyInput { .. }));
    }

    #[test]
    fn convenience_wrapper_matches_kernel() {
        let freqs = [193.38, 193.4, 193.42];
        let psd = raised_cosine_comb(&freqs, &[0.032], &[0.05], &[193.4], &[0.001]);
        let kernel = single_channel(0.05);
        let expected = kernel.run_alloc(&freqs[..]).expect("kernel run");
        assert_eq!(psd, expected);

        // Invalid channel arrays degrade to empty output.
        assert!(raised_cosine_comb(&freqs, &[0.032, 0.032], &[0.05], &[193.4], &[0.001]).is_empty());
    }
}
