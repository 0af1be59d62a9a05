//! Four-wave-mixing phase-matching efficiency.

use crate::kernel::{ConfigError, ExecError, KernelBuild, ReadBuf1D, WriteBuf1D};
use crate::model::traits::FwmEfficiency1D;
use nalgebra::Complex;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Constructor config for [`FwmEfficiencyKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FwmEfficiencyConfig {
    /// Fiber loss coefficient in 1/km, linear units.
    pub alpha: f64,
    /// Span length in km.
    pub span_length: f64,
    /// Fiber dispersion coefficient in ps/THz/km.
    pub beta2: f64,
}

/// Trait-first four-wave-mixing efficiency kernel.
///
/// Evaluates `|(1 - exp(-2aL + j*4*pi^2*b2*L*x)) / (2a - j*4*pi^2*b2*x)|^2`
/// elementwise over offset products `x = (f1 - f) * (f2 - f)`. The point
/// `a = 0, x = 0` is a removable singularity; it returns the loss-free
/// phase-matched limit `L^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FwmEfficiencyKernel {
    alpha: f64,
    span_length: f64,
    beta2: f64,
}

impl FwmEfficiencyKernel {
    pub(super) fn sample(&self, x: f64) -> f64 {
        if self.alpha == 0.0 && x == 0.0 {
            return self.span_length * self.span_length;
        }
        let phase = 4.0 * core::f64::consts::PI * core::f64::consts::PI * self.beta2 * x;
        let num = Complex::new(1.0, 0.0)
            - Complex::new(
                -2.0 * self.alpha * self.span_length,
                phase * self.span_length,
            )
            .exp();
        let den = Complex::new(2.0 * self.alpha, -phase);
        (num / den).norm_sqr()
    }
}

impl KernelBuild for FwmEfficiencyKernel {
    type Config = FwmEfficiencyConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.alpha.is_finite() || config.alpha < 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "alpha",
                reason: "loss coefficient must be finite and non-negative",
            });
        }
        if !config.span_length.is_finite() || config.span_length <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "span_length",
                reason: "span length must be finite and positive",
            });
        }
        if !config.beta2.is_finite() {
            return Err(ConfigError::InvalidArgument {
                arg: "beta2",
                reason: "dispersion coefficient must be finite",
            });
        }
        Ok(Self {
            alpha: config.alpha,
            span_length: config.span_length,
            beta2: config.beta2,
        })
    }
}

impl FwmEfficiency1D for FwmEfficiencyKernel {
    fn run_into<I, O>(&self, offset_products: &I, rho: &mut O) -> Result<(), ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
        O: WriteBuf1D<f64> + ?Sized,
    {
        let x = offset_products.read_slice().map_err(ExecError::from)?;
        let out = rho.write_slice_mut().map_err(ExecError::from)?;
        if out.len() != x.len() {
            return Err(ExecError::LengthMismatch {
                arg: "rho",
                expected: x.len(),
                got: out.len(),
            });
        }
        out.iter_mut()
            .zip(x.iter())
            .for_each(|(out, x)| *out = self.sample(*x));
        Ok(())
    }

    fn run_alloc<I>(&self, offset_products: &I) -> Result<Vec<f64>, ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
    {
        let x = offset_products.read_slice().map_err(ExecError::from)?;
        Ok(x.iter().map(|x| self.sample(*x)).collect())
    }
}

/// Four-wave-mixing efficiency of a fiber span over an array of frequency
/// offset products.
///
/// One value per offset product; invalid fiber parameters yield an empty
/// vector. Use [`FwmEfficiencyKernel`] directly to observe the rejection
/// reason.
pub fn fwm_efficiency(
    alpha: f64,
    span_length: f64,
    beta2: f64,
    offset_products: &[f64],
) -> Vec<f64> {
    let kernel = match FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
        alpha,
        span_length,
        beta2,
    }) {
        Ok(kernel) => kernel,
        Err(_) => return Vec::new(),
    };
    kernel.run_alloc(offset_products).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const ALPHA: f64 = 0.023; // ~0.2 dB/km in 1/km
    const SPAN: f64 = 100.0;
    const BETA2: f64 = 21.27;

    fn kernel() -> FwmEfficiencyKernel {
        FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha: ALPHA,
            span_length: SPAN,
            beta2: BETA2,
        })
        .expect("valid config")
    }

    #[test]
    fn efficiency_is_nonnegative_and_bounded_by_span_squared() {
        let k = kernel();
        for x in [-1.0, -1e-3, -1e-9, 0.0, 1e-9, 1e-3, 1.0] {
            let rho = k.sample(x);
            assert!(rho >= 0.0);
            assert!(rho <= SPAN * SPAN);
        }
    }

    #[test]
    fn zero_offset_with_loss_matches_closed_form() {
        // rho(0) = (1 - exp(-2aL))^2 / (2a)^2 with nonzero loss.
        let k = kernel();
        let expected = {
            let t = 1.0 - (-2.0 * ALPHA * SPAN).exp();
            t * t / (4.0 * ALPHA * ALPHA)
        };
        assert_relative_eq!(k.sample(0.0), expected, max_relative = 1e-12);
        assert!(k.sample(0.0) < SPAN * SPAN);
    }

    #[test]
    fn lossless_phase_matched_point_takes_the_limit_value() {
        let k = FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha: 0.0,
            span_length: SPAN,
            beta2: BETA2,
        })
        .expect("valid config");
        assert_eq!(k.sample(0.0), SPAN * SPAN);

        // The limit is the continuous extension: tiny offsets agree.
        assert_relative_eq!(k.sample(1e-12), SPAN * SPAN, max_relative = 1e-4);
    }

    #[test]
    fn efficiency_decays_with_phase_mismatch() {
        let k = kernel();
        assert!(k.sample(1.0) < k.sample(1e-4));
        assert!(k.sample(1e-4) < k.sample(0.0));
    }

    #[test]
    fn config_rejects_degenerate_fibers() {
        assert!(FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha: -0.1,
            span_length: SPAN,
            beta2: BETA2,
        })
        .is_err());
        assert!(FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha: ALPHA,
            span_length: 0.0,
            beta2: BETA2,
        })
        .is_err());
        assert!(FwmEfficiencyKernel::try_new(FwmEfficiencyConfig {
            alpha: ALPHA,
            span_length: SPAN,
            beta2: f64::NAN,
        })
        .is_err());
    }

    #[test]
    fn run_into_checks_output_shape() {
        let k = kernel();
        let x = [0.0, 1e-6];
        let mut rho = vec![0.0; 3];
        let err = k
            .run_into(&x, &mut rho)
            .expect_err("mismatched output length should error");
        assert!(matches!(err, ExecError::LengthMismatch { .. }));
    }

    #[test]
    fn convenience_wrapper_degrades_to_empty_on_bad_config() {
        assert!(fwm_efficiency(f64::NAN, SPAN, BETA2, &[0.0]).is_empty());
        let rho = fwm_efficiency(ALPHA, SPAN, BETA2, &[0.0, 1e-5]);
        assert_eq!(rho.len(), 2);
        assert_abs_diff_eq!(rho[0], kernel().sample(0.0), epsilon = 1e-12);
    }
}
