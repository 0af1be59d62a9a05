//! Trait interfaces for the Gaussian-Noise model capabilities.
//!
//! These traits define the trait-first API shape shared by the model kernels:
//! `run_into` writes into a caller-provided buffer after shape checks,
//! `run_alloc` allocates the output.

use crate::kernel::{ExecError, ReadBuf1D, WriteBuf1D};
use crate::model::grid::DenseBand;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// WDM comb power-spectral-density evaluation capability.
pub trait CombPsd1D {
    /// Evaluate the comb PSD at `freqs` into a caller-provided buffer.
    fn run_into<I, O>(&self, freqs: &I, psd: &mut O) -> Result<(), ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
        O: WriteBuf1D<f64> + ?Sized;

    /// Evaluate the comb PSD at `freqs` and allocate the output.
    fn run_alloc<I>(&self, freqs: &I) -> Result<Vec<f64>, ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized;
}

/// Four-wave-mixing efficiency evaluation capability.
pub trait FwmEfficiency1D {
    /// Evaluate the efficiency over `offset_products` into a caller-provided
    /// buffer.
    fn run_into<I, O>(&self, offset_products: &I, rho: &mut O) -> Result<(), ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized,
        O: WriteBuf1D<f64> + ?Sized;

    /// Evaluate the efficiency over `offset_products` and allocate the output.
    fn run_alloc<I>(&self, offset_products: &I) -> Result<Vec<f64>, ExecError>
    where
        I: ReadBuf1D<f64> + ?Sized;
}

/// Adaptive integration-grid generation capability.
///
/// Output length depends on the geometric expansion and is not known ahead of
/// the call, so only the allocating form exists.
pub trait AdaptiveGrid1D {
    /// Build the non-uniform frequency grid around `dense` for an evaluation
    /// frequency `f`.
    fn run_alloc(&self, f: f64, dense: DenseBand) -> Result<Vec<f64>, ExecError>;
}

/// Nonlinear-interference PSD computation capability.
///
/// The evaluation frequencies are part of the kernel config; the output holds
/// one value per evaluation frequency, in config order.
pub trait NliPsd1D {
    /// Run the double integral into a caller-provided buffer.
    fn run_into<O>(&self, nli: &mut O) -> Result<(), ExecError>
    where
        O: WriteBuf1D<f64> + ?Sized;

    /// Run the double integral and allocate the output.
    fn run_alloc(&self) -> Result<Vec<f64>, ExecError>;
}
