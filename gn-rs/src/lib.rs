//! Incoherent Gaussian-Noise (GN) model of fiber nonlinear interference.
//!
//! The crate computes the power spectral density of the nonlinear
//! interference (NLI) accumulated by a wavelength-division-multiplexed comb
//! of raised-cosine channels over a single fiber span. Nonlinear noise is
//! treated as four-wave-mixing contributions integrated over the signal
//! spectrum on adaptive (dense plus log-spaced) frequency grids.
//!
//! Three pure entry points are exposed, one per model primitive:
//! [`model::raised_cosine_comb`] evaluates the transmitted comb spectrum,
//! [`model::fwm_efficiency`] evaluates the phase-matching efficiency, and
//! [`model::gn_nli_psd`] runs the nested double integral. Each is backed by a
//! validated, reusable kernel (`try_new` rejects malformed channel sets and
//! accuracy parameters before any computation starts).
//!
//! With the `parallel` feature the engine distributes independent evaluation
//! frequencies across a rayon thread pool; results are bit-identical to the
//! sequential path.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod kernel;

#[cfg(feature = "std")]
pub mod model;
