//! Numpy-parity numeric primitives for the `gn-rs` Gaussian-Noise model.
//!
//! The integration engine in `gn-rs` is written against a handful of array
//! primitives with numpy semantics (`arange`, `diff`, `trapz`). They live in
//! their own crate so they stay `no_std`-buildable and reusable outside the
//! model itself.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod num_rs;

use alloc::string::String;
use core::{error, fmt};

/// Errors raised whilst running gn-rs-core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a function was invalid.
    InvalidArg {
        /// The invalid arg.
        arg: String,
        /// Explaining why arg is invalid.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
        }
    }
}

impl error::Error for Error {}

/// Result alias with the crate error type.
pub type Result<T> = core::result::Result<T, Error>;
