use core::fmt;

/// Validation errors raised while building a kernel from its config.
///
/// Everything here is rejected before any numeric work starts; a kernel that
/// constructs successfully never raises these at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration array is empty.
    EmptyInput {
        /// Name of the empty argument.
        arg: &'static str,
    },
    /// A configuration value is out of its documented domain.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Why the value is rejected.
        reason: &'static str,
    },
    /// Two parallel configuration arrays disagree in length.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// A contiguous 1D view could not be obtained from a buffer.
    NonContiguous {
        /// Name of the non-contiguous argument.
        arg: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime violations raised by checked kernel entry points.
///
/// Numerical edge cases (degenerate windows, the phase-matched singular
/// point) are resolved inside the kernels and never surface here; this enum
/// covers only shape and state contract breaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// An execution precondition was violated.
    InvalidState {
        /// Why execution could not proceed.
        reason: &'static str,
    },
    /// An output buffer did not match the expected runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Buffer adapter binding failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecError::Config(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecError {}
