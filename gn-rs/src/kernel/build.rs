use super::ConfigError;

/// Construction lifecycle shared by model kernels.
///
/// `try_new` is the single place a kernel validates its inputs; everything
/// downstream may assume the invariants it enforced.
pub trait KernelBuild: Sized {
    /// Kernel config type.
    type Config;

    /// Build a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KernelBuild};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ScaleConfig {
        factor: f64,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ScaleKernel {
        factor: f64,
    }

    impl KernelBuild for ScaleKernel {
        type Config = ScaleConfig;

        fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
            if !config.factor.is_finite() {
                return Err(ConfigError::InvalidArgument {
                    arg: "factor",
                    reason: "factor must be finite",
                });
            }
            Ok(Self {
                factor: config.factor,
            })
        }
    }

    #[test]
    fn build_accepts_valid_config() {
        let kernel = ScaleKernel::try_new(ScaleConfig { factor: 2.0 }).expect("valid config");
        assert_eq!(kernel.factor, 2.0);
    }

    #[test]
    fn build_rejects_invalid_config() {
        let err =
            ScaleKernel::try_new(ScaleConfig { factor: f64::NAN }).expect_err("invalid config");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "factor",
                reason: "factor must be finite",
            }
        );
    }
}
