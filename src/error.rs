//! Error types returned by the samplers.
//!
//! All checks run once, when a sampler is entered. Once sampling has started
//! nothing can fail: a proposal that cannot be scored (zero or NaN acceptance
//! probability, parameters outside a simulator's support) is simply rejected.

use thiserror::Error;

/// Problems with the observed data handed to a sampler.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObservationError {
    #[error("observation has no data points")]
    Empty,
    #[error("observation lengths differ: x={x}, y={y}, yerr={yerr}")]
    LengthMismatch { x: usize, y: usize, yerr: usize },
    #[error("uncertainty at index {index} must be strictly positive, got {value}")]
    NonPositiveUncertainty { index: usize, value: f64 },
    #[error("observation contains a non-finite value at index {index}")]
    NonFinite { index: usize },
    #[error("observed dataset for likelihood-free sampling is empty")]
    EmptyDataset,
}

/// Problems with the sampler configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("number of steps must be positive")]
    ZeroSteps,
    #[error("proposal scale must be finite and non-negative, got {0}")]
    InvalidScale(f64),
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("number of simulated draws must be positive")]
    ZeroDraws,
    #[error("ensemble needs at least one walker")]
    NoWalkers,
    #[error("parameter vector is empty")]
    EmptyParameters,
    #[error("parameter dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("initial parameter at index {index} is not finite")]
    NonFiniteParameter { index: usize },
    #[error("model returned {found} values for {expected} data points")]
    ModelOutputLength { expected: usize, found: usize },
}

/// Top-level error of this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplerError {
    #[error("invalid observation: {0}")]
    InvalidObservation(#[from] ObservationError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Convenience alias for `Result<T, SamplerError>`.
pub type Result<T> = std::result::Result<T, SamplerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_into_sampler_error() {
        fn fails() -> Result<()> {
            Err(ConfigError::ZeroSteps)?
        }
        assert_eq!(
            fails(),
            Err(SamplerError::InvalidConfiguration(ConfigError::ZeroSteps))
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = SamplerError::from(ObservationError::NonPositiveUncertainty {
            index: 2,
            value: -0.5,
        });
        assert_eq!(
            err.to_string(),
            "invalid observation: uncertainty at index 2 must be strictly positive, got -0.5"
        );
    }
}
