//! Error types for the interaction kernel.
//!
//! Configuration problems are fatal to the instance being built, index
//! problems are recoverable (callers treat them as a no-op), and activation
//! problems never surface as a `Result` at all: they degrade the activation
//! and are reported through [`Activation::Degraded`](crate::focus::Activation).

/// A [`Range`](crate::value::Range) or mapper was built with values that
/// cannot describe a legal value domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// `min` must be strictly below `max`.
    #[error("range minimum {min} must be below maximum {max}")]
    MinNotBelowMax { min: f64, max: f64 },
    /// `step` must be a positive number.
    #[error("step must be positive, got {0}")]
    NonPositiveStep(f64),
    /// One of the bounds or the step is NaN or infinite.
    #[error("range bounds and step must be finite")]
    NonFinite,
}

/// An index fell outside the `0..len` domain of a disclosure set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("index {index} is outside the domain 0..{len}")]
    OutOfDomain { index: usize, len: usize },
}

/// Why a [`FocusScope`](crate::focus::FocusScope) activation could not trap
/// focus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    /// The container handed to `activate` is not known to the host.
    #[error("container is not attached to the host")]
    MissingContainer,
    /// The host refused to install an input listener.
    #[error("listener registration failed: {0}")]
    ListenerRegistration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_messages() {
        let err = ConfigurationError::MinNotBelowMax { min: 5.0, max: 1.0 };
        assert_eq!(err.to_string(), "range minimum 5 must be below maximum 1");
        assert_eq!(
            ConfigurationError::NonPositiveStep(0.0).to_string(),
            "step must be positive, got 0"
        );
    }

    #[test]
    fn index_message() {
        let err = IndexError::OutOfDomain { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 is outside the domain 0..3");
    }
}
