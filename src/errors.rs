// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for template resolution and state convergence

use thiserror::Error;

use crate::domain::ValidationError;

/// Errors surfaced by the compute core.
///
/// Every variant is terminal: none of them is retried by
/// [`crate::polling::retry`], and none is logged and swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// A named id does not exist in a catalog
    #[error("{0}")]
    NotFound(String),

    /// The conjunction of constraints, or the hardware/image cross-match, is empty
    #[error("{0}")]
    NoMatch(String),

    /// A caller-supplied value is malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Catalog data is malformed, or a polled resource reached a fatal status
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Environment configuration could not be parsed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ComputeError {
    /// The bare message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::NoMatch(m)
            | Self::InvalidArgument(m)
            | Self::InvalidState(m)
            | Self::Configuration(m) => m,
        }
    }
}

/// Catalog data that fails validation is an invalid state, not a caller error.
impl From<ValidationError> for ComputeError {
    fn from(err: ValidationError) -> Self {
        ComputeError::InvalidState(err.to_string())
    }
}

/// Result type for compute operations
pub type ComputeResult<T> = Result<T, ComputeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_displays_bare_message() {
        let err = ComputeError::NotFound("imageId(region/x) not found".to_string());
        assert_eq!(err.to_string(), "imageId(region/x) not found");
        assert_eq!(err.message(), "imageId(region/x) not found");
    }

    #[test]
    fn test_prefixed_variants_keep_bare_message() {
        let err = ComputeError::InvalidArgument("bad pattern".to_string());
        assert_eq!(err.to_string(), "invalid argument: bad pattern");
        assert_eq!(err.message(), "bad pattern");
    }

    #[test]
    fn test_validation_error_maps_to_invalid_state() {
        let err: ComputeError = ValidationError::NegativeCapacity {
            hardware_id: "m1".to_string(),
            field: "ram".to_string(),
        }
        .into();
        assert!(matches!(err, ComputeError::InvalidState(_)));
    }
}
