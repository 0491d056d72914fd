//! Error taxonomy for generation and history operations.

use crate::gateway::GatewayError;
use adcopy_rs_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Stable, machine-readable error codes.
pub mod error_code {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const UNCONFIGURED: &str = "UNCONFIGURED";
    pub const GENERATION_FAILED: &str = "GENERATION_FAILED";
    pub const GENERATION_TIMED_OUT: &str = "GENERATION_TIMED_OUT";
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const PERSISTENCE_FAILED: &str = "PERSISTENCE_FAILED";
}

/// Errors returned by the generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Caller input was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The generation log has no connection string.
    #[error("not configured: {0}")]
    Unconfigured(String),
    /// The provider credential is missing; no generation can run.
    #[error("not configured: {0}")]
    GatewayUnconfigured(String),
    /// The provider failed or returned an unusable response.
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// The provider did not answer within the configured bound.
    #[error("generation timed out after {}s", .0.as_secs_f32())]
    GenerationTimedOut(Duration),
    /// The generation log could not be reached.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// Generation succeeded but the record was not saved; `text` is the output.
    #[error("generation succeeded but was not recorded: {detail}")]
    PersistenceFailed { text: String, detail: String },
}

impl GenerationError {
    /// Stable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidArgument(_) => error_code::INVALID_ARGUMENT,
            GenerationError::Unconfigured(_) | GenerationError::GatewayUnconfigured(_) => {
                error_code::UNCONFIGURED
            }
            GenerationError::GenerationFailed(_) => error_code::GENERATION_FAILED,
            GenerationError::GenerationTimedOut(_) => error_code::GENERATION_TIMED_OUT,
            GenerationError::StorageUnavailable(_) => error_code::STORAGE_UNAVAILABLE,
            GenerationError::PersistenceFailed { .. } => error_code::PERSISTENCE_FAILED,
        }
    }

    /// Generated text that survived a failed save, if any.
    pub fn generated_text(&self) -> Option<&str> {
        match self {
            GenerationError::PersistenceFailed { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl From<GatewayError> for GenerationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unconfigured(message) => GenerationError::GatewayUnconfigured(message),
            other => GenerationError::GenerationFailed(other.to_string()),
        }
    }
}

impl From<StoreError> for GenerationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(message) => GenerationError::InvalidArgument(message),
            StoreError::Unconfigured(message) => GenerationError::Unconfigured(message),
            StoreError::Unavailable(message) | StoreError::Rejected(message) => {
                GenerationError::StorageUnavailable(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationError;
    use crate::GatewayError;
    use adcopy_rs_store::StoreError;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn gateway_errors_map_to_generation_failures() {
        let err = GenerationError::from(GatewayError::Upstream {
            status: 429,
            message: "rate limited".to_string(),
        });
        assert_eq!(err.code(), "GENERATION_FAILED");
        assert!(err.to_string().contains("rate limited"));

        let err = GenerationError::from(GatewayError::Unconfigured("no key".to_string()));
        assert!(matches!(err, GenerationError::GatewayUnconfigured(_)), "{err:?}");
        assert_eq!(err.code(), "UNCONFIGURED");
    }

    #[test]
    fn store_errors_map_to_storage_codes() {
        let err = GenerationError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.code(), "STORAGE_UNAVAILABLE");
        let err = GenerationError::from(StoreError::InvalidArgument("limit".to_string()));
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn only_persistence_failures_carry_text() {
        let err = GenerationError::PersistenceFailed {
            text: "Buy now".to_string(),
            detail: "disk full".to_string(),
        };
        assert_eq!(err.generated_text(), Some("Buy now"));
        let err = GenerationError::GenerationTimedOut(Duration::from_secs(60));
        assert_eq!(err.generated_text(), None);
        assert_eq!(err.to_string(), "generation timed out after 60s");
    }
}
