//! Completion provider boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One completion call: optional system prompt plus a single user prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
}

/// Text produced by a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
}

/// Errors returned by completion gateways.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential or endpoint missing.
    #[error("gateway not configured: {0}")]
    Unconfigured(String),
    /// Request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// Provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    /// Provider answered but the body had no usable text.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait]
/// A provider that turns one request into one text or one error.
pub trait CompletionGateway: Send + Sync {
    /// Run a single, non-streaming completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError>;

    /// Whether the gateway has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }
}
