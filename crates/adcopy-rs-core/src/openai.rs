//! OpenAI-compatible chat completions gateway.

use crate::gateway::{Completion, CompletionGateway, CompletionRequest, GatewayError};
use adcopy_rs_config::GatewayConfig;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Gateway that calls `{base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiGateway {
    /// Build a gateway; a missing key is reported on the first call.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(concat!("adcopy-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| GatewayError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Build a gateway from the `gateway` config section.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GatewayError::Unconfigured(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        };

        let payload = ChatRequest::from(request);
        debug!(
            "calling chat completions (model={}, messages={}, user_prompt_len={})",
            payload.model,
            payload.messages.len(),
            request.user_prompt.len()
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::Transport(format!("failed to read response: {err}")))?;
        let result = parse_completion(status, &body);
        if let Err(err) = &result {
            warn!("chat completions failed (status={}, error={})", status, err);
        }
        result
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Interpret a chat completions response body.
fn parse_completion(status: StatusCode, body: &str) -> Result<Completion, GatewayError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| GatewayError::Malformed(format!("invalid response body: {err}")))?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(GatewayError::Malformed(
            "response contained no completion text".to_string(),
        ));
    }
    Ok(Completion { text })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });
        Self {
            model: &request.model,
            temperature: request.temperature,
            messages,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}
