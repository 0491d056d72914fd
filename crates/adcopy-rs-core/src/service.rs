//! Generation service: validate, generate, then record.
//!
//! A request moves through `Received -> Validating -> Generating ->
//! Persisting -> Completed`. It leaves early as `Rejected` (bad input),
//! `GenerationFailed`/`GenerationTimedOut` (nothing persisted), or
//! `PersistedPartial` (the text is returned inside the error). Nothing is
//! retried here.

use crate::error::GenerationError;
use crate::gateway::{CompletionGateway, CompletionRequest};
use crate::prompt::{AdBrief, PromptTemplate};
use adcopy_rs_config::GatewayConfig;
use adcopy_rs_store::{GenerationRecord, HistoryQuery, RecordStore};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Model parameters and bounds applied to every generation.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub template: PromptTemplate,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

impl GenerationSettings {
    /// Settings taken from the `gateway` config section.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
            template: PromptTemplate::new(config.system_prompt.clone()),
        }
    }

    /// Replace the gateway timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Completion request for a validated brief.
    pub fn completion_request(&self, brief: &AdBrief) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.template.system_prompt(),
            user_prompt: self.template.user_prompt(brief),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

/// Configuration snapshot reported by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub version: &'static str,
    pub model: String,
    pub timeout_secs: u64,
    pub gateway_configured: bool,
    pub store_configured: bool,
}

/// Orchestrates one gateway call plus one record insert per request.
#[derive(Clone)]
pub struct GenerationService {
    gateway: Arc<dyn CompletionGateway>,
    store: Arc<dyn RecordStore>,
    settings: GenerationSettings,
}

impl GenerationService {
    /// Create a service over an injected gateway and store.
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        store: Arc<dyn RecordStore>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate ad copy for `product` in `tone` and record it.
    pub async fn generate_and_record_product(
        &self,
        product: &str,
        tone: &str,
    ) -> Result<GenerationRecord, GenerationError> {
        self.generate_and_record(&AdBrief::new(product, tone)).await
    }

    /// Generate ad copy for a brief and record it.
    ///
    /// On a failed save the generated text is returned inside
    /// [`GenerationError::PersistenceFailed`].
    pub async fn generate_and_record(
        &self,
        brief: &AdBrief,
    ) -> Result<GenerationRecord, GenerationError> {
        let request_id = Uuid::new_v4();
        debug!("generation received (request_id={})", request_id);

        if let Err(err) = brief.validate() {
            info!("generation rejected (request_id={}, error={})", request_id, err);
            return Err(err);
        }

        let request = self.settings.completion_request(brief);
        debug!(
            "generating (request_id={}, model={}, tone={}, user_prompt_len={})",
            request_id,
            request.model,
            brief.tone(),
            request.user_prompt.len()
        );
        let text = match tokio::time::timeout(self.settings.timeout, self.gateway.complete(&request))
            .await
        {
            Ok(Ok(completion)) => completion.text.trim().to_string(),
            Ok(Err(err)) => {
                warn!("generation failed (request_id={}, error={})", request_id, err);
                return Err(err.into());
            }
            Err(_) => {
                warn!(
                    "generation timed out (request_id={}, timeout_ms={})",
                    request_id,
                    self.settings.timeout.as_millis()
                );
                return Err(GenerationError::GenerationTimedOut(self.settings.timeout));
            }
        };
        if text.is_empty() {
            warn!("generation returned empty text (request_id={})", request_id);
            return Err(GenerationError::GenerationFailed(
                "provider returned empty text".to_string(),
            ));
        }

        debug!(
            "persisting (request_id={}, text_len={})",
            request_id,
            text.len()
        );
        match self.store.insert(brief.product(), brief.tone(), &text).await {
            Ok(record) => {
                info!(
                    "generation completed (request_id={}, record_id={}, text_len={})",
                    request_id,
                    record.id,
                    record.generated_text.len()
                );
                Ok(record)
            }
            Err(err) => {
                error!(
                    "generation not recorded (request_id={}, text_len={}, error={})",
                    request_id,
                    text.len(),
                    err
                );
                Err(GenerationError::PersistenceFailed {
                    text,
                    detail: err.to_string(),
                })
            }
        }
    }

    /// Page through recorded generations, newest first.
    pub async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<GenerationRecord>, GenerationError> {
        let records = self.store.list(query).await?;
        debug!(
            "history listed (limit={}, offset={}, returned={})",
            query.limit,
            query.offset,
            records.len()
        );
        Ok(records)
    }

    /// Report what is configured without touching the network or database.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            version: env!("CARGO_PKG_VERSION"),
            model: self.settings.model.clone(),
            timeout_secs: self.settings.timeout.as_secs(),
            gateway_configured: self.gateway.is_configured(),
            store_configured: self.store.is_configured(),
        }
    }
}
