//! Ad generation core: the completion gateway, prompt template, and the
//! service that turns a brief into a persisted generation record.

pub mod error;
pub mod gateway;
pub mod openai;
pub mod prompt;
pub mod service;

pub use error::{GenerationError, error_code};
pub use gateway::{Completion, CompletionGateway, CompletionRequest, GatewayError};
pub use openai::OpenAiGateway;
pub use prompt::{AdBrief, PromptTemplate};
pub use service::{Diagnostics, GenerationService, GenerationSettings};

/// Store types re-exported for callers of the service.
pub use adcopy_rs_store::{GenerationRecord, HistoryQuery, RecordStore};
