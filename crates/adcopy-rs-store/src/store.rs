//! Record store interface.

use crate::error::StoreError;
use crate::model::{GenerationRecord, HistoryQuery};
use async_trait::async_trait;
use log::warn;

#[async_trait]
/// Append-only log of generations with paged, filtered reads.
pub trait RecordStore: Send + Sync {
    /// Persist a completed generation, assigning its id and timestamp.
    async fn insert(
        &self,
        product: &str,
        tone: &str,
        generated_text: &str,
    ) -> Result<GenerationRecord, StoreError>;

    /// List records newest first, ties broken by id descending.
    async fn list(&self, query: &HistoryQuery) -> Result<Vec<GenerationRecord>, StoreError>;

    /// Whether a backing database was configured.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Store used when no connection string was supplied.
///
/// Every call fails with [`StoreError::Unconfigured`] so the missing setting
/// is reported at first use instead of at startup.
#[derive(Debug, Clone)]
pub struct UnconfiguredRecordStore {
    reason: String,
}

impl UnconfiguredRecordStore {
    /// Create a placeholder that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnconfiguredRecordStore {
    fn default() -> Self {
        Self::new("DATABASE_URL is not set")
    }
}

#[async_trait]
impl RecordStore for UnconfiguredRecordStore {
    async fn insert(
        &self,
        product: &str,
        _tone: &str,
        _generated_text: &str,
    ) -> Result<GenerationRecord, StoreError> {
        warn!(
            "insert on unconfigured store (product_len={}, reason={})",
            product.len(),
            self.reason
        );
        Err(StoreError::Unconfigured(self.reason.clone()))
    }

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<GenerationRecord>, StoreError> {
        query.validate()?;
        Err(StoreError::Unconfigured(self.reason.clone()))
    }

    fn is_configured(&self) -> bool {
        false
    }
}
