//! Record store stubs.

use adcopy_rs_store::{GenerationRecord, HistoryQuery, RecordStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store that is reachable but refuses every write.
#[derive(Debug, Clone, Default)]
pub struct RejectingStore {
    attempts: Arc<AtomicUsize>,
}

impl RejectingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for RejectingStore {
    async fn insert(
        &self,
        _product: &str,
        _tone: &str,
        _generated_text: &str,
    ) -> Result<GenerationRecord, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Rejected("disk full".to_string()))
    }

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<GenerationRecord>, StoreError> {
        query.validate()?;
        Err(StoreError::Unavailable("connection lost".to_string()))
    }
}
