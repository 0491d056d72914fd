//! Completion gateway stubs.

use adcopy_rs_core::{Completion, CompletionGateway, CompletionRequest, GatewayError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Gateway that always returns the same text and records each request.
#[derive(Debug, Clone)]
pub struct FixedGateway {
    text: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FixedGateway {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionGateway for FixedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        Ok(Completion {
            text: self.text.clone(),
        })
    }
}

/// Gateway that always fails with an upstream error.
#[derive(Debug, Clone)]
pub struct FailingGateway {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingGateway {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionGateway for FailingGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Upstream {
            status: 500,
            message: self.message.clone(),
        })
    }
}

/// Gateway that sleeps before answering.
#[derive(Debug, Clone)]
pub struct SlowGateway {
    delay: Duration,
    text: String,
}

impl SlowGateway {
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
        }
    }
}

#[async_trait]
impl CompletionGateway for SlowGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, GatewayError> {
        tokio::time::sleep(self.delay).await;
        Ok(Completion {
            text: self.text.clone(),
        })
    }
}
