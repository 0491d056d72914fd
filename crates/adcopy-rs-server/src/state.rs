//! State shared by every handler.

use adcopy_rs_config::HistoryConfig;
use adcopy_rs_core::GenerationService;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GenerationService>,
    pub history: HistoryConfig,
}

impl AppState {
    pub fn new(service: GenerationService, history: HistoryConfig) -> Self {
        Self {
            service: Arc::new(service),
            history,
        }
    }
}
