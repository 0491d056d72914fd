//! HTTP facade for the ad copy service.
//!
//! The router is a thin translation layer: request parsing on the way in,
//! [`ApiError`] status mapping on the way out. All behaviour lives in
//! [`adcopy_rs_core::GenerationService`].

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{GenerateResponse, HistoryItem, HistoryParams};
pub use routes::{router, serve};
pub use state::AppState;
