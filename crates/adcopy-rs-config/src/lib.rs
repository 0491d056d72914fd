//! Configuration model and loading for the ad copy service.
//!
//! Settings come from an optional JSON5 file and are then overlaid with
//! environment variables, so credentials never have to live on disk.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Environment variable names consulted by the overlay.
pub use loader::env_keys;
/// Configuration schema models.
pub use model::*;
