//! Public SDK surface for the ad copy service.
//!
//! This crate re-exports the building blocks and wires them together from a
//! [`config::ServiceConfig`], so the binary and embedders start the same way.

mod bootstrap;

/// Re-export for convenience.
pub use adcopy_rs_config as config;
pub use adcopy_rs_core as core;
/// Re-export for convenience.
pub use adcopy_rs_server as server;
/// Re-export for convenience.
pub use adcopy_rs_store as store;

pub use bootstrap::{build_service, build_state, build_store};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. `RUST_LOG` selects levels.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
