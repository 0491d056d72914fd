//! Test helpers shared across adcopy crates.

pub mod gateway;
pub mod store;

pub use gateway::{FailingGateway, FixedGateway, SlowGateway};
pub use store::RejectingStore;
