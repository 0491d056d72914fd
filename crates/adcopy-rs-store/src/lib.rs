//! Generation log storage for the ad copy service.

pub mod error;
pub mod model;
pub mod sqlite;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// Record and query models.
pub use model::{DEFAULT_TONE, GenerationRecord, HistoryQuery};
/// SQLite-backed store and connection string parsing.
pub use sqlite::{DatabaseUrl, SqliteRecordStore};
/// Store interface and the placeholder used when no database is configured.
pub use store::{RecordStore, UnconfiguredRecordStore};
