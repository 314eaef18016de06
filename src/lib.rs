//! # store-import - Scraped store records into SQLite
//!
//! Loads a JSON array of store records and appends them to a single SQLite
//! table keyed by a unique `url`.
//!
//! store-import provides:
//! - Idempotent schema setup with a unique index on `url`
//! - Null/duplicate diagnostics before and after a load
//! - Per-record insert outcomes that never abort the batch
//! - A full dump of the stored rows

pub mod config;
pub mod import;
pub mod record;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use config::ImporterConfig;
pub use import::{ImportOutcome, ImportSummary, Importer, LoadError, RecordOutcome, RunReport};
pub use record::{StoreRecord, StoreRow};
pub use storage::StoreDb;

/// Result type alias for store-import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Store-level errors. Anything surfacing as this type is fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}
