//! Storage Layer - SQLite-backed persistence
//!
//! One table (name configurable, `stores` by default):
//! - <table>(store_name, store_description, store_location, store_phone_number, url)
//! - unique index idx_<table>_url on url

pub mod report;
pub mod schema;
pub mod sqlite;

pub use report::{ColumnInfo, DuplicateUrl, IndexInfo, QualityReport, SchemaReport, TableSchema};
pub use sqlite::{StoreDb, is_constraint_violation};
