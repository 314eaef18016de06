//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, ErrorCode, params};
use crate::config::ensure_db_dir;
use crate::record::{StoreRecord, StoreRow};
use crate::{Error, Result};
use super::report::{ColumnInfo, DuplicateUrl, IndexInfo, QualityReport, SchemaReport, TableSchema};
use super::schema;

/// One connection to the stores database, bound to a single table.
///
/// Dropping the value closes the connection; an open transaction that was
/// never committed is rolled back by SQLite at that point.
pub struct StoreDb {
    conn: Connection,
    table: String,
}

impl StoreDb {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        ensure_db_dir(path)?;
        let conn = Connection::open(path)?;
        tracing::debug!("opened {} (table {})", path.display(), table);
        Ok(Self { conn, table: table.to_string() })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, table: table.to_string() })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    // ========== Schema ==========

    /// Create the table if needed, add `url` if it is missing and make sure
    /// the unique index on `url` exists. Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<SchemaReport> {
        self.conn.execute(&schema::create_table(&self.table), [])?;

        let existing_columns = self.column_names()?;
        let url_column_added = !existing_columns.iter().any(|c| c == schema::URL_COLUMN);
        if url_column_added {
            self.conn.execute(&schema::add_url_column(&self.table), [])?;
            tracing::info!("added column '{}' to {}", schema::URL_COLUMN, self.table);
        }

        // tables created by older tools may already carry a unique url index under another name
        if !self.indexes()?.iter().any(IndexInfo::is_unique_on_url) {
            self.conn.execute(&schema::create_url_index(&self.table), [])?;
        }

        Ok(SchemaReport {
            table: self.table.clone(),
            existing_columns,
            url_column_added,
            indexes: self.indexes()?,
        })
    }

    pub fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.columns()?.into_iter().map(|c| c.name).collect())
    }

    /// Full column and index listing for the table
    pub fn describe(&self) -> Result<TableSchema> {
        Ok(TableSchema {
            columns: self.columns()?,
            indexes: self.indexes()?,
        })
    }

    fn columns(&self) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.conn.prepare(schema::TABLE_INFO)?;
        let columns = stmt
            .query_map([&self.table], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get(3)?,
                    default_value: row.get(4)?,
                    primary_key: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    fn indexes(&self) -> Result<Vec<IndexInfo>> {
        let mut stmt = self.conn.prepare(schema::INDEX_LIST)?;
        let listed = stmt
            .query_map([&self.table], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut columns_stmt = self.conn.prepare(schema::INDEX_COLUMNS)?;
        let mut indexes = Vec::with_capacity(listed.len());
        for (name, unique, origin, partial) in listed {
            let columns = columns_stmt
                .query_map([&name], |row| row.get::<_, Option<String>>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
                .into_iter()
                // expression indexes report a NULL column name
                .map(|c| c.unwrap_or_else(|| "<expr>".to_string()))
                .collect();
            indexes.push(IndexInfo { name, unique, origin, partial, columns });
        }
        Ok(indexes)
    }

    // ========== Diagnostics ==========

    /// Count NULL/empty urls and list url values stored more than once
    pub fn check_quality(&self) -> Result<QualityReport> {
        let missing: i64 = self
            .conn
            .query_row(&schema::count_missing_urls(&self.table), [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(&schema::duplicate_urls(&self.table))?;
        let duplicates = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(DuplicateUrl {
                    url: row.get(0)?,
                    count: count as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(QualityReport {
            missing_urls: missing as usize,
            duplicates,
        })
    }

    // ========== Rows ==========

    /// Insert one record. Constraint violations come back as
    /// `Error::Storage`; see [`is_constraint_violation`].
    pub fn insert_record(&self, record: &StoreRecord) -> Result<()> {
        self.conn.execute(
            &schema::insert_record(&self.table),
            params![
                record.url,
                record.store_name,
                record.store_description,
                record.store_location,
                record.store_phone_number,
            ],
        )?;
        Ok(())
    }

    /// Every row in insertion order
    pub fn all_rows(&self) -> Result<Vec<StoreRow>> {
        let mut stmt = self.conn.prepare(&schema::select_all(&self.table))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoreRow {
                    url: row.get(0)?,
                    store_name: row.get(1)?,
                    store_description: row.get(2)?,
                    store_location: row.get(3)?,
                    store_phone_number: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count_rows(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&schema::count_rows(&self.table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Transaction Support ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }
}

/// True for UNIQUE, NOT NULL, CHECK and other integrity failures.
pub fn is_constraint_violation(err: &Error) -> bool {
    matches!(
        err,
        Error::Storage(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
    )
}
