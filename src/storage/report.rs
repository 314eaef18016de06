//! Read-side reports produced by the store

use tabled::Tabled;

/// What `ensure_schema` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub table: String,
    /// Column names as they were before `url` was (possibly) added
    pub existing_columns: Vec<String>,
    pub url_column_added: bool,
    pub indexes: Vec<IndexInfo>,
}

impl SchemaReport {
    pub fn has_unique_url_index(&self) -> bool {
        self.indexes.iter().any(IndexInfo::is_unique_on_url)
    }
}

impl std::fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Existing columns: [{}]", self.existing_columns.join(", "))?;
        if self.url_column_added {
            writeln!(f, "Column 'url' added to the table.")?;
        } else {
            writeln!(f, "Column 'url' already exists.")?;
        }
        if self.has_unique_url_index() {
            write!(f, "Unique index on 'url' ensured.")
        } else {
            write!(f, "Unique index on 'url' is missing.")
        }
    }
}

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ColumnInfo {
    #[tabled(rename = "#")]
    pub cid: i64,
    #[tabled(rename = "Column")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub decl_type: String,
    #[tabled(rename = "Not Null")]
    pub not_null: bool,
    #[tabled(rename = "Default", display_with = "display_default")]
    pub default_value: Option<String>,
    #[tabled(rename = "PK")]
    pub primary_key: i64,
}

fn display_default(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// One row of `PRAGMA index_list` with its indexed columns.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct IndexInfo {
    #[tabled(rename = "Index")]
    pub name: String,
    #[tabled(rename = "Unique")]
    pub unique: bool,
    /// `c` for CREATE INDEX, `u` for UNIQUE constraints, `pk` for primary keys
    #[tabled(rename = "Origin")]
    pub origin: String,
    #[tabled(rename = "Partial")]
    pub partial: bool,
    #[tabled(rename = "Columns", display_with = "display_columns")]
    pub columns: Vec<String>,
}

impl IndexInfo {
    pub fn is_unique_on_url(&self) -> bool {
        self.unique && !self.partial && self.columns.len() == 1 && self.columns[0] == "url"
    }
}

fn display_columns(columns: &[String]) -> String {
    columns.join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
}

/// A `url` value held by more than one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateUrl {
    pub url: Option<String>,
    pub count: usize,
}

/// Null/empty and duplicate counts for the `url` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityReport {
    pub missing_urls: usize,
    pub duplicates: Vec<DuplicateUrl>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.missing_urls == 0 && self.duplicates.is_empty()
    }
}

impl std::fmt::Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number of NULL or empty URLs: {}", self.missing_urls)?;
        if self.duplicates.is_empty() {
            return write!(f, "No duplicate URLs found.");
        }
        write!(f, "Duplicate URLs found:")?;
        for dup in &self.duplicates {
            let url = dup.url.as_deref().unwrap_or("NULL");
            write!(f, "\n  ({url}, {})", dup.count)?;
        }
        Ok(())
    }
}
