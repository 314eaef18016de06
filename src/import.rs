//! Import pipeline
//!
//! A run is a fixed sequence of phases, each with its own connection:
//! schema ensure, pre-check, load & insert, post-check, dump.
//! Input-file problems abort only the load phase; per-entry problems only
//! skip that entry. Store failures propagate and end the run.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ImporterConfig;
use crate::record::{json_type_name, StoreRecord, StoreRow};
use crate::storage::{is_constraint_violation, QualityReport, SchemaReport, StoreDb, TableSchema};
use crate::ui::{self, Icons, TableBuilder};
use crate::{Error, Result};

/// Why an input file could not be turned into a list of entries.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("JSON file '{}' does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read JSON file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decoding JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON data is not a list. Found type: {0}")]
    NotAList(&'static str),
}

/// Read and parse the input document into its top-level entries.
pub fn load_entries(path: &Path) -> std::result::Result<Vec<Value>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Array(entries) => Ok(entries),
        other => Err(LoadError::NotAList(json_type_name(&other))),
    }
}

/// What happened to one input entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    SkippedMissingUrl,
    /// The store refused the row: unique `url` or another integrity rule
    SkippedDuplicate { reason: String },
    /// Undecodable entry or any non-constraint insert failure
    SkippedOther { reason: String },
}

impl RecordOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, RecordOutcome::Inserted)
    }
}

/// Counters for one load. `inserted + skipped() == processed` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    pub inserted: usize,
    pub skipped_missing_url: usize,
    pub skipped_duplicate: usize,
    pub skipped_other: usize,
}

impl ImportSummary {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        self.processed += 1;
        match outcome {
            RecordOutcome::Inserted => self.inserted += 1,
            RecordOutcome::SkippedMissingUrl => self.skipped_missing_url += 1,
            RecordOutcome::SkippedDuplicate { .. } => self.skipped_duplicate += 1,
            RecordOutcome::SkippedOther { .. } => self.skipped_other += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped_missing_url + self.skipped_duplicate + self.skipped_other
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Data insertion complete. Inserted: {}, Skipped: {}.",
            self.inserted,
            self.skipped()
        )
    }
}

/// Result of the load & insert phase.
#[derive(Debug)]
pub enum ImportOutcome {
    Completed(ImportSummary),
    /// The file was never loaded; nothing was inserted or counted
    Aborted(LoadError),
}

impl ImportOutcome {
    pub fn summary(&self) -> Option<&ImportSummary> {
        match self {
            ImportOutcome::Completed(summary) => Some(summary),
            ImportOutcome::Aborted(_) => None,
        }
    }

    pub fn inserted(&self) -> usize {
        self.summary().map_or(0, |s| s.inserted)
    }

    pub fn skipped(&self) -> usize {
        self.summary().map_or(0, ImportSummary::skipped)
    }
}

/// Everything a full run produced, phase by phase.
#[derive(Debug)]
pub struct RunReport {
    pub schema: SchemaReport,
    pub table_schema: TableSchema,
    pub before: QualityReport,
    pub import: ImportOutcome,
    pub after: QualityReport,
    pub rows: Vec<StoreRow>,
}

/// Runs the import phases against one database table.
pub struct Importer {
    config: ImporterConfig,
}

impl Importer {
    pub fn new(config: ImporterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    fn open(&self) -> Result<StoreDb> {
        StoreDb::open(&self.config.database, &self.config.table)
    }

    /// Every phase in order. Only store-level failures return `Err`.
    pub fn run(&self) -> Result<RunReport> {
        tracing::info!(
            "importing {} into {} (table {})",
            self.config.input.display(),
            self.config.database.display(),
            self.config.table
        );

        let schema = self.ensure_schema()?;
        let table_schema = self.describe_schema()?;

        ui::section("Checking for duplicates and NULLs before insertion");
        let before = self.check_duplicates_and_nulls()?;

        let import = self.import_file(&self.config.input)?;

        ui::section("After data insertion");
        let after = self.check_duplicates_and_nulls()?;

        let rows = self.dump_rows()?;

        Ok(RunReport { schema, table_schema, before, import, after, rows })
    }

    /// Create the table, add `url` if missing, ensure its unique index.
    pub fn ensure_schema(&self) -> Result<SchemaReport> {
        ui::phase("Preparing database");
        let store = self.open()?;
        let report = store.ensure_schema()?;

        println!("{}", report);
        ui::success(&format!(
            "Database '{}' is ready with table '{}'!",
            self.config.database.display(),
            self.config.table
        ));
        Ok(report)
    }

    /// Print `table_info` and `index_list` for the table.
    pub fn describe_schema(&self) -> Result<TableSchema> {
        let store = self.open()?;
        let schema = store.describe()?;

        ui::section("Table Schema");
        println!("{}", ui::render(&schema.columns));
        ui::section("Indexes");
        if schema.indexes.is_empty() {
            println!("  (none)");
        } else {
            println!("{}", ui::render(&schema.indexes));
        }
        Ok(schema)
    }

    /// Pure read; same output whether called before or after a load.
    pub fn check_duplicates_and_nulls(&self) -> Result<QualityReport> {
        let store = self.open()?;
        let report = store.check_quality()?;

        println!("{}", report);
        if !report.duplicates.is_empty() {
            tracing::warn!("{} duplicated url values in {}", report.duplicates.len(), store.table());
        }
        Ok(report)
    }

    /// Load `path` and insert every entry, isolating failures per entry.
    ///
    /// All inserts share one transaction that is committed after the last
    /// entry, whatever the individual outcomes were.
    pub fn import_file(&self, path: &Path) -> Result<ImportOutcome> {
        ui::phase("Inserting data");
        ui::status(Icons::FILE, "Input", &path.display().to_string());

        let spinner = ui::Spinner::new("Reading JSON...");
        let loaded = load_entries(path);
        spinner.finish();

        let entries = match loaded {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("{}", e);
                ui::error(&e.to_string());
                return Ok(ImportOutcome::Aborted(e));
            }
        };
        println!("Loaded {} entries from JSON.", entries.len());

        let mut store = self.open()?;
        store.begin_transaction()?;

        let mut summary = ImportSummary::default();
        for (idx, entry) in entries.iter().enumerate() {
            let outcome = insert_entry(&store, idx + 1, entry);
            summary.record(&outcome);
        }

        store.commit()?;
        drop(store);

        println!();
        println!("{}", summary);
        let mut table = TableBuilder::new();
        table
            .add_row("Processed", summary.processed)
            .add_row("Inserted", summary.inserted)
            .add_row("Skipped (missing url)", summary.skipped_missing_url)
            .add_row("Skipped (duplicate/invalid)", summary.skipped_duplicate)
            .add_row("Skipped (other)", summary.skipped_other);
        println!("{}", table.build());
        tracing::info!(
            "inserted {} of {} entries, skipped {}",
            summary.inserted,
            summary.processed,
            summary.skipped()
        );

        Ok(ImportOutcome::Completed(summary))
    }

    /// Print every stored row and the row count.
    pub fn dump_rows(&self) -> Result<Vec<StoreRow>> {
        let store = self.open()?;
        let rows = store.all_rows()?;

        ui::section(&format!("Total entries in '{}': {}", store.table(), rows.len()));
        if !rows.is_empty() {
            println!("{}", ui::render(&rows));
        }
        ui::status(Icons::STATS, "Rows", &rows.len().to_string());
        Ok(rows)
    }
}

/// Decode, validate and insert a single entry. Never fails the batch.
fn insert_entry(store: &StoreDb, idx: usize, entry: &Value) -> RecordOutcome {
    let record = match StoreRecord::from_json(entry) {
        Ok(record) => record,
        Err(e) => {
            let reason = e.to_string();
            tracing::warn!("entry {}: undecodable: {}", idx, reason);
            ui::entry_failed(idx, &format!("Could not decode entry: {reason}"));
            return RecordOutcome::SkippedOther { reason };
        }
    };

    if !record.has_url() {
        tracing::debug!("entry {}: missing url", idx);
        ui::entry_skipped(idx, "Missing 'url'. Skipping.");
        return RecordOutcome::SkippedMissingUrl;
    }

    match store.insert_record(&record) {
        Ok(()) => {
            tracing::debug!("entry {}: inserted {}", idx, record.url);
            ui::entry_inserted(idx, record.display_name());
            RecordOutcome::Inserted
        }
        Err(e) if is_constraint_violation(&e) => {
            let reason = failure_reason(&e);
            tracing::debug!("entry {}: rejected {}: {}", idx, record.url, reason);
            ui::entry_skipped(
                idx,
                &format!("Skipping duplicate or invalid entry for URL '{}': {}", record.url, reason),
            );
            RecordOutcome::SkippedDuplicate { reason }
        }
        Err(e) => {
            let reason = failure_reason(&e);
            tracing::warn!("entry {}: insert failed for {}: {}", idx, record.url, reason);
            ui::entry_failed(
                idx,
                &format!("Error inserting data for URL '{}': {}", record.url, reason),
            );
            RecordOutcome::SkippedOther { reason }
        }
    }
}

fn failure_reason(err: &Error) -> String {
    match err {
        Error::Storage(e) => e.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(input: &str) -> (TempDir, Importer) {
        let dir = tempfile::tempdir().unwrap();
        let config = ImporterConfig {
            database: dir.path().join("stores.db"),
            table: "stores".to_string(),
            input: dir.path().join("final_scrape_21.json"),
        };
        std::fs::write(&config.input, input).unwrap();
        let importer = Importer::new(config).unwrap();
        (dir, importer)
    }

    fn write_input(importer: &Importer, input: &str) {
        std::fs::write(&importer.config().input, input).unwrap();
    }

    #[test]
    fn test_end_to_end() {
        let (_dir, importer) = setup(
            r#"[{"url":"http://a","store_name":"A"},{"url":"http://a","store_name":"A2"},{"url":"","store_name":"B"}]"#,
        );

        let report = importer.run().unwrap();
        let summary = report.import.summary().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.skipped_missing_url, 1);
        assert_eq!(summary.skipped_duplicate, 1);

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].url.as_deref(), Some("http://a"));
        assert_eq!(report.rows[0].store_name.as_deref(), Some("A"));
        assert!(report.before.is_clean());
        assert!(report.after.is_clean());
    }

    #[test]
    fn test_count_conservation() {
        let (_dir, importer) = setup(
            r#"[
                {"url": "http://1"},
                {"url": "   "},
                {"url": "http://2", "store_name": "Two"},
                {"store_name": "no url"},
                {"url": " http://1 "},
                {"url": "http://3"}
            ]"#,
        );
        importer.ensure_schema().unwrap();

        let outcome = importer.import_file(&importer.config().input).unwrap();
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.processed, 6);
        assert_eq!(summary.inserted + summary.skipped(), 6);
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.skipped_missing_url, 2);
        assert_eq!(summary.skipped_duplicate, 1);
    }

    #[test]
    fn test_values_are_trimmed_before_storing() {
        let (_dir, importer) = setup(
            r#"[{"url": "  http://acme  ", "store_name": "  Acme  ", "store_phone_number": " 555 "}]"#,
        );
        let report = importer.run().unwrap();

        let row = &report.rows[0];
        assert_eq!(row.url.as_deref(), Some("http://acme"));
        assert_eq!(row.store_name.as_deref(), Some("Acme"));
        assert_eq!(row.store_phone_number.as_deref(), Some("555"));
        assert_eq!(row.store_description.as_deref(), Some(""));
    }

    #[test]
    fn test_object_root_is_aborted() {
        let (_dir, importer) = setup(r#"{"not": "a list"}"#);
        let report = importer.run().unwrap();

        assert!(matches!(report.import, ImportOutcome::Aborted(LoadError::NotAList("object"))));
        assert_eq!(report.import.inserted(), 0);
        assert_eq!(report.import.skipped(), 0);
        assert!(report.rows.is_empty());
        assert!(report.schema.has_unique_url_index());
    }

    #[test]
    fn test_missing_file_is_aborted() {
        let (dir, importer) = setup("[]");
        let outcome = importer.import_file(&dir.path().join("absent.json")).unwrap();
        assert!(matches!(outcome, ImportOutcome::Aborted(LoadError::NotFound(_))));
    }

    #[test]
    fn test_malformed_json_is_aborted() {
        let (_dir, importer) = setup(r#"[{"url": "http://a",]"#);
        let report = importer.run().unwrap();
        match &report.import {
            ImportOutcome::Aborted(e @ LoadError::Json(_)) => {
                assert!(e.to_string().starts_with("Error decoding JSON"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.rows.is_empty());
    }

    #[test]
    fn test_bad_entries_do_not_stop_the_batch() {
        let (_dir, importer) = setup(
            r#"[{"url": "http://a"}, 42, ["http://x"], {"url": 7}, {"url": "http://b"}]"#,
        );
        let report = importer.run().unwrap();

        let summary = report.import.summary().unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped_other, 3);
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn test_null_field_skips_the_entry() {
        let (_dir, importer) = setup(
            r#"[{"url": "http://a", "store_name": null}, {"url": "http://b", "store_name": "B"}]"#,
        );
        let report = importer.run().unwrap();

        let summary = report.import.summary().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped_other, 1);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].url.as_deref(), Some("http://b"));
    }

    #[test]
    fn test_store_failure_is_skipped_other_and_commit_still_succeeds() {
        // no schema: every insert fails with "no such table"
        let mut store = StoreDb::open_in_memory("stores").unwrap();
        store.begin_transaction().unwrap();

        let outcome = insert_entry(&store, 1, &serde_json::json!({ "url": "http://a" }));
        match &outcome {
            RecordOutcome::SkippedOther { reason } => assert!(reason.contains("no such table")),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let outcome = insert_entry(&store, 2, &serde_json::json!({ "store_name": "no url" }));
        assert_eq!(outcome, RecordOutcome::SkippedMissingUrl);

        store.commit().unwrap();
    }

    #[test]
    fn test_rerun_skips_everything_already_stored() {
        let (_dir, importer) = setup(r#"[{"url": "http://a"}, {"url": "http://b"}]"#);
        assert_eq!(importer.run().unwrap().import.inserted(), 2);

        write_input(&importer, r#"[{"url": "http://b"}, {"url": "http://c"}]"#);
        let report = importer.run().unwrap();
        let summary = report.import.summary().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped_duplicate, 1);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.table_schema.indexes.iter().filter(|i| i.is_unique_on_url()).count(), 1);
    }

    #[test]
    fn test_empty_list() {
        let (_dir, importer) = setup("[]");
        let report = importer.run().unwrap();
        assert_eq!(report.import.summary(), Some(&ImportSummary::default()));
        assert!(report.rows.is_empty());
    }

    #[test]
    fn test_rejects_invalid_table_name() {
        let config = ImporterConfig {
            table: "stores; --".to_string(),
            ..ImporterConfig::default()
        };
        assert!(matches!(Importer::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_entries_reports_root_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, "\"just a string\"").unwrap();
        assert!(matches!(load_entries(&path), Err(LoadError::NotAList("string"))));
    }

    #[test]
    fn test_summary_display() {
        let mut summary = ImportSummary::default();
        assert!(RecordOutcome::Inserted.is_inserted());
        assert!(!RecordOutcome::SkippedMissingUrl.is_inserted());
        summary.record(&RecordOutcome::Inserted);
        summary.record(&RecordOutcome::SkippedMissingUrl);
        summary.record(&RecordOutcome::SkippedOther { reason: "x".to_string() });
        assert_eq!(summary.to_string(), "Data insertion complete. Inserted: 1, Skipped: 2.");
    }
}
