//! Database schema definitions
//!
//! The table name is configurable, so statements are rendered per table.
//! Callers must pass a name that already passed `ImporterConfig::validate`.

/// Column added to tables created before `url` existed
pub const URL_COLUMN: &str = "url";

/// SQL to create the stores table. `url` is added separately so that older
/// tables and fresh ones end up with the same column order.
pub fn create_table(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    store_name TEXT,
    store_description TEXT,
    store_location TEXT,
    store_phone_number TEXT
)
"#
    )
}

pub fn add_url_column(table: &str) -> String {
    format!("ALTER TABLE {table} ADD COLUMN {URL_COLUMN} TEXT")
}

pub fn url_index_name(table: &str) -> String {
    format!("idx_{table}_url")
}

/// SQL to create the unique index on `url`
pub fn create_url_index(table: &str) -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {table} ({URL_COLUMN})",
        url_index_name(table)
    )
}

pub fn insert_record(table: &str) -> String {
    format!(
        r#"
INSERT INTO {table} (url, store_name, store_description, store_location, store_phone_number)
VALUES (?1, ?2, ?3, ?4, ?5)
"#
    )
}

pub fn count_missing_urls(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table} WHERE url IS NULL OR url = ''")
}

pub fn duplicate_urls(table: &str) -> String {
    format!(
        r#"
SELECT url, COUNT(*) AS cnt
FROM {table}
GROUP BY url
HAVING cnt > 1
ORDER BY url
"#
    )
}

pub fn select_all(table: &str) -> String {
    format!(
        "SELECT url, store_name, store_description, store_location, store_phone_number FROM {table} ORDER BY rowid"
    )
}

pub fn count_rows(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table}")
}

/// Table-valued pragma forms take the table or index name as a bound parameter.
pub const TABLE_INFO: &str =
    r#"SELECT cid, name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#;

pub const INDEX_LIST: &str =
    r#"SELECT name, "unique", origin, partial FROM pragma_index_list(?1) ORDER BY name"#;

pub const INDEX_COLUMNS: &str = "SELECT name FROM pragma_index_info(?1) ORDER BY seqno";
