use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const DEFAULT_DATABASE: &str = "stores.db";
pub const DEFAULT_TABLE: &str = "stores";
pub const DEFAULT_INPUT: &str = "final_scrape_21.json";

/// Names a single import run works against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    pub database: PathBuf,
    pub table: String,
    pub input: PathBuf,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
            input: PathBuf::from(DEFAULT_INPUT),
        }
    }
}

impl ImporterConfig {
    /// The table name is spliced into SQL text, so only plain identifiers pass.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.table) {
            return Err(Error::Config(format!(
                "table name '{}' is not a plain SQL identifier",
                self.table
            )));
        }
        if self.database.as_os_str().is_empty() {
            return Err(Error::Config("database path is empty".to_string()));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("store-import.toml")
}

/// Reads the optional override file. A missing file means "use defaults".
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ImporterConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(ImporterConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ImporterConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
