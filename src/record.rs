//! Store records - the input shape and the persisted shape
//!
//! `StoreRecord` is what the scraper hands us: every field optional in the
//! JSON, normalized to trimmed strings at decode time. `StoreRow` is what
//! comes back out of the table, where legacy rows may hold NULLs.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tabled::Tabled;

/// Wire shape of one scraped entry. Absent keys decode to `None`; a key
/// present with `null` (or any non-string) is a decode error.
#[derive(Debug, Default, Deserialize)]
struct RawStoreRecord {
    #[serde(default, deserialize_with = "present_text")]
    url: Option<String>,
    #[serde(default, deserialize_with = "present_text")]
    store_name: Option<String>,
    #[serde(default, deserialize_with = "present_text")]
    store_description: Option<String>,
    #[serde(default, deserialize_with = "present_text")]
    store_location: Option<String>,
    #[serde(default, deserialize_with = "present_text")]
    store_phone_number: Option<String>,
}

fn present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// A decoded, trimmed store entry ready for insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawStoreRecord")]
pub struct StoreRecord {
    pub url: String,
    pub store_name: String,
    pub store_description: String,
    pub store_location: String,
    pub store_phone_number: String,
}

impl From<RawStoreRecord> for StoreRecord {
    fn from(raw: RawStoreRecord) -> Self {
        fn clean(field: Option<String>) -> String {
            field.map(|s| s.trim().to_string()).unwrap_or_default()
        }

        Self {
            url: clean(raw.url),
            store_name: clean(raw.store_name),
            store_description: clean(raw.store_description),
            store_location: clean(raw.store_location),
            store_phone_number: clean(raw.store_phone_number),
        }
    }
}

impl StoreRecord {
    pub fn new(url: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self::from(RawStoreRecord {
            url: Some(url.into()),
            store_name: Some(store_name.into()),
            ..RawStoreRecord::default()
        })
    }

    /// Decode one element of the input array.
    ///
    /// Only JSON objects are accepted; a known field holding anything but a
    /// string, `null` included, makes the element undecodable.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_type_name(value)
            )));
        }
        StoreRecord::deserialize(value)
    }

    /// True when the identifying field is usable.
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }

    /// Label used in per-entry console lines.
    pub fn display_name(&self) -> &str {
        if self.store_name.is_empty() {
            &self.url
        } else {
            &self.store_name
        }
    }
}

/// A row as stored in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Tabled)]
pub struct StoreRow {
    #[tabled(rename = "URL", display_with = "display_nullable")]
    pub url: Option<String>,
    #[tabled(rename = "Name", display_with = "display_nullable")]
    pub store_name: Option<String>,
    #[tabled(rename = "Description", display_with = "display_nullable")]
    pub store_description: Option<String>,
    #[tabled(rename = "Location", display_with = "display_nullable")]
    pub store_location: Option<String>,
    #[tabled(rename = "Phone", display_with = "display_nullable")]
    pub store_phone_number: Option<String>,
}

fn display_nullable(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "NULL".to_string())
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
