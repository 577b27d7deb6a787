//! Common types used throughout listing-sweep
//!
//! This module contains the record types exchanged with the upstream
//! source and shared by the display and export sinks.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Listing
// ============================================================================

/// One directory record as returned by the upstream source.
///
/// The record is kept exactly as received: values keep their JSON type,
/// nulls stay null and keys stay in upstream order. Text accessors are
/// provided for the table and export sinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing {
    fields: JsonObject,
}

impl Listing {
    /// Create an empty listing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a listing with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with(Column::Name, name.into())
    }

    /// Set a field, builder style
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field, keeping its position if it already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// All fields in upstream order
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Text of a known column
    pub fn field(&self, column: Column) -> Option<Cow<'_, str>> {
        self.text(column.key())
    }

    /// Text of any field; null and missing fields are `None`
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(key)? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Keys that are not one of the known columns, in upstream order
    pub fn extra_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|key| Column::from_key(key).is_none())
    }
}

impl From<JsonObject> for Listing {
    fn from(fields: JsonObject) -> Self {
        Self { fields }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Tabular columns shared by the display and export sinks, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    ImageUrl,
    Name,
    Nickname,
    BarNumber,
    Practice,
    Address,
    OfficePhone,
    CellPhone,
    Email,
}

impl Column {
    /// All columns in display order
    pub const ALL: [Column; 9] = [
        Column::ImageUrl,
        Column::Name,
        Column::Nickname,
        Column::BarNumber,
        Column::Practice,
        Column::Address,
        Column::OfficePhone,
        Column::CellPhone,
        Column::Email,
    ];

    /// Wire/export name of the column
    pub fn key(self) -> &'static str {
        match self {
            Column::ImageUrl => "imageUrl",
            Column::Name => "name",
            Column::Nickname => "nickname",
            Column::BarNumber => "barNumber",
            Column::Practice => "practice",
            Column::Address => "address",
            Column::OfficePhone => "officePhone",
            Column::CellPhone => "cellPhone",
            Column::Email => "email",
        }
    }

    /// Column with the given wire key, matched exactly
    pub fn from_key(key: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|column| column.key() == key)
    }

    /// Human-readable header
    pub fn header(self) -> &'static str {
        match self {
            Column::ImageUrl => "Image",
            Column::Name => "Name",
            Column::Nickname => "Nickname",
            Column::BarNumber => "Bar Number",
            Column::Practice => "Practice",
            Column::Address => "Address",
            Column::OfficePhone => "Office Phone",
            Column::CellPhone => "Cell Phone",
            Column::Email => "Email",
        }
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.key().to_string()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = Error;

    /// Accepts the wire key, snake_case, or the header, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Column::ALL
            .into_iter()
            .find(|column| {
                let key = column.key().to_ascii_lowercase();
                let header: String = column
                    .header()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_ascii_lowercase();
                wanted == key || wanted == header
            })
            .ok_or_else(|| Error::config(format!("Unknown column: {s}")))
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of results as returned by the upstream source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Records on this page, in upstream order
    pub listings: Vec<Listing>,
    /// Total number of pages, when the upstream reports it
    #[serde(default, deserialize_with = "page_count")]
    pub total_pages: Option<u32>,
}

/// Accept any JSON value as a page count
///
/// Only whole, non-negative numbers count. Anything else (strings,
/// fractions, negative numbers, null) can never equal a page index and is
/// treated as absent.
fn page_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        _ => None,
    })
}

impl Page {
    /// Create a page
    pub fn new(listings: Vec<Listing>, total_pages: Option<u32>) -> Self {
        Self {
            listings,
            total_pages,
        }
    }

    /// Check if the page carries no records
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
