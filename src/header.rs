//! Schema that filter expressions are compiled against.

use crate::value::{Affinity, Row, Variant};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderItem {
    pub name: String,
    pub affinity: Affinity,
}

impl HeaderItem {
    pub fn new(name: impl Into<String>, affinity: Affinity) -> Self {
        Self {
            name: name.into(),
            affinity,
        }
    }
}

/// Ordered list of columns. Names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    items: Vec<HeaderItem>,
}

impl Header {
    pub fn new(items: Vec<HeaderItem>) -> Self {
        Self { items }
    }

    /// Load a header from a JSON array of `{"name", "affinity"}` objects
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read header file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid header file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let header: Header = serde_json::from_str(text)?;
        Ok(header)
    }

    /// Parse a column written as `name:affinity`
    pub fn parse_column(text: &str) -> Result<HeaderItem> {
        let Some((name, affinity)) = text.split_once(':') else {
            bail!("Column '{}' must be written as name:affinity", text);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Column '{}' has an empty name", text);
        }
        Ok(HeaderItem::new(name, affinity.trim().parse()?))
    }

    pub fn push(&mut self, item: HeaderItem) {
        self.items.push(item);
    }

    /// Find a column by name, ignoring case
    pub fn find(&self, name: &str) -> Option<(usize, &HeaderItem)> {
        let name = name.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.name.to_lowercase() == name)
    }

    pub fn get(&self, index: usize) -> Option<&HeaderItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderItem> {
        self.items.iter()
    }

    /// Check a raw row against this header and convert its cells to the
    /// declared affinities. Null cells are rejected.
    pub fn conform(&self, row: Vec<Variant>) -> Result<Row> {
        if row.len() != self.items.len() {
            bail!(
                "Row has {} values but the header has {} columns",
                row.len(),
                self.items.len()
            );
        }
        row.into_iter()
            .zip(self.items.iter())
            .map(|(value, item)| {
                if matches!(value, Variant::None) {
                    bail!("Column '{}' is null", item.name);
                }
                value
                    .conform(item.affinity)
                    .with_context(|| format!("Invalid value for column '{}'", item.name))
            })
            .collect()
    }
}

impl FromIterator<HeaderItem> for Header {
    fn from_iter<I: IntoIterator<Item = HeaderItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<HeaderItem>> for Header {
    fn from(items: Vec<HeaderItem>) -> Self {
        Self::new(items)
    }
}
