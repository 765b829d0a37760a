//! In-memory catalog and its JSON load/store

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

use super::CatalogError;

/// Schema version written by this build
pub const CATALOG_VERSION: i64 = 1;

/// Schema discriminator written by this build
pub const CATALOG_KIND: &str = "script_catalog";

/// File type and schema version, stored as `file_info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    #[serde(deserialize_with = "null_as_default")]
    pub version: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

impl Header {
    /// The header every stored catalog must carry
    pub fn current() -> Self {
        Self {
            version: CATALOG_VERSION,
            kind: CATALOG_KIND.to_string(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version {} kind '{}'", self.version, self.kind)
    }
}

/// A project recorded in the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    /// Which source produced the record (e.g. "lines")
    #[serde(deserialize_with = "null_as_default")]
    pub origin: String,

    /// Unique key within the catalog
    #[serde(deserialize_with = "null_as_default")]
    pub project_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub author: String,

    /// Location of the project resource
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// On-disk shape of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogContent {
    #[serde(rename = "file_info", default, deserialize_with = "null_as_default")]
    header: Header,

    #[serde(default, deserialize_with = "null_as_default")]
    entries: BTreeMap<String, Entry>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A keyed collection of project entries under a versioned header
#[derive(Debug, Clone)]
pub struct Catalog {
    content: CatalogContent,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog stamped with the current header
    pub fn new() -> Self {
        Self {
            content: CatalogContent {
                header: Header::current(),
                entries: BTreeMap::new(),
            },
        }
    }

    /// Load a catalog from its JSON form
    ///
    /// The header is not checked here; a foreign or outdated header only
    /// becomes an error when the catalog is stored again.
    pub fn load<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(CatalogError::Read)?;

        let content: CatalogContent =
            serde_json::from_slice(&data).map_err(CatalogError::Deserialize)?;

        tracing::debug!(
            "Loaded catalog ({}, {} entries)",
            content.header,
            content.entries.len()
        );

        Ok(Self { content })
    }

    /// Write the catalog in JSON form
    pub fn store<W: Write>(&self, mut writer: W) -> Result<(), CatalogError> {
        let expected = Header::current();
        if self.content.header != expected {
            return Err(CatalogError::HeaderMismatch {
                found: self.content.header.clone(),
                expected,
            });
        }

        let data = serde_json::to_vec(&self.content).map_err(CatalogError::Serialize)?;
        writer.write_all(&data).map_err(CatalogError::Write)?;
        writer.flush().map_err(CatalogError::Write)?;

        Ok(())
    }

    /// Insert an entry, replacing any entry with the same project name
    pub fn insert(&mut self, entry: Entry) {
        self.content
            .entries
            .insert(entry.project_name.clone(), entry);
    }

    /// All entries currently held (order is not part of the contract)
    pub fn entries(&self) -> Vec<Entry> {
        self.content.entries.values().cloned().collect()
    }

    pub fn get(&self, project_name: &str) -> Option<&Entry> {
        self.content.entries.get(project_name)
    }

    pub fn header(&self) -> &Header {
        &self.content.header
    }

    pub fn len(&self) -> usize {
        self.content.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.entries.is_empty()
    }
}
