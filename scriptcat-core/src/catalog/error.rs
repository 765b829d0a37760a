//! Catalog load/store errors

use thiserror::Error;

use super::Header;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The input stream could not be read
    #[error("Failed to read catalog data")]
    Read(#[source] std::io::Error),

    /// The input is not a well-formed catalog document
    #[error("Failed to parse catalog (malformed or truncated document)")]
    Deserialize(#[source] serde_json::Error),

    /// The catalog carries a header other than the one this build writes
    #[error("Catalog header does not match: found {found}, expected {expected}")]
    HeaderMismatch { found: Header, expected: Header },

    #[error("Failed to serialize catalog")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write catalog data")]
    Write(#[source] std::io::Error),
}

impl CatalogError {
    /// True for the errors `Catalog::load` returns on bad input
    pub fn is_deserialization(&self) -> bool {
        matches!(self, CatalogError::Deserialize(_) | CatalogError::Read(_))
    }
}
