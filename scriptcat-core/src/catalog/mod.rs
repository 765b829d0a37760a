//! Script catalog - versioned, keyed project records
//!
//! A catalog file is a JSON document with a schema header and the
//! entries keyed by project name:
//!
//! ```text
//! {
//!   "file_info": { "version": 1, "kind": "script_catalog" },
//!   "entries": {
//!     "<project_name>": { "origin", "project_name", "author", "url" }
//!   }
//! }
//! ```
//!
//! Loading accepts any header. Storing refuses anything but the
//! compiled-in [`Header::current`], so a file written by a different schema
//! version is never silently rewritten in the current shape.

mod error;
mod store;

pub use error::CatalogError;
pub use store::{Catalog, Entry, Header, CATALOG_KIND, CATALOG_VERSION};

#[cfg(test)]
mod tests;
