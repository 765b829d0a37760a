//! Source update orchestration
//!
//! Walks the configured sources one at a time, in key order:
//!
//! ```text
//! lines     ──▶ Catalog::new ──▶ ProjectGatherer ──▶ create <output> ──▶ Catalog::store
//! download  ──▶ Fetcher::fetch ──▶ create <output> ──▶ copy body verbatim
//! ```
//!
//! Configuration problems with a single source are reported and skipped.
//! Anything that goes wrong once a source has started doing I/O aborts the
//! whole run with an [`UpdateError`].

mod backend;
mod error;
mod runner;

pub use backend::{Fetcher, ProjectGatherer, ResponseBody};
pub use error::UpdateError;
pub use runner::{SourceOutcome, SourceReport, UpdateReport, Updater};
