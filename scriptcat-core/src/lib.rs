//! scriptcat core library
//!
//! Maintains a local catalog of externally discovered projects and refreshes
//! it from configured sources.
//!
//! ```text
//! config.yaml ──▶ sources ──▶ update::Updater ──┬──▶ lines::LinesGatherer ──▶ catalog::Catalog ──▶ <output>.json
//!                                                └──▶ fetch::HttpFetcher    ──────────────────────▶ <output>
//! ```

pub mod catalog;
pub mod fetch;
pub mod lines;
pub mod paths;
pub mod settings;
pub mod sources;
pub mod update;
