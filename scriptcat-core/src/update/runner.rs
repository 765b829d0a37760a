//! The update loop

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{Fetcher, ProjectGatherer, UpdateError};
use crate::catalog::Catalog;
use crate::paths::expand_path;
use crate::sources::{ConfigurationError, ParsedSources, SourceSpec};

/// What happened to a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// A fresh catalog with `entries` entries was written to `path`
    Cataloged { path: PathBuf, entries: usize },

    /// `bytes` bytes were copied verbatim to `path`
    Downloaded { path: PathBuf, bytes: u64 },

    /// The source definition was unusable and nothing was done
    Skipped(ConfigurationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub key: String,
    pub outcome: SourceOutcome,
}

/// Outcome of a run that did not abort
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub sources: Vec<SourceReport>,
}

impl UpdateReport {
    /// Look up the outcome for a source key
    pub fn outcome(&self, key: &str) -> Option<&SourceOutcome> {
        self.sources
            .iter()
            .find(|report| report.key == key)
            .map(|report| &report.outcome)
    }

    pub fn updated_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|report| !matches!(report.outcome, SourceOutcome::Skipped(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.sources.len() - self.updated_count()
    }
}

/// Drives catalog refresh for every configured source
pub struct Updater<'a> {
    gatherer: &'a dyn ProjectGatherer,
    fetcher: &'a dyn Fetcher,
}

impl<'a> Updater<'a> {
    pub fn new(gatherer: &'a dyn ProjectGatherer, fetcher: &'a dyn Fetcher) -> Self {
        Self { gatherer, fetcher }
    }

    /// Update every source, writing progress lines to `progress`.
    ///
    /// Sources are processed strictly one after another. The first fatal
    /// error stops the run; sources after it are not touched.
    pub async fn run<W: Write>(
        &self,
        sources: &ParsedSources,
        progress: &mut W,
    ) -> Result<UpdateReport, UpdateError> {
        let mut report = UpdateReport::default();

        for (key, source) in sources {
            emit(progress, format_args!("Updating: {key}; "));

            let outcome = match source {
                Ok(SourceSpec::Lines { output }) => self.update_lines(key, output, progress).await?,
                Ok(SourceSpec::Download { output, url }) => {
                    self.update_download(key, output, url, progress).await?
                }
                Err(problem) => {
                    let message = describe_problem(key, problem);
                    warn!("Skipping source '{}': {}", key, message);
                    emit(progress, format_args!("{message}\n"));
                    SourceOutcome::Skipped(problem.clone())
                }
            };

            report.sources.push(SourceReport {
                key: key.clone(),
                outcome,
            });
        }

        info!(
            "Update finished: {} updated, {} skipped",
            report.updated_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    async fn update_lines<W: Write>(
        &self,
        key: &str,
        output: &str,
        progress: &mut W,
    ) -> Result<SourceOutcome, UpdateError> {
        let path = expand_path(output);
        emit(
            progress,
            format_args!("fetching topics from {}... ", self.gatherer.name()),
        );

        let mut catalog = Catalog::new();
        self.gatherer
            .gather_projects(&mut catalog)
            .await
            .map_err(|source| UpdateError::Gather {
                key: key.to_string(),
                source,
            })?;
        debug!("Gathered {} projects for '{}'", catalog.len(), key);

        let file = File::create(&path).map_err(|source| UpdateError::CreateOutput {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;

        catalog
            .store(BufWriter::new(file))
            .map_err(|source| UpdateError::Store {
                key: key.to_string(),
                path: path.clone(),
                source,
            })?;

        emit(progress, format_args!("wrote: {}\n", path.display()));
        info!(
            "Wrote catalog for '{}' to {} ({} entries)",
            key,
            path.display(),
            catalog.len()
        );

        Ok(SourceOutcome::Cataloged {
            path,
            entries: catalog.len(),
        })
    }

    async fn update_download<W: Write>(
        &self,
        key: &str,
        output: &str,
        url: &str,
        progress: &mut W,
    ) -> Result<SourceOutcome, UpdateError> {
        let path = expand_path(output);
        emit(progress, format_args!("fetching {url}... "));

        let download_error = |source: anyhow::Error| UpdateError::Download {
            key: key.to_string(),
            url: url.to_string(),
            source,
        };
        let write_error = |source: std::io::Error| UpdateError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        // The request goes out before the file is touched so a failed fetch
        // leaves any previous download in place.
        let mut body = self.fetcher.fetch(url).await.map_err(download_error)?;

        let mut file = File::create(&path).map_err(|source| UpdateError::CreateOutput {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;

        let mut bytes = 0u64;
        while let Some(chunk) = body.chunk().await.map_err(download_error)? {
            file.write_all(&chunk).map_err(write_error)?;
            bytes += chunk.len() as u64;
        }
        file.flush().map_err(write_error)?;

        emit(progress, format_args!("wrote: {}\n", path.display()));
        info!(
            "Downloaded {} for '{}' to {} ({} bytes)",
            url,
            key,
            path.display(),
            bytes
        );

        Ok(SourceOutcome::Downloaded { path, bytes })
    }
}

fn describe_problem(key: &str, problem: &ConfigurationError) -> String {
    match problem {
        ConfigurationError::MissingField { .. } | ConfigurationError::Malformed { .. } => {
            format!("{problem}: {key}")
        }
        ConfigurationError::UnrecognizedKind { .. } => problem.to_string(),
    }
}

/// Progress output is best effort; a closed stdout must not fail the run
fn emit<W: Write>(progress: &mut W, args: fmt::Arguments<'_>) {
    if let Err(e) = progress.write_fmt(args).and_then(|_| progress.flush()) {
        debug!("Failed to write progress output: {}", e);
    }
}
