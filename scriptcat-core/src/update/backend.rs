//! Collaborator traits used by the update loop
//!
//! The update loop never talks to the network itself:
//! - a [`ProjectGatherer`] fills a fresh catalog for `lines` sources
//! - a [`Fetcher`] opens a byte stream for `download` sources
//!
//! Both are swapped for mocks in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::Catalog;

/// Populates a catalog from some external project listing
#[async_trait]
pub trait ProjectGatherer: Send + Sync {
    /// Insert every discovered project into `catalog`
    async fn gather_projects(&self, catalog: &mut Catalog) -> Result<()>;

    /// Gatherer identifier for progress output and logging
    fn name(&self) -> &'static str;
}

/// Opens a remote resource for reading
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue the request and return the response body.
    ///
    /// Implementations must fail here, before any body is returned, when the
    /// server does not answer with success.
    async fn fetch(&self, url: &str) -> Result<Box<dyn ResponseBody>>;
}

/// A response body read chunk by chunk
#[async_trait]
pub trait ResponseBody: Send {
    /// Next chunk of the body, or `None` once it is exhausted
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Body served from memory; errors once drained when `interrupted` is set
#[cfg(test)]
pub struct MockBody {
    pub chunks: std::collections::VecDeque<Vec<u8>>,
    pub interrupted: bool,
}

#[cfg(test)]
#[async_trait]
impl ResponseBody for MockBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None if self.interrupted => anyhow::bail!("connection reset mid-body"),
            None => Ok(None),
        }
    }
}

/// Fetcher returning fixed chunks, or failing when `chunks` is `None`
#[cfg(test)]
pub struct MockFetcher {
    pub chunks: Option<Vec<Vec<u8>>>,
    pub interrupted: bool,
    pub requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFetcher {
    pub fn serving(body: &[u8]) -> Self {
        Self {
            chunks: Some(vec![body.to_vec()]),
            interrupted: false,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            chunks: None,
            interrupted: false,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Serves `chunks`, then fails instead of ending the body
    pub fn interrupted(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: Some(chunks),
            interrupted: true,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Box<dyn ResponseBody>> {
        self.requests.lock().unwrap().push(url.to_string());
        match &self.chunks {
            Some(chunks) => Ok(Box::new(MockBody {
                chunks: chunks.iter().cloned().collect(),
                interrupted: self.interrupted,
            })),
            None => anyhow::bail!("connection refused: {url}"),
        }
    }
}

/// Gatherer inserting fixed entries, or failing when `entries` is `None`
#[cfg(test)]
pub struct MockGatherer {
    pub entries: Option<Vec<crate::catalog::Entry>>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGatherer {
    pub fn with_entries(entries: Vec<crate::catalog::Entry>) -> Self {
        Self {
            entries: Some(entries),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            entries: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl ProjectGatherer for MockGatherer {
    async fn gather_projects(&self, catalog: &mut Catalog) -> Result<()> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.entries {
            Some(entries) => {
                for entry in entries {
                    catalog.insert(entry.clone());
                }
                Ok(())
            }
            None => anyhow::bail!("forum listing unavailable"),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
