//! HTTP fetcher for download sources

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::update::{Fetcher, ResponseBody};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("scriptcat/", env!("CARGO_PKG_VERSION"));

/// Streams response bodies over HTTP(S). No timeout is applied.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Box<dyn ResponseBody>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed: HTTP {} for {}", response.status(), url);
        }

        tracing::debug!(
            "Fetching {} ({} bytes advertised)",
            url,
            response
                .content_length()
                .map(|len| len.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(Box::new(HttpBody { response }))
    }
}

struct HttpBody {
    response: reqwest::Response,
}

#[async_trait]
impl ResponseBody for HttpBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let chunk = self
            .response
            .chunk()
            .await
            .context("Failed to read response body")?;

        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}
