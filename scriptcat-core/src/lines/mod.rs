//! Project gatherer for the lines forum
//!
//! Lines runs on Discourse, which serves every category listing as JSON at
//! `<base_url>/c/<category>.json?page=N`. Each topic in the configured
//! category is treated as one project:
//!
//! | entry field    | taken from                                   |
//! |----------------|----------------------------------------------|
//! | `origin`       | always `"lines"`                             |
//! | `project_name` | topic slug                                   |
//! | `author`       | username of the topic's original poster      |
//! | `url`          | `<base_url>/t/<slug>/<id>`                   |

mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, Entry};
use crate::fetch::USER_AGENT;
use crate::update::ProjectGatherer;

pub use types::{CategoryPage, Poster, Topic, TopicList, User};

/// Origin recorded on every entry this gatherer produces
pub const LINES_ORIGIN: &str = "lines";

/// Default forum location
pub const DEFAULT_BASE_URL: &str = "https://llllllll.co";

/// Default category holding project announcements
pub const DEFAULT_CATEGORY: &str = "library";

/// Upper bound on listing pages fetched per run
pub const DEFAULT_MAX_PAGES: usize = 25;

/// Gatherer options, read from the `lines` section of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinesConfig {
    pub base_url: String,
    pub category: String,
    pub max_pages: usize,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl LinesConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// URL of one page of the category listing
    pub fn page_url(&self, page: usize) -> String {
        format!("{}/c/{}.json?page={}", self.base(), self.category, page)
    }

    /// Public URL of a topic
    pub fn topic_url(&self, topic: &Topic) -> String {
        format!("{}/t/{}/{}", self.base(), topic.slug, topic.id)
    }

    /// Slug Discourse gives the category's own description topic
    fn about_slug(&self) -> String {
        format!("about-the-{}-category", self.category)
    }
}

/// Gathers projects from a Discourse category listing
pub struct LinesGatherer {
    client: reqwest::Client,
    config: LinesConfig,
}

impl LinesGatherer {
    pub fn new(config: LinesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    async fn fetch_page(&self, page: usize) -> Result<CategoryPage> {
        let url = self.config.page_url(page);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch topic listing from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch topic listing: HTTP {} from {}",
                response.status(),
                url
            );
        }

        let content = response
            .text()
            .await
            .context("Failed to read response body")?;

        CategoryPage::from_json(&content)
            .with_context(|| format!("Failed to parse topic listing from {url}"))
    }
}

#[async_trait]
impl ProjectGatherer for LinesGatherer {
    async fn gather_projects(&self, catalog: &mut Catalog) -> Result<()> {
        for page_number in 0..self.config.max_pages {
            let page = self.fetch_page(page_number).await?;
            if page.topic_list.topics.is_empty() {
                break;
            }

            let entries = entries_from_page(&self.config, &page);
            debug!(
                "Page {} of '{}': {} projects",
                page_number,
                self.config.category,
                entries.len()
            );
            for entry in entries {
                catalog.insert(entry);
            }

            if page.topic_list.more_topics_url.is_none() {
                break;
            }
        }

        info!(
            "Gathered {} projects from {}",
            catalog.len(),
            self.config.base()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        LINES_ORIGIN
    }
}

/// Convert one listing page into catalog entries
pub fn entries_from_page(config: &LinesConfig, page: &CategoryPage) -> Vec<Entry> {
    let about_slug = config.about_slug();

    page.topic_list
        .topics
        .iter()
        .filter(|topic| !topic.slug.is_empty() && topic.slug != about_slug)
        .map(|topic| Entry {
            origin: LINES_ORIGIN.to_string(),
            project_name: topic.slug.clone(),
            author: page.original_poster(topic).unwrap_or_default().to_string(),
            url: config.topic_url(topic),
        })
        .collect()
}
