//! Catalog CLI commands
//!
//! `update` refreshes every configured source; `list` and `show` read a
//! catalog file produced by a `lines` source.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use scriptcat_core::catalog::{Catalog, Entry};
use scriptcat_core::fetch::HttpFetcher;
use scriptcat_core::lines::LinesGatherer;
use scriptcat_core::settings::Settings;
use scriptcat_core::update::Updater;

/// Catalog subcommand for refreshing and browsing catalogs
#[derive(Parser, Debug)]
pub struct CatalogCommand {
    #[clap(subcommand)]
    pub command: CatalogSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CatalogSubcommand {
    /// Update all configured catalog sources
    Update,

    /// List the projects in a catalog file
    List {
        /// Catalog file
        file: PathBuf,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show a single project from a catalog file
    Show {
        /// Catalog file
        file: PathBuf,

        /// Project name
        name: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

impl CatalogCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        match self.command {
            CatalogSubcommand::Update => execute_update(config).await,
            CatalogSubcommand::List { file, json } => execute_list(&file, json),
            CatalogSubcommand::Show { file, name, json } => execute_show(&file, &name, json),
        }
    }
}

async fn execute_update(config: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config)?;
    let sources = settings.parsed_sources();

    if sources.is_empty() {
        println!("No catalog sources configured.");
        return Ok(());
    }

    let gatherer = LinesGatherer::new(settings.lines.clone())?;
    let fetcher = HttpFetcher::new()?;

    let mut stdout = std::io::stdout();
    let report = Updater::new(&gatherer, &fetcher)
        .run(&sources, &mut stdout)
        .await
        .context("Catalog update aborted")?;

    tracing::debug!(
        "{} sources updated, {} skipped",
        report.updated_count(),
        report.skipped_count()
    );
    Ok(())
}

fn load_catalog(file: &Path) -> Result<Catalog> {
    let reader = File::open(file)
        .with_context(|| format!("Failed to open catalog: {}", file.display()))?;
    Catalog::load(reader).with_context(|| format!("Failed to load catalog: {}", file.display()))
}

/// Table row for catalog listings
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Origin")]
    origin: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.project_name.clone(),
            author: entry.author.clone(),
            origin: entry.origin.clone(),
            url: entry.url.clone(),
        }
    }
}

fn sorted_entries(catalog: &Catalog) -> Vec<Entry> {
    let mut entries = catalog.entries();
    entries.sort_by(|a, b| a.project_name.cmp(&b.project_name));
    entries
}

fn execute_list(file: &Path, json_output: bool) -> Result<()> {
    let catalog = load_catalog(file)?;
    let entries = sorted_entries(&catalog);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No projects in catalog.");
        return Ok(());
    }

    println!("{} project(s) ({}):\n", entries.len(), catalog.header());

    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
    Ok(())
}

fn execute_show(file: &Path, name: &str, json_output: bool) -> Result<()> {
    let catalog = load_catalog(file)?;
    let entry = catalog
        .get(name)
        .with_context(|| format!("Project '{name}' not found in {}", file.display()))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!();
        println!("Project: {}", entry.project_name);
        println!("Author:  {}", entry.author);
        println!("Origin:  {}", entry.origin);
        println!("URL:     {}", entry.url);
    }

    Ok(())
}
