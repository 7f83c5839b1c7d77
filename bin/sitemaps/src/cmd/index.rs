//! Index command - stores the sitemap as a gzip child of a sitemap index

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitemaps_core::{ClockSetting, Config};
use sitemaps_generator::{LastmodClock, SitemapIndex};

use super::build::build_sitemap;

/// Options that override the `[index]` configuration section.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexOverrides<'a> {
    /// Index file path.
    pub index: Option<&'a Path>,
    /// Child sitemap file name.
    pub filename: Option<&'a str>,
    /// Extend the existing index file (`Some(true)`) or replace it (`Some(false)`).
    pub load_existing: Option<bool>,
}

/// Run the index command.
///
/// Builds the sitemap, writes it as a gzip-compressed child file and records
/// it in the sitemap index.
pub fn run(config_path: &Path, overrides: IndexOverrides<'_>) -> Result<()> {
    tracing::info!(?config_path, ?overrides, "Starting sitemap index update");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let sitemap = build_sitemap(&config)?;
    let payload = sitemap.to_xml_bytes().wrap_err("Failed to render sitemap")?;

    let index_path = overrides
        .index
        .unwrap_or_else(|| Path::new(&config.index.path));
    let filename = overrides.filename.unwrap_or(config.index.filename.as_str());
    let load_existing = overrides
        .load_existing
        .unwrap_or(config.index.load_existing);

    let mut index = SitemapIndex::open(config.site.domain.as_str(), index_path, load_existing)
        .wrap_err_with(|| format!("Failed to open sitemap index {}", index_path.display()))?
        .with_clock(clock_for(config.index.clock));

    index
        .append(filename, &payload)
        .wrap_err_with(|| format!("Failed to write child sitemap {filename}"))?;
    index
        .save()
        .wrap_err_with(|| format!("Failed to save sitemap index {}", index_path.display()))?;

    println!();
    println!("  Child sitemap:  {filename} ({} URLs)", sitemap.len());
    println!("  Index written:  {}", index_path.display());
    println!(
        "  Index entries:  {}",
        index.preserved_count() + index.refs().len()
    );
    println!();

    Ok(())
}

fn clock_for(setting: ClockSetting) -> LastmodClock {
    match setting {
        ClockSetting::Utc => LastmodClock::Utc,
        ClockSetting::Local => LastmodClock::LocalAsUtc,
    }
}
