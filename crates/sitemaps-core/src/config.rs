//! Sitemap configuration management.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// URL entries for the sitemap, in output order.
    #[serde(default)]
    pub urls: Vec<UrlConfig>,

    /// Plain sitemap output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Sitemap index settings.
    #[serde(default)]
    pub index: IndexConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site domain used for the seed entry and index locations (e.g., "https://example.com").
    pub domain: String,
}

/// A single URL entry as written in the configuration file.
///
/// Values are kept raw here; the generator validates them when the entry is
/// appended to a sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Page location.
    pub loc: String,

    /// Last modification date, preformatted (e.g., "2024-05-01").
    #[serde(default)]
    pub lastmod: Option<String>,

    /// Change frequency token.
    #[serde(default)]
    pub changefreq: Option<String>,

    /// Priority, either a number or a numeric string.
    #[serde(default)]
    pub priority: Option<PriorityConfig>,
}

/// Priority as it may appear in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityConfig {
    Number(f64),
    Text(String),
}

/// Plain sitemap output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated sitemap file.
    #[serde(default = "default_sitemap_path")]
    pub sitemap: String,

    /// Whether to seed the sitemap with the site domain at priority 1.0.
    #[serde(default = "default_true")]
    pub seed_domain: bool,
}

/// Sitemap index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path of the index file.
    #[serde(default = "default_index_path")]
    pub path: String,

    /// File name of the gzip-compressed child sitemap.
    #[serde(default = "default_child_filename")]
    pub filename: String,

    /// Extend an existing index file instead of starting a new one.
    #[serde(default)]
    pub load_existing: bool,

    /// Clock used for child `lastmod` timestamps.
    #[serde(default)]
    pub clock: ClockSetting,
}

/// Clock selection for index timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSetting {
    /// Real UTC time.
    #[default]
    Utc,
    /// Local wall-clock time labelled as UTC.
    Local,
}

impl fmt::Display for PriorityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// Default value functions
fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}

fn default_index_path() -> String {
    "sitemap_index.xml".to_string()
}

fn default_child_filename() -> String {
    "sitemap1.xml.gz".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap: default_sitemap_path(),
            seed_domain: true,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            filename: default_child_filename(),
            load_existing: false,
            clock: ClockSetting::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), urls = config.urls.len(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with `SITEMAPS__*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SITEMAPS").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(path = %path.display(), urls = config.urls.len(), "loaded configuration");
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.domain.is_empty() {
            return Err(CoreError::config("site.domain cannot be empty"));
        }

        if self.index.path.is_empty() {
            return Err(CoreError::config("index.path cannot be empty"));
        }

        if self.index.filename.is_empty() {
            return Err(CoreError::config("index.filename cannot be empty"));
        }

        Ok(())
    }
}
