//! Build command - writes the plain sitemap

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitemaps_core::{Config, PriorityConfig, UrlConfig};
use sitemaps_generator::{PriorityValue, SitemapDocument, ValidationError};

/// Run the build command.
///
/// Builds the sitemap described by the configuration and saves it to
/// `output`, or to `output.sitemap` from the configuration.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, ?output, "Starting sitemap build");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let sitemap = build_sitemap(&config)?;

    let output = output.unwrap_or_else(|| Path::new(&config.output.sitemap));
    sitemap
        .save_to_file(output)
        .wrap_err_with(|| format!("Failed to write sitemap to {}", output.display()))?;

    println!();
    println!("  Sitemap written: {}", output.display());
    println!("  URLs:            {}", sitemap.len());
    println!();

    Ok(())
}

/// Build the sitemap from configuration, stopping at the first invalid entry.
pub fn build_sitemap(config: &Config) -> Result<SitemapDocument> {
    let mut sitemap = if config.output.seed_domain {
        SitemapDocument::with_domain(&config.site.domain)
            .wrap_err("Invalid site.domain for the seed entry")?
    } else {
        SitemapDocument::new()
    };

    for (i, url) in config.urls.iter().enumerate() {
        append_url(&mut sitemap, url)
            .wrap_err_with(|| format!("Invalid URL entry #{} ({})", i + 1, url.loc))?;
    }

    tracing::debug!(urls = sitemap.len(), "Built sitemap from configuration");
    Ok(sitemap)
}

/// Append one configured URL entry.
pub fn append_url(sitemap: &mut SitemapDocument, url: &UrlConfig) -> Result<(), ValidationError> {
    let priority = url.priority.as_ref().map(|p| match p {
        PriorityConfig::Number(n) => PriorityValue::Number(*n),
        PriorityConfig::Text(s) => PriorityValue::Text(s.clone()),
    });

    sitemap.append(
        url.loc.as_str(),
        url.lastmod.as_deref().map(Into::into),
        url.changefreq.as_deref(),
        priority,
    )
}

#[cfg(test)]
mod tests {
    use sitemaps_core::config::{IndexConfig, OutputConfig, SiteConfig};

    use super::*;

    fn test_config(urls: Vec<UrlConfig>) -> Config {
        Config {
            site: SiteConfig {
                domain: "http://www.x.com".to_string(),
            },
            urls,
            output: OutputConfig::default(),
            index: IndexConfig::default(),
        }
    }

    fn url(loc: &str, changefreq: Option<&str>, priority: Option<PriorityConfig>) -> UrlConfig {
        UrlConfig {
            loc: loc.to_string(),
            lastmod: None,
            changefreq: changefreq.map(str::to_string),
            priority,
        }
    }

    #[test]
    fn test_build_sitemap_seeds_domain() {
        let config = test_config(vec![url(
            "http://www.x.com/a1",
            Some("monthly"),
            Some(PriorityConfig::Text("0.7".to_string())),
        )]);

        let sitemap = build_sitemap(&config).unwrap();

        assert_eq!(sitemap.len(), 2);
        assert_eq!(sitemap.entries()[0].loc(), "http://www.x.com");
        assert_eq!(sitemap.entries()[0].priority(), Some(1.0));
        assert_eq!(sitemap.entries()[1].priority(), Some(0.7));
    }

    #[test]
    fn test_build_sitemap_without_seed() {
        let mut config = test_config(vec![url("http://www.x.com/a1", None, None)]);
        config.output.seed_domain = false;

        let sitemap = build_sitemap(&config).unwrap();
        assert_eq!(sitemap.len(), 1);
    }

    #[test]
    fn test_build_sitemap_reports_bad_entry() {
        let config = test_config(vec![
            url("http://www.x.com/a1", None, None),
            url("http://www.x.com/a2", Some("often"), None),
        ]);

        let err = build_sitemap(&config).unwrap_err();
        assert!(format!("{err:#}").contains("#2"));
    }

    #[test]
    fn test_run_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sitemaps.toml");
        let output = dir.path().join("sitemap.xml");
        std::fs::write(
            &config_path,
            r#"
[site]
domain = "http://www.x.com"

[[urls]]
loc = "http://www.x.com/a1"
priority = 0.5
"#,
        )
        .unwrap();

        run(&config_path, Some(&output)).unwrap();

        let saved = std::fs::read_to_string(&output).unwrap();
        assert!(saved.contains("<loc>http://www.x.com/a1</loc>"));
        assert!(saved.contains("<priority>0.5</priority>"));
    }
}
