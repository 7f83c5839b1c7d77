//! Check command - validate configuration and URL entries

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use sitemaps_core::Config;
use sitemaps_generator::SitemapDocument;

use super::build::append_url;

/// Run the check command.
///
/// Validates the configuration and every URL entry, reporting all failures
/// rather than stopping at the first.
pub fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking configuration");

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration check failed");
        }
    };

    println!("\nChecking URL entries...");
    let errors = validate_urls(&config);
    for error in &errors {
        println!("  ✗ {error}");
    }

    if !errors.is_empty() {
        bail!("{} invalid URL entries", errors.len());
    }

    let seeded = usize::from(config.output.seed_domain);
    println!("  ✓ {} URL entries valid", config.urls.len() + seeded);
    Ok(())
}

/// Validate the domain seed and each configured URL, returning one message
/// per invalid entry.
fn validate_urls(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    let seed = config
        .output
        .seed_domain
        .then(|| SitemapDocument::with_domain(&config.site.domain));
    if let Some(Err(e)) = seed {
        errors.push(format!("site.domain seed entry: {e}"));
    }

    let mut scratch = SitemapDocument::new();
    errors.extend(config.urls.iter().enumerate().filter_map(|(i, url)| {
        append_url(&mut scratch, url)
            .err()
            .map(|e| format!("entry #{} ({}): {e}", i + 1, url.loc))
    }));

    errors
}
