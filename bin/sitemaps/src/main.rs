//! Sitemaps CLI
//!
//! Generates sitemaps.org sitemaps and gzip-backed sitemap indexes.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use sitemaps::cmd::index::IndexOverrides;

/// Command-line interface for sitemap generation.
#[derive(Parser)]
#[command(
    name = "sitemaps",
    version,
    about = "Generate XML sitemaps and sitemap indexes"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sitemaps.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the sitemap and save it as plain XML
    Build {
        /// Output file (defaults to output.sitemap from the config)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Store the sitemap as a gzip child and record it in a sitemap index
    Index {
        /// Index file (defaults to index.path from the config)
        #[arg(short, long)]
        index: Option<std::path::PathBuf>,
        /// Child file name (defaults to index.filename from the config)
        #[arg(short, long)]
        filename: Option<String>,
        /// Extend the existing index file instead of replacing it
        #[arg(long, conflicts_with = "no_load_existing")]
        load_existing: bool,
        /// Replace the index file even if the config asks to extend it
        #[arg(long)]
        no_load_existing: bool,
    },
    /// Validate configuration and URL entries
    Check,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitemaps::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            sitemaps::cmd::build::run(&cli.config, output.as_deref())?;
        }
        Commands::Index {
            index,
            filename,
            load_existing,
            no_load_existing,
        } => {
            sitemaps::cmd::index::run(
                &cli.config,
                IndexOverrides {
                    index: index.as_deref(),
                    filename: filename.as_deref(),
                    load_existing: load_existing_flag(load_existing, no_load_existing),
                },
            )?;
        }
        Commands::Check => {
            sitemaps::cmd::check::run(&cli.config)?;
        }
    }

    Ok(())
}

/// Collapse the `--load-existing` / `--no-load-existing` pair into an override.
fn load_existing_flag(load_existing: bool, no_load_existing: bool) -> Option<bool> {
    if load_existing {
        Some(true)
    } else if no_load_existing {
        Some(false)
    } else {
        None
    }
}
