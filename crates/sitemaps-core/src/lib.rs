//! Sitemaps Core Library
//!
//! Configuration and error handling shared by the sitemap generator and CLI.

pub mod config;
pub mod error;

pub use config::{
    ClockSetting, Config, IndexConfig, OutputConfig, PriorityConfig, SiteConfig, UrlConfig,
};
pub use error::{CoreError, Result};
