//! Sitemaps Generator Library
//!
//! Builders for sitemaps.org 0.9 documents.
//!
//! # Modules
//!
//! - [`entry`] - URL entry model and validation
//! - [`sitemap`] - `<urlset>` sitemap documents
//! - [`index`] - `<sitemapindex>` documents with gzip-compressed children
//! - [`compress`] - Gzip payload writing
//! - [`xml`] - Shared XML rendering helpers
//!
//! # Example
//!
//! ```no_run
//! use sitemaps_generator::{SitemapDocument, SitemapIndex};
//!
//! let mut sitemap = SitemapDocument::new();
//! sitemap.append("http://www.example.com", None, Some("weekly"), Some(0.9_f64.into()))?;
//! sitemap.append("http://www.example.com/a1", None, Some("monthly"), Some(0.7_f64.into()))?;
//! sitemap.save_to_file("sitemap.xml")?;
//!
//! let mut index = SitemapIndex::new("http://www.example.com", "root_sitemap.xml");
//! index.append("sitemap1.xml.gz", &sitemap.to_xml_bytes()?)?;
//! index.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compress;
pub mod entry;
pub mod index;
pub mod sitemap;
pub mod xml;

pub use entry::{ChangeFreq, LastModified, PriorityValue, UrlEntry, ValidationError};
pub use index::{IndexError, LastmodClock, SitemapIndex, SitemapRef};
pub use sitemap::{SitemapDocument, SitemapError};
pub use xml::SITEMAP_NAMESPACE;
