//! Sitemap generation.
//!
//! Builds a `<urlset>` document from validated URL entries.

use std::{fs::File, io::Write, path::Path};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    entry::{LastModified, PriorityValue, UrlEntry, ValidationError, format_priority},
    xml::{self, DocumentWriter, XmlError},
};

/// Number of URLs a single sitemap may list under the protocol.
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Rejected URL entry.
    #[error("invalid URL entry: {0}")]
    Validation(#[from] ValidationError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML encoding error.
    #[error("XML encoding error: {0}")]
    Xml(#[from] XmlError),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// An in-memory sitemap document.
///
/// Entries are kept in insertion order. Rendering never mutates the document,
/// so it can be serialized any number of times.
#[derive(Debug, Clone, Default)]
pub struct SitemapDocument {
    entries: Vec<UrlEntry>,
}

impl SitemapDocument {
    /// Create an empty sitemap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sitemap seeded with `domain` at priority 1.0.
    ///
    /// An empty domain yields an empty sitemap.
    pub fn with_domain(domain: &str) -> std::result::Result<Self, ValidationError> {
        let mut sitemap = Self::new();
        if !domain.is_empty() {
            sitemap.append(domain, None, None, Some(PriorityValue::Number(1.0)))?;
        }
        Ok(sitemap)
    }

    /// Validate and append a URL entry.
    ///
    /// Nothing is recorded when validation fails.
    pub fn append(
        &mut self,
        loc: impl Into<String>,
        lastmod: Option<LastModified>,
        changefreq: Option<&str>,
        priority: Option<PriorityValue>,
    ) -> std::result::Result<(), ValidationError> {
        let entry = UrlEntry::new(loc, lastmod, changefreq, priority)?;
        self.push(entry);
        Ok(())
    }

    /// Append an already validated entry.
    pub fn push(&mut self, entry: UrlEntry) {
        debug!(loc = entry.loc(), "appending url");
        self.entries.push(entry);
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sitemap has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the sitemap as a pretty-printed XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        debug!(count = self.entries.len(), "generating sitemap");

        if self.entries.len() > MAX_URLS_PER_SITEMAP {
            warn!(
                count = self.entries.len(),
                limit = MAX_URLS_PER_SITEMAP,
                "sitemap exceeds the protocol URL limit"
            );
        }

        let root = xml::namespaced_root("urlset");
        let xml = xml::render_document(&[], &root, &[], |writer| {
            for entry in &self.entries {
                write_url(writer, entry)?;
            }
            Ok(())
        })?;

        Ok(xml)
    }

    /// Render the sitemap as UTF-8 bytes, ready to be stored in an index.
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_xml_string()?.into_bytes())
    }

    /// Write the sitemap to a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let xml = self.to_xml_string()?;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Write the sitemap to `path`, overwriting any existing file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;

        let mut file = File::create(path)?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;

        info!(path = %path.display(), urls = self.entries.len(), "saved sitemap");
        Ok(())
    }
}

/// Write one `<url>` element, children in `loc, lastmod, changefreq, priority` order.
fn write_url(writer: &mut DocumentWriter, entry: &UrlEntry) -> xml::Result<()> {
    xml::start(writer, "url")?;

    xml::write_text_element(writer, "loc", entry.loc())?;

    if let Some(lastmod) = entry.lastmod() {
        xml::write_text_element(writer, "lastmod", lastmod)?;
    }

    if let Some(changefreq) = entry.changefreq() {
        xml::write_text_element(writer, "changefreq", changefreq.as_str())?;
    }

    if let Some(priority) = entry.priority() {
        xml::write_text_element(writer, "priority", &format_priority(priority))?;
    }

    xml::end(writer, "url")
}
