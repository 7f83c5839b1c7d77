//! Sitemap index generation.
//!
//! A [`SitemapIndex`] lists gzip-compressed child sitemaps. Appending a child
//! writes its compressed payload to disk first and only then records the
//! reference, so the index never points at a file that failed to write.
//!
//! An index can also be loaded from an existing file. Its `sitemapindex` root
//! and everything inside it are kept as parsed events and replayed verbatim
//! ahead of the newly appended references.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use quick_xml::{
    Reader,
    events::{BytesStart, BytesText, Event},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    compress,
    xml::{self, DocumentWriter, XmlError},
};

/// Timestamp format of a child sitemap `<lastmod>`.
pub const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const ROOT_ELEMENT: &str = "sitemapindex";
const SITEMAP_ELEMENT: &str = "sitemap";

/// Sitemap index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Index file to load does not exist.
    #[error("index file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Index file is malformed or has no `sitemapindex` element.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// XML encoding error.
    #[error("XML encoding error: {0}")]
    Xml(#[from] XmlError),
}

impl IndexError {
    fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Clock used to stamp appended references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LastmodClock {
    /// Current UTC time.
    #[default]
    Utc,
    /// Current local wall-clock time, labelled `Z` without conversion.
    LocalAsUtc,
    /// A fixed instant.
    Fixed(NaiveDateTime),
}

impl LastmodClock {
    /// Current instant according to this clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::Utc => chrono::Utc::now().naive_utc(),
            Self::LocalAsUtc => chrono::Local::now().naive_local(),
            Self::Fixed(instant) => *instant,
        }
    }

    /// Current instant formatted as `YYYY-MM-DDTHH:MM:SSZ`.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.now().format(LASTMOD_FORMAT).to_string()
    }
}

/// A reference to a child sitemap appended during this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRef {
    /// Absolute location, `domain/filename`.
    pub loc: String,

    /// Time of the append.
    pub lastmod: String,

    /// Path of the compressed payload on disk.
    pub path: PathBuf,
}

/// Pass-through content of a loaded index file.
#[derive(Debug, Clone)]
struct LoadedIndex {
    /// Nodes before the root element, without the XML declaration.
    prefix: Vec<Event<'static>>,
    /// The root start tag with its original attributes.
    root: BytesStart<'static>,
    /// Every node inside the root.
    body: Vec<Event<'static>>,
    /// Nodes after the root element.
    suffix: Vec<Event<'static>>,
    /// Number of direct `sitemap` children.
    sitemaps: usize,
}

/// An in-memory sitemap index bound to a file path.
#[derive(Debug, Clone)]
pub struct SitemapIndex {
    domain: String,
    path: PathBuf,
    clock: LastmodClock,
    loaded: Option<LoadedIndex>,
    refs: Vec<SitemapRef>,
}

impl SitemapIndex {
    /// Create an empty index. Performs no I/O.
    ///
    /// `domain` is used as given; a trailing slash produces a doubled
    /// separator in every appended location.
    pub fn new(domain: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let domain = domain.into();
        if domain.ends_with('/') {
            warn!(%domain, "index domain has a trailing slash");
        }

        Self {
            domain,
            path: path.into(),
            clock: LastmodClock::default(),
            loaded: None,
            refs: Vec::new(),
        }
    }

    /// Load an existing index file so further references extend it.
    pub fn load(domain: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let mut index = Self::new(domain, path);

        let bytes = match fs::read(&index.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(IndexError::NotFound { path: index.path });
            }
            Err(e) => return Err(e.into()),
        };
        let content = String::from_utf8(bytes)
            .map_err(|e| IndexError::parse(&index.path, format!("invalid UTF-8: {e}")))?;

        let loaded = parse_index(&content, &index.path)?;
        info!(
            path = %index.path.display(),
            sitemaps = loaded.sitemaps,
            "loaded sitemap index"
        );

        index.loaded = Some(loaded);
        Ok(index)
    }

    /// Create a fresh index or load the existing one at `path`.
    pub fn open(
        domain: impl Into<String>,
        path: impl Into<PathBuf>,
        load_existing: bool,
    ) -> Result<Self> {
        if load_existing {
            Self::load(domain, path)
        } else {
            Ok(Self::new(domain, path))
        }
    }

    /// Use a different clock for appended references.
    #[must_use]
    pub fn with_clock(mut self, clock: LastmodClock) -> Self {
        self.clock = clock;
        self
    }

    /// Site domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Path the index is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// References appended since construction, in order.
    #[must_use]
    pub fn refs(&self) -> &[SitemapRef] {
        &self.refs
    }

    /// Number of `sitemap` elements already present in a loaded file.
    #[must_use]
    pub fn preserved_count(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.sitemaps)
    }

    /// Compress `data` into `filename` and reference it from the index.
    ///
    /// The location is `domain + "/" + filename`. If the payload cannot be
    /// written, the index is left unchanged.
    pub fn append(&mut self, filename: impl AsRef<Path>, data: &[u8]) -> Result<()> {
        let filename = filename.as_ref();

        compress::write_gzip(filename, data)?;

        let loc = format!("{}/{}", self.domain, filename.to_string_lossy());
        let lastmod = self.clock.timestamp();
        debug!(%loc, %lastmod, "appending sitemap reference");

        self.refs.push(SitemapRef {
            loc,
            lastmod,
            path: filename.to_path_buf(),
        });
        Ok(())
    }

    /// Render the index as a pretty-printed XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        let write_refs = |writer: &mut DocumentWriter| -> xml::Result<()> {
            if let Some(loaded) = &self.loaded {
                xml::replay(writer, &loaded.body)?;
            }
            for sitemap in &self.refs {
                write_ref(writer, sitemap)?;
            }
            Ok(())
        };

        let xml = match &self.loaded {
            Some(loaded) => {
                xml::render_document(&loaded.prefix, &loaded.root, &loaded.suffix, write_refs)?
            }
            None => {
                let root = xml::namespaced_root(ROOT_ELEMENT);
                xml::render_document(&[], &root, &[], write_refs)?
            }
        };

        Ok(xml)
    }

    /// Write the index to its own path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Write the index to `path`, overwriting any existing file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;

        let mut file = File::create(path)?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;

        info!(
            path = %path.display(),
            sitemaps = self.preserved_count() + self.refs.len(),
            "saved sitemap index"
        );
        Ok(())
    }
}

fn write_ref(writer: &mut DocumentWriter, sitemap: &SitemapRef) -> xml::Result<()> {
    xml::start(writer, SITEMAP_ELEMENT)?;
    xml::write_text_element(writer, "loc", &sitemap.loc)?;
    xml::write_text_element(writer, "lastmod", &sitemap.lastmod)?;
    xml::end(writer, SITEMAP_ELEMENT)
}

/// Match on the local name so prefixed roots (`<sm:sitemapindex>`) are found too.
fn is_named(element: &BytesStart<'_>, name: &str) -> bool {
    element.local_name().as_ref() == name.as_bytes()
}

/// Text made only of XML whitespace; the writer re-indents in its place.
fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Split a parsed index into pass-through parts around the first `sitemapindex` element.
///
/// Text is not trimmed, so surviving text nodes are replayed byte for byte.
fn parse_index(content: &str, path: &Path) -> Result<LoadedIndex> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);

    let mut prefix = Vec::new();
    let mut root = None;
    let mut body = Vec::new();
    let mut suffix = Vec::new();
    let mut closed = false;
    let mut depth = 0usize;
    let mut sitemaps = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            IndexError::parse(
                path,
                format!("at byte {}: {e}", reader.error_position()),
            )
        })?;

        match event {
            Event::Eof => break,
            Event::Text(ref t) if is_blank(t) => {}
            // A fresh declaration is written on save.
            Event::Decl(_) if root.is_none() => {}
            Event::Start(e) if root.is_none() && is_named(&e, ROOT_ELEMENT) => {
                root = Some(e.into_owned());
            }
            Event::Empty(e) if root.is_none() && is_named(&e, ROOT_ELEMENT) => {
                root = Some(e.into_owned());
                closed = true;
            }
            event if root.is_none() => prefix.push(event.into_owned()),
            event if closed => suffix.push(event.into_owned()),
            Event::End(_) if depth == 0 => closed = true,
            event => {
                match &event {
                    Event::Start(e) => {
                        if depth == 0 && is_named(e, SITEMAP_ELEMENT) {
                            sitemaps += 1;
                        }
                        depth += 1;
                    }
                    Event::Empty(e) => {
                        if depth == 0 && is_named(e, SITEMAP_ELEMENT) {
                            sitemaps += 1;
                        }
                    }
                    Event::End(_) => depth -= 1,
                    _ => {}
                }
                body.push(event.into_owned());
            }
        }
    }

    let Some(root) = root else {
        return Err(IndexError::parse(path, "no sitemapindex element"));
    };
    if !closed {
        return Err(IndexError::parse(path, "unclosed sitemapindex element"));
    }

    debug!(
        path = %path.display(),
        nodes = body.len(),
        sitemaps,
        "parsed sitemap index"
    );

    Ok(LoadedIndex {
        prefix,
        root,
        body,
        suffix,
        sitemaps,
    })
}
