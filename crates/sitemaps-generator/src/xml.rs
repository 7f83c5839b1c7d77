//! Shared XML rendering helpers.
//!
//! Both document kinds render through [`render_document`]: an explicit UTF-8
//! declaration, one tab per nesting level, and a trailing newline.

use std::string::FromUtf8Error;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;

/// Namespace of the sitemaps.org 0.9 schema.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const INDENT_CHAR: u8 = b'\t';
const INDENT_SIZE: usize = 1;

/// XML rendering errors.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Writer error.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializer error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Rendered bytes were not UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Result type for XML rendering.
pub type Result<T> = std::result::Result<T, XmlError>;

/// Writer type handed to child renderers.
pub(crate) type DocumentWriter = Writer<Vec<u8>>;

/// Root element carrying the sitemap namespace.
pub(crate) fn namespaced_root(name: &str) -> BytesStart<'_> {
    BytesStart::new(name).with_attributes([("xmlns", SITEMAP_NAMESPACE)])
}

/// Render a complete document.
///
/// `prefix` and `suffix` are replayed around the root element; fresh
/// documents pass empty slices.
pub(crate) fn render_document<F>(
    prefix: &[Event<'_>],
    root: &BytesStart<'_>,
    suffix: &[Event<'_>],
    write_children: F,
) -> Result<String>
where
    F: FnOnce(&mut DocumentWriter) -> Result<()>,
{
    let mut writer = Writer::new_with_indent(Vec::new(), INDENT_CHAR, INDENT_SIZE);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    replay(&mut writer, prefix)?;
    writer.write_event(Event::Start(root.clone()))?;
    write_children(&mut writer)?;
    writer.write_event(Event::End(root.to_end()))?;
    replay(&mut writer, suffix)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

/// Write previously parsed events unchanged.
pub(crate) fn replay(writer: &mut DocumentWriter, events: &[Event<'_>]) -> Result<()> {
    for event in events {
        writer.write_event(event.clone())?;
    }
    Ok(())
}

/// Write `<name>text</name>`, escaping the text.
pub(crate) fn write_text_element(
    writer: &mut DocumentWriter,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Open a child element with no attributes.
pub(crate) fn start(writer: &mut DocumentWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

/// Close a child element.
pub(crate) fn end(writer: &mut DocumentWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
