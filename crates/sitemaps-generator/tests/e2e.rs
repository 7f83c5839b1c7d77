//! End-to-end tests for sitemap and index generation.
//!
//! These tests exercise the full flow: build a sitemap, store it as a gzip
//! child of an index, reload the index and extend it.

use std::{
    env, fs,
    io::Read,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use quick_xml::{Reader, events::Event};
use sitemaps_generator::{LastmodClock, SitemapDocument, SitemapIndex};

/// Collect `(element, text)` pairs for every leaf element, in document order.
fn leaf_values(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut values = Vec::new();
    let mut current = None;
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                current = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Text(t) => {
                let text = t.unescape().expect("valid text").into_owned();
                if let Some(name) = current.take() {
                    values.push((name, text));
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    values
}

fn count_elements(xml: &str, name: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == name.as_bytes() => {
                count += 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    count
}

fn gunzip(path: &Path) -> String {
    let mut out = String::new();
    GzDecoder::new(fs::File::open(path).expect("open gzip"))
        .read_to_string(&mut out)
        .expect("decompress");
    out
}

/// Switches the process working directory and restores it on drop.
///
/// Only one test in this binary changes directory; the others use absolute paths.
struct CurrentDir {
    previous: PathBuf,
}

impl CurrentDir {
    fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().expect("current dir");
        env::set_current_dir(dir).expect("enter dir");
        Self { previous }
    }
}

impl Drop for CurrentDir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

#[test]
fn test_sitemap_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitemap.xml");

    let mut sitemap = SitemapDocument::new();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    sitemap
        .append("http://www.x.com", Some(date.into()), Some("weekly"), Some(0.9_f64.into()))
        .unwrap();
    sitemap
        .append(
            "http://www.x.com/a1?q=1&r=2",
            Some("2024-03-01".into()),
            Some("monthly"),
            Some("0.7".into()),
        )
        .unwrap();
    sitemap.save_to_file(&path).unwrap();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(count_elements(&saved, "urlset"), 1);
    assert_eq!(count_elements(&saved, "url"), 2);

    let values = leaf_values(&saved);
    let expected = [
        ("loc", "http://www.x.com"),
        ("lastmod", "2024-02-29"),
        ("changefreq", "weekly"),
        ("priority", "0.9"),
        ("loc", "http://www.x.com/a1?q=1&r=2"),
        ("lastmod", "2024-03-01"),
        ("changefreq", "monthly"),
        ("priority", "0.7"),
    ];
    let values: Vec<(&str, &str)> = values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(values, expected);
}

#[test]
fn test_sitemap_into_new_index() {
    let dir = tempfile::tempdir().unwrap();
    let child = dir.path().join("sitemap1.xml.gz");
    let index_path = dir.path().join("root_sitemap.xml");

    let mut sitemap = SitemapDocument::with_domain("http://www.new.com").unwrap();
    sitemap
        .append("http://www.new.com/a1", None, Some("monthly"), Some(0.7_f64.into()))
        .unwrap();
    let payload = sitemap.to_xml_string().unwrap();

    let mut index = SitemapIndex::open("http://www.new.com", &index_path, false).unwrap();
    index.append(&child, payload.as_bytes()).unwrap();
    index.save().unwrap();

    assert_eq!(gunzip(&child), payload);

    let saved = fs::read_to_string(&index_path).unwrap();
    assert_eq!(count_elements(&saved, "sitemap"), 1);
    let values = leaf_values(&saved);
    assert_eq!(values[0].0, "loc");
    assert_eq!(
        values[0].1,
        format!("http://www.new.com/{}", child.to_string_lossy())
    );
    assert_eq!(values[1].0, "lastmod");
    assert!(values[1].1.ends_with('Z'));
}

#[test]
fn test_extend_existing_index_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("root_sitemap.xml");
    let first_run = LastmodClock::Fixed(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap(),
    );
    let second_run = LastmodClock::Fixed(
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 15, 0).unwrap(),
    );

    let mut index = SitemapIndex::new("http://www.new.com", &index_path).with_clock(first_run);
    index.append(dir.path().join("s1.xml.gz"), b"<urlset/>").unwrap();
    index.save().unwrap();
    let before = leaf_values(&fs::read_to_string(&index_path).unwrap());

    let mut index = SitemapIndex::load("http://www.new.com", &index_path)
        .unwrap()
        .with_clock(second_run);
    index.append(dir.path().join("s2.xml.gz"), b"<urlset/>").unwrap();
    index.save().unwrap();

    let saved = fs::read_to_string(&index_path).unwrap();
    assert_eq!(count_elements(&saved, "sitemapindex"), 1);
    assert_eq!(count_elements(&saved, "sitemap"), 2);

    let after = leaf_values(&saved);
    assert_eq!(after.len(), 4);
    assert_eq!(&after[..2], &before[..]);
    assert_eq!(after[3], ("lastmod".to_string(), "2024-01-02T09:15:00Z".to_string()));
}

#[test]
fn test_loaded_index_keeps_root_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.xml");
    fs::write(
        &index_path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="/sitemap.xsl"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <sitemap><loc>http://old.com/a.xml.gz</loc></sitemap>
</sitemapindex>"#,
    )
    .unwrap();

    let mut index = SitemapIndex::load("http://new.com", &index_path).unwrap();
    index.append(dir.path().join("b.xml.gz"), b"b").unwrap();
    let xml = index.to_xml_string().unwrap();

    assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
    assert!(xml.contains(r#"<?xml-stylesheet type="text/xsl" href="/sitemap.xsl"?>"#));
    assert_eq!(xml.matches("<?xml version").count(), 1);
    assert_eq!(count_elements(&xml, "sitemap"), 2);
}

#[test]
fn test_relative_child_filename() {
    let dir = tempfile::tempdir().unwrap();
    let _cwd = CurrentDir::enter(dir.path());
    let clock = LastmodClock::Fixed(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
    );

    let mut sitemap = SitemapDocument::with_domain("http://new.com").unwrap();
    sitemap
        .append("http://new.com/a1", None, Some("monthly"), None)
        .unwrap();
    let payload = sitemap.to_xml_string().unwrap();

    let mut index = SitemapIndex::new("http://new.com", "root_sitemap.xml").with_clock(clock);
    index.append("s1.xml.gz", payload.as_bytes()).unwrap();
    index.save().unwrap();

    assert_eq!(index.refs()[0].loc, "http://new.com/s1.xml.gz");
    assert_eq!(gunzip(&dir.path().join("s1.xml.gz")), payload);

    let saved = fs::read_to_string(dir.path().join("root_sitemap.xml")).unwrap();
    assert!(saved.contains(
        "\t<sitemap>\n\t\t<loc>http://new.com/s1.xml.gz</loc>\n\t\t<lastmod>2024-06-01T00:00:00Z</lastmod>\n\t</sitemap>"
    ));
}
