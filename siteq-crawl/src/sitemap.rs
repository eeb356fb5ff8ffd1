//! Sitemap parsing and writing.
//!
//! Reads the `<loc>` entries of a sitemaps.org `urlset`, deduplicating
//! while preserving first-seen order, and writes the normalized list back
//! out in the same format.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::info;

use crate::error::{CrawlError, Result};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Extract the unique `<loc>` URLs of a sitemap document, in first-seen
/// order.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut seen = HashSet::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                let url = t
                    .unescape()
                    .map_err(|e| CrawlError::Sitemap(e.to_string()))?
                    .trim()
                    .to_string();
                if !url.is_empty() && seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CrawlError::Sitemap(e.to_string())),
            _ => {}
        }
    }
    Ok(urls)
}

/// Parse a sitemap file from disk.
pub fn parse_sitemap_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)
        .map_err(|e| CrawlError::Sitemap(format!("cannot read {}: {e}", path.display())))?;
    let urls = parse_sitemap(&xml)?;
    info!(path = %path.display(), urls = urls.len(), "sitemap parsed");
    Ok(urls)
}

/// Render a URL list as a sitemaps.org `urlset` document.
pub fn write_sitemap(urls: &[String]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| CrawlError::Sitemap(e.to_string()))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer
        .write_event(Event::Start(urlset))
        .map_err(|e| CrawlError::Sitemap(e.to_string()))?;

    for url in urls {
        for event in [
            Event::Start(BytesStart::new("url")),
            Event::Start(BytesStart::new("loc")),
            Event::Text(BytesText::new(url)),
            Event::End(BytesEnd::new("loc")),
            Event::End(BytesEnd::new("url")),
        ] {
            writer.write_event(event).map_err(|e| CrawlError::Sitemap(e.to_string()))?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(|e| CrawlError::Sitemap(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| CrawlError::Sitemap(e.to_string()))
}

/// Write a URL list to `path` as a sitemap document.
pub fn write_sitemap_file(urls: &[String], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_sitemap(urls)?)?;
    info!(path = %path.display(), urls = urls.len(), "sitemap written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc> https://x.com/a </loc></url>
  <url><loc>https://x.com/b</loc></url>
  <url><loc>https://x.com/a</loc></url>
  <url><loc></loc></url>
</urlset>"#;

    #[test]
    fn parse_dedupes_preserving_order() {
        let urls = parse_sitemap(SITEMAP).unwrap();
        assert_eq!(urls, vec!["https://x.com/a".to_string(), "https://x.com/b".to_string()]);
    }

    #[test]
    fn round_trip_through_writer() {
        let urls = vec!["https://x.com/a".to_string(), "https://x.com/b?x=1&y=2".to_string()];
        let xml = write_sitemap(&urls).unwrap();
        assert_eq!(parse_sitemap(&xml).unwrap(), urls);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_sitemap_file("/nonexistent/sitemap.xml").is_err());
    }
}
