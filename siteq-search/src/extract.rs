//! Visible-text extraction from HTML.

use scraper::{Html, Selector, node::Node};

/// Elements whose text is never visible page content.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "iframe"];

/// Extract the visible text of an HTML document.
///
/// Text inside scripts, styles, and other non-content elements is
/// skipped; the result is whitespace-collapsed into a single line of
/// space-separated words.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut out = String::new();
    for node in doc.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| {
                matches!(a.value(), Node::Element(el) if SKIP_TAGS.contains(&el.name()))
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    collapse_whitespace(&out)
}

/// Extract the document title, when one is present and non-empty.
pub fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title = doc.select(&selector).next()?;
    let text = collapse_whitespace(&title.text().collect::<String>());
    if text.is_empty() { None } else { Some(text) }
}

/// Collapse all runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
