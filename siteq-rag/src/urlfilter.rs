//! Whole-word URL filtering.
//!
//! A cheap high-precision pre-filter: when the user's query names a
//! URL-like term (a product or page name), records whose URL contains
//! every query term as a whole word are kept and the rest dropped.

use regex::Regex;
use tracing::debug;

use crate::document::ScoredPage;

/// True when every lowercase whitespace-delimited term of `query` appears
/// as a whole word inside the lowercased `url`.
///
/// Partial-word substrings do not match: the term `cap` does not match a
/// URL containing `capsule`.
pub fn url_matches_all_terms(url: &str, query: &str) -> bool {
    let url = url.to_lowercase();
    query.to_lowercase().split_whitespace().all(|term| {
        match Regex::new(&format!(r"\b{}\b", regex::escape(term))) {
            Ok(re) => re.is_match(&url),
            // An unbuildable pattern cannot match anything.
            Err(_) => false,
        }
    })
}

/// Keep only candidates whose URL contains every query term as a whole
/// word. Input order is preserved.
pub fn filter_by_url_terms(candidates: Vec<ScoredPage>, query: &str) -> Vec<ScoredPage> {
    let before = candidates.len();
    let kept: Vec<ScoredPage> =
        candidates.into_iter().filter(|c| url_matches_all_terms(&c.url, query)).collect();
    debug!(before, after = kept.len(), "url-term filter applied");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> ScoredPage {
        ScoredPage {
            index: 0,
            url: url.to_string(),
            title: None,
            content: String::new(),
            score: 0.9,
        }
    }

    #[test]
    fn whole_word_match_required() {
        assert!(url_matches_all_terms("https://x.com/capsule-machines", "capsule"));
        // "cap" is a substring of "capsule" but not a whole word.
        assert!(!url_matches_all_terms("https://x.com/capsule-machines", "cap"));
    }

    #[test]
    fn every_term_must_match() {
        let url = "https://x.com/products/tablet-coating";
        assert!(url_matches_all_terms(url, "tablet coating"));
        assert!(!url_matches_all_terms(url, "tablet inspection"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(url_matches_all_terms("https://x.com/Leadership", "LEADERSHIP"));
    }

    #[test]
    fn filter_preserves_input_order() {
        let candidates = vec![
            page("https://x.com/leadership"),
            page("https://x.com/history"),
            page("https://x.com/leadership/team"),
        ];
        let kept = filter_by_url_terms(candidates, "leadership");
        let urls: Vec<&str> = kept.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.com/leadership", "https://x.com/leadership/team"]);
    }
}
