//! Word-limit text truncation.

/// The first `limit` whitespace-separated words of `text`, with an
/// ellipsis when anything was cut.
pub fn first_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    format!("{}...", words[..limit].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        assert_eq!(first_words("one two three", 5), "one two three");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        assert_eq!(first_words("one two three four", 2), "one two...");
    }
}
