// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Strips markup noise from raw review text before tokenisation.
//
// IMDB reviews in the wild contain:
//   - HTML line breaks and formatting tags (<br />, <i>...</i>)
//   - links to other sites (http://..., www....)
//
// Steps, in this order:
//   1. Remove every `<...>` span (non-greedy, single line)
//   2. Remove every http(s) URL and bare `www.` URL
//
// Tags go first: a URL inside a tag attribute disappears
// together with its tag instead of leaving `">` fragments.
// Surrounding text and whitespace are left exactly as they are.

use std::sync::LazyLock;

use regex::Regex;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern is valid"));
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("url pattern is valid"));

/// Stateless text normalizer shared by training and inference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Remove tags, then URLs. Total: never fails, may return "".
    pub fn normalize(&self, text: &str) -> String {
        let without_tags = TAG_REGEX.replace_all(text, "");
        URL_REGEX.replace_all(&without_tags, "").into_owned()
    }
}

/// Convenience wrapper around `Preprocessor::normalize`.
pub fn normalize(text: &str) -> String {
    Preprocessor.normalize(text)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_tags_and_url_keeps_spacing() {
        assert_eq!(
            normalize("<b>Great movie</b> see http://x.co"),
            "Great movie see "
        );
    }

    #[test]
    fn test_removes_imdb_line_breaks() {
        assert_eq!(
            normalize("Loved it.<br /><br />Would watch again."),
            "Loved it.Would watch again."
        );
    }

    #[test]
    fn test_removes_www_and_https_urls() {
        assert_eq!(
            normalize("more at www.example.com/page and https://a.b/c?d=1 ok"),
            "more at  and  ok"
        );
    }

    #[test]
    fn test_url_inside_tag_goes_with_tag() {
        assert_eq!(
            normalize(r#"<a href="http://spam.io/x">link</a> text"#),
            "link text"
        );
    }

    #[test]
    fn test_tag_removal_is_non_greedy() {
        assert_eq!(normalize("<i>a</i> b <i>c</i>"), "a b c");
    }

    #[test]
    fn test_tag_does_not_span_lines() {
        // `.` does not match a newline, so this is not a tag
        assert_eq!(normalize("a <\n> b"), "a <\n> b");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "A perfectly ordinary review, 10/10!";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_may_become_empty() {
        assert_eq!(normalize("<p></p>http://only.link"), "");
        assert_eq!(normalize(""), "");
    }
}
