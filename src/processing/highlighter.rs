//! Keyword highlighting of resume text

use crate::config::EmphasisMarker;
use crate::processing::keywords::KeywordSet;
use colored::Colorize;
use regex::Regex;
use serde::Serialize;

/// One whitespace-delimited word of the cleaned resume text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedWord {
    pub text: String,
    pub matched: bool,
}

pub struct Highlighter {
    marker: EmphasisMarker,
    url_regex: Regex,
    email_regex: Regex,
    non_word_regex: Regex,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(EmphasisMarker::Markdown)
    }
}

impl Highlighter {
    pub fn new(marker: EmphasisMarker) -> Self {
        let url_regex = Regex::new(r"(?:https?://|www\.)\S+").expect("Invalid URL regex");
        let email_regex = Regex::new(r"\S*@\S*").expect("Invalid email regex");
        let non_word_regex = Regex::new(r"\W").expect("Invalid non-word regex");

        Self {
            marker,
            url_regex,
            email_regex,
            non_word_regex,
        }
    }

    pub fn marker(&self) -> EmphasisMarker {
        self.marker
    }

    /// Split the text into words and flag those whose comparison key is a keyword.
    ///
    /// URLs and email-like tokens are dropped before splitting. Words keep
    /// their original casing and punctuation.
    pub fn segments(&self, text: &str, keywords: &KeywordSet) -> Vec<HighlightedWord> {
        let trimmed = text.trim();
        let without_urls = self.url_regex.replace_all(trimmed, "");
        let cleaned = self.email_regex.replace_all(&without_urls, "");

        cleaned
            .split_whitespace()
            .map(|word| HighlightedWord {
                text: word.to_string(),
                matched: self.is_keyword(word, keywords),
            })
            .collect()
    }

    /// Render the text with every matched word wrapped in the configured marker.
    pub fn highlight(&self, text: &str, keywords: &KeywordSet) -> String {
        self.segments(text, keywords)
            .iter()
            .map(|word| self.render_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_keyword(&self, word: &str, keywords: &KeywordSet) -> bool {
        let key = self.comparison_key(word);
        !key.is_empty() && keywords.contains(&key)
    }

    fn comparison_key(&self, word: &str) -> String {
        self.non_word_regex
            .replace_all(&word.to_lowercase(), "")
            .into_owned()
    }

    fn render_word(&self, word: &HighlightedWord) -> String {
        match (self.marker, word.matched) {
            (marker, true) => emphasize(marker, &word.text),
            (EmphasisMarker::Html, false) => escape_html(&word.text),
            (_, false) => word.text.clone(),
        }
    }
}

/// Wrap one matched word in `marker`.
pub fn emphasize(marker: EmphasisMarker, word: &str) -> String {
    match marker {
        EmphasisMarker::Markdown => format!("**{}**", word),
        EmphasisMarker::Html => format!("<mark>{}</mark>", escape_html(word)),
        EmphasisMarker::Ansi => word.bold().yellow().to_string(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::keywords::extract_keywords;

    fn job_keywords() -> KeywordSet {
        extract_keywords("Looking for a Python developer with AWS experience")
    }

    #[test]
    fn test_resume_scenario() {
        let highlighter = Highlighter::default();
        let output = highlighter.highlight("Experienced Python developer, AWS certified", &job_keywords());

        assert_eq!(output, "Experienced **Python** **developer,** **AWS** certified");
    }

    #[test]
    fn test_empty_keyword_set_is_noop() {
        let highlighter = Highlighter::default();
        let text = "  Rust   engineer\nwith Tokio  ";

        let output = highlighter.highlight(text, &KeywordSet::default());

        assert_eq!(output, "Rust engineer with Tokio");
        assert!(!output.contains("**"));
    }

    #[test]
    fn test_word_count_and_order_preserved() {
        let highlighter = Highlighter::default();
        let text = "AWS, then Python; then more AWS.";

        let segments = highlighter.segments(text, &job_keywords());
        let words: Vec<&str> = segments.iter().map(|w| w.text.as_str()).collect();

        assert_eq!(words, text.split_whitespace().collect::<Vec<_>>());
        assert_eq!(segments.iter().filter(|w| w.matched).count(), 3);
    }

    #[test]
    fn test_urls_and_emails_removed() {
        let highlighter = Highlighter::default();
        let text = "Python dev https://github.com/jane www.jane.dev jane@example.com AWS";

        let output = highlighter.highlight(text, &job_keywords());

        assert_eq!(output, "**Python** dev **AWS**");
    }

    #[test]
    fn test_pure_punctuation_never_matches() {
        let highlighter = Highlighter::default();
        let keywords: KeywordSet = vec![String::new(), "rust".to_string()].into_iter().collect();

        let segments = highlighter.segments("-- Rust !!", &keywords);

        assert_eq!(segments.len(), 3);
        assert!(!segments[0].matched);
        assert!(segments[1].matched);
        assert!(!segments[2].matched);
    }

    #[test]
    fn test_html_marker_escapes_text() {
        let highlighter = Highlighter::new(EmphasisMarker::Html);
        let keywords: KeywordSet = vec!["python".to_string()].into_iter().collect();

        let output = highlighter.highlight("<Python> & Go", &keywords);

        assert_eq!(output, "<mark>&lt;Python&gt;</mark> &amp; Go");
    }
}
