//! Document structures for a ranking run

use serde::{Deserialize, Serialize};

/// An uploaded file: its name and raw bytes. Consumed by extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Plain text extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    content: String,
}

/// One ranked resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub filename: String,
    /// Cosine similarity as a percentage, rounded to two decimals.
    pub score: f64,
    pub text: TextRecord,
}

/// A document that could not be extracted or embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub filename: String,
    pub reason: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn from_text(filename: impl Into<String>, text: &str) -> Self {
        Self::new(filename, text.as_bytes().to_vec())
    }
}

impl TextRecord {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn character_count(&self) -> usize {
        self.content.chars().count()
    }
}

impl AsRef<str> for TextRecord {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Convert a cosine similarity into a display percentage with two decimals.
///
/// No clamping: a negative similarity yields a negative percentage.
pub fn similarity_to_score(similarity: f32) -> f64 {
    (f64::from(similarity) * 100.0 * 100.0).round() / 100.0
}
