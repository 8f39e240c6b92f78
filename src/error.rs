//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Raised once per run when the job description or the resume set is missing.
    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    #[error("Failed to process '{filename}': {reason}")]
    DocumentFailed { filename: String, reason: String },

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScreenerError>;

/// model2vec reports load failures through anyhow
impl From<anyhow::Error> for ResumeScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeScreenerError::ModelLoading(err.to_string())
    }
}

impl ResumeScreenerError {
    /// Wrap an error raised while handling a single document.
    pub fn for_document(filename: &str, err: ResumeScreenerError) -> Self {
        match err {
            already @ ResumeScreenerError::DocumentFailed { .. } => already,
            other => ResumeScreenerError::DocumentFailed {
                filename: filename.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Process exit code used by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResumeScreenerError::InsufficientInput(_) => 2,
            _ => 1,
        }
    }
}
