//! Input manager: turns command-line paths into uploaded documents

use crate::error::{Result, ResumeScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::Document;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read every resume into a `Document`, keeping the order given.
    pub async fn load_documents(&self, paths: &[PathBuf]) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            if !path.exists() {
                return Err(ResumeScreenerError::InvalidInput(format!(
                    "File does not exist: {}",
                    path.display()
                )));
            }

            let filename = Self::display_name(path);
            let bytes = fs::read(path).await?;
            info!("Loaded resume '{}' ({} bytes)", filename, bytes.len());
            documents.push(Document::new(filename, bytes));
        }

        Ok(documents)
    }

    /// Resolve the job description from an inline string or a text/markdown file.
    ///
    /// Returns an empty string when neither is given so the ranking run can
    /// report insufficient input itself.
    pub async fn load_job_description(
        &self,
        job_file: Option<&Path>,
        job_text: Option<&str>,
    ) -> Result<String> {
        match (job_file, job_text) {
            (Some(_), Some(_)) => Err(ResumeScreenerError::InvalidInput(
                "Pass the job description either as a file or as text, not both".to_string(),
            )),
            (None, Some(text)) => Ok(text.to_string()),
            (None, None) => Ok(String::new()),
            (Some(path), None) => {
                if !path.exists() {
                    return Err(ResumeScreenerError::InvalidInput(format!(
                        "File does not exist: {}",
                        path.display()
                    )));
                }

                let filename = Self::display_name(path);
                let bytes = fs::read(path).await?;
                info!("Reading job description: {}", path.display());

                match FileType::from_filename(&filename) {
                    FileType::Text => PlainTextExtractor.extract(&filename, &bytes),
                    FileType::Markdown => MarkdownExtractor.extract(&filename, &bytes),
                    _ => Err(ResumeScreenerError::UnsupportedFormat(format!(
                        "Job description must be .txt or .md: {}",
                        path.display()
                    ))),
                }
            }
        }
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}
