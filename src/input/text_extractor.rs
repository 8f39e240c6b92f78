//! Text extraction from various file formats

use crate::error::{Result, ResumeScreenerError};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use pulldown_cmark::{Event, Parser, Tag};
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

/// Turns the raw bytes of one uploaded file into plain text.
pub trait TextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// PDF extraction through a scratch file that is removed once the
/// document has been read, whether or not parsing succeeded.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    scratch_dir: Option<PathBuf>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage scratch files under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: Some(dir.into()),
        }
    }

    fn stage(&self, bytes: &[u8]) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-").suffix(".pdf");

        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        scratch.write_all(bytes)?;
        scratch.flush()?;
        Ok(scratch)
    }

    /// Page texts in page order, joined by a single space.
    fn extract_pages(filename: &str, path: &Path) -> Result<String> {
        let doc = lopdf::Document::load(path).map_err(|e| {
            ResumeScreenerError::PdfExtraction(format!("Failed to open PDF '{}': {}", filename, e))
        })?;

        // get_pages is keyed by page number, so iteration is already in page order
        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    warn!(
                        "Page {} of '{}' could not be decoded ({}), retrying with pdf-extract",
                        page_number, filename, e
                    );
                    return Self::extract_whole(filename, path);
                }
            }
        }

        Ok(texts.join(" "))
    }

    /// Whole-document fallback. Page boundaries are whatever pdf-extract emits.
    fn extract_whole(filename: &str, path: &Path) -> Result<String> {
        catch_extractor_panic(filename, || {
            pdf_extract::extract_text(path).map_err(|e| {
                ResumeScreenerError::PdfExtraction(format!(
                    "Failed to extract text from PDF '{}': {}",
                    filename, e
                ))
            })
        })
    }
}

/// pdf-extract panics on some malformed fonts; report that as an
/// extraction error for this document only.
fn catch_extractor_panic<F>(filename: &str, extract: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    std::panic::catch_unwind(AssertUnwindSafe(extract)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ResumeScreenerError::PdfExtraction(format!(
            "PDF parser crashed on '{}': {}",
            filename, detail
        )))
    })
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let scratch = self.stage(bytes)?;
        debug!("Staged '{}' at {}", filename, scratch.path().display());

        let result = Self::extract_pages(filename, scratch.path());

        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch file for '{}': {}", filename, e);
        } else {
            debug!("Removed scratch file for '{}'", filename);
        }

        result
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ResumeScreenerError::TextProcessing(format!("'{}' is not valid UTF-8: {}", filename, e))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(filename, bytes)?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Routes each file to the extractor matching its extension.
#[derive(Debug, Clone, Default)]
pub struct AutoExtractor {
    pdf: PdfExtractor,
}

impl AutoExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextExtractor for AutoExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        match FileType::from_filename(filename) {
            FileType::Pdf => self.pdf.extract(filename, bytes),
            FileType::Text => PlainTextExtractor.extract(filename, bytes),
            FileType::Markdown => MarkdownExtractor.extract(filename, bytes),
            FileType::Unknown => Err(ResumeScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                filename
            ))),
        }
    }
}
