//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Detect from an uploaded file name; names without an extension are `Unknown`.
    pub fn from_filename(name: &str) -> Self {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_is_case_insensitive() {
        assert_eq!(FileType::from_filename("Jane_Doe.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_filename("notes.Md"), FileType::Markdown);
        assert_eq!(FileType::from_filename("cv.txt"), FileType::Text);
    }

    #[test]
    fn test_missing_or_unknown_extension() {
        assert_eq!(FileType::from_filename("resume"), FileType::Unknown);
        assert_eq!(FileType::from_filename("resume.docx"), FileType::Unknown);
    }
}
