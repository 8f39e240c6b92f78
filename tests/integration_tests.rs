//! Integration tests for the resume screener

use resume_screener::config::{EmphasisMarker, FailurePolicy, OutputFormat};
use resume_screener::input::{AutoExtractor, InputManager};
use resume_screener::output::{RankingReport, ReportGenerator};
use resume_screener::processing::{Highlighter, LexicalEmbedder, RankingPipeline, SimilarityScorer};
use resume_screener::ResumeScreenerError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const JOB_MD: &str = "# Backend Engineer\n\nLooking for a **Python** developer with AWS experience.\n";

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn pipeline() -> RankingPipeline<AutoExtractor, LexicalEmbedder> {
    RankingPipeline::new(AutoExtractor::new(), SimilarityScorer::new(LexicalEmbedder::default()))
}

#[tokio::test]
async fn test_load_documents_keeps_order_and_file_names() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "zoe.txt", b"Rust engineer");
    let second = write(dir.path(), "adam.md", b"# Adam\n\nGo developer");

    let documents = InputManager::new().load_documents(&[first, second]).await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].filename, "zoe.txt");
    assert_eq!(documents[1].filename, "adam.md");
    assert_eq!(documents[0].bytes, b"Rust engineer");
}

#[tokio::test]
async fn test_missing_resume_is_rejected() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nonexistent.pdf");

    let result = InputManager::new().load_documents(&[missing]).await;

    assert!(matches!(result, Err(ResumeScreenerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_job_description_from_markdown_file() {
    let dir = TempDir::new().unwrap();
    let job = write(dir.path(), "job.md", JOB_MD.as_bytes());

    let text = InputManager::new().load_job_description(Some(&job), None).await.unwrap();

    assert!(text.contains("Backend Engineer"));
    assert!(text.contains("Python developer"));
    assert!(!text.contains("**"));
    assert!(!text.contains('#'));
}

#[tokio::test]
async fn test_job_description_sources() {
    let dir = TempDir::new().unwrap();
    let job = write(dir.path(), "job.txt", b"Rust developer");
    let manager = InputManager::new();

    let both = manager.load_job_description(Some(&job), Some("Go developer")).await;
    assert!(matches!(both, Err(ResumeScreenerError::InvalidInput(_))));

    assert_eq!(manager.load_job_description(None, None).await.unwrap(), "");
    assert_eq!(
        manager.load_job_description(None, Some("Go developer")).await.unwrap(),
        "Go developer"
    );

    let pdf_job = write(dir.path(), "job.pdf", b"%PDF-1.5");
    let unsupported = manager.load_job_description(Some(&pdf_job), None).await;
    assert!(matches!(unsupported, Err(ResumeScreenerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_rank_files_end_to_end() {
    let dir = TempDir::new().unwrap();
    let job = write(dir.path(), "job.md", JOB_MD.as_bytes());
    let resumes = vec![
        write(dir.path(), "chef.txt", b"Pastry chef baking sourdough bread"),
        write(dir.path(), "broken.pdf", b"this is not a pdf"),
        write(
            dir.path(),
            "jane.md",
            b"# Jane Doe\n\nExperienced Python developer, AWS certified. jane@example.com",
        ),
    ];

    let manager = InputManager::new();
    let job_description = manager.load_job_description(Some(&job), None).await.unwrap();
    let documents = manager.load_documents(&resumes).await.unwrap();

    let run = pipeline().rank(&job_description, documents).unwrap();

    assert_eq!(run.entries.len(), 2);
    assert_eq!(run.entries[0].filename, "jane.md");
    assert_eq!(run.entries[1].filename, "chef.txt");
    assert!(run.entries[0].score > run.entries[1].score);
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].filename, "broken.pdf");

    let report = RankingReport::from_run(&run, &Highlighter::new(EmphasisMarker::Markdown), Some(1));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.chart.bars.len(), 2);
    assert!(report.results[0].highlighted_text.contains("**Python**"));
    assert!(!report.results[0].highlighted_text.contains("jane@example.com"));

    let json = ReportGenerator::new(false, false, 40)
        .generate_report(&report, OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"][0]["filename"], "jane.md");
    assert_eq!(value["metadata"]["documents_failed"], 1);
    assert_eq!(value["metadata"]["embedder"], "lexical");
}

#[tokio::test]
async fn test_fail_fast_stops_on_bad_resume() {
    let dir = TempDir::new().unwrap();
    let resumes = vec![
        write(dir.path(), "jane.txt", b"Python developer"),
        write(dir.path(), "resume.docx", b"binary"),
    ];
    let documents = InputManager::new().load_documents(&resumes).await.unwrap();

    let err = pipeline()
        .with_failure_policy(FailurePolicy::Abort)
        .rank("Python developer", documents)
        .unwrap_err();

    assert!(matches!(err, ResumeScreenerError::DocumentFailed { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_missing_job_description_is_insufficient_input() {
    let dir = TempDir::new().unwrap();
    let resume = write(dir.path(), "jane.txt", b"Python developer");

    let manager = InputManager::new();
    let job_description = manager.load_job_description(None, None).await.unwrap();
    let documents = manager.load_documents(&[resume]).await.unwrap();

    let err = pipeline().rank(&job_description, documents).unwrap_err();

    assert!(matches!(err, ResumeScreenerError::InsufficientInput(_)));
    assert_eq!(err.exit_code(), 2);
}
