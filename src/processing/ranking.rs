//! Ranking pipeline: extract, score, and order a batch of resumes

use crate::config::FailurePolicy;
use crate::error::{Result, ResumeScreenerError};
use crate::input::text_extractor::TextExtractor;
use crate::processing::document::{similarity_to_score, Document, DocumentFailure, ScoreEntry, TextRecord};
use crate::processing::embeddings::{Embedder, SimilarityScorer};
use crate::processing::highlighter::{HighlightedWord, Highlighter};
use crate::processing::keywords::{extract_keywords, KeywordSet};
use log::{debug, info, warn};
use std::time::Instant;

pub const INSUFFICIENT_INPUT_MESSAGE: &str =
    "Please provide both a job description and at least one resume.";

/// Result of one analysis run, ordered by score descending.
#[derive(Debug, Clone)]
pub struct RankingRun {
    pub keywords: KeywordSet,
    pub entries: Vec<ScoreEntry>,
    pub failures: Vec<DocumentFailure>,
    pub embedder: String,
    pub processing_time_ms: u64,
}

impl RankingRun {
    /// Highlight one entry's text against this run's keyword set.
    pub fn highlight(&self, entry: &ScoreEntry, highlighter: &Highlighter) -> String {
        highlighter.highlight(entry.text.as_str(), &self.keywords)
    }

    pub fn highlighted_words(&self, entry: &ScoreEntry, highlighter: &Highlighter) -> Vec<HighlightedWord> {
        highlighter.segments(entry.text.as_str(), &self.keywords)
    }
}

pub struct RankingPipeline<X: TextExtractor, E: Embedder> {
    extractor: X,
    scorer: SimilarityScorer<E>,
    failure_policy: FailurePolicy,
}

impl<X: TextExtractor, E: Embedder> RankingPipeline<X, E> {
    pub fn new(extractor: X, scorer: SimilarityScorer<E>) -> Self {
        Self {
            extractor,
            scorer,
            failure_policy: FailurePolicy::Isolate,
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn scorer(&self) -> &SimilarityScorer<E> {
        &self.scorer
    }

    pub fn rank(&mut self, job_description: &str, documents: Vec<Document>) -> Result<RankingRun> {
        self.rank_with_progress(job_description, documents, |_, _| {})
    }

    /// Rank `documents` against the job description.
    ///
    /// `on_document` is called with the upload index and file name before
    /// each document is processed.
    pub fn rank_with_progress<F>(
        &mut self,
        job_description: &str,
        documents: Vec<Document>,
        mut on_document: F,
    ) -> Result<RankingRun>
    where
        F: FnMut(usize, &str),
    {
        if job_description.is_empty() || documents.is_empty() {
            return Err(ResumeScreenerError::InsufficientInput(
                INSUFFICIENT_INPUT_MESSAGE.to_string(),
            ));
        }

        let start_time = Instant::now();
        info!("Ranking {} resume(s) with '{}'", documents.len(), self.scorer.embedder_name());

        let keywords = extract_keywords(job_description);
        debug!("Job description yielded {} keywords", keywords.len());

        let policy = self.failure_policy;
        let outcomes = documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| {
                on_document(index, &document.filename);
                match self.score_document(&document, job_description) {
                    Ok(entry) => Ok(Ok(entry)),
                    Err(e) if policy == FailurePolicy::Abort => {
                        Err(ResumeScreenerError::for_document(&document.filename, e))
                    }
                    Err(e) => {
                        warn!("Skipping '{}': {}", document.filename, e);
                        Ok(Err(DocumentFailure {
                            filename: document.filename,
                            reason: e.to_string(),
                        }))
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut entries = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(entry) => entries.push(entry),
                Err(failure) => failures.push(failure),
            }
        }

        // stable: equal scores keep upload order
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(RankingRun {
            keywords,
            entries,
            failures,
            embedder: self.scorer.embedder_name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn score_document(&mut self, document: &Document, job_description: &str) -> Result<ScoreEntry> {
        let text = self.extractor.extract(&document.filename, &document.bytes)?;
        let similarity = self.scorer.similarity(&text, job_description)?;
        let score = similarity_to_score(similarity);
        debug!("'{}' scored {:.2}%", document.filename, score);

        Ok(ScoreEntry {
            filename: document.filename.clone(),
            score,
            text: TextRecord::new(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::text_extractor::AutoExtractor;
    use crate::processing::embeddings::LexicalEmbedder;

    const JOB: &str = "Looking for a Python developer with AWS experience";

    fn pipeline() -> RankingPipeline<AutoExtractor, LexicalEmbedder> {
        RankingPipeline::new(AutoExtractor::new(), SimilarityScorer::new(LexicalEmbedder::default()))
    }

    #[test]
    fn test_empty_job_description_is_insufficient_input() {
        let docs = vec![Document::from_text("a.txt", "Python developer")];

        let err = pipeline().rank("", docs).unwrap_err();

        assert!(matches!(err, ResumeScreenerError::InsufficientInput(_)));
    }

    #[test]
    fn test_whitespace_job_description_is_still_ranked() {
        let docs = vec![Document::from_text("a.txt", "Python developer")];

        let run = pipeline().rank("   ", docs).unwrap();

        assert_eq!(run.entries.len(), 1);
        assert!(run.keywords.is_empty());
        assert_eq!(run.entries[0].score, 0.0);
    }

    #[test]
    fn test_no_documents_is_insufficient_input() {
        let err = pipeline().rank(JOB, Vec::new()).unwrap_err();
        assert!(matches!(err, ResumeScreenerError::InsufficientInput(_)));
    }

    #[test]
    fn test_insufficient_input_does_no_document_work() {
        let mut calls = 0;
        let docs = vec![Document::from_text("a.txt", "Python developer")];

        let result = pipeline().rank_with_progress("", docs, |_, _| calls += 1);

        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_results_sorted_descending() {
        let docs = vec![
            Document::from_text("chef.txt", "Pastry chef baking sourdough bread"),
            Document::from_text("dev.txt", "Experienced Python developer, AWS certified"),
            Document::from_text("partial.txt", "Python hobbyist and gardener"),
        ];

        let run = pipeline().rank(JOB, docs).unwrap();

        let names: Vec<&str> = run.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["dev.txt", "partial.txt", "chef.txt"]);
        assert!(run.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(run.failures.is_empty());
    }

    #[test]
    fn test_identical_documents_keep_upload_order() {
        let text = "Python developer with AWS";
        let docs = vec![
            Document::from_text("first.txt", text),
            Document::from_text("second.txt", text),
        ];

        let run = pipeline().rank(JOB, docs).unwrap();

        assert_eq!(run.entries[0].score, run.entries[1].score);
        assert_eq!(run.entries[0].filename, "first.txt");
        assert_eq!(run.entries[1].filename, "second.txt");
    }

    #[test]
    fn test_keywords_come_from_job_description_only() {
        let docs = vec![Document::from_text("a.txt", "Kubernetes operator")];

        let run = pipeline().rank(JOB, docs).unwrap();

        assert!(run.keywords.contains("python"));
        assert!(!run.keywords.contains("kubernetes"));
    }

    #[test]
    fn test_isolate_policy_records_failure_and_continues() {
        let docs = vec![
            Document::new("broken.pdf", b"not a pdf".to_vec()),
            Document::from_text("dev.txt", "Python developer"),
        ];

        let run = pipeline().rank(JOB, docs).unwrap();

        assert_eq!(run.entries.len(), 1);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].filename, "broken.pdf");
    }

    #[test]
    fn test_abort_policy_fails_whole_run() {
        let docs = vec![
            Document::from_text("dev.txt", "Python developer"),
            Document::new("resume.docx", b"binary".to_vec()),
        ];

        let err = pipeline()
            .with_failure_policy(FailurePolicy::Abort)
            .rank(JOB, docs)
            .unwrap_err();

        match err {
            ResumeScreenerError::DocumentFailed { filename, .. } => assert_eq!(filename, "resume.docx"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_progress_reports_upload_order() {
        let docs = vec![
            Document::from_text("a.txt", "Python"),
            Document::from_text("b.txt", "AWS"),
        ];
        let mut seen = Vec::new();

        pipeline()
            .rank_with_progress(JOB, docs, |index, name| seen.push((index, name.to_string())))
            .unwrap();

        assert_eq!(seen, vec![(0, "a.txt".to_string()), (1, "b.txt".to_string())]);
    }

    #[test]
    fn test_highlight_uses_run_keywords() {
        let docs = vec![Document::from_text("dev.txt", "Experienced Python developer, AWS certified")];
        let run = pipeline().rank(JOB, docs).unwrap();

        let highlighted = run.highlight(&run.entries[0], &Highlighter::default());

        assert_eq!(highlighted, "Experienced **Python** **developer,** **AWS** certified");
    }
}
