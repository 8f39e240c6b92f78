//! Presentation model of a ranking run

use crate::config::EmphasisMarker;
use crate::output::chart::{Bar, BarChart};
use crate::processing::document::DocumentFailure;
use crate::processing::highlighter::{HighlightedWord, Highlighter};
use crate::processing::ranking::RankingRun;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    /// Job-description keywords, sorted.
    pub keywords: Vec<String>,
    pub results: Vec<RankedResume>,
    pub failures: Vec<DocumentFailure>,
    pub chart: BarChart,
    /// Emphasis used in `highlighted_text`.
    pub marker: EmphasisMarker,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub embedder: String,
    pub screener_version: String,
    pub documents_ranked: usize,
    pub documents_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedResume {
    pub rank: usize,
    pub filename: String,
    pub score: f64,
    pub word_count: usize,
    pub character_count: usize,
    pub matched_keywords: usize,
    /// Text with matched words wrapped in the highlighter's marker.
    pub highlighted_text: String,
    #[serde(skip)]
    pub words: Vec<HighlightedWord>,
}

impl RankingReport {
    /// Build the report, keeping at most `top` results when given.
    ///
    /// The chart always covers every ranked resume.
    pub fn from_run(run: &RankingRun, highlighter: &Highlighter, top: Option<usize>) -> Self {
        let limit = top.unwrap_or(run.entries.len());

        let results = run
            .entries
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, entry)| {
                let words = run.highlighted_words(entry, highlighter);
                RankedResume {
                    rank: index + 1,
                    filename: entry.filename.clone(),
                    score: entry.score,
                    word_count: entry.text.word_count(),
                    character_count: entry.text.character_count(),
                    matched_keywords: words.iter().filter(|w| w.matched).count(),
                    highlighted_text: run.highlight(entry, highlighter),
                    words,
                }
            })
            .collect();

        let chart = BarChart::new(
            run.entries
                .iter()
                .map(|entry| Bar {
                    label: entry.filename.clone(),
                    value: entry.score,
                })
                .collect(),
        );

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: run.processing_time_ms,
                embedder: run.embedder.clone(),
                screener_version: env!("CARGO_PKG_VERSION").to_string(),
                documents_ranked: run.entries.len(),
                documents_failed: run.failures.len(),
            },
            keywords: run.keywords.iter().map(str::to_string).collect(),
            results,
            failures: run.failures.clone(),
            chart,
            marker: highlighter.marker(),
        }
    }
}
