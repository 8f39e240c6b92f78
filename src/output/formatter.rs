//! Output formatters for ranking reports

use crate::config::{EmphasisMarker, OutputFormat};
use crate::error::{Result, ResumeScreenerError};
use crate::output::report::{RankedResume, RankingReport};
use crate::processing::document::DocumentFailure;
use crate::processing::highlighter::{emphasize, HighlightedWord};
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
}

/// Terminal output with colored highlights and a text bar chart
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    chart_width: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    chart_width: usize,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Picks the formatter for a requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Words shown per resume outside detailed mode
const PREVIEW_WORDS: usize = 80;

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Match Scores</title>
    {% if include_styles %}
    <style>
        body { font-family: system-ui, sans-serif; color: #222; background: #f3f4f6; margin: 0; }
        .container { max-width: 960px; margin: 24px auto; background: #fff; padding: 24px 32px; border-radius: 10px; }
        h1 { border-bottom: 2px solid #2b6cb0; padding-bottom: 8px; }
        h2 { color: #2b6cb0; margin-top: 28px; }
        .keywords span { display: inline-block; background: #e2e8f0; border-radius: 10px; padding: 1px 9px; margin: 2px; }
        .resume { border: 1px solid #e2e8f0; border-left: 5px solid #2b6cb0; border-radius: 6px; padding: 12px 16px; margin: 12px 0; }
        mark { background: #fde68a; font-weight: 600; }
        .bar-row { display: flex; align-items: center; margin: 4px 0; }
        .bar-label { width: 220px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
        .bar-track { flex: 1; background: #e2e8f0; height: 16px; margin: 0 8px; }
        .bar-fill { background: #2b6cb0; height: 100%; }
        .failures { background: #fef2f2; border-left: 5px solid #c53030; padding: 8px 16px; }
        .metadata { margin-top: 32px; font-size: 0.85em; color: #718096; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>Resume Match Scores</h1>

        <div class="keywords">
            <h2>Job keywords</h2>
            {% for keyword in keywords %}<span>{{ keyword }}</span>{% endfor %}
        </div>

        {% if has_failures %}
        <div class="failures">
            <h2>Skipped resumes</h2>
            <ul>
            {% for failure in failures %}<li><strong>{{ failure.filename }}</strong>: {{ failure.reason }}</li>{% endfor %}
            </ul>
        </div>
        {% endif %}

        <h2>Ranking</h2>
        {% for result in results %}
        <div class="resume">
            <h3>{{ result.rank }}. {{ result.filename }} &mdash; Match Score: {{ result.score }}%</h3>
            <p>{% for word in result.words %}{% if word.matched %}<mark>{{ word.text }}</mark>{% else %}{{ word.text }}{% endif %} {% endfor %}</p>
        </div>
        {% endfor %}

        <h2>Score chart</h2>
        {% for bar in bars %}
        <div class="bar-row">
            <span class="bar-label">{{ bar.label }}</span>
            <div class="bar-track"><div class="bar-fill" style="width: {{ bar.width_pct }}%"></div></div>
            <span>{{ bar.score }}%</span>
        </div>
        {% endfor %}
        <p><small>Axis: 0 to {{ axis_max }}</small></p>

        <div class="metadata">
            Generated {{ generated_at }} in {{ processing_time }}ms with embedder <code>{{ embedder }}</code> (resume-screener v{{ version }})
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    embedder: String,
    version: String,
    keywords: Vec<String>,
    results: Vec<HtmlResult>,
    has_failures: bool,
    failures: Vec<DocumentFailure>,
    bars: Vec<HtmlBar>,
    axis_max: String,
}

struct HtmlResult {
    rank: usize,
    filename: String,
    score: String,
    words: Vec<HighlightedWord>,
}

struct HtmlBar {
    label: String,
    score: String,
    width_pct: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, chart_width: usize) -> Self {
        Self {
            use_colors,
            detailed,
            chart_width,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score(&self, score: f64) -> String {
        let color = match score {
            s if s >= 70.0 => Color::Green,
            s if s >= 50.0 => Color::Yellow,
            _ => Color::Red,
        };
        let text = format!("{:.2}%", score);
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text
        }
    }

    fn format_words(&self, words: &[HighlightedWord], marker: EmphasisMarker) -> String {
        let shown = if self.detailed {
            words.len()
        } else {
            words.len().min(PREVIEW_WORDS)
        };

        let mut text = words[..shown]
            .iter()
            .map(|word| match (word.matched, self.use_colors, marker) {
                (true, true, _) => word.text.bold().yellow().to_string(),
                // ANSI needs colors; plain terminals get Markdown emphasis
                (true, false, EmphasisMarker::Ansi) => emphasize(EmphasisMarker::Markdown, &word.text),
                (true, false, marker) => emphasize(marker, &word.text),
                (false, _, _) => word.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        if shown < words.len() {
            text.push_str(&format!(" ... ({} more words)", words.len() - shown));
        }
        text
    }

    fn format_result(&self, result: &RankedResume, marker: EmphasisMarker) -> String {
        let mut output = format!(
            "{}. {} — Match Score: {}\n",
            result.rank,
            self.colorize(&result.filename, Color::Cyan),
            self.format_score(result.score)
        );
        output.push_str(&format!(
            "   {} keyword matches · {} words\n",
            result.matched_keywords, result.word_count
        ));
        output.push_str(&format!("   {}\n\n", self.format_words(&result.words, marker)));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📄 RESUME MATCH SCORES", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms | Embedder: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms,
            report.metadata.embedder
        ));

        output.push_str(&self.format_header("Job Keywords", 3));
        if report.keywords.is_empty() {
            output.push_str("  (none: the job description contains only stop words)\n");
        } else {
            output.push_str(&format!("  {}\n", report.keywords.join(", ")));
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("⚠️  Skipped Resumes", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&failure.filename, Color::Red),
                    self.colorize(&format!("({})", failure.reason), Color::BrightBlack)
                ));
            }
        }

        output.push_str(&self.format_header("📊 Ranking", 2));
        for result in &report.results {
            output.push_str(&self.format_result(result, report.marker));
        }

        output.push_str(&self.format_header("Score Chart", 2));
        output.push_str(&report.chart.render_text(self.chart_width, self.use_colors));

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, chart_width: usize) -> Self {
        Self {
            include_metadata,
            chart_width,
        }
    }

    fn markdown_words(words: &[HighlightedWord]) -> String {
        words
            .iter()
            .map(|word| {
                if word.matched {
                    format!("**{}**", word.text)
                } else {
                    word.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Resume Match Scores\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Embedder:** `{}`\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.embedder
            ));
        }

        if !report.keywords.is_empty() {
            output.push_str(&format!("**Job keywords:** {}\n\n", report.keywords.join(", ")));
        }

        output.push_str("| Rank | Resume | Match Score |\n");
        output.push_str("|------|--------|-------------|\n");
        for result in &report.results {
            output.push_str(&format!("| {} | {} | {:.2}% |\n", result.rank, result.filename, result.score));
        }
        output.push('\n');

        if !report.failures.is_empty() {
            output.push_str("## ⚠️ Skipped Resumes\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- **{}**: {}\n", failure.filename, failure.reason));
            }
            output.push('\n');
        }

        output.push_str("## Highlighted Resumes\n\n");
        for result in &report.results {
            output.push_str(&format!(
                "### {}. {} — Match Score: **{:.2}%**\n\n",
                result.rank, result.filename, result.score
            ));
            output.push_str(&Self::markdown_words(&result.words));
            output.push_str("\n\n");
        }

        output.push_str("## Score Chart\n\n```text\n");
        output.push_str(&report.chart.render_text(self.chart_width, false));
        output.push_str("```\n");

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RankingReport) -> HtmlTemplate {
        let results = report
            .results
            .iter()
            .map(|result| HtmlResult {
                rank: result.rank,
                filename: result.filename.clone(),
                score: format!("{:.2}", result.score),
                words: result.words.clone(),
            })
            .collect();

        let bars = report
            .chart
            .bars
            .iter()
            .map(|bar| HtmlBar {
                label: bar.label.clone(),
                score: format!("{:.2}", bar.value),
                width_pct: format!("{:.1}", report.chart.fraction(bar.value) * 100.0),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.metadata.processing_time_ms,
            embedder: report.metadata.embedder.clone(),
            version: report.metadata.screener_version.clone(),
            keywords: report.keywords.clone(),
            results,
            has_failures: !report.failures.is_empty(),
            failures: report.failures.clone(),
            bars,
            axis_max: format!("{:.0}", report.chart.axis_max),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeScreenerError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool, chart_width: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, chart_width),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, chart_width),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Where `--save` writes: a directory gets a generated file name inside it.
pub fn resolve_save_path(path: &Path, format: OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format, true))
    } else {
        path.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("resume_ranking{}.{}", timestamp_suffix, extension)
}
