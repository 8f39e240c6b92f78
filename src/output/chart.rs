//! Horizontal bar chart of resume scores

use colored::{Color, Colorize};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Bars sorted by value descending, with an axis that always shows 0-100
/// plus headroom above the best score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub axis_max: f64,
}

impl BarChart {
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| b.value.total_cmp(&a.value));
        let axis_max = Self::axis_max_for(&bars);
        Self { bars, axis_max }
    }

    /// max(100, best + 10)
    pub fn axis_max_for(bars: &[Bar]) -> f64 {
        let best = bars
            .iter()
            .map(|bar| bar.value)
            .fold(f64::NEG_INFINITY, f64::max);
        if best.is_finite() {
            (best + 10.0).max(100.0)
        } else {
            100.0
        }
    }

    /// Share of the axis a value covers, clipped to [0, 1].
    pub fn fraction(&self, value: f64) -> f64 {
        if self.axis_max <= 0.0 {
            return 0.0;
        }
        (value / self.axis_max).clamp(0.0, 1.0)
    }

    /// Render as text, `width` columns for the longest possible bar.
    pub fn render_text(&self, width: usize, use_colors: bool) -> String {
        let label_width = self.bars.iter().map(|bar| bar.label.chars().count()).max().unwrap_or(0);
        let mut output = String::new();

        for bar in &self.bars {
            let filled = (self.fraction(bar.value) * width as f64).round() as usize;
            let body = "█".repeat(filled);
            let body = if use_colors {
                body.color(Self::bar_color(bar.value)).to_string()
            } else {
                body
            };
            output.push_str(&format!(
                "{:<label_width$} │{}{} {:.2}%\n",
                bar.label,
                body,
                " ".repeat(width - filled.min(width)),
                bar.value,
                label_width = label_width
            ));
        }

        output.push_str(&format!(
            "{:<label_width$} └{}┘ 0 .. {:.0}\n",
            "",
            "─".repeat(width),
            self.axis_max,
            label_width = label_width
        ));
        output
    }

    fn bar_color(value: f64) -> Color {
        match value {
            v if v >= 70.0 => Color::Green,
            v if v >= 50.0 => Color::Yellow,
            _ => Color::Red,
        }
    }
}
