//! Report building and rendering

pub mod chart;
pub mod formatter;
pub mod report;

pub use chart::{Bar, BarChart};
pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::RankingReport;
