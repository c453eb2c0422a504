//! Result reporter: run verdict, tallies and report encodings.
//!
//! Every function here is a pure function of the [NodeResult] sequence. Renderings
//! carry no timestamps or durations (except the console table), so rendering the same
//! results twice is byte-identical and reports from equivalent runs compare equal.

mod junit;
mod markdown;
mod text;
mod verdict;
#[cfg(test)]
mod verdict_test;

use std::fmt;
use std::str::FromStr;

pub use junit::render_junit;
pub use markdown::render_markdown;
pub use text::render_text;
pub use verdict::{RunSummary, summarize};

use crate::error::ReportError;
use crate::types::NodeResult;

/// Report encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JUnit-style XML test report.
  Junit,
  /// Markdown summary table.
  Markdown,
  /// Plain-text console table.
  Text,
}

impl fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReportFormat::Junit => write!(f, "junit"),
      ReportFormat::Markdown => write!(f, "markdown"),
      ReportFormat::Text => write!(f, "text"),
    }
  }
}

impl FromStr for ReportFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "junit" | "xml" => Ok(ReportFormat::Junit),
      "markdown" | "md" => Ok(ReportFormat::Markdown),
      "text" | "txt" => Ok(ReportFormat::Text),
      other => Err(format!("unknown report format '{}'", other)),
    }
  }
}

/// Renders `results` in the given encoding.
pub fn render(results: &[NodeResult], format: ReportFormat) -> Result<String, ReportError> {
  match format {
    ReportFormat::Junit => render_junit(results),
    ReportFormat::Markdown => Ok(render_markdown(results)),
    ReportFormat::Text => Ok(render_text(results)),
  }
}

/// Up to `limit` metrics as `name=value`, in name order.
pub(crate) fn key_metrics(result: &NodeResult, limit: usize) -> String {
  result
    .outcome()
    .map(|o| {
      o.metrics()
        .iter()
        .take(limit)
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
    })
    .unwrap_or_default()
}

/// Truncates to at most `max` characters, marking the cut with `...`.
pub(crate) fn shorten(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_string();
  }
  let keep: String = s.chars().take(max.saturating_sub(3)).collect();
  format!("{}...", keep)
}
