//! Markdown summary: verdict line plus one table row per node.

use super::{RunSummary, key_metrics, shorten, summarize};
use crate::types::NodeResult;

/// Renders results as a Markdown report.
pub fn render_markdown(results: &[NodeResult]) -> String {
  let summary = RunSummary::from_results(results);
  let mut out = String::new();
  out.push_str("# Quail run report\n\n");
  out.push_str(&format!("**Verdict:** {}\n\n", summarize(results)));
  out.push_str(&format!("{}\n\n", summary.line()));
  out.push_str("| id | kind | status | metrics | description |\n");
  out.push_str("|----|------|--------|---------|-------------|\n");
  for r in results {
    out.push_str(&format!(
      "| {} | {} | {} | {} | {} |\n",
      cell(&r.id),
      r.kind,
      r.status,
      cell(&key_metrics(r, 2)),
      cell(&shorten(&r.description(), 80)),
    ));
  }
  out
}

/// Escapes table delimiters and folds line breaks so a value stays in one cell.
fn cell(s: &str) -> String {
  s.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}
