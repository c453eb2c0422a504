//! Plain-text console table printed at the end of a run.

use super::{RunSummary, shorten, summarize};
use crate::types::NodeResult;

const RULE_WIDTH: usize = 72;

/// Renders a fixed-width table of node, kind, status, severity and time.
pub fn render_text(results: &[NodeResult]) -> String {
  let rule = "-".repeat(RULE_WIDTH);
  let mut out = String::new();
  out.push_str("Run summary\n");
  out.push_str(&format!("{}\n", RunSummary::from_results(results).line()));
  out.push_str(&format!("{}\n", rule));
  out.push_str(&format!(
    "{:30} {:6} {:8} {:7} {:>8}\n",
    "node", "type", "status", "sev", "time(ms)"
  ));
  out.push_str(&format!("{}\n", rule));
  for r in results {
    let severity = r.severity.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
      "{:30} {:6} {:8} {:7} {:>8}\n",
      shorten(&r.id, 30),
      r.kind.to_string(),
      r.status.to_string(),
      severity,
      r.duration_ms
    ));
  }
  out.push_str(&format!("{}\n", rule));
  out.push_str(&format!("verdict: {}\n", summarize(results)));
  out
}
