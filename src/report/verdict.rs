//! Run verdict and status tallies.

use serde::{Deserialize, Serialize};

use crate::types::{NodeKind, NodeResult, NodeStatus, RunVerdict};

/// Folds results into the run verdict.
///
/// Only checks that ended in `Fail` or `Error` count, weighted by severity. Skipped
/// checks (including those skipped because of an upstream failure), `Info` checks and
/// tasks never raise the verdict.
pub fn summarize(results: &[NodeResult]) -> RunVerdict {
  results
    .iter()
    .filter(|r| r.kind == NodeKind::Check && r.status.is_failure())
    .filter_map(|r| r.severity)
    .map(RunVerdict::from_severity)
    .max()
    .unwrap_or_default()
}

/// Counts per kind and status for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
  pub tasks: usize,
  pub tasks_passed: usize,
  pub tasks_errored: usize,
  pub tasks_skipped: usize,
  pub checks: usize,
  pub checks_passed: usize,
  pub checks_failed: usize,
  pub checks_skipped: usize,
  pub checks_errored: usize,
  pub planned: usize,
  /// Percentage of checks that passed; 0 when there are no checks.
  pub success_rate: f64,
}

impl RunSummary {
  pub fn from_results(results: &[NodeResult]) -> Self {
    let mut s = RunSummary::default();
    for r in results {
      if r.status == NodeStatus::Planned {
        s.planned += 1;
      }
      match r.kind {
        NodeKind::Task => {
          s.tasks += 1;
          match r.status {
            NodeStatus::Pass => s.tasks_passed += 1,
            NodeStatus::Error | NodeStatus::Fail => s.tasks_errored += 1,
            NodeStatus::Skip => s.tasks_skipped += 1,
            NodeStatus::Planned => {}
          }
        }
        NodeKind::Check => {
          s.checks += 1;
          match r.status {
            NodeStatus::Pass => s.checks_passed += 1,
            NodeStatus::Fail => s.checks_failed += 1,
            NodeStatus::Skip => s.checks_skipped += 1,
            NodeStatus::Error => s.checks_errored += 1,
            NodeStatus::Planned => {}
          }
        }
      }
    }
    if s.checks > 0 {
      s.success_rate = s.checks_passed as f64 / s.checks as f64 * 100.0;
    }
    s
  }

  /// One-line tally, e.g. `tasks: 2 | checks: 3 pass, 1 fail, 0 skip, 0 error`.
  pub fn line(&self) -> String {
    let mut line = format!(
      "tasks: {} | checks: {} pass, {} fail, {} skip, {} error",
      self.tasks_passed + self.tasks_errored,
      self.checks_passed,
      self.checks_failed,
      self.checks_skipped,
      self.checks_errored
    );
    if self.planned > 0 {
      line.push_str(&format!(" | planned: {}", self.planned));
    }
    line
  }
}
