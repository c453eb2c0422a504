//! Tests for the verdict fold and tallies.

use super::{RunSummary, summarize};
use crate::types::{NodeKind, NodePayload, NodeResult, NodeStatus, RunVerdict, Severity};

fn check(id: &str, severity: Severity, status: NodeStatus) -> NodeResult {
  NodeResult {
    id: id.to_string(),
    kind: NodeKind::Check,
    severity: Some(severity),
    status,
    payload: NodePayload::None,
    error: None,
    upstream_skipped: status == NodeStatus::Skip,
    blocked_by: None,
    duration_ms: 0,
  }
}

fn task(id: &str, status: NodeStatus) -> NodeResult {
  NodeResult {
    kind: NodeKind::Task,
    severity: None,
    ..check(id, Severity::Error, status)
  }
}

#[test]
fn empty_results_are_clean() {
  assert_eq!(summarize(&[]), RunVerdict::Clean);
}

#[test]
fn error_severity_failure_is_error() {
  let results = vec![
    check("a", Severity::Warning, NodeStatus::Fail),
    check("b", Severity::Error, NodeStatus::Fail),
  ];
  assert_eq!(summarize(&results), RunVerdict::Error);
}

#[test]
fn errored_check_counts_like_failed() {
  let results = vec![check("a", Severity::Error, NodeStatus::Error)];
  assert_eq!(summarize(&results), RunVerdict::Error);
  let results = vec![check("a", Severity::Warning, NodeStatus::Error)];
  assert_eq!(summarize(&results), RunVerdict::Warning);
}

#[test]
fn info_failures_stay_clean() {
  let results = vec![check("a", Severity::Info, NodeStatus::Fail)];
  assert_eq!(summarize(&results), RunVerdict::Clean);
}

#[test]
fn skip_never_raises_the_verdict() {
  let results = vec![
    task("a", NodeStatus::Error),
    check("b", Severity::Error, NodeStatus::Skip),
    check("c", Severity::Warning, NodeStatus::Skip),
  ];
  assert_eq!(summarize(&results), RunVerdict::Clean);
}

#[test]
fn task_errors_do_not_count() {
  let results = vec![task("a", NodeStatus::Error), check("b", Severity::Error, NodeStatus::Pass)];
  assert_eq!(summarize(&results), RunVerdict::Clean);
}

#[test]
fn planned_results_are_clean() {
  let results = vec![check("a", Severity::Error, NodeStatus::Planned)];
  assert_eq!(summarize(&results), RunVerdict::Clean);
}

#[test]
fn flipping_an_error_check_to_fail_is_monotone() {
  let base = vec![
    check("a", Severity::Warning, NodeStatus::Fail),
    check("b", Severity::Error, NodeStatus::Pass),
  ];
  let mut flipped = base.clone();
  flipped[1].status = NodeStatus::Fail;
  assert!(summarize(&flipped) >= summarize(&base));
  assert_eq!(summarize(&flipped), RunVerdict::Error);
}

#[test]
fn summary_counts() {
  let results = vec![
    task("t1", NodeStatus::Pass),
    task("t2", NodeStatus::Error),
    task("t3", NodeStatus::Skip),
    check("c1", Severity::Error, NodeStatus::Pass),
    check("c2", Severity::Error, NodeStatus::Fail),
    check("c3", Severity::Warning, NodeStatus::Skip),
    check("c4", Severity::Info, NodeStatus::Error),
  ];
  let s = RunSummary::from_results(&results);
  assert_eq!(s.tasks, 3);
  assert_eq!(s.tasks_passed, 1);
  assert_eq!(s.tasks_errored, 1);
  assert_eq!(s.tasks_skipped, 1);
  assert_eq!(s.checks, 4);
  assert_eq!(s.checks_passed, 1);
  assert_eq!(s.checks_failed, 1);
  assert_eq!(s.checks_skipped, 1);
  assert_eq!(s.checks_errored, 1);
  assert_eq!(s.success_rate, 25.0);
  assert_eq!(s.line(), "tasks: 2 | checks: 1 pass, 1 fail, 1 skip, 1 error");
}

#[test]
fn summary_of_a_plan() {
  let results = vec![task("t", NodeStatus::Planned), check("c", Severity::Error, NodeStatus::Planned)];
  let s = RunSummary::from_results(&results);
  assert_eq!(s.planned, 2);
  assert_eq!(s.success_rate, 0.0);
  assert!(s.line().ends_with("| planned: 2"));
}
