//! Per-node record produced by the scheduler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CheckOutcome, NodeKind, NodeStatus, Severity};

/// What a node produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodePayload {
  /// Handler not invoked (skipped, planned) or failed before returning.
  None,
  /// Value returned by a task.
  Value(Value),
  /// Outcome returned by a check.
  Check(CheckOutcome),
}

/// Record of one scheduled node in one run. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
  pub id: String,
  pub kind: NodeKind,
  /// Severity of a check; `None` for tasks.
  pub severity: Option<Severity>,
  pub status: NodeStatus,
  pub payload: NodePayload,
  /// Set only when `status` is `Error`.
  pub error: Option<String>,
  /// True when skipped because a dependency did not pass.
  pub upstream_skipped: bool,
  /// First dependency (declaration order) that caused the skip.
  pub blocked_by: Option<String>,
  /// Handler wall time in milliseconds; 0 when not invoked.
  pub duration_ms: u64,
}

impl NodeResult {
  /// Returns the check outcome, if this node is a check that returned one.
  pub fn outcome(&self) -> Option<&CheckOutcome> {
    match &self.payload {
      NodePayload::Check(o) => Some(o),
      _ => None,
    }
  }

  /// Returns the task value, if this node is a task that returned one.
  pub fn value(&self) -> Option<&Value> {
    match &self.payload {
      NodePayload::Value(v) => Some(v),
      _ => None,
    }
  }

  /// Human-readable description: check description, error message, or skip reason.
  pub fn description(&self) -> String {
    if let Some(err) = &self.error {
      return err.clone();
    }
    if let Some(dep) = &self.blocked_by {
      return format!("skipped: upstream '{}' did not pass", dep);
    }
    self
      .outcome()
      .map(|o| o.description().to_string())
      .unwrap_or_default()
  }
}
