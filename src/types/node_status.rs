//! Final status of a scheduled node.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CheckStatus;

/// Final status recorded for a node in one run.
///
/// `Planned` only appears in dry runs and never mixes with the execution statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
  Pass,
  Fail,
  Skip,
  Error,
  Planned,
}

impl NodeStatus {
  /// True when dependents of a node with this status must be skipped.
  pub fn blocks_dependents(self) -> bool {
    matches!(self, NodeStatus::Fail | NodeStatus::Skip | NodeStatus::Error)
  }

  /// True for `Fail` and `Error`, the statuses that can raise a verdict.
  pub fn is_failure(self) -> bool {
    matches!(self, NodeStatus::Fail | NodeStatus::Error)
  }
}

impl From<CheckStatus> for NodeStatus {
  fn from(s: CheckStatus) -> Self {
    match s {
      CheckStatus::Pass => NodeStatus::Pass,
      CheckStatus::Fail => NodeStatus::Fail,
      CheckStatus::Skip => NodeStatus::Skip,
      CheckStatus::Error => NodeStatus::Error,
    }
  }
}

impl fmt::Display for NodeStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeStatus::Pass => write!(f, "pass"),
      NodeStatus::Fail => write!(f, "fail"),
      NodeStatus::Skip => write!(f, "skip"),
      NodeStatus::Error => write!(f, "error"),
      NodeStatus::Planned => write!(f, "planned"),
    }
  }
}
