//! Kind of a registered node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a node is a task (produces a value) or a check (produces a verdict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
  Task,
  Check,
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeKind::Task => write!(f, "task"),
      NodeKind::Check => write!(f, "check"),
    }
  }
}
