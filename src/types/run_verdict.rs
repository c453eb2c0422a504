//! Overall verdict of a completed run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Worst-case classification of a run. Ordered `Clean < Warning < Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunVerdict {
  #[default]
  Clean,
  Warning,
  Error,
}

impl RunVerdict {
  /// Verdict contributed by one failing check of the given severity.
  pub fn from_severity(severity: Severity) -> Self {
    match severity {
      Severity::Info => RunVerdict::Clean,
      Severity::Warning => RunVerdict::Warning,
      Severity::Error => RunVerdict::Error,
    }
  }

  /// Process exit status for this verdict. With `strict`, warnings also exit non-zero.
  pub fn exit_code(self, strict: bool) -> i32 {
    match self {
      RunVerdict::Clean => 0,
      RunVerdict::Warning if strict => 1,
      RunVerdict::Warning => 0,
      RunVerdict::Error => 1,
    }
  }
}

impl fmt::Display for RunVerdict {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunVerdict::Clean => write!(f, "clean"),
      RunVerdict::Warning => write!(f, "warning"),
      RunVerdict::Error => write!(f, "error"),
    }
  }
}
