//! Status reported by a check handler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status a check handler reports in its [super::CheckOutcome].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
  Pass,
  Fail,
  Skip,
  Error,
}

impl fmt::Display for CheckStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CheckStatus::Pass => write!(f, "pass"),
      CheckStatus::Fail => write!(f, "fail"),
      CheckStatus::Skip => write!(f, "skip"),
      CheckStatus::Error => write!(f, "error"),
    }
  }
}
