//! Severity of a check failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Weight a failing check carries toward the run verdict. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Warning,
  #[default]
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "info"),
      Severity::Warning => write!(f, "warning"),
      Severity::Error => write!(f, "error"),
    }
  }
}

impl FromStr for Severity {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "info" => Ok(Severity::Info),
      "warn" | "warning" => Ok(Severity::Warning),
      "error" => Ok(Severity::Error),
      other => Err(format!("unknown severity '{}'", other)),
    }
  }
}
