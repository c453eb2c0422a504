//! Outcome returned by a check handler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CheckStatus;

/// Outcome returned by a check handler.
///
/// Fields are read-only once built; the status is fixed by the constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
  id: String,
  status: CheckStatus,
  #[serde(with = "metric_values")]
  metrics: BTreeMap<String, f64>,
  description: String,
}

impl CheckOutcome {
  pub fn new(id: impl Into<String>, status: CheckStatus) -> Self {
    Self {
      id: id.into(),
      status,
      metrics: BTreeMap::new(),
      description: String::new(),
    }
  }

  pub fn pass(id: impl Into<String>) -> Self {
    Self::new(id, CheckStatus::Pass)
  }

  pub fn fail(id: impl Into<String>) -> Self {
    Self::new(id, CheckStatus::Fail)
  }

  pub fn skip(id: impl Into<String>) -> Self {
    Self::new(id, CheckStatus::Skip)
  }

  pub fn error(id: impl Into<String>) -> Self {
    Self::new(id, CheckStatus::Error)
  }

  /// Pass when `ok`, fail otherwise.
  pub fn from_bool(id: impl Into<String>, ok: bool) -> Self {
    if ok { Self::pass(id) } else { Self::fail(id) }
  }

  /// Adds (or replaces) a numeric metric. Non-finite values are kept and serialize
  /// as `"NaN"`, `"inf"` or `"-inf"`.
  pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
    self.metrics.insert(name.into(), value);
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn status(&self) -> CheckStatus {
    self.status
  }

  pub fn metrics(&self) -> &BTreeMap<String, f64> {
    &self.metrics
  }

  pub fn description(&self) -> &str {
    &self.description
  }
}

/// Metric maps as JSON: finite values as numbers, non-finite values as strings
/// (JSON numbers cannot hold them).
mod metric_values {
  use std::collections::BTreeMap;

  use serde::de::Error as _;
  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  #[derive(Serialize, Deserialize)]
  #[serde(untagged)]
  enum Metric {
    Number(f64),
    Text(String),
  }

  fn encode(value: f64) -> Metric {
    if value.is_finite() {
      Metric::Number(value)
    } else if value.is_nan() {
      Metric::Text("NaN".to_string())
    } else if value > 0.0 {
      Metric::Text("inf".to_string())
    } else {
      Metric::Text("-inf".to_string())
    }
  }

  pub fn serialize<S>(metrics: &BTreeMap<String, f64>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_map(metrics.iter().map(|(name, value)| (name, encode(*value))))
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
  where
    D: Deserializer<'de>,
  {
    BTreeMap::<String, Metric>::deserialize(deserializer)?
      .into_iter()
      .map(|(name, metric)| match metric {
        Metric::Number(n) => Ok((name, n)),
        Metric::Text(text) => match text.as_str() {
          "NaN" => Ok((name, f64::NAN)),
          "inf" => Ok((name, f64::INFINITY)),
          "-inf" => Ok((name, f64::NEG_INFINITY)),
          other => Err(D::Error::custom(format!(
            "metric '{}' has non-numeric value '{}'",
            name, other
          ))),
        },
      })
      .collect()
  }
}
