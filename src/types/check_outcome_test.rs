//! Tests for `CheckOutcome`.

use super::{CheckOutcome, CheckStatus};

#[test]
fn constructors_set_status() {
  assert_eq!(CheckOutcome::pass("a").status(), CheckStatus::Pass);
  assert_eq!(CheckOutcome::fail("a").status(), CheckStatus::Fail);
  assert_eq!(CheckOutcome::skip("a").status(), CheckStatus::Skip);
  assert_eq!(CheckOutcome::error("a").status(), CheckStatus::Error);
}

#[test]
fn from_bool_maps_to_pass_or_fail() {
  assert_eq!(CheckOutcome::from_bool("a", true).status(), CheckStatus::Pass);
  assert_eq!(CheckOutcome::from_bool("a", false).status(), CheckStatus::Fail);
}

#[test]
fn metrics_and_description() {
  let o = CheckOutcome::fail("null_rate")
    .with_metric("null_rate", 0.25)
    .with_metric("rows", 400.0)
    .with_metric("null_rate", 0.5)
    .with_description("too many nulls");
  assert_eq!(o.id(), "null_rate");
  assert_eq!(o.metrics().len(), 2);
  assert_eq!(o.metrics().get("null_rate"), Some(&0.5));
  assert_eq!(o.description(), "too many nulls");
}

#[test]
fn new_outcome_has_empty_metrics() {
  let o = CheckOutcome::pass("x");
  assert!(o.metrics().is_empty());
  assert!(o.description().is_empty());
}

#[test]
fn serializes_status_lowercase() {
  let o = CheckOutcome::skip("x").with_metric("m", 1.0);
  let v = serde_json::to_value(&o).unwrap();
  assert_eq!(v["status"], "skip");
  assert_eq!(v["id"], "x");
  assert_eq!(v["metrics"]["m"], 1.0);
}

#[test]
fn non_finite_metrics_survive_json() {
  let o = CheckOutcome::pass("null_rate")
    .with_metric("null_rate", 0.0 / 0.0)
    .with_metric("growth", f64::INFINITY)
    .with_metric("drop", f64::NEG_INFINITY)
    .with_metric("rows", 0.0);
  let v = serde_json::to_value(&o).unwrap();
  assert_eq!(v["metrics"]["null_rate"], "NaN");
  assert_eq!(v["metrics"]["growth"], "inf");
  assert_eq!(v["metrics"]["drop"], "-inf");
  assert_eq!(v["metrics"]["rows"], 0.0);

  let back: CheckOutcome = serde_json::from_value(v).unwrap();
  assert!(back.metrics()["null_rate"].is_nan());
  assert_eq!(back.metrics()["growth"], f64::INFINITY);
  assert_eq!(back.metrics()["drop"], f64::NEG_INFINITY);
  assert_eq!(back.metrics()["rows"], 0.0);
}

#[test]
fn integer_metrics_deserialize() {
  let o: CheckOutcome = serde_json::from_str(
    r#"{"id": "rows", "status": "pass", "metrics": {"rows": 12}, "description": ""}"#,
  )
  .unwrap();
  assert_eq!(o.metrics()["rows"], 12.0);
}

#[test]
fn unknown_metric_text_is_rejected() {
  let err = serde_json::from_str::<CheckOutcome>(
    r#"{"id": "x", "status": "pass", "metrics": {"m": "lots"}, "description": ""}"#,
  )
  .unwrap_err();
  assert!(err.to_string().contains("metric 'm' has non-numeric value 'lots'"));
}
