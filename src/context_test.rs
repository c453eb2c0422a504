//! Tests for `RunContext` and `Resources`.

use std::sync::Arc;

use serde_json::json;

use crate::context::{Resources, RunContext};
use crate::error::ContextError;

#[derive(Debug, PartialEq)]
struct FakeDb {
  url: String,
}

#[test]
fn put_then_get() {
  let mut ctx = RunContext::default();
  ctx.put("rows", json!(42));
  assert_eq!(ctx.get("rows").unwrap(), &json!(42));
  assert!(ctx.has("rows"));
}

#[test]
fn last_write_wins() {
  let mut ctx = RunContext::default();
  ctx.put("k", json!("a"));
  ctx.put("k", json!("b"));
  assert_eq!(ctx.get("k").unwrap(), &json!("b"));
  assert_eq!(ctx.keys(), vec!["k"]);
}

#[test]
fn missing_key_is_an_error_value() {
  let ctx = RunContext::default();
  let err = ctx.get("nope").unwrap_err();
  assert!(matches!(err, ContextError::MissingKey { ref key } if key == "nope"));
  assert!(!ctx.has("nope"));
}

#[test]
fn get_or_returns_default() {
  let mut ctx = RunContext::default();
  let fallback = json!(0);
  assert_eq!(ctx.get_or("count", &fallback), &json!(0));
  ctx.put("count", json!(7));
  assert_eq!(ctx.get_or("count", &fallback), &json!(7));
}

#[test]
fn get_as_decodes_and_reports_decode_errors() {
  let mut ctx = RunContext::default();
  ctx.put("ids", json!([1, 2, 3]));
  let ids: Vec<u32> = ctx.get_as("ids").unwrap();
  assert_eq!(ids, vec![1, 2, 3]);
  let err = ctx.get_as::<String>("ids").unwrap_err();
  assert!(matches!(err, ContextError::Decode { .. }));
}

#[test]
fn env_downcasts_resources() {
  let resources = Resources::new().with_resource(
    "warehouse",
    FakeDb {
      url: "postgres://localhost/dq".to_string(),
    },
  );
  let ctx = RunContext::new(resources);
  let db: Arc<FakeDb> = ctx.env("warehouse").unwrap();
  assert_eq!(db.url, "postgres://localhost/dq");
}

#[test]
fn env_missing_and_wrong_type() {
  let ctx = RunContext::new(Resources::new().with_resource("n", 5_u32));
  assert!(matches!(
    ctx.env::<FakeDb>("warehouse"),
    Err(ContextError::MissingResource { .. })
  ));
  assert!(matches!(
    ctx.env::<FakeDb>("n"),
    Err(ContextError::ResourceType { .. })
  ));
}

#[test]
fn shared_resources_are_the_same_allocation() {
  let shared: Arc<dyn std::any::Any + Send + Sync> = Arc::new(FakeDb {
    url: "x".to_string(),
  });
  let ctx = RunContext::new(Resources::new().with_shared("db", Arc::clone(&shared)));
  let db: Arc<FakeDb> = ctx.env("db").unwrap();
  assert_eq!(Arc::strong_count(&shared), 3);
  assert_eq!(db.url, "x");
}

#[test]
fn params_are_readable() {
  let ctx = RunContext::new(Resources::new().with_param("threshold", json!(0.1)));
  assert_eq!(ctx.param("threshold").unwrap(), &json!(0.1));
  assert!(matches!(
    ctx.param("missing"),
    Err(ContextError::MissingParam { .. })
  ));
}

#[test]
fn resources_debug_lists_names() {
  let r = Resources::new().with_resource("b", 1_u8).with_resource("a", 2_u8);
  assert_eq!(r.resource_names(), vec!["a", "b"]);
  assert!(format!("{:?}", r).contains("\"a\""));
}

#[test]
fn clear_drops_values_but_keeps_resources() {
  let mut ctx = RunContext::new(Resources::new().with_param("limit", json!(3)).with_resource("db", 7_u32));
  ctx.put("rows", json!(10));
  ctx.clear();
  assert!(!ctx.has("rows"));
  assert!(ctx.keys().is_empty());
  assert_eq!(ctx.param("limit").unwrap(), &json!(3));
  assert_eq!(*ctx.env::<u32>("db").unwrap(), 7);
}
