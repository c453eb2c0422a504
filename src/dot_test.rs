//! Tests for DOT rendering.

use serde_json::json;

use crate::dot::render_dot;
use crate::registry::Registry;
use crate::types::{CheckOutcome, NodeDefinition, Severity};

#[test]
fn tasks_are_boxes_checks_are_ovals() {
  let registry = Registry::from_nodes([
    NodeDefinition::task("load", |_| Ok(json!(null))),
    NodeDefinition::check("rows", Severity::Error, |_| Ok(CheckOutcome::pass("rows")))
      .requires(["load"]),
  ])
  .unwrap();
  let dot = render_dot(&registry);
  assert_eq!(
    dot,
    "digraph quail {\n  rankdir=LR;\n  \"load\" [shape=box];\n  \"rows\" [shape=oval];\n  \"load\" -> \"rows\";\n}\n"
  );
}

#[test]
fn empty_registry_renders_an_empty_graph() {
  assert_eq!(
    render_dot(&Registry::default()),
    "digraph quail {\n  rankdir=LR;\n}\n"
  );
}

#[test]
fn quotes_in_ids_are_escaped() {
  let registry = Registry::from_nodes([NodeDefinition::task("say \"hi\"", |_| Ok(json!(null)))]).unwrap();
  assert!(render_dot(&registry).contains("\"say \\\"hi\\\"\" [shape=box];"));
}
