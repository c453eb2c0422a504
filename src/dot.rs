//! Graphviz DOT rendering of a registry.

use std::fmt::Write;

use crate::registry::Registry;
use crate::types::NodeKind;

/// Renders `registry` as a left-to-right digraph: tasks as boxes, checks as ovals,
/// one edge from each dependency to its dependent. Nodes appear in registration order.
pub fn render_dot(registry: &Registry) -> String {
  let mut out = String::from("digraph quail {\n  rankdir=LR;\n");
  for node in registry.nodes() {
    let shape = match node.kind() {
      NodeKind::Task => "box",
      NodeKind::Check => "oval",
    };
    let _ = writeln!(out, "  {} [shape={}];", quote(node.id()), shape);
  }
  for node in registry.nodes() {
    for dep in node.dependencies() {
      let _ = writeln!(out, "  {} -> {};", quote(dep), quote(node.id()));
    }
  }
  out.push_str("}\n");
  out
}

fn quote(id: &str) -> String {
  format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
