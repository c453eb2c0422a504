//! Graph builder: validates the registry and computes a deterministic execution order.
//!
//! Edges run from a node to each of its dependencies. The order places every node
//! after all of its dependencies; among ready nodes the lexicographically smallest
//! id is taken first, so the same registry always yields the same order.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::registry::Registry;
use crate::types::NodeDefinition;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  InProgress,
  Done,
}

/// Validates `registry` and returns the execution order.
///
/// With `targets`, the order is restricted to the union of the targets' transitive
/// dependency closures; an empty slice yields an empty order.
#[instrument(level = "trace", skip(registry))]
pub fn build(registry: &Registry, targets: Option<&[String]>) -> Result<Vec<String>, GraphError> {
  validate(registry)?;
  let include = match targets {
    Some(targets) => Some(closure(registry, targets)?),
    None => None,
  };
  let order = topo_order(registry, include.as_ref());
  debug!(nodes = order.len(), registered = registry.len(), "built execution order");
  Ok(order)
}

/// Checks that every dependency resolves and that the dependency relation is acyclic.
pub fn validate(registry: &Registry) -> Result<(), GraphError> {
  check_dependencies(registry)?;
  detect_cycle(registry)
}

/// Ids in the transitive dependency closure of `targets`, targets included.
pub fn closure<'r>(
  registry: &'r Registry,
  targets: &[String],
) -> Result<HashSet<&'r str>, GraphError> {
  let mut seen: HashSet<&'r str> = HashSet::new();
  let mut stack: Vec<&'r str> = Vec::new();
  for target in targets {
    let node = registry
      .get(target)
      .ok_or_else(|| GraphError::UnknownTarget {
        target: target.clone(),
      })?;
    stack.push(node.id());
  }
  while let Some(id) = stack.pop() {
    if !seen.insert(id) {
      continue;
    }
    for dep in dependencies_of(registry, id) {
      if !seen.contains(dep.as_str()) {
        stack.push(dep.as_str());
      }
    }
  }
  Ok(seen)
}

fn dependencies_of<'r>(registry: &'r Registry, id: &str) -> &'r [String] {
  registry
    .get(id)
    .map(NodeDefinition::dependencies)
    .unwrap_or(&[])
}

fn check_dependencies(registry: &Registry) -> Result<(), GraphError> {
  for node in registry.nodes() {
    for dep in node.dependencies() {
      if !registry.contains(dep) {
        return Err(GraphError::UnknownDependency {
          node: node.id().to_string(),
          missing: dep.clone(),
        });
      }
    }
  }
  Ok(())
}

/// Depth-first search with an in-progress mark; a back edge to an in-progress node is a cycle.
/// Roots are visited in id order so the reported cycle is deterministic.
fn detect_cycle(registry: &Registry) -> Result<(), GraphError> {
  let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(registry.len());
  let mut roots: Vec<&str> = registry.nodes().iter().map(NodeDefinition::id).collect();
  roots.sort_unstable();

  for root in roots {
    if marks.contains_key(root) {
      continue;
    }
    marks.insert(root, Mark::InProgress);
    let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
      let (id, next) = *frame;
      match dependencies_of(registry, id).get(next) {
        Some(dep) => {
          frame.1 += 1;
          let dep = dep.as_str();
          match marks.get(dep) {
            Some(Mark::InProgress) => {
              let start = stack.iter().position(|(s, _)| *s == dep).unwrap_or(0);
              let mut cycle: Vec<String> = stack[start..].iter().map(|(s, _)| s.to_string()).collect();
              cycle.push(dep.to_string());
              return Err(GraphError::CycleDetected { cycle });
            }
            Some(Mark::Done) => {}
            None => {
              marks.insert(dep, Mark::InProgress);
              stack.push((dep, 0));
            }
          }
        }
        None => {
          marks.insert(id, Mark::Done);
          stack.pop();
        }
      }
    }
  }
  Ok(())
}

/// Kahn's algorithm with a sorted ready set. Assumes a validated, acyclic registry.
fn topo_order(registry: &Registry, include: Option<&HashSet<&str>>) -> Vec<String> {
  let included = |id: &str| include.is_none_or(|set| set.contains(id));

  let mut pending: HashMap<&str, usize> = HashMap::new();
  let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
  let mut ready: BTreeSet<&str> = BTreeSet::new();

  for node in registry.nodes().iter().filter(|n| included(n.id())) {
    let deps = node.dependencies();
    for dep in deps {
      dependents.entry(dep.as_str()).or_default().push(node.id());
    }
    if deps.is_empty() {
      ready.insert(node.id());
    } else {
      pending.insert(node.id(), deps.len());
    }
  }

  let mut order = Vec::with_capacity(pending.len() + ready.len());
  while let Some(id) = ready.pop_first() {
    order.push(id.to_string());
    for dependent in dependents.get(id).map(Vec::as_slice).unwrap_or(&[]) {
      if let Some(count) = pending.get_mut(dependent) {
        *count -= 1;
        if *count == 0 {
          pending.remove(dependent);
          ready.insert(*dependent);
        }
      }
    }
  }
  order
}
