//! Node registry: the finalized set of tasks and checks for a run.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::GraphError;
use crate::types::{NodeDefinition, NodeKind};

/// Collects [NodeDefinition]s, rejecting duplicate ids and repeated dependencies.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
  nodes: Vec<NodeDefinition>,
  index: HashMap<String, usize>,
}

impl RegistryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a node.
  pub fn register(&mut self, node: NodeDefinition) -> Result<&mut Self, GraphError> {
    if self.index.contains_key(node.id()) {
      return Err(GraphError::DuplicateId {
        id: node.id().to_string(),
      });
    }
    let mut seen = HashSet::new();
    for dep in node.dependencies() {
      if !seen.insert(dep.as_str()) {
        return Err(GraphError::DuplicateDependency {
          node: node.id().to_string(),
          dependency: dep.clone(),
        });
      }
    }
    debug!(id = %node.id(), kind = %node.kind(), deps = ?node.dependencies(), "registered node");
    self.index.insert(node.id().to_string(), self.nodes.len());
    self.nodes.push(node);
    Ok(self)
  }

  /// Consuming variant of [Self::register] for chained construction.
  pub fn with(mut self, node: NodeDefinition) -> Result<Self, GraphError> {
    self.register(node)?;
    Ok(self)
  }

  pub fn build(self) -> Registry {
    Registry {
      nodes: self.nodes,
      index: self.index,
    }
  }
}

/// Immutable collection of registered nodes, in registration order.
///
/// Dependencies are not resolved here; [crate::graph::build] validates them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
  nodes: Vec<NodeDefinition>,
  index: HashMap<String, usize>,
}

impl Registry {
  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::new()
  }

  /// Builds a registry from definitions in one call.
  pub fn from_nodes<I>(nodes: I) -> Result<Self, GraphError>
  where
    I: IntoIterator<Item = NodeDefinition>,
  {
    let mut builder = RegistryBuilder::new();
    for node in nodes {
      builder.register(node)?;
    }
    Ok(builder.build())
  }

  pub fn get(&self, id: &str) -> Option<&NodeDefinition> {
    self.index.get(id).and_then(|&i| self.nodes.get(i))
  }

  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(id)
  }

  /// All nodes in registration order.
  pub fn nodes(&self) -> &[NodeDefinition] {
    &self.nodes
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Ids of all tasks, in registration order.
  pub fn tasks(&self) -> Vec<&str> {
    self.ids_of(NodeKind::Task)
  }

  /// Ids of all checks, in registration order.
  pub fn checks(&self) -> Vec<&str> {
    self.ids_of(NodeKind::Check)
  }

  fn ids_of(&self, kind: NodeKind) -> Vec<&str> {
    self
      .nodes
      .iter()
      .filter(|n| n.kind() == kind)
      .map(NodeDefinition::id)
      .collect()
  }
}
