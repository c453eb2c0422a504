//! A registered task or check.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{CheckOutcome, NodeKind, Severity};
use crate::context::RunContext;
use crate::error::BoxError;

/// Task handler: produces an arbitrary value or fails.
pub type TaskFn = Arc<dyn Fn(&mut RunContext) -> Result<Value, BoxError> + Send + Sync>;

/// Check handler: produces a [CheckOutcome] or fails.
pub type CheckFn = Arc<dyn Fn(&mut RunContext) -> Result<CheckOutcome, BoxError> + Send + Sync>;

/// Unit of work attached to a node.
#[derive(Clone)]
pub enum Handler {
  Task(TaskFn),
  Check(CheckFn),
}

impl fmt::Debug for Handler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Handler::Task(_) => f.write_str("Handler::Task"),
      Handler::Check(_) => f.write_str("Handler::Check"),
    }
  }
}

/// A task or check as declared before a run.
///
/// Built with [NodeDefinition::task] or [NodeDefinition::check] and handed to a
/// [crate::registry::RegistryBuilder]; immutable once registered.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
  id: String,
  dependencies: Vec<String>,
  severity: Option<Severity>,
  description: Option<String>,
  handler: Handler,
}

impl NodeDefinition {
  /// Declares a task.
  pub fn task<F>(id: impl Into<String>, handler: F) -> Self
  where
    F: Fn(&mut RunContext) -> Result<Value, BoxError> + Send + Sync + 'static,
  {
    Self {
      id: id.into(),
      dependencies: vec![],
      severity: None,
      description: None,
      handler: Handler::Task(Arc::new(handler)),
    }
  }

  /// Declares a check with the given severity.
  pub fn check<F>(id: impl Into<String>, severity: Severity, handler: F) -> Self
  where
    F: Fn(&mut RunContext) -> Result<CheckOutcome, BoxError> + Send + Sync + 'static,
  {
    Self {
      id: id.into(),
      dependencies: vec![],
      severity: Some(severity),
      description: None,
      handler: Handler::Check(Arc::new(handler)),
    }
  }

  /// Appends dependency ids in declaration order. Repeats are rejected at registration.
  pub fn requires<I, S>(mut self, ids: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dependencies.extend(ids.into_iter().map(Into::into));
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn kind(&self) -> NodeKind {
    match self.handler {
      Handler::Task(_) => NodeKind::Task,
      Handler::Check(_) => NodeKind::Check,
    }
  }

  pub fn dependencies(&self) -> &[String] {
    &self.dependencies
  }

  /// Severity of a check; `None` for tasks.
  pub fn severity(&self) -> Option<Severity> {
    self.severity
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn handler(&self) -> &Handler {
    &self.handler
  }
}
