//! Run-scoped key/value store and external resource access.
//!
//! One [RunContext] is created per run and passed by `&mut` to every handler in
//! execution order; nothing else observes it, so it needs no locking.

use std::any::{Any, type_name};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::ContextError;

/// Named opaque resources (database handles, clients) and parameters supplied by the caller.
///
/// The core never inspects resources; handlers downcast them with [RunContext::env].
#[derive(Clone, Default)]
pub struct Resources {
  handles: HashMap<String, Arc<dyn Any + Send + Sync>>,
  params: BTreeMap<String, Value>,
}

impl Resources {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a resource under `name`, replacing any previous one.
  pub fn with_resource<T>(mut self, name: impl Into<String>, resource: T) -> Self
  where
    T: Any + Send + Sync,
  {
    self.handles.insert(name.into(), Arc::new(resource));
    self
  }

  /// Registers an already shared resource under `name`.
  pub fn with_shared(mut self, name: impl Into<String>, resource: Arc<dyn Any + Send + Sync>) -> Self {
    self.handles.insert(name.into(), resource);
    self
  }

  pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
    self.params.insert(name.into(), value);
    self
  }

  pub fn with_params(mut self, params: BTreeMap<String, Value>) -> Self {
    self.params.extend(params);
    self
  }

  pub fn params(&self) -> &BTreeMap<String, Value> {
    &self.params
  }

  /// Names of registered resources, sorted.
  pub fn resource_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.handles.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

impl std::fmt::Debug for Resources {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resources")
      .field("handles", &self.resource_names())
      .field("params", &self.params)
      .finish()
  }
}

/// Shared, mutable state for one run.
#[derive(Debug, Default)]
pub struct RunContext {
  store: HashMap<String, Value>,
  resources: Resources,
}

impl RunContext {
  pub fn new(resources: Resources) -> Self {
    Self {
      store: HashMap::new(),
      resources,
    }
  }

  /// Stores `value` under `key`. Last write wins.
  pub fn put(&mut self, key: impl Into<String>, value: Value) {
    let key = key.into();
    trace!(key = %key, "context put");
    self.store.insert(key, value);
  }

  /// Returns the value under `key`, or [ContextError::MissingKey].
  pub fn get(&self, key: &str) -> Result<&Value, ContextError> {
    self.store.get(key).ok_or_else(|| ContextError::MissingKey {
      key: key.to_string(),
    })
  }

  /// Returns the value under `key`, or `default` when unset.
  pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
    self.store.get(key).unwrap_or(default)
  }

  /// Decodes the value under `key` into `T`.
  pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ContextError> {
    let value = self.get(key)?;
    serde_json::from_value(value.clone()).map_err(|source| ContextError::Decode {
      key: key.to_string(),
      source,
    })
  }

  /// Drops every stored value. Resources and parameters are kept.
  pub fn clear(&mut self) {
    self.store.clear();
  }

  pub fn has(&self, key: &str) -> bool {
    self.store.contains_key(key)
  }

  /// Keys currently stored, sorted.
  pub fn keys(&self) -> Vec<&str> {
    let mut keys: Vec<&str> = self.store.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
  }

  /// Returns the resource registered under `name`, downcast to `T`.
  pub fn env<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContextError> {
    let handle = self
      .resources
      .handles
      .get(name)
      .ok_or_else(|| ContextError::MissingResource {
        name: name.to_string(),
      })?;
    Arc::clone(handle)
      .downcast::<T>()
      .map_err(|_| ContextError::ResourceType {
        name: name.to_string(),
        expected: type_name::<T>(),
      })
  }

  /// Returns the parameter `name`.
  pub fn param(&self, name: &str) -> Result<&Value, ContextError> {
    self
      .resources
      .params
      .get(name)
      .ok_or_else(|| ContextError::MissingParam {
        name: name.to_string(),
      })
  }

  pub fn resources(&self) -> &Resources {
    &self.resources
  }
}
