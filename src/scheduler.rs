//! Scheduler: runs nodes in a precomputed order and propagates failures to dependents.
//!
//! Execution is strictly sequential. A node whose dependency ended in `Fail`, `Skip` or
//! `Error` is recorded as skipped without invoking its handler, so one upstream break
//! skips the entire downstream subtree.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::context::RunContext;
use crate::error::BoxError;
use crate::registry::Registry;
use crate::types::{
  CheckOutcome, CheckStatus, Handler, NodeDefinition, NodePayload, NodeResult, NodeStatus,
};

/// Runs every node in `order` against `ctx` and returns one [NodeResult] per node, in order.
///
/// Handler errors and panics become `Error` results; they never abort the run.
#[instrument(level = "trace", skip_all, fields(nodes = order.len()))]
pub fn run(order: &[String], registry: &Registry, ctx: &mut RunContext) -> Vec<NodeResult> {
  let mut statuses: HashMap<&str, NodeStatus> = HashMap::with_capacity(order.len());
  let mut results = Vec::with_capacity(order.len());

  for id in order {
    let Some(node) = registry.get(id) else {
      warn!(node = %id, "not in registry, not scheduled");
      continue;
    };

    let blocked_by = node
      .dependencies()
      .iter()
      .find(|dep| statuses.get(dep.as_str()).is_some_and(|s| s.blocks_dependents()));

    let result = match blocked_by {
      Some(dep) => {
        warn!(node = %id, blocked_by = %dep, "skipped: upstream did not pass");
        skipped(node, dep)
      }
      None => execute(node, ctx),
    };

    statuses.insert(node.id(), result.status);
    results.push(result);
  }
  results
}

/// Dry run: the same node sequence as [run], every node `Planned`, no handler invoked.
#[instrument(level = "trace", skip_all, fields(nodes = order.len()))]
pub fn plan(order: &[String], registry: &Registry) -> Vec<NodeResult> {
  order
    .iter()
    .filter_map(|id| registry.get(id))
    .map(|node| {
      info!(node = %node.id(), kind = %node.kind(), deps = ?node.dependencies(), "planned");
      record(node, NodeStatus::Planned, NodePayload::None, None, 0)
    })
    .collect()
}

fn record(
  node: &NodeDefinition,
  status: NodeStatus,
  payload: NodePayload,
  error: Option<String>,
  duration_ms: u64,
) -> NodeResult {
  NodeResult {
    id: node.id().to_string(),
    kind: node.kind(),
    severity: node.severity(),
    status,
    payload,
    error,
    upstream_skipped: false,
    blocked_by: None,
    duration_ms,
  }
}

fn skipped(node: &NodeDefinition, dep: &str) -> NodeResult {
  NodeResult {
    upstream_skipped: true,
    blocked_by: Some(dep.to_string()),
    ..record(node, NodeStatus::Skip, NodePayload::None, None, 0)
  }
}

fn execute(node: &NodeDefinition, ctx: &mut RunContext) -> NodeResult {
  let id = node.id();
  info!(node = %id, kind = %node.kind(), "running");
  let started = Instant::now();

  let (status, payload, error) = match node.handler() {
    Handler::Task(f) => match invoke(|| f(&mut *ctx)) {
      Ok(value) => {
        publish(ctx, id, &value);
        (NodeStatus::Pass, NodePayload::Value(value), None)
      }
      Err(msg) => (NodeStatus::Error, NodePayload::None, Some(msg)),
    },
    Handler::Check(f) => match invoke(|| f(&mut *ctx)) {
      Ok(outcome) if outcome.id() != id => {
        let msg = format!("check returned an outcome for '{}'", outcome.id());
        (NodeStatus::Error, NodePayload::Check(outcome), Some(msg))
      }
      Ok(outcome) => {
        if let Ok(v) = serde_json::to_value(&outcome) {
          ctx.put(id, v);
        }
        let error = check_error(&outcome);
        (outcome.status().into(), NodePayload::Check(outcome), error)
      }
      Err(msg) => (NodeStatus::Error, NodePayload::None, Some(msg)),
    },
  };

  let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
  match status {
    NodeStatus::Error => {
      warn!(node = %id, error = error.as_deref().unwrap_or_default(), duration_ms, "errored")
    }
    NodeStatus::Fail => warn!(node = %id, severity = ?node.severity(), duration_ms, "failed"),
    _ => info!(node = %id, status = %status, duration_ms, "done"),
  }
  record(node, status, payload, error, duration_ms)
}

/// Stores a task's value under its id; object keys are also merged into the context.
fn publish(ctx: &mut RunContext, id: &str, value: &Value) {
  if let Value::Object(map) = value {
    for (k, v) in map {
      ctx.put(k.clone(), v.clone());
    }
  }
  ctx.put(id, value.clone());
}

fn check_error(outcome: &CheckOutcome) -> Option<String> {
  if outcome.status() != CheckStatus::Error {
    return None;
  }
  if outcome.description().is_empty() {
    Some("check reported an error".to_string())
  } else {
    Some(outcome.description().to_string())
  }
}

thread_local! {
  static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Installs, once per process, a panic hook that keeps handler panics off stderr.
///
/// Panics raised while this thread is inside a handler are logged at debug level
/// (the scheduler records them as `Error` results); all others reach the previous hook.
fn install_panic_hook() {
  PANIC_HOOK.call_once(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
      if IN_HANDLER.with(Cell::get) {
        debug!(panic = %info, "handler panicked");
      } else {
        previous(info);
      }
    }));
  });
}

/// True while the current thread is running a node handler.
pub(crate) fn in_handler() -> bool {
  IN_HANDLER.with(Cell::get)
}

/// Marks the current thread as inside a handler until dropped.
struct HandlerScope;

impl HandlerScope {
  fn enter() -> Self {
    IN_HANDLER.with(|flag| flag.set(true));
    HandlerScope
  }
}

impl Drop for HandlerScope {
  fn drop(&mut self) {
    IN_HANDLER.with(|flag| flag.set(false));
  }
}

/// Calls a handler, turning both returned errors and panics into a message.
fn invoke<T>(f: impl FnOnce() -> Result<T, BoxError>) -> Result<T, String> {
  install_panic_hook();
  let caught = {
    let _scope = HandlerScope::enter();
    panic::catch_unwind(AssertUnwindSafe(f))
  };
  match caught {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(e)) => Err(e.to_string()),
    Err(payload) => Err(format!("handler panicked: {}", panic_message(&*payload))),
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&str>() {
    *s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "unknown panic"
  }
}
