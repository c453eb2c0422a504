//! Pipeline runner: graph building, scheduling and reporting for one run.
//!
//! - [run_pipeline]: build a fresh [RunContext] from [Resources] and run.
//! - [run_with_context]: run against a caller-owned context (inspectable afterwards).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::context::{Resources, RunContext};
use crate::error::{GraphError, ReportError};
use crate::graph;
use crate::registry::Registry;
use crate::report::{self, ReportFormat, RunSummary};
use crate::scheduler;
use crate::types::{NodeResult, RunVerdict};

/// Options for [run_pipeline].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Restrict the run to the transitive closure of these ids. `None` runs everything.
  pub targets: Option<Vec<String>>,
  /// Plan only: no handler is invoked and every node is `Planned`.
  pub dry_run: bool,
}

/// Record of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
  pub run_id: String,
  /// RFC 3339 timestamp when the run started.
  pub started_at: String,
  /// RFC 3339 timestamp when the run finished.
  pub finished_at: String,
  pub dry_run: bool,
  pub targets: Option<Vec<String>>,
  /// Execution order computed by the graph builder.
  pub order: Vec<String>,
  pub results: Vec<NodeResult>,
  pub verdict: RunVerdict,
  pub summary: RunSummary,
}

impl RunReport {
  /// Renders the results in the given encoding.
  pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
    report::render(&self.results, format)
  }

  /// Result for `id`, if it was scheduled.
  pub fn result(&self, id: &str) -> Option<&NodeResult> {
    self.results.iter().find(|r| r.id == id)
  }
}

/// Runs `registry` with a fresh context built from `resources`.
pub fn run_pipeline(
  registry: &Registry,
  resources: Resources,
  options: &RunOptions,
) -> Result<RunReport, GraphError> {
  let mut ctx = RunContext::new(resources);
  run_with_context(registry, &mut ctx, options)
}

/// Runs `registry` against `ctx`.
///
/// Definition errors are returned before any handler is invoked and leave `ctx`
/// untouched. Otherwise the store is cleared first, so values from an earlier run
/// on the same context are never visible; resources and parameters are kept.
#[instrument(level = "trace", skip(registry, ctx))]
pub fn run_with_context(
  registry: &Registry,
  ctx: &mut RunContext,
  options: &RunOptions,
) -> Result<RunReport, GraphError> {
  let started_at = Utc::now();
  let run_id = new_run_id(&started_at);
  let order = graph::build(registry, options.targets.as_deref())?;
  ctx.clear();

  info!(run_id = %run_id, nodes = order.len(), dry_run = options.dry_run, targets = ?options.targets, "starting run");
  let results = if options.dry_run {
    scheduler::plan(&order, registry)
  } else {
    scheduler::run(&order, registry, ctx)
  };

  let verdict = report::summarize(&results);
  let summary = RunSummary::from_results(&results);
  if summary.tasks_errored > 0 {
    warn!(run_id = %run_id, tasks_errored = summary.tasks_errored, "tasks errored; dependents were skipped");
  }
  info!(run_id = %run_id, verdict = %verdict, summary = %summary.line(), "run complete");

  Ok(RunReport {
    run_id,
    started_at: started_at.to_rfc3339(),
    finished_at: Utc::now().to_rfc3339(),
    dry_run: options.dry_run,
    targets: options.targets.clone(),
    order,
    results,
    verdict,
    summary,
  })
}

/// `qc_<YYYYmmdd_HHMMSS>_<8 hex>`.
fn new_run_id(at: &chrono::DateTime<Utc>) -> String {
  let suffix = Uuid::new_v4().simple().to_string();
  format!("qc_{}_{}", at.format("%Y%m%d_%H%M%S"), &suffix[..8])
}
