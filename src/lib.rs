//! # quailtrail
//!
//! Declarative task/check orchestration for data-quality pipelines.
//!
//! ## Architecture
//!
//! Register tasks (units of work) and checks (validations with a severity) with
//! explicit dependencies, then run them:
//!
//! Registry → graph builder (deterministic topological order) → scheduler (sequential
//! execution over a shared [RunContext], skips propagated to dependents) → reporter
//! (severity-weighted [RunVerdict], JUnit/Markdown/text encodings).
//!
//! ```no_run
//! use quailtrail::{CheckOutcome, NodeDefinition, Registry, Resources, RunOptions, Severity, run_pipeline};
//! use serde_json::json;
//!
//! let registry = Registry::from_nodes([
//!   NodeDefinition::task("load", |_| Ok(json!({ "rows": 42 }))),
//!   NodeDefinition::check("has_rows", Severity::Error, |ctx| {
//!     let rows: u64 = ctx.get_as("rows")?;
//!     Ok(CheckOutcome::from_bool("has_rows", rows > 0).with_metric("rows", rows as f64))
//!   })
//!   .requires(["load"]),
//! ])?;
//! let report = run_pipeline(&registry, Resources::new(), &RunOptions::default())?;
//! println!("{}", report.verdict);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Pipelines can also be declared in a JSON config of shell-command nodes (see
//! [config] and [command_node]) and run with the `quail` binary.

pub mod command_node;
pub mod config;
pub mod context;
#[cfg(test)]
mod context_test;
pub mod dot;
#[cfg(test)]
mod dot_test;
pub mod error;
pub mod graph;
pub mod registry;
pub mod report;
pub mod report_io;
pub mod runner;
pub mod scheduler;
pub mod targets;
pub mod types;

pub use config::PipelineConfig;
pub use context::{Resources, RunContext};
pub use error::{BoxError, CommandError, ConfigError, ContextError, GraphError, ReportError, TargetError};
pub use registry::{Registry, RegistryBuilder};
pub use report::{ReportFormat, RunSummary, render, summarize};
pub use runner::{RunOptions, RunReport, run_pipeline, run_with_context};
pub use targets::TargetGroups;
pub use types::{
  CheckOutcome, CheckStatus, NodeDefinition, NodeKind, NodePayload, NodeResult, NodeStatus,
  RunVerdict, Severity,
};
