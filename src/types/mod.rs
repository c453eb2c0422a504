//! Data types shared by the registry, graph builder, scheduler and reporter.

mod check_outcome;
#[cfg(test)]
mod check_outcome_test;
mod check_status;
mod node_definition;
mod node_kind;
mod node_result;
mod node_status;
#[cfg(test)]
mod node_status_test;
mod run_verdict;
mod severity;

pub use check_outcome::CheckOutcome;
pub use check_status::CheckStatus;
pub use node_definition::{CheckFn, Handler, NodeDefinition, TaskFn};
pub use node_kind::NodeKind;
pub use node_result::{NodePayload, NodeResult};
pub use node_status::NodeStatus;
pub use run_verdict::RunVerdict;
pub use severity::Severity;
