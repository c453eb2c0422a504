//! Command-backed nodes declared in pipeline config.
//!
//! Each node runs `sh -c <command>` in the current directory. Parameters are exported
//! as `QUAIL_PARAM_<NAME>` and the context values of direct dependencies as
//! `QUAIL_DEP_<ID>`; strings are passed raw, everything else as JSON.
//!
//! - Task: exit 0 passes; stdout (trimmed) becomes the value, parsed as JSON when possible.
//! - Check: exit 0 passes, exit 1 fails, anything else is an error. A JSON object on
//!   stdout may carry `metrics` (name → number) and `description`.

use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::context::RunContext;
use crate::error::{CommandError, ConfigError};
use crate::types::{CheckOutcome, CheckStatus, NodeDefinition, NodeKind, Severity};

/// A node declared in config and executed through the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNodeSpec {
  pub id: String,
  pub kind: NodeKind,
  pub command: String,
  #[serde(default)]
  pub requires: Vec<String>,
  /// Checks only; defaults to `error`.
  #[serde(default)]
  pub severity: Option<Severity>,
  #[serde(default)]
  pub description: Option<String>,
}

impl CommandNodeSpec {
  /// Validates the declaration and builds its [NodeDefinition].
  pub fn into_definition(self) -> Result<NodeDefinition, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidNode {
      id: self.id.clone(),
      message: message.to_string(),
    };
    if self.id.trim().is_empty() {
      return Err(invalid("id must not be empty"));
    }
    if self.command.trim().is_empty() {
      return Err(invalid("command must not be empty"));
    }
    if self.kind == NodeKind::Task && self.severity.is_some() {
      return Err(invalid("severity is only valid for checks"));
    }

    let CommandNodeSpec {
      id,
      kind,
      command,
      requires,
      severity,
      description,
    } = self;
    let deps = requires.clone();
    let node = match kind {
      NodeKind::Task => NodeDefinition::task(id.clone(), move |ctx| {
        let output = run_shell(&command, ctx, &deps)?;
        if !output.status.success() {
          return Err(exit_error(&output).into());
        }
        Ok(parse_value(&output.stdout))
      }),
      NodeKind::Check => {
        let check_id = id.clone();
        NodeDefinition::check(id, severity.unwrap_or_default(), move |ctx| {
          let output = run_shell(&command, ctx, &deps)?;
          let status = match output.status.code() {
            Some(0) => CheckStatus::Pass,
            Some(1) => CheckStatus::Fail,
            _ => return Err(exit_error(&output).into()),
          };
          Ok(check_outcome(&check_id, status, &output))
        })
      }
    };
    let node = node.requires(requires);
    Ok(match description {
      Some(d) => node.with_description(d),
      None => node,
    })
  }
}

/// `QUAIL_<PREFIX>_<NAME>` with the name upper-cased and non-alphanumerics replaced by `_`.
pub fn env_var_name(prefix: &str, name: &str) -> String {
  let suffix: String = name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() {
        c.to_ascii_uppercase()
      } else {
        '_'
      }
    })
    .collect();
  format!("QUAIL_{}_{}", prefix, suffix)
}

fn env_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[instrument(level = "trace", skip(ctx, deps))]
fn run_shell(command: &str, ctx: &RunContext, deps: &[String]) -> Result<Output, CommandError> {
  let mut cmd = Command::new("sh");
  cmd.arg("-c").arg(command);
  for (name, value) in ctx.resources().params() {
    cmd.env(env_var_name("PARAM", name), env_value(value));
  }
  for dep in deps {
    if let Ok(value) = ctx.get(dep) {
      cmd.env(env_var_name("DEP", dep), env_value(value));
    }
  }
  let output = cmd.output().map_err(|source| CommandError::Spawn {
    command: command.to_string(),
    source,
  })?;
  debug!(command = %command, code = ?output.status.code(), "command finished");
  Ok(output)
}

fn exit_error(output: &Output) -> CommandError {
  CommandError::Exit {
    code: output.status.code(),
    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
  }
}

fn parse_value(stdout: &[u8]) -> Value {
  let text = String::from_utf8_lossy(stdout);
  let text = text.trim();
  serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn check_outcome(id: &str, status: CheckStatus, output: &Output) -> CheckOutcome {
  let mut outcome = CheckOutcome::new(id, status);
  match parse_value(&output.stdout) {
    Value::Object(map) => {
      if let Some(Value::Object(metrics)) = map.get("metrics") {
        for (name, value) in metrics {
          if let Some(n) = value.as_f64() {
            outcome = outcome.with_metric(name.clone(), n);
          }
        }
      }
      if let Some(Value::String(d)) = map.get("description") {
        outcome = outcome.with_description(d.clone());
      }
    }
    Value::String(s) if !s.is_empty() => outcome = outcome.with_description(s),
    _ => {}
  }
  if outcome.description().is_empty() && status == CheckStatus::Fail {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
      outcome = outcome.with_description(stderr);
    }
  }
  outcome
}
