//! Pipeline configuration: a JSON document declaring params, profiles, target groups
//! and command-backed nodes.
//!
//! ```json
//! {
//!   "project": "pricing",
//!   "profile": "dev",
//!   "default_target": "daily",
//!   "targets": { "daily": ["row_count"] },
//!   "params": { "table": "prices", "dsn": "${PRICING_DSN}" },
//!   "profiles": { "prod": { "table": "prices_live" } },
//!   "nodes": [
//!     { "id": "load", "kind": "task", "command": "echo 42" },
//!     { "id": "row_count", "kind": "check", "command": "test $QUAIL_DEP_LOAD -gt 0", "requires": ["load"] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::command_node::CommandNodeSpec;
use crate::context::Resources;
use crate::error::ConfigError;
use crate::registry::Registry;
use crate::targets::TargetGroups;

/// Environment variable selecting the profile when no flag is given.
pub const PROFILE_ENV: &str = "QUAIL_PROFILE";
/// Profile used when neither flag, environment nor file names one.
pub const DEFAULT_PROFILE: &str = "dev";

static ENV_VAR_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Parsed pipeline config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
  #[serde(default)]
  pub project: Option<String>,
  /// Profile named by the file; overridden by flag and environment.
  #[serde(default)]
  pub profile: Option<String>,
  #[serde(default)]
  pub default_target: Option<String>,
  #[serde(default)]
  pub targets: BTreeMap<String, Vec<String>>,
  /// Base parameters, shared by every profile.
  #[serde(default)]
  pub params: BTreeMap<String, Value>,
  /// Per-profile parameter overrides.
  #[serde(default)]
  pub profiles: BTreeMap<String, BTreeMap<String, Value>>,
  #[serde(default)]
  pub nodes: Vec<CommandNodeSpec>,
}

impl PipelineConfig {
  /// Reads and parses the config file at `path`.
  #[instrument(level = "trace")]
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::parse(&text, &path.display().to_string())
  }

  /// Parses config text; `origin` names the source in errors.
  pub fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(text).map_err(|source| ConfigError::Parse {
      path: origin.to_string(),
      source,
    })
  }

  /// Active profile: `flag`, then `QUAIL_PROFILE`, then the file's `profile`, then `dev`.
  pub fn resolve_profile(&self, flag: Option<&str>) -> String {
    self.resolve_profile_with(flag, |name| std::env::var(name).ok())
  }

  /// [Self::resolve_profile] with an explicit environment lookup.
  pub fn resolve_profile_with<F>(&self, flag: Option<&str>, lookup: F) -> String
  where
    F: Fn(&str) -> Option<String>,
  {
    flag
      .map(str::to_string)
      .or_else(|| lookup(PROFILE_ENV).filter(|p| !p.is_empty()))
      .or_else(|| self.profile.clone())
      .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
  }

  /// Parameters for `profile`: base params overlaid with the profile's overrides,
  /// `${VAR}` expanded in every string value.
  pub fn params_for(&self, profile: &str) -> BTreeMap<String, Value> {
    self.params_for_with(profile, |name| std::env::var(name).ok())
  }

  /// [Self::params_for] with an explicit environment lookup.
  pub fn params_for_with<F>(&self, profile: &str, lookup: F) -> BTreeMap<String, Value>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut params = self.params.clone();
    match self.profiles.get(profile) {
      Some(overrides) => params.extend(overrides.clone()),
      None => debug!(profile = %profile, "no overrides for profile"),
    }
    for value in params.values_mut() {
      if let Value::String(s) = value {
        *s = expand_vars_with(s.as_str(), &lookup);
      }
    }
    params
  }

  /// Resources carrying the parameters for `profile`.
  pub fn resources(&self, profile: &str) -> Resources {
    Resources::new().with_params(self.params_for(profile))
  }

  pub fn target_groups(&self) -> TargetGroups {
    TargetGroups::new(self.targets.clone(), self.default_target.clone())
  }

  /// Builds the registry of the declared command nodes.
  pub fn registry(&self) -> Result<Registry, ConfigError> {
    let nodes = self
      .nodes
      .iter()
      .cloned()
      .map(CommandNodeSpec::into_definition)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Registry::from_nodes(nodes)?)
  }
}

/// Replaces `${VAR}` with the process environment value; unset variables are left as written.
pub fn expand_vars(input: &str) -> String {
  expand_vars_with(input, |name| std::env::var(name).ok())
}

/// [expand_vars] with an explicit lookup.
pub fn expand_vars_with<F>(input: &str, lookup: F) -> String
where
  F: Fn(&str) -> Option<String>,
{
  ENV_VAR_RE
    .replace_all(input, |caps: &Captures<'_>| {
      lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
