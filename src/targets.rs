//! Target groups: named sets of node ids selectable from the command line.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::TargetError;

/// Group name → node ids, plus an optional default group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroups {
  #[serde(default)]
  groups: BTreeMap<String, Vec<String>>,
  #[serde(default)]
  default: Option<String>,
}

impl TargetGroups {
  pub fn new(groups: BTreeMap<String, Vec<String>>, default: Option<String>) -> Self {
    Self { groups, default }
  }

  pub fn groups(&self) -> &BTreeMap<String, Vec<String>> {
    &self.groups
  }

  pub fn default_group(&self) -> Option<&str> {
    self.default.as_deref()
  }

  /// Resolves command-line names to node ids.
  ///
  /// Each name expands to its group when one matches, otherwise it is taken as a
  /// node id (validated later by the graph builder). Duplicates are dropped, first
  /// occurrence wins. With no names, the default group is used; with no default,
  /// `None` selects the whole registry.
  #[instrument(level = "trace", skip(self))]
  pub fn resolve(&self, names: &[String]) -> Result<Option<Vec<String>>, TargetError> {
    if names.is_empty() {
      return match &self.default {
        None => Ok(None),
        Some(name) => {
          let ids = self
            .groups
            .get(name)
            .ok_or_else(|| TargetError::UnknownDefault { name: name.clone() })?;
          debug!(group = %name, ids = ?ids, "using default target group");
          Ok(Some(dedup(ids.iter())))
        }
      };
    }

    let expanded = names.iter().flat_map(|name| match self.groups.get(name) {
      Some(ids) => ids.iter().collect::<Vec<_>>(),
      None => vec![name],
    });
    Ok(Some(dedup(expanded)))
  }
}

fn dedup<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
  let mut seen: HashSet<&str> = HashSet::new();
  let mut out = Vec::new();
  for id in ids {
    if seen.insert(id.as_str()) {
      out.push(id.clone());
    }
  }
  out
}
