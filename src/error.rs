//! Error types for registration, graph building, context access and reporting.

/// Boxed error returned by node handlers. Anything that implements `Error` converts with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Definition errors: detected before any node executes and fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
  /// Two nodes were registered under the same id.
  #[error("duplicate node id: {id}")]
  DuplicateId {
    /// The id registered twice.
    id: String,
  },

  /// A node lists the same dependency more than once.
  #[error("node '{node}' lists dependency '{dependency}' more than once")]
  DuplicateDependency {
    /// The declaring node.
    node: String,
    /// The repeated dependency id.
    dependency: String,
  },

  /// A node depends on an id that is not registered.
  #[error("unknown dependency '{missing}' required by '{node}'")]
  UnknownDependency {
    /// The declaring node.
    node: String,
    /// The dependency id that does not resolve.
    missing: String,
  },

  /// The dependency relation contains a cycle.
  #[error("cycle detected: {}", .cycle.join(" -> "))]
  CycleDetected {
    /// Node ids along the cycle; the first id is repeated at the end.
    cycle: Vec<String>,
  },

  /// A requested target id is not registered.
  #[error("unknown node/target: {target}")]
  UnknownTarget {
    /// The requested id.
    target: String,
  },
}

/// Context access errors. Returned to handlers, never fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
  /// `get` on a key nobody has written.
  #[error("missing context key: {key}")]
  MissingKey {
    /// The key looked up.
    key: String,
  },

  /// No resource registered under this name.
  #[error("missing resource: {name}")]
  MissingResource {
    /// The resource name.
    name: String,
  },

  /// A resource exists but is not of the requested type.
  #[error("resource '{name}' is not a {expected}")]
  ResourceType {
    /// The resource name.
    name: String,
    /// Requested type name.
    expected: &'static str,
  },

  /// No parameter with this name.
  #[error("missing parameter: {name}")]
  MissingParam {
    /// The parameter name.
    name: String,
  },

  /// A context value could not be decoded into the requested type.
  #[error("context key '{key}' could not be decoded: {source}")]
  Decode {
    /// The key looked up.
    key: String,
    /// Underlying decode error.
    #[source]
    source: serde_json::Error,
  },
}

/// Target name resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
  /// The configured default target is not a known group.
  #[error("default target '{name}' is not a defined target group")]
  UnknownDefault {
    /// The default target name.
    name: String,
  },
}

/// Pipeline configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("reading {path}: {source}")]
  Io {
    /// Path of the config file.
    path: String,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The config file is not valid JSON for [crate::config::PipelineConfig].
  #[error("parsing {path}: {source}")]
  Parse {
    /// Path of the config file.
    path: String,
    /// Underlying JSON error.
    #[source]
    source: serde_json::Error,
  },

  /// A declared node is invalid.
  #[error("node '{id}': {message}")]
  InvalidNode {
    /// The node id.
    id: String,
    /// What is wrong with it.
    message: String,
  },

  /// The declared nodes do not form a valid registry.
  #[error(transparent)]
  Graph(#[from] GraphError),
}

/// Report rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
  /// XML writer failure.
  #[error("writing junit xml: {0}")]
  Xml(String),

  /// Rendered bytes were not valid UTF-8.
  #[error("rendered report is not utf-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),
}

/// Failures of command-backed nodes.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  /// The shell could not be started.
  #[error("spawning `{command}`: {source}")]
  Spawn {
    /// The command line.
    command: String,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The command exited with a status its node kind does not accept.
  #[error("command exited with {}{}", exit_status(.code), stderr_suffix(.stderr))]
  Exit {
    /// Exit code, `None` when terminated by a signal.
    code: Option<i32>,
    /// Trimmed standard error.
    stderr: String,
  },
}

fn exit_status(code: &Option<i32>) -> String {
  match code {
    Some(c) => format!("status {}", c),
    None => "a signal".to_string(),
  }
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(": {}", stderr)
  }
}
