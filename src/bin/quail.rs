//! CLI: run, list or graph a pipeline declared in a JSON config.
//!
//! Usage: `quail [OPTIONS] <COMMAND>`
//! Example: quail --config quail.json run daily --junit reports/junit.xml
//!
//! Exit status: 0 clean, 1 error verdict (or warning with `--strict`), 2 config or
//! definition error. Logs go to stderr; set RUST_LOG=quailtrail=debug for detail.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use quailtrail::report::{ReportFormat, render_junit, render_markdown};
use quailtrail::{PipelineConfig, RunOptions, run_pipeline};
use quailtrail::{dot, report_io};
use regex::Regex;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "quail.json";
const EXIT_DEFINITION_ERROR: i32 = 2;

static SENSITIVE_PARAM: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)password|secret|key|token").expect("valid sensitive param regex"));
static URL_USERINFO: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*://)[^/@\s]+@").expect("valid url userinfo regex")
});

/// Run data-quality tasks and checks declared in a JSON config.
#[derive(Parser, Debug)]
#[command(name = "quail", version)]
#[command(
  after_help = r#"Environment variables:
  QUAIL_CONFIG    Config file (same as --config).
  QUAIL_PROFILE   Profile when --profile is not given.
  QUAIL_RUN_DIR   Directory for run records (same as --run-dir).

Examples:
  quail list
  quail run daily --strict
  quail --profile prod run row_count --dry-run"#
)]
struct Args {
  /// Pipeline config file.
  #[arg(long, short, global = true, env = "QUAIL_CONFIG", default_value = DEFAULT_CONFIG)]
  config: PathBuf,

  /// Parameter profile. Falls back to QUAIL_PROFILE, the config's profile, then `dev`.
  #[arg(long, short, global = true)]
  profile: Option<String>,

  #[command(subcommand)]
  command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Run target groups or nodes (default target group, or everything).
  Run {
    /// Target group names or node ids.
    targets: Vec<String>,
    /// Print the execution plan without running anything.
    #[arg(long)]
    dry_run: bool,
    /// Write a JUnit XML report to this path.
    #[arg(long, value_name = "PATH")]
    junit: Option<PathBuf>,
    /// Write a Markdown summary to this path.
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,
    /// Write run.json, junit.xml and summary.md under <DIR>/<run_id>/.
    #[arg(long, value_name = "DIR", env = "QUAIL_RUN_DIR")]
    run_dir: Option<PathBuf>,
    /// Exit non-zero on a warning verdict too.
    #[arg(long)]
    strict: bool,
    /// Encoding printed to stdout.
    #[arg(long, default_value = "text")]
    format: ReportFormat,
  },
  /// List tasks, checks, target groups and (masked) params.
  List,
  /// Print the dependency graph in Graphviz DOT.
  Graph,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let code = match execute(&args) {
    Ok(code) => code,
    Err(msg) => {
      eprintln!("Error: {}", msg);
      EXIT_DEFINITION_ERROR
    }
  };
  process::exit(code);
}

fn execute(args: &Args) -> Result<i32, String> {
  let config = PipelineConfig::load(&args.config).map_err(|e| e.to_string())?;
  let registry = config.registry().map_err(|e| e.to_string())?;
  let profile = config.resolve_profile(args.profile.as_deref());
  info!(config = %args.config.display(), profile = %profile, nodes = registry.len(), "loaded config");

  match &args.command {
    Cmd::Graph => {
      print!("{}", dot::render_dot(&registry));
      Ok(0)
    }
    Cmd::List => {
      print!("{}", render_listing(&config, &registry, &profile));
      Ok(0)
    }
    Cmd::Run {
      targets,
      dry_run,
      junit,
      markdown,
      run_dir,
      strict,
      format,
    } => {
      let targets = config
        .target_groups()
        .resolve(targets)
        .map_err(|e| e.to_string())?;
      let options = RunOptions {
        targets,
        dry_run: *dry_run,
      };
      let report =
        run_pipeline(&registry, config.resources(&profile), &options).map_err(|e| e.to_string())?;

      print!("{}", report.render(*format).map_err(|e| e.to_string())?);
      if let Some(path) = junit {
        let xml = render_junit(&report.results).map_err(|e| e.to_string())?;
        write_or_fail(path, &xml)?;
      }
      if let Some(path) = markdown {
        write_or_fail(path, &render_markdown(&report.results))?;
      }
      if let Some(dir) = run_dir {
        let written = report_io::write_run_dir(dir, &report)
          .map_err(|e| format!("writing run directory {}: {}", dir.display(), e))?;
        info!(dir = %written.display(), "run record written");
      }
      Ok(report.verdict.exit_code(*strict))
    }
  }
}

fn write_or_fail(path: &Path, text: &str) -> Result<(), String> {
  report_io::write_report(path, text).map_err(|e| format!("writing {}: {}", path.display(), e))?;
  info!(path = %path.display(), "report written");
  Ok(())
}

fn render_listing(
  config: &PipelineConfig,
  registry: &quailtrail::Registry,
  profile: &str,
) -> String {
  let mut out = String::new();
  out.push_str(&format!(
    "project: {}\nprofile: {}\n",
    config.project.as_deref().unwrap_or("-"),
    profile
  ));

  out.push_str("\nparams:\n");
  for (name, value) in masked(config.params_for(profile)) {
    out.push_str(&format!("  {} = {}\n", name, value));
  }

  out.push_str("\ntasks:\n");
  for node in registry.nodes().iter().filter(|n| n.kind() == quailtrail::NodeKind::Task) {
    out.push_str(&format!("  {}{}\n", node.id(), requires_suffix(node.dependencies())));
  }
  out.push_str("\nchecks:\n");
  for node in registry.nodes().iter().filter(|n| n.kind() == quailtrail::NodeKind::Check) {
    out.push_str(&format!(
      "  {} [{}]{}\n",
      node.id(),
      node.severity().unwrap_or_default(),
      requires_suffix(node.dependencies())
    ));
  }

  let groups = config.target_groups();
  out.push_str("\ntargets:\n");
  for (name, ids) in groups.groups() {
    let marker = if groups.default_group() == Some(name.as_str()) {
      " (default)"
    } else {
      ""
    };
    out.push_str(&format!("  {}{}: {}\n", name, marker, ids.join(", ")));
  }
  out
}

fn requires_suffix(deps: &[String]) -> String {
  if deps.is_empty() {
    String::new()
  } else {
    format!(" <- {}", deps.join(", "))
  }
}

fn masked(params: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
  params
    .into_iter()
    .map(|(name, value)| {
      if SENSITIVE_PARAM.is_match(&name) {
        return (name, Value::String("****".to_string()));
      }
      match value {
        Value::String(s) => {
          let hidden = URL_USERINFO.replace_all(&s, "${scheme}****@").into_owned();
          (name, Value::String(hidden))
        }
        other => (name, other),
      }
    })
    .collect()
}
