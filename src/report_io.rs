//! Run record and report persistence to a run directory.

use std::path::Path;

use tracing::{debug, instrument};

use crate::report::ReportFormat;
use crate::runner::RunReport;

/// Filename of the JSON run record under a run directory.
pub const RUN_RECORD_FILENAME: &str = "run.json";
/// Filename of the JUnit report under a run directory.
pub const JUNIT_FILENAME: &str = "junit.xml";
/// Filename of the Markdown summary under a run directory.
pub const MARKDOWN_FILENAME: &str = "summary.md";

fn invalid_data<E>(e: E) -> std::io::Error
where
  E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
  std::io::Error::new(std::io::ErrorKind::InvalidData, e)
}

/// Saves a run record to `path` as pretty JSON, creating parent directories.
#[instrument(level = "trace", skip(path, report))]
pub fn save_run_record(path: &Path, report: &RunReport) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(report).map_err(invalid_data)?;
  write_report(path, &json)
}

/// Loads a run record from `path`. Errors if the file is missing or not a run record.
#[instrument(level = "trace", skip(path))]
pub fn load_run_record(path: &Path) -> Result<RunReport, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(invalid_data)
}

/// Writes rendered report text to `path`, creating parent directories.
#[instrument(level = "trace", skip(path, text))]
pub fn write_report(path: &Path, text: &str) -> Result<(), std::io::Error> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, text)
}

/// Writes `run.json`, `junit.xml` and `summary.md` for `report` under `<dir>/<run_id>/`.
///
/// Returns the directory written to.
#[instrument(level = "trace", skip(dir, report), fields(run_id = %report.run_id))]
pub fn write_run_dir(dir: &Path, report: &RunReport) -> Result<std::path::PathBuf, std::io::Error> {
  let run_dir = dir.join(&report.run_id);
  save_run_record(&run_dir.join(RUN_RECORD_FILENAME), report)?;
  let junit = report.render(ReportFormat::Junit).map_err(invalid_data)?;
  write_report(&run_dir.join(JUNIT_FILENAME), &junit)?;
  let markdown = report.render(ReportFormat::Markdown).map_err(invalid_data)?;
  write_report(&run_dir.join(MARKDOWN_FILENAME), &markdown)?;
  debug!(dir = %run_dir.display(), "run directory written");
  Ok(run_dir)
}
