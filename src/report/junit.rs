//! JUnit-style XML encoding: one test case per node.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::{RunSummary, summarize};
use crate::error::ReportError;
use crate::types::{NodeResult, NodeStatus};

const SUITE_NAME: &str = "quailtrail";

fn xml_err(e: impl std::fmt::Display) -> ReportError {
  ReportError::Xml(e.to_string())
}

/// Renders results as a JUnit XML document.
///
/// `Fail` maps to `<failure>`, `Error` to `<error>`, `Skip` and `Planned` to `<skipped>`;
/// severity and check metrics become `<property>` entries.
pub fn render_junit(results: &[NodeResult]) -> Result<String, ReportError> {
  let summary = RunSummary::from_results(results);
  let failures = count(results, NodeStatus::Fail).to_string();
  let errors = count(results, NodeStatus::Error).to_string();
  let skipped = (summary.tasks_skipped + summary.checks_skipped + summary.planned).to_string();
  let tests = results.len().to_string();
  let verdict = summarize(results).to_string();

  let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
  writer
    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .map_err(xml_err)?;

  for element in ["testsuites", "testsuite"] {
    let mut start = BytesStart::new(element);
    start.push_attribute(("name", SUITE_NAME));
    start.push_attribute(("tests", tests.as_str()));
    start.push_attribute(("failures", failures.as_str()));
    start.push_attribute(("errors", errors.as_str()));
    start.push_attribute(("skipped", skipped.as_str()));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
  }

  writer
    .write_event(Event::Start(BytesStart::new("properties")))
    .map_err(xml_err)?;
  write_property(&mut writer, "verdict", &verdict)?;
  writer
    .write_event(Event::End(BytesEnd::new("properties")))
    .map_err(xml_err)?;

  for result in results {
    write_case(&mut writer, result)?;
  }

  for element in ["testsuite", "testsuites"] {
    writer
      .write_event(Event::End(BytesEnd::new(element)))
      .map_err(xml_err)?;
  }

  let mut bytes = writer.into_inner();
  bytes.push(b'\n');
  Ok(String::from_utf8(bytes)?)
}

fn count(results: &[NodeResult], status: NodeStatus) -> usize {
  results.iter().filter(|r| r.status == status).count()
}

fn write_property(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), ReportError> {
  let mut prop = BytesStart::new("property");
  prop.push_attribute(("name", name));
  prop.push_attribute(("value", value));
  writer.write_event(Event::Empty(prop)).map_err(xml_err)
}

fn write_case(writer: &mut Writer<Vec<u8>>, result: &NodeResult) -> Result<(), ReportError> {
  let classname = format!("{}.{}", SUITE_NAME, result.kind);
  let mut case = BytesStart::new("testcase");
  case.push_attribute(("name", result.id.as_str()));
  case.push_attribute(("classname", classname.as_str()));
  writer.write_event(Event::Start(case)).map_err(xml_err)?;

  let metrics = result.outcome().map(|o| o.metrics());
  let has_properties = result.severity.is_some() || metrics.is_some_and(|m| !m.is_empty());
  if has_properties {
    writer
      .write_event(Event::Start(BytesStart::new("properties")))
      .map_err(xml_err)?;
    if let Some(severity) = result.severity {
      write_property(writer, "severity", &severity.to_string())?;
    }
    for (name, value) in metrics.into_iter().flatten() {
      write_property(writer, &format!("metric.{}", name), &value.to_string())?;
    }
    writer
      .write_event(Event::End(BytesEnd::new("properties")))
      .map_err(xml_err)?;
  }

  let description = result.description();
  let marker = match result.status {
    NodeStatus::Pass => None,
    NodeStatus::Fail => Some(("failure", description, "fail")),
    NodeStatus::Error => Some(("error", description, "error")),
    NodeStatus::Skip => Some(("skipped", description, "skip")),
    NodeStatus::Planned => Some(("skipped", "planned (dry run)".to_string(), "planned")),
  };
  if let Some((element, message, kind)) = marker {
    let mut el = BytesStart::new(element);
    el.push_attribute(("message", message.as_str()));
    el.push_attribute(("type", kind));
    writer.write_event(Event::Empty(el)).map_err(xml_err)?;
  }

  writer
    .write_event(Event::End(BytesEnd::new("testcase")))
    .map_err(xml_err)
}
