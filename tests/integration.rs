//! End-to-end tests of the library API: registration, graph building, scheduling,
//! verdict and report encodings over realistic pipelines.

use std::sync::{Arc, Mutex};

use quailtrail::report::{render_junit, render_markdown};
use quailtrail::{
  CheckOutcome, GraphError, NodeDefinition, NodeStatus, Registry, Resources, RunOptions,
  RunVerdict, Severity, run_pipeline,
};
use serde_json::json;

/// In-memory stand-in for a database handle supplied as a resource.
struct PriceTable {
  prices: Vec<f64>,
}

fn pricing_registry(log: Arc<Mutex<Vec<String>>>) -> Registry {
  let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log);
  Registry::builder()
    .with(NodeDefinition::task("load_prices", move |ctx| {
      l1.lock().unwrap().push("load_prices".into());
      let table = ctx.env::<PriceTable>("db")?;
      Ok(json!({ "prices": table.prices }))
    }))
    .unwrap()
    .with(
      NodeDefinition::check("no_negative_prices", Severity::Error, move |ctx| {
        l2.lock().unwrap().push("no_negative_prices".into());
        let prices: Vec<f64> = ctx.get_as("prices")?;
        let negatives = prices.iter().filter(|p| **p < 0.0).count();
        Ok(
          CheckOutcome::from_bool("no_negative_prices", negatives == 0)
            .with_metric("negatives", negatives as f64)
            .with_description(format!("{} negative prices", negatives)),
        )
      })
      .requires(["load_prices"]),
    )
    .unwrap()
    .with(
      NodeDefinition::check("max_price", Severity::Warning, move |ctx| {
        l3.lock().unwrap().push("max_price".into());
        let prices: Vec<f64> = ctx.get_as("prices")?;
        let limit = ctx.param("max_price")?.as_f64().unwrap_or(f64::MAX);
        let max = prices.iter().cloned().fold(f64::MIN, f64::max);
        Ok(CheckOutcome::from_bool("max_price", max <= limit).with_metric("max", max))
      })
      .requires(["no_negative_prices"]),
    )
    .unwrap()
    .with(
      NodeDefinition::check("row_count", Severity::Info, move |ctx| {
        l4.lock().unwrap().push("row_count".into());
        let prices: Vec<f64> = ctx.get_as("prices")?;
        Ok(CheckOutcome::from_bool("row_count", prices.len() >= 10).with_metric("rows", prices.len() as f64))
      })
      .requires(["load_prices"]),
    )
    .unwrap()
    .build()
}

fn resources(prices: Vec<f64>) -> Resources {
  Resources::new()
    .with_resource("db", PriceTable { prices })
    .with_param("max_price", json!(100.0))
}

#[test]
fn healthy_data_is_clean_and_runs_in_deterministic_order() {
  let log = Arc::new(Mutex::new(vec![]));
  let report = run_pipeline(
    &pricing_registry(log.clone()),
    resources(vec![1.0; 12]),
    &RunOptions::default(),
  )
  .unwrap();
  assert_eq!(report.verdict, RunVerdict::Clean);
  assert_eq!(
    *log.lock().unwrap(),
    vec!["load_prices", "no_negative_prices", "max_price", "row_count"]
  );
  assert!(report.results.iter().all(|r| r.status == NodeStatus::Pass));
}

#[test]
fn failing_error_check_skips_downstream_and_sets_error_verdict() {
  let log = Arc::new(Mutex::new(vec![]));
  let report = run_pipeline(
    &pricing_registry(log.clone()),
    resources(vec![5.0, -1.0, 500.0]),
    &RunOptions::default(),
  )
  .unwrap();
  assert_eq!(report.verdict, RunVerdict::Error);
  let max = report.result("max_price").unwrap();
  assert_eq!(max.status, NodeStatus::Skip);
  assert_eq!(max.blocked_by.as_deref(), Some("no_negative_prices"));
  // info-severity failure does not raise the verdict on its own
  assert_eq!(report.result("row_count").unwrap().status, NodeStatus::Fail);
  assert!(!log.lock().unwrap().contains(&"max_price".to_string()));
}

#[test]
fn warning_check_gives_warning_verdict() {
  let log = Arc::new(Mutex::new(vec![]));
  let report = run_pipeline(
    &pricing_registry(log),
    resources(vec![500.0; 12]),
    &RunOptions::default(),
  )
  .unwrap();
  assert_eq!(report.verdict, RunVerdict::Warning);
  assert_eq!(report.verdict.exit_code(false), 0);
  assert_eq!(report.verdict.exit_code(true), 1);
}

#[test]
fn missing_resource_errors_the_task_only() {
  let log = Arc::new(Mutex::new(vec![]));
  let report = run_pipeline(&pricing_registry(log), Resources::new(), &RunOptions::default()).unwrap();
  let load = report.result("load_prices").unwrap();
  assert_eq!(load.status, NodeStatus::Error);
  assert_eq!(load.error.as_deref(), Some("missing resource: db"));
  assert_eq!(report.verdict, RunVerdict::Clean);
  assert_eq!(report.summary.checks_skipped, 3);
}

#[test]
fn target_restriction_and_unknown_target() {
  let log = Arc::new(Mutex::new(vec![]));
  let registry = pricing_registry(log.clone());
  let options = RunOptions {
    targets: Some(vec!["row_count".to_string()]),
    dry_run: false,
  };
  let report = run_pipeline(&registry, resources(vec![1.0; 12]), &options).unwrap();
  assert_eq!(report.order, vec!["load_prices", "row_count"]);

  let options = RunOptions {
    targets: Some(vec!["nope".to_string()]),
    dry_run: false,
  };
  let err = run_pipeline(&registry, resources(vec![]), &options).unwrap_err();
  assert_eq!(
    err,
    GraphError::UnknownTarget {
      target: "nope".to_string()
    }
  );
}

#[test]
fn dry_run_plans_the_same_order_without_side_effects() {
  let log = Arc::new(Mutex::new(vec![]));
  let registry = pricing_registry(log.clone());
  let real = run_pipeline(&registry, resources(vec![1.0; 12]), &RunOptions::default()).unwrap();
  log.lock().unwrap().clear();
  let options = RunOptions {
    targets: None,
    dry_run: true,
  };
  let planned = run_pipeline(&registry, resources(vec![1.0; 12]), &options).unwrap();
  assert!(log.lock().unwrap().is_empty());
  assert_eq!(planned.order, real.order);
  assert!(planned.results.iter().all(|r| r.status == NodeStatus::Planned));
}

#[test]
fn reports_are_byte_identical_across_equivalent_runs() {
  let run = || {
    let log = Arc::new(Mutex::new(vec![]));
    run_pipeline(
      &pricing_registry(log),
      resources(vec![5.0, -1.0]),
      &RunOptions::default(),
    )
    .unwrap()
  };
  let (a, b) = (run(), run());
  assert_ne!(a.run_id, b.run_id);
  assert_eq!(render_junit(&a.results).unwrap(), render_junit(&b.results).unwrap());
  assert_eq!(render_markdown(&a.results), render_markdown(&b.results));
  let xml = render_junit(&a.results).unwrap();
  assert!(xml.contains("<failure"));
  assert!(xml.contains("<skipped"));
  assert!(xml.contains("metric.negatives"));
}

#[test]
fn cyclic_registry_never_runs() {
  let registry = Registry::from_nodes([
    NodeDefinition::task("a", |_| panic!("must not run")).requires(["c"]),
    NodeDefinition::task("b", |_| panic!("must not run")).requires(["a"]),
    NodeDefinition::task("c", |_| panic!("must not run")).requires(["b"]),
  ])
  .unwrap();
  let err = run_pipeline(&registry, Resources::new(), &RunOptions::default()).unwrap_err();
  assert_eq!(
    err,
    GraphError::CycleDetected {
      cycle: vec!["a".into(), "c".into(), "b".into(), "a".into()]
    }
  );
}
