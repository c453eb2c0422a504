//! Tests for `NodeStatus`.

use super::{CheckStatus, NodeStatus};

#[test]
fn blocking_statuses() {
  assert!(NodeStatus::Fail.blocks_dependents());
  assert!(NodeStatus::Skip.blocks_dependents());
  assert!(NodeStatus::Error.blocks_dependents());
  assert!(!NodeStatus::Pass.blocks_dependents());
  assert!(!NodeStatus::Planned.blocks_dependents());
}

#[test]
fn skip_is_not_a_failure() {
  assert!(NodeStatus::Fail.is_failure());
  assert!(NodeStatus::Error.is_failure());
  assert!(!NodeStatus::Skip.is_failure());
  assert!(!NodeStatus::Planned.is_failure());
}

#[test]
fn from_check_status_is_verbatim() {
  assert_eq!(NodeStatus::from(CheckStatus::Pass), NodeStatus::Pass);
  assert_eq!(NodeStatus::from(CheckStatus::Fail), NodeStatus::Fail);
  assert_eq!(NodeStatus::from(CheckStatus::Skip), NodeStatus::Skip);
  assert_eq!(NodeStatus::from(CheckStatus::Error), NodeStatus::Error);
}

#[test]
fn display_planned() {
  assert_eq!(NodeStatus::Planned.to_string(), "planned");
  assert_eq!(NodeStatus::Error.to_string(), "error");
}
