//! Tests for the sufficiency check and critique routing.

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::stages::{critique, route_critique, sufficiency_report};
use crate::types::{
  ArtifactParts, Edge, Node, Phase, ProcessArtifact, ProcessUpdate, Stage, WorkflowState,
};

fn artifact(nodes: Vec<Node>, edges: Vec<Edge>) -> ProcessArtifact {
  ProcessArtifact::new(ArtifactParts {
    nodes,
    edges,
    ..ArtifactParts::new("p", "P")
  })
}

fn complete() -> ProcessArtifact {
  artifact(
    vec![Node::start("s", "Start"), Node::end("e", "End")],
    vec![Edge::new("s", "e")],
  )
}

#[test]
fn only_end_event_is_missing_start() {
  let a = artifact(vec![Node::end("e", "End")], vec![]);
  let reasons = sufficiency_report(&a, None, 0.7);
  assert!(reasons.contains(&"missing start event".to_string()));
  assert!(!reasons.contains(&"missing end event".to_string()));
}

#[test]
fn start_and_end_without_edges_lack_connections() {
  let a = artifact(vec![Node::start("s", "Start"), Node::end("e", "End")], vec![]);
  assert_eq!(
    sufficiency_report(&a, None, 0.7),
    vec!["no sequence flow connections".to_string()]
  );
}

#[test]
fn empty_artifact_does_not_report_connections() {
  let a = ProcessArtifact::empty("p", "P");
  assert_eq!(
    sufficiency_report(&a, None, 0.7),
    vec!["missing start event".to_string(), "missing end event".to_string()]
  );
}

#[test]
fn low_confidence_is_reported_with_value() {
  let reasons = sufficiency_report(&complete(), Some(&ProcessUpdate::empty(0.5)), 0.7);
  assert_eq!(reasons.len(), 1);
  assert!(reasons[0].contains("0.50"), "{reasons:?}");
}

#[test]
fn high_confidence_without_gaps_is_sufficient() {
  assert!(sufficiency_report(&complete(), Some(&ProcessUpdate::empty(0.9)), 0.7).is_empty());
  // exactly at the threshold passes
  assert!(sufficiency_report(&complete(), Some(&ProcessUpdate::empty(0.7)), 0.7).is_empty());
}

#[test]
fn analyst_gaps_are_appended_verbatim() {
  let mut u = ProcessUpdate::empty(0.9);
  u.missing_information = vec!["Who approves?".to_string(), "What is the SLA?".to_string()];
  assert_eq!(
    sufficiency_report(&complete(), Some(&u), 0.7),
    vec!["Who approves?".to_string(), "What is the SLA?".to_string()]
  );
}

#[test]
fn integrity_errors_make_artifact_insufficient() {
  let a = artifact(
    vec![Node::start("s", "Start"), Node::end("e", "End")],
    vec![Edge::new("s", "e"), Edge::new("e", "ghost")],
  );
  assert_eq!(
    sufficiency_report(&a, None, 0.7),
    vec!["Edge references non-existent target node: ghost".to_string()]
  );
}

#[test]
fn critique_sets_phase_and_routes() {
  let config = WorkflowConfig::default();

  let mut state = WorkflowState::with_artifact("x", complete());
  state.last_update = Some(ProcessUpdate::empty(0.9));
  let out = critique(&state, &config);
  assert!(out.is_sufficient);
  let state = state.apply(out.into_update());
  assert_eq!(state.phase, Phase::Generation);
  assert!(state.missing_info.is_empty());
  assert_eq!(route_critique(&state, &config).unwrap(), Stage::Generate);

  let state = WorkflowState::new("x");
  let out = critique(&state, &config);
  assert!(!out.is_sufficient);
  let state = state.apply(out.into_update());
  assert_eq!(state.phase, Phase::Clarification);
  assert_eq!(state.missing_info.len(), 2);
  assert_eq!(route_critique(&state, &config).unwrap(), Stage::Clarify);
}

#[test]
fn custom_threshold_is_honored() {
  let config = WorkflowConfig {
    confidence_threshold: 0.4,
    ..WorkflowConfig::default()
  };
  let mut state = WorkflowState::with_artifact("x", complete());
  state.last_update = Some(ProcessUpdate::empty(0.5));
  assert!(critique(&state, &config).is_sufficient);
}

#[test]
fn exhausted_revisions_fail_instead_of_clarifying() {
  let config = WorkflowConfig {
    max_revisions: 2,
    ..WorkflowConfig::default()
  };
  let mut state = WorkflowState::new("x");
  state.revision_count = 2;
  let update = critique(&state, &config).into_update();
  let state = state.apply(update);
  assert!(matches!(
    route_critique(&state, &config),
    Err(WorkflowError::RevisionLimit { limit: 2 })
  ));

  // a sufficient artifact still generates on the last pass
  let mut done = WorkflowState::with_artifact("x", complete());
  done.last_update = Some(ProcessUpdate::empty(0.9));
  done.revision_count = 2;
  let update = critique(&done, &config).into_update();
  let done = done.apply(update);
  assert_eq!(route_critique(&done, &config).unwrap(), Stage::Generate);
}
