//! Tests for `ProcessUpdate`.

use super::{DataAssociation, DataObject, Edge, Node, ProcessUpdate};

#[test]
fn parses_analyst_output_with_defaults() {
  let json = r#"{
    "reasoning": "User described a simple approval flow",
    "new_nodes": [{"id": "task_1", "label": "Approve Request", "type": "UserTask", "role": "Manager"}],
    "new_edges": [{"source_id": "start_1", "target_id": "task_1"}],
    "confidence": 0.7,
    "missing_information": ["What happens if rejected?"]
  }"#;
  let u: ProcessUpdate = serde_json::from_str(json).unwrap();
  assert_eq!(u.new_nodes, vec![Node::user_task("task_1", "Approve Request", Some("Manager".to_string()))]);
  assert_eq!(u.new_edges, vec![Edge::new("start_1", "task_1")]);
  assert!(u.new_data_objects.is_empty());
  assert!(u.nodes_to_remove.is_empty());
  assert_eq!(u.missing_information.len(), 1);
  assert!(u.check().is_ok());
}

#[test]
fn missing_confidence_is_rejected() {
  let r: Result<ProcessUpdate, _> = serde_json::from_str(r#"{"missing_information": []}"#);
  assert!(r.is_err());
}

#[test]
fn check_rejects_out_of_range_confidence() {
  assert!(ProcessUpdate::empty(1.5).check().is_err());
  assert!(ProcessUpdate::empty(-0.1).check().is_err());
  assert!(ProcessUpdate::empty(f64::NAN).check().is_err());
  assert!(ProcessUpdate::empty(0.0).check().is_ok());
  assert!(ProcessUpdate::empty(1.0).check().is_ok());
}

#[test]
fn carries_data_architecture() {
  let mut u = ProcessUpdate::empty(0.8);
  u.new_data_objects = vec![DataObject::new("data_1", "Invoice")];
  u.new_data_associations = vec![DataAssociation::input("assoc_1", "data_1", "task_1")];
  let v = serde_json::to_value(&u).unwrap();
  assert_eq!(v["new_data_objects"][0]["label"], "Invoice");
  assert_eq!(v["new_data_associations"][0]["direction"], "input");
}
