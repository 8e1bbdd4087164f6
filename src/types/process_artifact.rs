//! The process artifact: aggregate root of the process graph.
//!
//! An artifact is rebuilt, never patched: [ProcessArtifact::new] and [ProcessArtifact::merge]
//! both run the integrity check, so `is_valid` and `validation_errors` always describe the
//! current content. Integrity problems are data, not errors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{DataAssociation, DataObject, DecisionRecord, Edge, Node, NodeKind, ProcessUpdate};

/// Raw fields of an artifact, before the integrity check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactParts {
  pub process_id: String,
  pub process_name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
  #[serde(default)]
  pub data_objects: Vec<DataObject>,
  #[serde(default)]
  pub data_associations: Vec<DataAssociation>,
  #[serde(default)]
  pub decision_log: Vec<DecisionRecord>,
}

impl ArtifactParts {
  pub fn new(process_id: impl Into<String>, process_name: impl Into<String>) -> Self {
    Self {
      process_id: process_id.into(),
      process_name: process_name.into(),
      ..Self::default()
    }
  }
}

/// Typed, self-validating process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArtifactParts")]
pub struct ProcessArtifact {
  process_id: String,
  process_name: String,
  description: Option<String>,
  nodes: Vec<Node>,
  edges: Vec<Edge>,
  data_objects: Vec<DataObject>,
  data_associations: Vec<DataAssociation>,
  is_valid: bool,
  validation_errors: Vec<String>,
  decision_log: Vec<DecisionRecord>,
}

impl From<ArtifactParts> for ProcessArtifact {
  fn from(parts: ArtifactParts) -> Self {
    Self::new(parts)
  }
}

impl ProcessArtifact {
  /// Builds an artifact and runs the integrity check. Never fails.
  #[instrument(level = "trace", skip(parts), fields(process_id = %parts.process_id))]
  pub fn new(parts: ArtifactParts) -> Self {
    let validation_errors = integrity_errors(&parts);
    Self {
      process_id: parts.process_id,
      process_name: parts.process_name,
      description: parts.description,
      nodes: parts.nodes,
      edges: parts.edges,
      data_objects: parts.data_objects,
      data_associations: parts.data_associations,
      is_valid: validation_errors.is_empty(),
      validation_errors,
      decision_log: parts.decision_log,
    }
  }

  /// An artifact with no elements.
  pub fn empty(process_id: impl Into<String>, process_name: impl Into<String>) -> Self {
    Self::new(ArtifactParts::new(process_id, process_name))
  }

  pub fn process_id(&self) -> &str {
    &self.process_id
  }

  pub fn process_name(&self) -> &str {
    &self.process_name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn data_objects(&self) -> &[DataObject] {
    &self.data_objects
  }

  pub fn data_associations(&self) -> &[DataAssociation] {
    &self.data_associations
  }

  pub fn is_valid(&self) -> bool {
    self.is_valid
  }

  pub fn validation_errors(&self) -> &[String] {
    &self.validation_errors
  }

  pub fn decision_log(&self) -> &[DecisionRecord] {
    &self.decision_log
  }

  pub fn has_start(&self) -> bool {
    self.nodes.iter().any(Node::is_start)
  }

  pub fn has_end(&self) -> bool {
    self.nodes.iter().any(Node::is_end)
  }

  /// Returns the raw fields, dropping the derived validation state.
  pub fn into_parts(self) -> ArtifactParts {
    ArtifactParts {
      process_id: self.process_id,
      process_name: self.process_name,
      description: self.description,
      nodes: self.nodes,
      edges: self.edges,
      data_objects: self.data_objects,
      data_associations: self.data_associations,
      decision_log: self.decision_log,
    }
  }

  /// Returns a new artifact with `update` applied, then re-validated.
  ///
  /// Removal runs against the current content before additions are appended, so removing and
  /// re-adding an id replaces that node. Removing a node also drops every edge, boundary event
  /// and data association that referenced it (transitively through removed boundary events).
  /// Ids in `nodes_to_remove` that do not exist are ignored. Added items that are exact
  /// duplicates of kept items are skipped.
  #[instrument(level = "trace", skip(self, update), fields(process_id = %self.process_id))]
  pub fn merge(&self, update: &ProcessUpdate) -> ProcessArtifact {
    let removed = removal_closure(self, &update.nodes_to_remove);

    let mut parts = self.clone().into_parts();
    parts.nodes.retain(|n| !removed.contains(n.id.as_str()));
    parts.data_objects.retain(|d| !removed.contains(d.id.as_str()));
    parts
      .edges
      .retain(|e| !removed.contains(e.source_id.as_str()) && !removed.contains(e.target_id.as_str()));
    parts
      .data_associations
      .retain(|a| !removed.contains(a.source_ref.as_str()) && !removed.contains(a.target_ref.as_str()));

    let mut added = Vec::new();
    for node in &update.new_nodes {
      if !parts.nodes.contains(node) {
        added.push(node.id.clone());
        parts.nodes.push(node.clone());
      }
    }
    for edge in &update.new_edges {
      if !parts.edges.contains(edge) {
        parts.edges.push(edge.clone());
      }
    }
    for data in &update.new_data_objects {
      if !parts.data_objects.contains(data) {
        added.push(data.id.clone());
        parts.data_objects.push(data.clone());
      }
    }
    for assoc in &update.new_data_associations {
      if !parts.data_associations.contains(assoc) {
        added.push(assoc.id.clone());
        parts.data_associations.push(assoc.clone());
      }
    }

    let mut removed: Vec<String> = removed.into_iter().map(str::to_string).collect();
    removed.sort();
    debug!(added = ?added, removed = ?removed, "merged process update");

    parts.decision_log.push(DecisionRecord {
      revision: parts.decision_log.len() as u32 + 1,
      reasoning: update.reasoning.clone(),
      added,
      removed,
      confidence: update.confidence,
    });
    ProcessArtifact::new(parts)
  }
}

/// Existing ids removed by `requested`, plus boundary events whose host goes away.
fn removal_closure<'a>(artifact: &'a ProcessArtifact, requested: &[String]) -> HashSet<&'a str> {
  let mut removed: HashSet<&str> = artifact
    .nodes
    .iter()
    .map(|n| n.id.as_str())
    .chain(artifact.data_objects.iter().map(|d| d.id.as_str()))
    .filter(|id| requested.iter().any(|r| r.as_str() == *id))
    .collect();
  loop {
    let before = removed.len();
    for node in &artifact.nodes {
      if node.attached_to().is_some_and(|host| removed.contains(host)) {
        removed.insert(node.id.as_str());
      }
    }
    if removed.len() == before {
      return removed;
    }
  }
}

/// One message per broken reference or duplicated element id.
pub(crate) fn integrity_errors(parts: &ArtifactParts) -> Vec<String> {
  let node_ids: HashSet<&str> = parts.nodes.iter().map(|n| n.id.as_str()).collect();
  let mut errors = Vec::new();

  for edge in &parts.edges {
    if !node_ids.contains(edge.source_id.as_str()) {
      errors.push(format!(
        "Edge references non-existent source node: {}",
        edge.source_id
      ));
    }
    if !node_ids.contains(edge.target_id.as_str()) {
      errors.push(format!(
        "Edge references non-existent target node: {}",
        edge.target_id
      ));
    }
  }

  for node in &parts.nodes {
    if let Some(host) = node.attached_to() {
      if !node_ids.contains(host) {
        errors.push(format!(
          "BoundaryEvent '{}' references non-existent task: {}",
          node.id, host
        ));
      }
    }
  }

  let data_ids: HashSet<&str> = parts
    .data_objects
    .iter()
    .map(|d| d.id.as_str())
    .chain(
      parts
        .nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::DataObject { .. }))
        .map(|n| n.id.as_str()),
    )
    .collect();
  for node in &parts.nodes {
    if matches!(node.kind, NodeKind::DataObjectReference { .. }) {
      for target in node.referenced_ids() {
        if !data_ids.contains(target) {
          errors.push(format!(
            "DataObjectReference '{}' references non-existent data object: {}",
            node.id, target
          ));
        }
      }
    }
  }

  let element_ids: HashSet<&str> = node_ids
    .iter()
    .copied()
    .chain(parts.data_objects.iter().map(|d| d.id.as_str()))
    .collect();
  for assoc in &parts.data_associations {
    if !element_ids.contains(assoc.source_ref.as_str()) {
      errors.push(format!(
        "DataAssociation '{}' references non-existent source: {}",
        assoc.id, assoc.source_ref
      ));
    }
    if !element_ids.contains(assoc.target_ref.as_str()) {
      errors.push(format!(
        "DataAssociation '{}' references non-existent target: {}",
        assoc.id, assoc.target_ref
      ));
    }
  }

  // nodes, data objects and associations share one XML id space
  let mut seen = HashSet::new();
  for node in &parts.nodes {
    if !seen.insert(node.id.as_str()) {
      errors.push(format!("Duplicate node id: {}", node.id));
    }
  }
  for data in &parts.data_objects {
    if !seen.insert(data.id.as_str()) {
      errors.push(format!("Duplicate data object id: {}", data.id));
    }
  }
  for assoc in &parts.data_associations {
    if !seen.insert(assoc.id.as_str()) {
      errors.push(format!("Duplicate data association id: {}", assoc.id));
    }
  }

  errors
}
