//! Delta proposed by the analyst against the current artifact.

use serde::{Deserialize, Serialize};

use super::{DataAssociation, DataObject, Edge, Node};

/// Structured change proposal. Consumed once by [ProcessArtifact::merge](super::ProcessArtifact::merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUpdate {
  /// Analyst's reasoning about what changed.
  #[serde(default)]
  pub reasoning: String,
  #[serde(default)]
  pub new_nodes: Vec<Node>,
  #[serde(default)]
  pub new_edges: Vec<Edge>,
  #[serde(default)]
  pub new_data_objects: Vec<DataObject>,
  #[serde(default)]
  pub new_data_associations: Vec<DataAssociation>,
  #[serde(default)]
  pub nodes_to_remove: Vec<String>,
  /// How complete the analyst perceives the process to be, in `[0, 1]`.
  pub confidence: f64,
  /// Gaps the analyst could not resolve from the conversation.
  pub missing_information: Vec<String>,
}

impl ProcessUpdate {
  /// An update that changes nothing.
  pub fn empty(confidence: f64) -> Self {
    Self {
      reasoning: String::new(),
      new_nodes: vec![],
      new_edges: vec![],
      new_data_objects: vec![],
      new_data_associations: vec![],
      nodes_to_remove: vec![],
      confidence,
      missing_information: vec![],
    }
  }

  /// Checks value ranges that the schema alone cannot express.
  pub fn check(&self) -> Result<(), String> {
    if !(0.0..=1.0).contains(&self.confidence) || self.confidence.is_nan() {
      return Err(format!("confidence {} is outside [0, 1]", self.confidence));
    }
    Ok(())
  }
}
