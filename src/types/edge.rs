//! A sequence flow between two nodes.

use serde::{Deserialize, Serialize};

/// A directed sequence flow. Cycles are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub source_id: String,
  pub target_id: String,
  #[serde(default)]
  pub condition: Option<String>,
  #[serde(default)]
  pub is_default: bool,
}

impl Edge {
  pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
    Self {
      source_id: source_id.into(),
      target_id: target_id.into(),
      condition: None,
      is_default: false,
    }
  }

  pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
    self.condition = Some(condition.into());
    self
  }

  pub fn as_default(mut self) -> Self {
    self.is_default = true;
    self
  }

  /// True if either endpoint is `id`.
  pub fn touches(&self, id: &str) -> bool {
    self.source_id == id || self.target_id == id
  }
}
