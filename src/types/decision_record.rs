//! Traceability entry appended to the artifact on every merge.

use serde::{Deserialize, Serialize};

/// Why the artifact changed at a given revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
  /// 1-based position in the decision log.
  pub revision: u32,
  pub reasoning: String,
  /// Ids of nodes, data objects and associations added.
  pub added: Vec<String>,
  /// Ids of nodes removed.
  pub removed: Vec<String>,
  pub confidence: f64,
}
