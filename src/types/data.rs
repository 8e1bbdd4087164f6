//! Data objects and the dotted associations that tie them to activities.

use serde::{Deserialize, Serialize};

/// Information created or consumed by the process (a document, a record, a file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataObject {
  pub id: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub is_collection: bool,
}

impl DataObject {
  pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
      is_collection: false,
    }
  }
}

/// Direction of a data association relative to the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationDirection {
  /// Data flows into the activity: `source_ref` is data, `target_ref` is the activity.
  Input,
  /// Data flows out of the activity: `source_ref` is the activity, `target_ref` is data.
  Output,
}

/// Non-sequence relation between an activity and a data element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAssociation {
  pub id: String,
  pub source_ref: String,
  pub target_ref: String,
  pub direction: AssociationDirection,
}

impl DataAssociation {
  pub fn input(id: impl Into<String>, data_id: impl Into<String>, task_id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source_ref: data_id.into(),
      target_ref: task_id.into(),
      direction: AssociationDirection::Input,
    }
  }

  pub fn output(id: impl Into<String>, task_id: impl Into<String>, data_id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source_ref: task_id.into(),
      target_ref: data_id.into(),
      direction: AssociationDirection::Output,
    }
  }

  /// Id of the activity end of the association.
  pub fn task_ref(&self) -> &str {
    match self.direction {
      AssociationDirection::Input => &self.target_ref,
      AssociationDirection::Output => &self.source_ref,
    }
  }

  /// Id of the data end of the association.
  pub fn data_ref(&self) -> &str {
    match self.direction {
      AssociationDirection::Input => &self.source_ref,
      AssociationDirection::Output => &self.target_ref,
    }
  }

  pub fn touches(&self, id: &str) -> bool {
    self.source_ref == id || self.target_ref == id
  }
}
