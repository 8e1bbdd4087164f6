//! A BPMN flow element in the process graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger of a boundary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryEventKind {
  Error,
  Timer,
  Message,
}

/// Gateway semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayKind {
  Exclusive,
  Parallel,
  Inclusive,
}

impl GatewayKind {
  /// BPMN element name for this gateway kind.
  pub fn tag(self) -> &'static str {
    match self {
      GatewayKind::Exclusive => "exclusiveGateway",
      GatewayKind::Parallel => "parallelGateway",
      GatewayKind::Inclusive => "inclusiveGateway",
    }
  }
}

/// Multi-instance loop mode of a sub-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopKind {
  Sequential,
  Parallel,
}

/// Variant-specific payload of a [Node]. Serialized with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
  StartEvent,
  EndEvent,
  BoundaryEvent {
    attached_to: String,
    event_kind: BoundaryEventKind,
    #[serde(default = "default_true")]
    interrupts_host: bool,
  },
  UserTask {
    #[serde(default)]
    role: Option<String>,
  },
  ServiceTask {
    #[serde(default)]
    implementation: Option<String>,
  },
  ScriptTask {
    #[serde(default)]
    script_format: Option<String>,
  },
  SendTask,
  ReceiveTask,
  Gateway {
    gateway_kind: GatewayKind,
    #[serde(default)]
    default_flow_id: Option<String>,
  },
  SubProcess {
    #[serde(default = "default_true")]
    is_expanded: bool,
    #[serde(default)]
    loop_kind: Option<LoopKind>,
  },
  DataObject {
    #[serde(default)]
    is_collection: bool,
  },
  DataObjectReference {
    referenced_data_object_id: String,
  },
}

fn default_true() -> bool {
  true
}

impl NodeKind {
  /// Name of the variant, as used in the `type` discriminator.
  pub fn name(&self) -> &'static str {
    match self {
      NodeKind::StartEvent => "StartEvent",
      NodeKind::EndEvent => "EndEvent",
      NodeKind::BoundaryEvent { .. } => "BoundaryEvent",
      NodeKind::UserTask { .. } => "UserTask",
      NodeKind::ServiceTask { .. } => "ServiceTask",
      NodeKind::ScriptTask { .. } => "ScriptTask",
      NodeKind::SendTask => "SendTask",
      NodeKind::ReceiveTask => "ReceiveTask",
      NodeKind::Gateway { .. } => "Gateway",
      NodeKind::SubProcess { .. } => "SubProcess",
      NodeKind::DataObject { .. } => "DataObject",
      NodeKind::DataObjectReference { .. } => "DataObjectReference",
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A node of the process graph: unique id, display label and variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(default)]
  pub label: String,
  #[serde(flatten)]
  pub kind: NodeKind,
}

impl Node {
  pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
      kind,
    }
  }

  pub fn start(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self::new(id, label, NodeKind::StartEvent)
  }

  pub fn end(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self::new(id, label, NodeKind::EndEvent)
  }

  pub fn user_task(id: impl Into<String>, label: impl Into<String>, role: Option<String>) -> Self {
    Self::new(id, label, NodeKind::UserTask { role })
  }

  pub fn gateway(id: impl Into<String>, label: impl Into<String>, gateway_kind: GatewayKind) -> Self {
    Self::new(
      id,
      label,
      NodeKind::Gateway {
        gateway_kind,
        default_flow_id: None,
      },
    )
  }

  pub fn boundary(
    id: impl Into<String>,
    label: impl Into<String>,
    attached_to: impl Into<String>,
    event_kind: BoundaryEventKind,
  ) -> Self {
    Self::new(
      id,
      label,
      NodeKind::BoundaryEvent {
        attached_to: attached_to.into(),
        event_kind,
        interrupts_host: true,
      },
    )
  }

  pub fn is_start(&self) -> bool {
    matches!(self.kind, NodeKind::StartEvent)
  }

  pub fn is_end(&self) -> bool {
    matches!(self.kind, NodeKind::EndEvent)
  }

  /// Host id when this node is a boundary event.
  pub fn attached_to(&self) -> Option<&str> {
    match &self.kind {
      NodeKind::BoundaryEvent { attached_to, .. } => Some(attached_to),
      _ => None,
    }
  }

  /// Every id this node refers to besides its own.
  pub fn referenced_ids(&self) -> Vec<&str> {
    match &self.kind {
      NodeKind::BoundaryEvent { attached_to, .. } => vec![attached_to.as_str()],
      NodeKind::DataObjectReference {
        referenced_data_object_id,
      } => vec![referenced_data_object_id.as_str()],
      NodeKind::StartEvent
      | NodeKind::EndEvent
      | NodeKind::UserTask { .. }
      | NodeKind::ServiceTask { .. }
      | NodeKind::ScriptTask { .. }
      | NodeKind::SendTask
      | NodeKind::ReceiveTask
      | NodeKind::Gateway { .. }
      | NodeKind::SubProcess { .. }
      | NodeKind::DataObject { .. } => vec![],
    }
  }
}
