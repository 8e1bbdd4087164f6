//! BPMN 2.0 XML writer: process model plus Diagram Interchange.

use std::collections::HashSet;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::instrument;

use crate::error::CodecError;
use crate::layout::{Bounds, DiagramLayout, Point};
use crate::types::{
  AssociationDirection, BoundaryEventKind, DataAssociation, Edge, LoopKind, Node, NodeKind,
  ProcessArtifact,
};

pub const BPMN_MODEL_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMN_DI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
pub const DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";
pub const TARGET_NAMESPACE: &str = "http://bpmn.io/schema/bpmn";

type Attrs = Vec<(&'static str, String)>;

fn write_err(e: impl std::fmt::Display) -> CodecError {
  CodecError::Write(e.to_string())
}

/// Thin wrapper over an indenting quick-xml writer.
struct XmlOut {
  inner: Writer<Vec<u8>>,
}

impl XmlOut {
  fn new() -> Self {
    Self {
      inner: Writer::new_with_indent(Vec::new(), b' ', 2),
    }
  }

  fn element(tag: &str, attrs: &[(&'static str, String)]) -> BytesStart<'static> {
    let mut start = BytesStart::new(tag.to_string());
    for (key, value) in attrs {
      start.push_attribute((*key, value.as_str()));
    }
    start
  }

  fn decl(&mut self) -> Result<(), CodecError> {
    self
      .inner
      .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
      .map_err(write_err)
  }

  fn open(&mut self, tag: &str, attrs: &[(&'static str, String)]) -> Result<(), CodecError> {
    self
      .inner
      .write_event(Event::Start(Self::element(tag, attrs)))
      .map_err(write_err)
  }

  fn empty(&mut self, tag: &str, attrs: &[(&'static str, String)]) -> Result<(), CodecError> {
    self
      .inner
      .write_event(Event::Empty(Self::element(tag, attrs)))
      .map_err(write_err)
  }

  fn close(&mut self, tag: &str) -> Result<(), CodecError> {
    self
      .inner
      .write_event(Event::End(BytesEnd::new(tag.to_string())))
      .map_err(write_err)
  }

  fn text_element(&mut self, tag: &str, text: &str) -> Result<(), CodecError> {
    self.open(tag, &[])?;
    self
      .inner
      .write_event(Event::Text(BytesText::new(text)))
      .map_err(write_err)?;
    self.close(tag)
  }

  fn finish(self) -> Result<String, CodecError> {
    String::from_utf8(self.inner.into_inner()).map_err(write_err)
  }
}

/// Sequence flow ids in edge order: `Flow_{source}_to_{target}`, with `_2`, `_3`, ... appended
/// while the id is already taken, so every returned id is distinct.
pub fn flow_ids(edges: &[Edge]) -> Vec<String> {
  let mut issued: HashSet<String> = HashSet::new();
  edges
    .iter()
    .map(|e| {
      let base = format!("Flow_{}_to_{}", e.source_id, e.target_id);
      let mut id = base.clone();
      let mut n = 1;
      while issued.contains(&id) {
        n += 1;
        id = format!("{base}_{n}");
      }
      issued.insert(id.clone());
      id
    })
    .collect()
}

/// Element tag and attributes of a node, excluding children.
fn node_element(node: &Node, default_flow: Option<&str>) -> (&'static str, Attrs) {
  let mut attrs: Attrs = vec![("id", node.id.clone()), ("name", node.label.clone())];
  let tag = match &node.kind {
    NodeKind::StartEvent => "startEvent",
    NodeKind::EndEvent => "endEvent",
    NodeKind::BoundaryEvent {
      attached_to,
      interrupts_host,
      ..
    } => {
      attrs.push(("attachedToRef", attached_to.clone()));
      attrs.push(("cancelActivity", interrupts_host.to_string()));
      "boundaryEvent"
    }
    NodeKind::UserTask { role } => {
      if let Some(role) = role {
        attrs.push(("performer", role.clone()));
      }
      "userTask"
    }
    NodeKind::ServiceTask { implementation } => {
      if let Some(implementation) = implementation {
        attrs.push(("implementation", implementation.clone()));
      }
      "serviceTask"
    }
    NodeKind::ScriptTask { script_format } => {
      if let Some(format) = script_format {
        attrs.push(("scriptFormat", format.clone()));
      }
      "scriptTask"
    }
    NodeKind::SendTask => "sendTask",
    NodeKind::ReceiveTask => "receiveTask",
    NodeKind::Gateway { gateway_kind, .. } => {
      if let Some(flow) = default_flow {
        attrs.push(("default", flow.to_string()));
      }
      gateway_kind.tag()
    }
    NodeKind::SubProcess { .. } => "subProcess",
    NodeKind::DataObject { is_collection } => {
      attrs.push(("isCollection", is_collection.to_string()));
      "dataObject"
    }
    NodeKind::DataObjectReference {
      referenced_data_object_id,
    } => {
      attrs.push(("dataObjectRef", referenced_data_object_id.clone()));
      "dataObjectReference"
    }
  };
  (tag, attrs)
}

/// Default flow of a gateway: its explicit `default_flow_id`, else the first outgoing edge
/// flagged as default.
fn default_flow<'a>(
  node: &'a Node,
  edges: &[Edge],
  flow_ids: &'a [String],
) -> Option<&'a str> {
  match &node.kind {
    NodeKind::Gateway {
      default_flow_id: Some(id),
      ..
    } => Some(id.as_str()),
    NodeKind::Gateway { .. } => edges
      .iter()
      .zip(flow_ids)
      .find(|(e, _)| e.source_id == node.id && e.is_default)
      .map(|(_, id)| id.as_str()),
    _ => None,
  }
}

fn write_node(
  out: &mut XmlOut,
  node: &Node,
  default_flow: Option<&str>,
  associations: &[&DataAssociation],
) -> Result<(), CodecError> {
  let (tag, attrs) = node_element(node, default_flow);
  let definition = match &node.kind {
    NodeKind::BoundaryEvent { event_kind, .. } => Some(match event_kind {
      BoundaryEventKind::Error => "errorEventDefinition",
      BoundaryEventKind::Timer => "timerEventDefinition",
      BoundaryEventKind::Message => "messageEventDefinition",
    }),
    _ => None,
  };
  let loop_kind = match &node.kind {
    NodeKind::SubProcess {
      loop_kind: Some(kind),
      ..
    } => Some(*kind),
    _ => None,
  };

  if definition.is_none() && loop_kind.is_none() && associations.is_empty() {
    return out.empty(tag, &attrs);
  }

  out.open(tag, &attrs)?;
  if let Some(definition) = definition {
    out.empty(definition, &[("id", format!("{}_definition", node.id))])?;
  }
  for assoc in associations {
    let assoc_tag = match assoc.direction {
      AssociationDirection::Input => "dataInputAssociation",
      AssociationDirection::Output => "dataOutputAssociation",
    };
    out.open(assoc_tag, &[("id", assoc.id.clone())])?;
    out.text_element("sourceRef", &assoc.source_ref)?;
    out.text_element("targetRef", &assoc.target_ref)?;
    out.close(assoc_tag)?;
  }
  if let Some(kind) = loop_kind {
    out.empty(
      "multiInstanceLoopCharacteristics",
      &[("isSequential", (kind == LoopKind::Sequential).to_string())],
    )?;
  }
  out.close(tag)
}

fn write_shape(
  out: &mut XmlOut,
  element_id: &str,
  bounds: &Bounds,
  is_expanded: Option<bool>,
) -> Result<(), CodecError> {
  let mut attrs: Attrs = vec![
    ("id", format!("{element_id}_di")),
    ("bpmnElement", element_id.to_string()),
  ];
  if let Some(expanded) = is_expanded {
    attrs.push(("isExpanded", expanded.to_string()));
  }
  out.open("bpmndi:BPMNShape", &attrs)?;
  out.empty(
    "dc:Bounds",
    &[
      ("x", bounds.x.to_string()),
      ("y", bounds.y.to_string()),
      ("width", bounds.width.to_string()),
      ("height", bounds.height.to_string()),
    ],
  )?;
  out.close("bpmndi:BPMNShape")
}

fn write_edge(out: &mut XmlOut, element_id: &str, waypoints: &[Point]) -> Result<(), CodecError> {
  out.open(
    "bpmndi:BPMNEdge",
    &[
      ("id", format!("{element_id}_di")),
      ("bpmnElement", element_id.to_string()),
    ],
  )?;
  for p in waypoints {
    out.empty(
      "di:waypoint",
      &[("x", p.x.to_string()), ("y", p.y.to_string())],
    )?;
  }
  out.close("bpmndi:BPMNEdge")
}

/// Serializes `artifact` with the geometry in `layout`. Does not validate the result.
#[instrument(level = "trace", skip(artifact, layout), fields(process_id = %artifact.process_id()))]
pub fn write_definitions(
  artifact: &ProcessArtifact,
  layout: &DiagramLayout,
) -> Result<String, CodecError> {
  let flows = flow_ids(artifact.edges());
  let mut out = XmlOut::new();
  out.decl()?;
  out.open(
    "definitions",
    &[
      ("xmlns", BPMN_MODEL_NS.to_string()),
      ("xmlns:bpmndi", BPMN_DI_NS.to_string()),
      ("xmlns:dc", DC_NS.to_string()),
      ("xmlns:di", DI_NS.to_string()),
      ("id", "Definitions_1".to_string()),
      ("targetNamespace", TARGET_NAMESPACE.to_string()),
    ],
  )?;

  out.open(
    "process",
    &[
      ("id", artifact.process_id().to_string()),
      ("name", artifact.process_name().to_string()),
      ("isExecutable", "false".to_string()),
    ],
  )?;
  if let Some(description) = artifact.description() {
    out.text_element("documentation", description)?;
  }
  for node in artifact.nodes() {
    let associations: Vec<&DataAssociation> = artifact
      .data_associations()
      .iter()
      .filter(|a| a.task_ref() == node.id)
      .collect();
    write_node(
      &mut out,
      node,
      default_flow(node, artifact.edges(), &flows),
      &associations,
    )?;
  }
  for data in artifact.data_objects() {
    out.empty(
      "dataObject",
      &[
        ("id", data.id.clone()),
        ("name", data.label.clone()),
        ("isCollection", data.is_collection.to_string()),
      ],
    )?;
  }
  for (edge, id) in artifact.edges().iter().zip(&flows) {
    let mut attrs: Attrs = vec![
      ("id", id.clone()),
      ("sourceRef", edge.source_id.clone()),
      ("targetRef", edge.target_id.clone()),
    ];
    if let Some(condition) = &edge.condition {
      attrs.push(("name", condition.clone()));
    }
    out.empty("sequenceFlow", &attrs)?;
  }
  out.close("process")?;

  out.open("bpmndi:BPMNDiagram", &[("id", "BPMNDiagram_1".to_string())])?;
  out.open(
    "bpmndi:BPMNPlane",
    &[
      ("id", "BPMNPlane_1".to_string()),
      ("bpmnElement", artifact.process_id().to_string()),
    ],
  )?;
  for node in artifact.nodes() {
    let is_expanded = match &node.kind {
      NodeKind::SubProcess { is_expanded, .. } => Some(*is_expanded),
      _ => None,
    };
    if let Some(bounds) = layout.shapes.get(&node.id) {
      write_shape(&mut out, &node.id, bounds, is_expanded)?;
    }
  }
  for data in artifact.data_objects() {
    if let Some(bounds) = layout.shapes.get(&data.id) {
      write_shape(&mut out, &data.id, bounds, None)?;
    }
  }
  for (id, waypoints) in flows.iter().zip(&layout.flows) {
    write_edge(&mut out, id, waypoints)?;
  }
  for (assoc, waypoints) in artifact
    .data_associations()
    .iter()
    .zip(&layout.associations)
  {
    write_edge(&mut out, &assoc.id, waypoints)?;
  }
  out.close("bpmndi:BPMNPlane")?;
  out.close("bpmndi:BPMNDiagram")?;
  out.close("definitions")?;

  out.finish()
}
