//! Manhattan grid layout for BPMN Diagram Interchange.
//!
//! Nodes are laid out left to right on one row in artifact order; boundary events sit on the
//! lower-right of their host; data elements float above the task they are associated with.
//! Connectors only use horizontal and vertical segments. The layout is a pure function of the
//! artifact and the [LayoutConfig]: identical input gives identical output.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::instrument;

use crate::config::LayoutConfig;
use crate::types::{DataAssociation, Edge, NodeKind, ProcessArtifact};

/// A point on the diagram plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// Width and height of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
  pub width: i32,
  pub height: i32,
}

impl Size {
  pub const fn new(width: i32, height: i32) -> Self {
    Self { width, height }
  }
}

/// DI bounds of a shape (top-left corner plus size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

pub const EVENT_SIZE: Size = Size::new(36, 36);
pub const TASK_SIZE: Size = Size::new(100, 80);
pub const GATEWAY_SIZE: Size = Size::new(50, 50);
pub const DATA_OBJECT_SIZE: Size = Size::new(36, 50);
pub const SUBPROCESS_SIZE: Size = Size::new(350, 200);

/// Standard BPMN size of a node variant.
pub fn node_size(kind: &NodeKind) -> Size {
  match kind {
    NodeKind::StartEvent | NodeKind::EndEvent | NodeKind::BoundaryEvent { .. } => EVENT_SIZE,
    NodeKind::UserTask { .. }
    | NodeKind::ServiceTask { .. }
    | NodeKind::ScriptTask { .. }
    | NodeKind::SendTask
    | NodeKind::ReceiveTask => TASK_SIZE,
    NodeKind::Gateway { .. } => GATEWAY_SIZE,
    NodeKind::SubProcess { .. } => SUBPROCESS_SIZE,
    NodeKind::DataObject { .. } | NodeKind::DataObjectReference { .. } => DATA_OBJECT_SIZE,
  }
}

/// Computes the top-left position of every node and data object.
///
/// Elements whose position cannot be resolved (a boundary event with a missing host, a data
/// object with no association) are placed at the grid origin.
#[instrument(level = "trace", skip(artifact, config), fields(process_id = %artifact.process_id()))]
pub fn calculate_node_positions(
  artifact: &ProcessArtifact,
  config: &LayoutConfig,
) -> BTreeMap<String, Point> {
  let origin = Point::new(config.origin_x, config.origin_y);
  let mut positions = BTreeMap::new();

  let mut x = config.origin_x;
  for node in artifact.nodes() {
    if node.attached_to().is_some() {
      continue;
    }
    positions.insert(node.id.clone(), Point::new(x, config.origin_y));
    x += config.horizontal_step;
  }

  for node in artifact.nodes() {
    if let Some(host) = node.attached_to() {
      let pos = positions
        .get(host)
        .map(|p| Point::new(p.x + config.boundary_offset_x, p.y + config.boundary_offset_y))
        .unwrap_or(origin);
      positions.insert(node.id.clone(), pos);
    }
  }

  for assoc in artifact.data_associations() {
    if let Some(task) = positions.get(assoc.task_ref()).copied() {
      positions.insert(
        assoc.data_ref().to_string(),
        Point::new(task.x, task.y + config.data_object_offset_y),
      );
    }
  }

  for data in artifact.data_objects() {
    positions.entry(data.id.clone()).or_insert(origin);
  }

  positions
}

/// Orthogonal waypoints from the center of the source shape to the center of the target shape.
///
/// When the vertical centers differ by more than `elbow_threshold`, the route gets an elbow
/// at (source x, target y) and has three points. Otherwise it is a single horizontal segment
/// on the source's center line.
pub fn calculate_waypoints(
  source_pos: Point,
  target_pos: Point,
  source_size: Size,
  target_size: Size,
  elbow_threshold: i32,
) -> Vec<Point> {
  let source = Point::new(
    source_pos.x + source_size.width / 2,
    source_pos.y + source_size.height / 2,
  );
  let target = Point::new(
    target_pos.x + target_size.width / 2,
    target_pos.y + target_size.height / 2,
  );

  if (source.y - target.y).abs() > elbow_threshold {
    vec![source, Point::new(source.x, target.y), target]
  } else {
    vec![source, Point::new(target.x, source.y)]
  }
}

/// Bounds of an element, defaulting to the grid origin when it has no position.
pub fn bounds_for(
  id: &str,
  positions: &BTreeMap<String, Point>,
  size: Size,
  config: &LayoutConfig,
) -> Bounds {
  let pos = positions
    .get(id)
    .copied()
    .unwrap_or(Point::new(config.origin_x, config.origin_y));
  Bounds {
    x: pos.x,
    y: pos.y,
    width: size.width,
    height: size.height,
  }
}

/// Complete diagram geometry for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramLayout {
  /// Bounds keyed by node or data object id.
  pub shapes: BTreeMap<String, Bounds>,
  /// Waypoints per sequence flow, in the order of [ProcessArtifact::edges].
  pub flows: Vec<Vec<Point>>,
  /// Waypoints per data association, in the order of [ProcessArtifact::data_associations].
  pub associations: Vec<Vec<Point>>,
}

/// Lays out every node, data object, sequence flow and data association of `artifact`.
#[instrument(level = "trace", skip(artifact, config), fields(process_id = %artifact.process_id()))]
pub fn compute_layout(artifact: &ProcessArtifact, config: &LayoutConfig) -> DiagramLayout {
  let positions = calculate_node_positions(artifact, config);

  let mut sizes: BTreeMap<&str, Size> = BTreeMap::new();
  for data in artifact.data_objects() {
    sizes.insert(data.id.as_str(), DATA_OBJECT_SIZE);
  }
  for node in artifact.nodes() {
    sizes.insert(node.id.as_str(), node_size(&node.kind));
  }

  let shapes = sizes
    .iter()
    .map(|(id, size)| (id.to_string(), bounds_for(id, &positions, *size, config)))
    .collect();

  let route = |from: &str, to: &str| {
    let origin = Point::new(config.origin_x, config.origin_y);
    calculate_waypoints(
      positions.get(from).copied().unwrap_or(origin),
      positions.get(to).copied().unwrap_or(origin),
      sizes.get(from).copied().unwrap_or(TASK_SIZE),
      sizes.get(to).copied().unwrap_or(TASK_SIZE),
      config.elbow_threshold,
    )
  };

  let flows = artifact
    .edges()
    .iter()
    .map(|e: &Edge| route(&e.source_id, &e.target_id))
    .collect();
  let associations = artifact
    .data_associations()
    .iter()
    .map(|a: &DataAssociation| route(&a.source_ref, &a.target_ref))
    .collect();

  DiagramLayout {
    shapes,
    flows,
    associations,
  }
}
