//! Tests for the Manhattan grid layout.

use crate::config::LayoutConfig;
use crate::layout::{
  Bounds, DATA_OBJECT_SIZE, EVENT_SIZE, GATEWAY_SIZE, Point, SUBPROCESS_SIZE, Size, TASK_SIZE,
  calculate_node_positions, calculate_waypoints, compute_layout, node_size,
};
use crate::types::{
  ArtifactParts, BoundaryEventKind, DataAssociation, DataObject, Edge, GatewayKind, Node,
  NodeKind, ProcessArtifact,
};
use proptest::prelude::*;

fn artifact(parts: ArtifactParts) -> ProcessArtifact {
  ProcessArtifact::new(parts)
}

fn chain() -> ProcessArtifact {
  artifact(ArtifactParts {
    nodes: vec![
      Node::start("start_1", "Start"),
      Node::user_task("task_1", "Review", None),
      Node::end("end_1", "End"),
    ],
    edges: vec![Edge::new("start_1", "task_1"), Edge::new("task_1", "end_1")],
    ..ArtifactParts::new("p1", "Chain")
  })
}

#[test]
fn sizes_follow_bpmn_convention() {
  assert_eq!(node_size(&NodeKind::StartEvent), Size::new(36, 36));
  assert_eq!(node_size(&NodeKind::EndEvent), EVENT_SIZE);
  assert_eq!(node_size(&NodeKind::SendTask), Size::new(100, 80));
  assert_eq!(
    node_size(&NodeKind::Gateway {
      gateway_kind: GatewayKind::Exclusive,
      default_flow_id: None
    }),
    GATEWAY_SIZE
  );
  assert_eq!(
    node_size(&NodeKind::SubProcess {
      is_expanded: true,
      loop_kind: None
    }),
    SUBPROCESS_SIZE
  );
  assert_eq!(
    node_size(&NodeKind::DataObject {
      is_collection: false
    }),
    DATA_OBJECT_SIZE
  );
  assert_eq!(DATA_OBJECT_SIZE, Size::new(36, 50));
}

#[test]
fn two_nodes_on_one_row() {
  let a = artifact(ArtifactParts {
    nodes: vec![
      Node::start("start_1", "Start"),
      Node::user_task("task_1", "Review", None),
    ],
    ..ArtifactParts::new("p1", "Two")
  });
  let positions = calculate_node_positions(&a, &LayoutConfig::default());
  assert_eq!(positions.len(), 2);
  assert_eq!(positions["start_1"], Point::new(200, 200));
  assert_eq!(positions["task_1"], Point::new(380, 200));
}

#[test]
fn boundary_event_sits_on_host_lower_right() {
  let a = artifact(ArtifactParts {
    nodes: vec![
      Node::start("s", "Start"),
      Node::boundary("b1", "Timeout", "t", BoundaryEventKind::Timer),
      Node::user_task("t", "Work", None),
    ],
    ..ArtifactParts::new("p1", "Boundary")
  });
  let positions = calculate_node_positions(&a, &LayoutConfig::default());
  // the boundary event does not take a grid slot
  assert_eq!(positions["t"], Point::new(380, 200));
  assert_eq!(positions["b1"], Point::new(460, 260));
}

#[test]
fn unresolvable_positions_default_to_origin() {
  let a = artifact(ArtifactParts {
    nodes: vec![
      Node::user_task("t", "Work", None),
      Node::boundary("b1", "Err", "gone", BoundaryEventKind::Error),
    ],
    data_objects: vec![DataObject::new("d1", "Loose")],
    ..ArtifactParts::new("p1", "Orphans")
  });
  assert!(!a.is_valid());
  let positions = calculate_node_positions(&a, &LayoutConfig::default());
  assert_eq!(positions["b1"], Point::new(200, 200));
  assert_eq!(positions["d1"], Point::new(200, 200));
}

#[test]
fn data_object_floats_above_its_task() {
  let a = artifact(ArtifactParts {
    nodes: vec![
      Node::start("s", "Start"),
      Node::user_task("t", "Fill form", None),
    ],
    data_objects: vec![DataObject::new("d1", "Form"), DataObject::new("d2", "Receipt")],
    data_associations: vec![
      DataAssociation::input("a1", "d1", "t"),
      DataAssociation::output("a2", "s", "d2"),
    ],
    ..ArtifactParts::new("p1", "Data")
  });
  let positions = calculate_node_positions(&a, &LayoutConfig::default());
  assert_eq!(positions["d1"], Point::new(380, 100));
  assert_eq!(positions["d2"], Point::new(200, 100));
}

#[test]
fn custom_config_changes_geometry() {
  let config = LayoutConfig {
    origin_x: 0,
    origin_y: 50,
    horizontal_step: 150,
    ..LayoutConfig::default()
  };
  let positions = calculate_node_positions(&chain(), &config);
  assert_eq!(positions["start_1"], Point::new(0, 50));
  assert_eq!(positions["task_1"], Point::new(150, 50));
  assert_eq!(positions["end_1"], Point::new(300, 50));
}

#[test]
fn waypoints_between_equal_tasks_are_straight() {
  let w = calculate_waypoints(
    Point::new(200, 200),
    Point::new(380, 200),
    TASK_SIZE,
    TASK_SIZE,
    10,
  );
  assert_eq!(w, vec![Point::new(250, 240), Point::new(430, 240)]);
}

#[test]
fn waypoints_use_actual_shape_centers() {
  // start event center y = 218, task center y = 240: an elbow is needed
  let w = calculate_waypoints(
    Point::new(200, 200),
    Point::new(380, 200),
    EVENT_SIZE,
    TASK_SIZE,
    10,
  );
  assert_eq!(
    w,
    vec![Point::new(218, 218), Point::new(218, 240), Point::new(430, 240)]
  );
}

#[test]
fn small_vertical_offset_stays_horizontal() {
  let w = calculate_waypoints(
    Point::new(0, 0),
    Point::new(200, 8),
    TASK_SIZE,
    TASK_SIZE,
    10,
  );
  assert_eq!(w, vec![Point::new(50, 40), Point::new(250, 40)]);
}

#[test]
fn compute_layout_covers_every_element() {
  let a = artifact(ArtifactParts {
    nodes: vec![
      Node::start("s", "Start"),
      Node::user_task("t", "Fill form", None),
      Node::end("e", "End"),
    ],
    edges: vec![Edge::new("s", "t"), Edge::new("t", "e")],
    data_objects: vec![DataObject::new("d1", "Form")],
    data_associations: vec![DataAssociation::input("a1", "d1", "t")],
    ..ArtifactParts::new("p1", "Full")
  });
  let layout = compute_layout(&a, &LayoutConfig::default());
  assert_eq!(layout.shapes.len(), 4);
  assert_eq!(
    layout.shapes["t"],
    Bounds {
      x: 380,
      y: 200,
      width: 100,
      height: 80
    }
  );
  assert_eq!(
    layout.shapes["d1"],
    Bounds {
      x: 380,
      y: 100,
      width: 36,
      height: 50
    }
  );
  assert_eq!(layout.flows.len(), 2);
  assert_eq!(layout.associations.len(), 1);
  assert!(layout.flows.iter().all(|w| w.len() >= 2));
}

#[test]
fn compute_layout_routes_dangling_edges_from_origin() {
  let a = artifact(ArtifactParts {
    nodes: vec![Node::start("s", "Start")],
    edges: vec![Edge::new("s", "ghost")],
    ..ArtifactParts::new("p1", "Dangling")
  });
  let layout = compute_layout(&a, &LayoutConfig::default());
  assert_eq!(layout.flows.len(), 1);
  assert_eq!(layout.flows[0].first(), Some(&Point::new(218, 218)));
  assert_eq!(layout.flows[0].last(), Some(&Point::new(250, 240)));
}

fn arb_kind() -> impl Strategy<Value = NodeKind> {
  prop_oneof![
    Just(NodeKind::StartEvent),
    Just(NodeKind::EndEvent),
    Just(NodeKind::UserTask { role: None }),
    Just(NodeKind::Gateway {
      gateway_kind: GatewayKind::Parallel,
      default_flow_id: None
    }),
    Just(NodeKind::SubProcess {
      is_expanded: true,
      loop_kind: None
    }),
  ]
}

fn arb_artifact() -> impl Strategy<Value = ProcessArtifact> {
  prop::collection::vec(arb_kind(), 0..8).prop_flat_map(|kinds| {
    let n = kinds.len();
    let edges = if n == 0 {
      Just(vec![]).boxed()
    } else {
      prop::collection::vec((0..n, 0..n), 0..10).boxed()
    };
    (Just(kinds), edges).prop_map(|(kinds, pairs)| {
      let nodes = kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| Node::new(format!("n{i}"), format!("Node {i}"), kind))
        .collect();
      let edges = pairs
        .into_iter()
        .map(|(a, b)| Edge::new(format!("n{a}"), format!("n{b}")))
        .collect();
      ProcessArtifact::new(ArtifactParts {
        nodes,
        edges,
        ..ArtifactParts::new("p", "Generated")
      })
    })
  })
}

proptest! {
  #[test]
  fn layout_is_deterministic(a in arb_artifact()) {
    let config = LayoutConfig::default();
    prop_assert_eq!(compute_layout(&a, &config), compute_layout(&a, &config));
  }

  #[test]
  fn every_node_gets_a_shape(a in arb_artifact()) {
    let layout = compute_layout(&a, &LayoutConfig::default());
    for node in a.nodes() {
      prop_assert!(layout.shapes.contains_key(&node.id));
    }
    prop_assert_eq!(layout.flows.len(), a.edges().len());
  }

  #[test]
  fn elbow_rule(
    sx in -500i32..500, sy in -500i32..500,
    tx in -500i32..500, ty in -500i32..500,
    threshold in 0i32..40,
  ) {
    let w = calculate_waypoints(Point::new(sx, sy), Point::new(tx, ty), TASK_SIZE, EVENT_SIZE, threshold);
    let source_cy = sy + TASK_SIZE.height / 2;
    let target_cy = ty + EVENT_SIZE.height / 2;
    if (source_cy - target_cy).abs() <= threshold {
      prop_assert_eq!(w.len(), 2);
      prop_assert_eq!(w[0].y, w[1].y);
    } else {
      prop_assert_eq!(w.len(), 3);
      prop_assert_eq!(w[1].x, w[0].x);
      prop_assert_eq!(w[1].y, w[2].y);
    }
    // every segment is axis aligned
    for pair in w.windows(2) {
      prop_assert!(pair[0].x == pair[1].x || pair[0].y == pair[1].y);
    }
  }
}
