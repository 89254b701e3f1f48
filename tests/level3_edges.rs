//! Level 3: edge gestures — connect, rewire, cut, and path generation.

mod common;

use common::{connected_editor, two_node_editor, RecordingSink};
use node_canvas::{
    Key, Modifiers, PointerButton, SocketRef, KIND_DEFAULT, SOCKET_LEFT, SOCKET_RIGHT,
    SOCKET_TOP,
};

// ============================================================================
// Path generation
// ============================================================================

#[test]
fn straight_path_stops_arrow_gap_short() {
    // A at (0,0) and B at (1000,0), both 300x200, clearance 10:
    // A.right = (160, 0), B.left = (840, 0), arrow gap 8.
    let (ed, _, _) = connected_editor();
    let path = ed.edge_path(0).unwrap();
    assert_eq!(path, "M 160 0 L 832 0");
}

#[test]
fn edge_path_follows_style() {
    let (mut ed, _, _) = connected_editor();
    ed.scene_mut().edge_mut(0).unwrap().style = node_canvas::PathStyle::Bezier;
    let path = ed.edge_path(0).unwrap();
    assert!(path.contains(" C "));
}

// ============================================================================
// Connect gesture
// ============================================================================

#[test]
fn drag_socket_to_socket_creates_edge() {
    let (mut ed, a, b) = two_node_editor();

    // From A.right (160, 0) to B.left (840, 0).
    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 0.0);
    assert!(ed.preview_path().is_some());
    ed.pointer_up(840.0, 0.0);

    assert_eq!(ed.scene().edges().len(), 1);
    let edge = &ed.scene().edges()[0];
    assert_eq!(edge.source, SocketRef::new(a, SOCKET_RIGHT));
    assert_eq!(edge.target, SocketRef::new(b, SOCKET_LEFT));
}

#[test]
fn connect_to_same_node_is_rejected() {
    let (mut ed, a, _) = two_node_editor();

    // From A.right to A.top.
    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(0.0, -110.0);
    ed.pointer_up(0.0, -110.0);

    assert!(ed.scene().edges().is_empty());
    assert!(ed.undo().is_none());
    let _ = a;
}

#[test]
fn duplicate_connect_is_rejected_without_history() {
    let (mut ed, _, _) = connected_editor();

    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 0.0);
    ed.pointer_up(840.0, 0.0);

    assert_eq!(ed.scene().edges().len(), 1);
    assert!(ed.undo().is_none());
}

#[test]
fn release_over_empty_canvas_offers_pending_connect() {
    let (mut ed, a, _) = two_node_editor();

    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 400.0);
    ed.pointer_up(500.0, 400.0);

    let pending = ed.pending_connect().unwrap();
    assert_eq!(pending.source(), SocketRef::new(a, SOCKET_RIGHT));
    assert_eq!(pending.position(), (500.0, 400.0));
    assert!(ed.scene().edges().is_empty());
}

#[test]
fn confirm_pending_connect_creates_and_wires_node() {
    let (mut ed, a, _) = two_node_editor();
    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 400.0);
    ed.pointer_up(500.0, 400.0);

    let id = ed.confirm_pending_connect(KIND_DEFAULT).unwrap();

    let node = ed.scene().node(id).unwrap();
    assert_eq!((node.x, node.y), (500.0, 400.0));
    assert_eq!(ed.scene().edges().len(), 1);
    assert_eq!(ed.scene().edges()[0].source, SocketRef::new(a, SOCKET_RIGHT));
    assert_eq!(ed.scene().edges()[0].target.node, id);
    // One undo removes both the node and the edge.
    ed.undo();
    assert!(ed.scene().node(id).is_none());
    assert!(ed.scene().edges().is_empty());
}

#[test]
fn dismissed_pending_connect_leaves_no_trace() {
    let (mut ed, _, _) = two_node_editor();
    ed.pointer_down(160.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 400.0);
    ed.pointer_up(500.0, 400.0);

    ed.dismiss_pending_connect();

    assert!(ed.pending_connect().is_none());
    assert_eq!(ed.scene().node_count(), 2);
    assert!(ed.scene().edges().is_empty());
    assert!(ed.undo().is_none());
}

// ============================================================================
// Rewire gesture
// ============================================================================

#[test]
fn rewiring_moves_the_target_end() {
    let (mut ed, a, b) = connected_editor();
    let c = ed.scene_mut().add_node(1000.0, 600.0, 300.0, 200.0, KIND_DEFAULT);

    // Grab the edge midway and drop on C.left at (840, 600).
    ed.pointer_down(500.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(700.0, 300.0);
    ed.pointer_up(840.0, 600.0);

    assert_eq!(ed.scene().edges().len(), 1);
    let edge = &ed.scene().edges()[0];
    assert_eq!(edge.source, SocketRef::new(a, SOCKET_RIGHT));
    assert_eq!(edge.target, SocketRef::new(c, SOCKET_LEFT));
    let _ = b;
}

#[test]
fn rewire_escape_restores_original_edge_at_original_index() {
    let (mut ed, a, b) = connected_editor();
    let before = ed.scene().edges().to_vec();

    ed.pointer_down(500.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(700.0, 300.0);
    ed.key_down(Key::Escape);

    assert_eq!(ed.scene().edges(), before.as_slice());
    assert!(ed.undo().is_none());
    let _ = (a, b);
}

#[test]
fn rewire_released_over_empty_canvas_can_be_dismissed() {
    let (mut ed, _, _) = connected_editor();
    let before = ed.scene().edges().to_vec();

    ed.pointer_down(500.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(600.0, 500.0);
    ed.pointer_up(600.0, 500.0);
    assert!(ed.pending_connect().is_some());
    assert!(ed.scene().edges().is_empty());

    ed.dismiss_pending_connect();

    assert_eq!(ed.scene().edges(), before.as_slice());
}

#[test]
fn plain_click_on_edge_selects_it() {
    let (mut ed, _, _) = connected_editor();

    ed.pointer_down(500.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(500.0, 0.0);

    assert_eq!(ed.scene().edges().len(), 1);
    assert!(ed.selection().contains_edge(0));
    assert!(ed.undo().is_none());
}

// ============================================================================
// Cut gesture
// ============================================================================

#[test]
fn cut_stroke_deletes_only_the_crossed_edge() {
    let (mut ed, a, b) = two_node_editor();
    // Two parallel edges: right->left at y=0 and top->top at y=-110.
    ed.scene_mut().add_edge(
        SocketRef::new(a, SOCKET_RIGHT),
        SocketRef::new(b, SOCKET_LEFT),
        node_canvas::PathStyle::Straight,
    );
    ed.scene_mut().add_edge(
        SocketRef::new(a, SOCKET_TOP),
        SocketRef::new(b, SOCKET_TOP),
        node_canvas::PathStyle::Straight,
    );

    // Vertical stroke crossing only the y=0 edge.
    ed.key_down(Key::Cut);
    ed.pointer_down(500.0, -50.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 50.0);
    ed.pointer_up(500.0, 50.0);
    ed.key_up(Key::Cut);

    assert_eq!(ed.scene().edges().len(), 1);
    assert_eq!(ed.scene().edges()[0].source.socket, SOCKET_TOP);
}

#[test]
fn cut_deleting_several_edges_is_one_history_entry() {
    let (mut ed, a, b) = two_node_editor();
    ed.scene_mut().add_edge(
        SocketRef::new(a, SOCKET_RIGHT),
        SocketRef::new(b, SOCKET_LEFT),
        node_canvas::PathStyle::Straight,
    );
    ed.scene_mut().add_edge(
        SocketRef::new(a, SOCKET_TOP),
        SocketRef::new(b, SOCKET_TOP),
        node_canvas::PathStyle::Straight,
    );

    // Stroke tall enough to cross both parallel edges.
    ed.key_down(Key::Cut);
    ed.pointer_down(500.0, -200.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 100.0);
    ed.pointer_up(500.0, 100.0);
    ed.key_up(Key::Cut);

    assert!(ed.scene().edges().is_empty());
    assert_eq!(ed.undo(), Some("cut edges".to_string()));
    assert_eq!(ed.scene().edges().len(), 2);
    assert!(ed.undo().is_none());
}

#[test]
fn cut_stroke_missing_everything_is_a_noop() {
    let (mut ed, _, _) = connected_editor();
    let sink = RecordingSink::default();
    ed.set_sink(Box::new(sink.clone()));

    ed.key_down(Key::Cut);
    ed.pointer_down(500.0, 300.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(500.0, 400.0);
    ed.pointer_up(500.0, 400.0);
    ed.key_up(Key::Cut);

    assert_eq!(ed.scene().edges().len(), 1);
    assert_eq!(sink.count(), 0);
    assert!(ed.undo().is_none());
}

// ============================================================================
// Waypoints
// ============================================================================

#[test]
fn waypoint_can_be_added_and_dragged() {
    let (mut ed, _, _) = connected_editor();
    ed.add_waypoint(0, 500.0, 100.0);
    assert_eq!(ed.scene().edges()[0].points.len(), 1);

    // Drag the waypoint handle to a new position.
    ed.pointer_down(500.0, 100.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(520.0, 180.0);
    ed.pointer_up(520.0, 180.0);

    let p = ed.scene().edges()[0].points[0];
    assert_eq!((p.x, p.y), (520.0, 180.0));
    assert_eq!(ed.undo(), Some("move waypoint".to_string()));
    assert_eq!(ed.undo(), Some("add waypoint".to_string()));
}

#[test]
fn cut_tests_the_full_polyline_through_waypoints() {
    let (mut ed, _, _) = connected_editor();
    ed.add_waypoint(0, 500.0, 300.0);

    // The detour through (500, 300) is crossed by a stroke that would
    // miss the direct line.
    ed.key_down(Key::Cut);
    ed.pointer_down(300.0, 200.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(700.0, 200.0);
    ed.pointer_up(700.0, 200.0);
    ed.key_up(Key::Cut);

    assert!(ed.scene().edges().is_empty());
}
