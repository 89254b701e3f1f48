//! Level 2: drag, snap, resize and drop-reparent gestures.

mod common;

use common::{drag, editor, two_node_editor};
use node_canvas::{Key, Modifiers, PointerButton, KIND_DEFAULT, KIND_GROUP};

// ============================================================================
// Grid and object snap
// ============================================================================

#[test]
fn drag_to_raw_207_198_snaps_to_200_200() {
    let mut ed = editor();
    // Grid 20, grid snap on, nothing else nearby.
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 50.0, KIND_DEFAULT);

    drag(&mut ed, (100.0, 100.0), (207.0, 198.0));

    let node = ed.scene().node(a).unwrap();
    assert_eq!((node.x, node.y), (200.0, 200.0));
}

#[test]
fn object_snap_aligns_edges_and_beats_grid() {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 50.0, KIND_DEFAULT);
    // Stationary node whose left edge sits at x = 253.
    ed.scene_mut().add_node(303.0, 400.0, 100.0, 50.0, KIND_DEFAULT);

    // Candidate center 207: dragged right edge 257 is 4 from the target
    // edge 253, inside the threshold, so x aligns to 203 instead of the
    // grid's 200.
    drag(&mut ed, (100.0, 100.0), (207.0, 100.0));

    let node = ed.scene().node(a).unwrap();
    assert_eq!(node.x, 203.0);
}

#[test]
fn dragging_a_selection_moves_all_members() {
    let (mut ed, a, b) = two_node_editor();
    ed.pointer_down(0.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(0.0, 0.0);
    ed.pointer_down(1000.0, 0.0, PointerButton::Primary, Modifiers::ALT);
    ed.pointer_up(1000.0, 0.0);

    drag(&mut ed, (0.0, 0.0), (100.0, 40.0));

    let na = ed.scene().node(a).unwrap();
    let nb = ed.scene().node(b).unwrap();
    assert_eq!((na.x, na.y), (100.0, 40.0));
    assert_eq!((nb.x, nb.y), (1100.0, 40.0));
}

#[test]
fn locked_nodes_stay_put_during_drags() {
    let (mut ed, a, b) = two_node_editor();
    ed.scene_mut().node_mut(b).unwrap().locked = true;
    ed.pointer_down(0.0, 0.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(0.0, 0.0);
    ed.pointer_down(1000.0, 0.0, PointerButton::Primary, Modifiers::ALT);
    ed.pointer_up(1000.0, 0.0);

    drag(&mut ed, (0.0, 0.0), (100.0, 40.0));

    assert_eq!(ed.scene().node(a).unwrap().x, 100.0);
    assert_eq!(ed.scene().node(b).unwrap().x, 1000.0);
}

// ============================================================================
// Drop-reparent
// ============================================================================

#[test]
fn dropping_inside_a_group_reparents() {
    let mut ed = editor();
    let group = ed.scene_mut().add_node(1000.0, 1000.0, 600.0, 400.0, KIND_GROUP);
    let a = ed.scene_mut().add_node(0.0, 0.0, 100.0, 50.0, KIND_DEFAULT);

    drag(&mut ed, (0.0, 0.0), (1000.0, 1000.0));

    assert_eq!(ed.scene().node(a).unwrap().parent, Some(group));
    assert!(ed.scene().node(group).unwrap().children.contains(&a));
}

#[test]
fn dropping_outside_every_group_detaches() {
    let mut ed = editor();
    let group = ed.scene_mut().add_node(0.0, 0.0, 600.0, 400.0, KIND_GROUP);
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 50.0, KIND_DEFAULT);
    ed.scene_mut().set_parent(a, Some(group));

    drag(&mut ed, (100.0, 100.0), (2000.0, 2000.0));

    assert_eq!(ed.scene().node(a).unwrap().parent, None);
    let _ = group;
}

#[test]
fn dragging_a_group_does_not_reparent_into_itself() {
    let mut ed = editor();
    let group = ed.scene_mut().add_node(0.0, 0.0, 600.0, 400.0, KIND_GROUP);

    drag(&mut ed, (0.0, 0.0), (40.0, 40.0));

    assert_eq!(ed.scene().node(group).unwrap().parent, None);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_anchors_the_opposite_corner() {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 60.0, KIND_DEFAULT);
    // Select so the handles exist, then grab the bottom-right handle at
    // (150, 130) and pull to (200, 160).
    ed.pointer_down(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(100.0, 100.0);

    drag(&mut ed, (150.0, 130.0), (200.0, 160.0));

    let node = ed.scene().node(a).unwrap();
    let bounds = node.bounds();
    // Top-left anchor unchanged at (50, 70); the moving corner snapped to
    // the grid.
    assert_eq!((bounds.x, bounds.y), (50.0, 70.0));
    assert_eq!((node.width, node.height), (150.0, 90.0));
}

#[test]
fn resize_clamps_to_one_grid_cell() {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 60.0, KIND_DEFAULT);
    ed.pointer_down(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(100.0, 100.0);

    // Drag the bottom-right handle far past the top-left anchor.
    drag(&mut ed, (150.0, 130.0), (52.0, 72.0));

    let node = ed.scene().node(a).unwrap();
    assert!(node.width >= 20.0);
    assert!(node.height >= 20.0);
}

// ============================================================================
// Cancel
// ============================================================================

#[test]
fn escape_mid_drag_restores_positions_and_history() {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 50.0, KIND_DEFAULT);

    ed.pointer_down(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(400.0, 300.0);
    ed.key_down(Key::Escape);

    let node = ed.scene().node(a).unwrap();
    assert_eq!((node.x, node.y), (100.0, 100.0));
    assert!(ed.is_idle());
    assert!(ed.undo().is_none());
}

#[test]
fn escape_mid_resize_restores_bounds() {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(100.0, 100.0, 100.0, 60.0, KIND_DEFAULT);
    ed.pointer_down(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_up(100.0, 100.0);

    ed.pointer_down(150.0, 130.0, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(300.0, 300.0);
    ed.key_down(Key::Escape);

    let node = ed.scene().node(a).unwrap();
    assert_eq!((node.width, node.height), (100.0, 60.0));
    assert!(ed.undo().is_none());
}
