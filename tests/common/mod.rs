//! Shared test harness: logging setup, a standard two-node editor and a
//! recording persistence sink.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use node_canvas::{
    Editor, EditorConfig, Modifiers, NodeId, PersistError, PersistenceSink, PointerButton,
    Snapshot, SocketRef, KIND_DEFAULT, SOCKET_LEFT, SOCKET_RIGHT,
};

/// Initialize env_logger once per process; safe to call from every test.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// An editor with an identity viewport (screen == world at zoom 1) and
/// default config.
pub fn editor() -> Editor {
    init_logging();
    Editor::new(EditorConfig::default(), 800.0, 600.0)
}

/// The standard two-node layout: A centered at (0, 0) and B at (1000, 0),
/// both 300x200 with the default clearance of 10. A.right sits at
/// (160, 0) and B.left at (840, 0).
pub fn two_node_editor() -> (Editor, NodeId, NodeId) {
    let mut ed = editor();
    let a = ed.scene_mut().add_node(0.0, 0.0, 300.0, 200.0, KIND_DEFAULT);
    let b = ed.scene_mut().add_node(1000.0, 0.0, 300.0, 200.0, KIND_DEFAULT);
    (ed, a, b)
}

/// Like [`two_node_editor`] with the nodes already connected
/// A.right -> B.left.
pub fn connected_editor() -> (Editor, NodeId, NodeId) {
    let (mut ed, a, b) = two_node_editor();
    ed.scene_mut().add_edge(
        SocketRef::new(a, SOCKET_RIGHT),
        SocketRef::new(b, SOCKET_LEFT),
        node_canvas::PathStyle::Straight,
    );
    (ed, a, b)
}

/// Run a full primary-button drag gesture through the input API.
pub fn drag(ed: &mut Editor, from: (f32, f32), to: (f32, f32)) {
    ed.pointer_down(from.0, from.1, PointerButton::Primary, Modifiers::NONE);
    ed.pointer_move(to.0, to.1);
    ed.pointer_up(to.0, to.1);
}

/// Persistence sink that records every snapshot it is handed.
#[derive(Default, Clone)]
pub struct RecordingSink {
    pub snapshots: Rc<RefCell<Vec<Snapshot>>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.snapshots.borrow().len()
    }
}

impl PersistenceSink for RecordingSink {
    fn persist(&mut self, snapshot: &Snapshot) -> Result<(), PersistError> {
        self.snapshots.borrow_mut().push(snapshot.clone());
        Ok(())
    }
}

/// Persistence sink that always fails, for availability tests.
pub struct FailingSink;

impl PersistenceSink for FailingSink {
    fn persist(&mut self, _snapshot: &Snapshot) -> Result<(), PersistError> {
        Err(PersistError::new("disk unavailable"))
    }
}
