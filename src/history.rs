//! Snapshot-based undo/redo.
//!
//! Entries are value-semantics deep copies of the scene content, taken
//! once per user gesture. Undo and redo move entries between the two
//! stacks and replace the live scene wholesale.

use log::info;

use crate::scene::{Scene, SceneState};

/// One undo/redo entry: a full scene copy tagged with an action label.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: String,
    pub state: SceneState,
}

#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Push a deep copy of the scene onto the undo stack and clear the
    /// redo stack. Called once at the start of each mutating gesture.
    pub fn snapshot(&mut self, scene: &Scene, label: &str) {
        self.push(scene.capture(), label);
    }

    /// Push an already-captured state. Used by gestures that mutate the
    /// scene before they know whether they will commit.
    pub fn push(&mut self, state: SceneState, label: &str) {
        self.undo_stack.push(HistoryEntry {
            label: label.to_string(),
            state,
        });
        self.redo_stack.clear();
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Drop the most recent snapshot without applying it. Used when a
    /// gesture that already snapshotted is cancelled.
    pub fn discard_last(&mut self) {
        self.undo_stack.pop();
    }

    /// Revert the scene to the previous snapshot, parking the current
    /// state on the redo stack. Returns the applied label, or `None`
    /// (with a logged notice) when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<String> {
        let entry = match self.undo_stack.pop() {
            Some(e) => e,
            None => {
                info!("nothing to undo");
                return None;
            }
        };
        self.redo_stack.push(HistoryEntry {
            label: entry.label.clone(),
            state: scene.capture(),
        });
        scene.restore(entry.state);
        Some(entry.label)
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self, scene: &mut Scene) -> Option<String> {
        let entry = match self.redo_stack.pop() {
            Some(e) => e,
            None => {
                info!("nothing to redo");
                return None;
            }
        };
        self.undo_stack.push(HistoryEntry {
            label: entry.label.clone(),
            state: scene.capture(),
        });
        scene.restore(entry.state);
        Some(entry.label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
