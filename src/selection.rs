//! Selection state: independent node and edge sets plus the range anchor.
//!
//! Node selection is a set of ids; edge selection a set of edge indices.
//! A plain click replaces both sets as a unit, modifier clicks merge or
//! toggle, and shift-click selects the contiguous span between the anchor
//! and the target in creation order.

use std::collections::BTreeSet;

use crate::scene::{NodeId, Point, Scene};
use crate::viewport::WorldRect;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<usize>,
    anchor: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    // === Accessors ===

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn contains_edge(&self, index: usize) -> bool {
        self.edges.contains(&index)
    }

    /// Selected node ids in id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Selected edge indices in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().copied()
    }

    pub fn node_vec(&self) -> Vec<NodeId> {
        self.nodes.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    // === Mutation ===

    /// Replace both sets with a single node; the node becomes the anchor.
    pub fn select_single(&mut self, id: NodeId) {
        self.nodes.clear();
        self.edges.clear();
        self.nodes.insert(id);
        self.anchor = Some(id);
    }

    /// Replace both sets with a single edge. The node anchor is kept so a
    /// later shift-click still ranges from the last node.
    pub fn select_single_edge(&mut self, index: usize) {
        self.nodes.clear();
        self.edges.clear();
        self.edges.insert(index);
    }

    /// Add or remove one node without disturbing the rest; the node
    /// becomes the new anchor either way.
    pub fn toggle_node(&mut self, id: NodeId) {
        if !self.nodes.remove(&id) {
            self.nodes.insert(id);
        }
        self.anchor = Some(id);
    }

    pub fn toggle_edge(&mut self, index: usize) {
        if !self.edges.remove(&index) {
            self.edges.insert(index);
        }
    }

    /// Replace the node selection with the contiguous inclusive span
    /// between the anchor and `target` in creation (id) order. The anchor
    /// is left unchanged. Without an anchor this degrades to a plain
    /// single select.
    pub fn select_range(&mut self, scene: &Scene, target: NodeId) {
        let anchor = match self.anchor {
            Some(a) if scene.node(a).is_some() => a,
            _ => {
                self.select_single(target);
                return;
            }
        };
        let (lo, hi) = if anchor <= target { (anchor, target) } else { (target, anchor) };
        self.nodes = scene.node_ids().filter(|&id| id >= lo && id <= hi).collect();
    }

    /// Replace both sets from a world-space rectangle: every node whose
    /// bounds intersect the rect, plus every edge whose own bounds
    /// intersect the rect or whose endpoint nodes are both selected.
    pub fn box_select(&mut self, scene: &Scene, rect: &WorldRect) {
        let rect = rect.normalized();
        self.nodes = scene
            .nodes()
            .filter(|n| n.bounds().intersects(&rect))
            .map(|n| n.id)
            .collect();
        self.edges.clear();
        for (index, edge) in scene.valid_edges() {
            let both_selected = self.nodes.contains(&edge.source.node)
                && self.nodes.contains(&edge.target.node);
            if both_selected || edge_bounds(scene, index).is_some_and(|b| b.intersects(&rect)) {
                self.edges.insert(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.anchor = None;
    }

    /// Drop references to nodes and edges that no longer exist. Called
    /// after any mutation that can remove scene content.
    pub fn retain_valid(&mut self, scene: &Scene) {
        self.nodes.retain(|id| scene.node(*id).is_some());
        let edge_count = scene.edges().len();
        self.edges.retain(|&i| i < edge_count);
        if self.anchor.is_some_and(|a| scene.node(a).is_none()) {
            self.anchor = None;
        }
    }
}

/// Axis-aligned bounds of an edge's unshortened polyline.
fn edge_bounds(scene: &Scene, index: usize) -> Option<WorldRect> {
    let edge = scene.edge(index)?;
    let source = scene.socket_position(edge.source)?;
    let target = scene.socket_position(edge.target)?;

    let mut min = Point::new(source.x.min(target.x), source.y.min(target.y));
    let mut max = Point::new(source.x.max(target.x), source.y.max(target.y));
    for p in &edge.points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(WorldRect::new(min.x, min.y, max.x - min.x, max.y - min.y))
}
