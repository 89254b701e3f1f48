//! The scene data model: nodes, edges and group containment.
//!
//! Nodes live in an id-indexed arena ([`BTreeMap`] keyed by [`NodeId`]) so
//! iteration order is creation order — ids are assigned monotonically and
//! range selection is defined over that order. Edges are stored in a `Vec`
//! and addressed by index.
//!
//! All mutation goes through [`Scene`] methods. Invalid requests that arise
//! from ordinary exploratory interaction (self-loop edges, duplicate edges,
//! cyclic reparenting) are silent no-ops, never errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::socket_positions;
use crate::viewport::WorldRect;

/// Unique node identifier, assigned monotonically by the scene.
pub type NodeId = i32;

/// Node kind tag for plain content nodes.
pub const KIND_DEFAULT: &str = "default";
/// Node kind tag for container nodes that group children.
pub const KIND_GROUP: &str = "group";

/// Socket indices, in the order the socket array is laid out.
pub const SOCKET_TOP: usize = 0;
pub const SOCKET_BOTTOM: usize = 1;
pub const SOCKET_LEFT: usize = 2;
pub const SOCKET_RIGHT: usize = 3;

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Reference to one socket on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    #[serde(rename = "nodeId")]
    pub node: NodeId,
    #[serde(rename = "socketId")]
    pub socket: usize,
}

impl SocketRef {
    pub fn new(node: NodeId, socket: usize) -> Self {
        Self { node, socket }
    }
}

/// How an edge's path is generated between its sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    Straight,
    Step,
    #[default]
    Bezier,
}

/// A node on the canvas. Position is the center; sockets are cached world
/// positions derived purely from position, size and the scene's socket
/// clearance — never an independent source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: String,
    pub title: String,
    pub color: String,
    pub locked: bool,
    pub parent: Option<NodeId>,
    /// Child ids, ordered. Non-empty only for group kinds.
    pub children: Vec<NodeId>,
    pub sockets: [Point; 4],
}

impl Node {
    /// Axis-aligned bounds (position is the center).
    pub fn bounds(&self) -> WorldRect {
        WorldRect::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    pub fn is_group(&self) -> bool {
        self.kind == KIND_GROUP
    }
}

/// A directed connection between two sockets on distinct nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: SocketRef,
    pub target: SocketRef,
    pub style: PathStyle,
    /// User-placed waypoints the path passes through, in order.
    pub points: Vec<Point>,
}

impl Edge {
    pub fn new(source: SocketRef, target: SocketRef, style: PathStyle) -> Self {
        Self { source, target, style, points: Vec::new() }
    }

    /// True if this edge connects the same unordered socket pair.
    pub fn connects_pair(&self, a: SocketRef, b: SocketRef) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Deep copy of the mutable scene content, used by the history stacks and
/// restored wholesale on undo/redo.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
    pub id_counter: NodeId,
}

/// Owns all nodes, edges and group containment.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    id_counter: NodeId,
    socket_clearance: f32,
}

impl Scene {
    pub fn new(socket_clearance: f32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            id_counter: 0,
            socket_clearance,
        }
    }

    // === Accessors ===

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// All nodes in creation (id) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn edge_mut(&mut self, index: usize) -> Option<&mut Edge> {
        self.edges.get_mut(index)
    }

    pub fn id_counter(&self) -> NodeId {
        self.id_counter
    }

    pub fn socket_clearance(&self) -> f32 {
        self.socket_clearance
    }

    /// Edges whose endpoint nodes both exist, with their indices.
    ///
    /// An edge referencing a missing node is an invariant violation: fatal
    /// in debug builds, filtered from iteration in release so the
    /// interaction loop keeps running.
    pub fn valid_edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
        self.edges.iter().enumerate().filter(|(_, e)| {
            let ok = self.nodes.contains_key(&e.source.node) && self.nodes.contains_key(&e.target.node);
            debug_assert!(ok, "edge references missing node");
            ok
        })
    }

    /// World position of a socket, looked up from the cache.
    pub fn socket_position(&self, socket: SocketRef) -> Option<Point> {
        let node = self.nodes.get(&socket.node)?;
        node.sockets.get(socket.socket).copied()
    }

    // === Node mutation ===

    /// Create a node centered at (x, y) and return its id.
    pub fn add_node(&mut self, x: f32, y: f32, width: f32, height: f32, kind: &str) -> NodeId {
        self.id_counter += 1;
        let id = self.id_counter;
        let node = Node {
            id,
            x,
            y,
            width,
            height,
            kind: kind.to_string(),
            title: String::new(),
            color: String::new(),
            locked: false,
            parent: None,
            children: Vec::new(),
            sockets: socket_positions(x, y, width, height, self.socket_clearance),
        };
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, cascading to every touching edge. Children of a
    /// removed group are detached to the root, not deleted.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let node = match self.nodes.remove(&id) {
            Some(n) => n,
            None => return false,
        };
        self.edges
            .retain(|e| e.source.node != id && e.target.node != id);
        for child in &node.children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
            }
        }
        if let Some(parent) = node.parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != id);
            }
        }
        true
    }

    /// Move a node (and nothing else) to an absolute center position,
    /// recomputing its sockets.
    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.x = x;
            node.y = y;
        }
        self.recompute_sockets(id);
    }

    /// Resize a node around the given center, recomputing its sockets.
    pub fn set_bounds(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.x = x;
            node.y = y;
            node.width = width;
            node.height = height;
        }
        self.recompute_sockets(id);
    }

    /// Refresh the cached socket positions from position + size.
    pub fn recompute_sockets(&mut self, id: NodeId) {
        let clearance = self.socket_clearance;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.sockets = socket_positions(node.x, node.y, node.width, node.height, clearance);
        }
    }

    // === Edge mutation ===

    /// Add an edge between two sockets.
    ///
    /// Silent no-op (returns `false`) on self-loops, missing endpoints, and
    /// duplicates of an existing unordered socket pair.
    pub fn add_edge(&mut self, source: SocketRef, target: SocketRef, style: PathStyle) -> bool {
        if source.node == target.node {
            return false;
        }
        if !self.nodes.contains_key(&source.node) || !self.nodes.contains_key(&target.node) {
            return false;
        }
        if source.socket >= 4 || target.socket >= 4 {
            return false;
        }
        if self.edges.iter().any(|e| e.connects_pair(source, target)) {
            return false;
        }
        self.edges.push(Edge::new(source, target, style));
        true
    }

    /// Remove and return the edge at `index`.
    pub fn remove_edge(&mut self, index: usize) -> Option<Edge> {
        if index < self.edges.len() {
            Some(self.edges.remove(index))
        } else {
            None
        }
    }

    /// Re-insert an edge at a specific index (used to restore a cancelled
    /// rewire at its original position). Duplicate pairs are still rejected.
    pub fn insert_edge(&mut self, index: usize, edge: Edge) -> bool {
        if self
            .edges
            .iter()
            .any(|e| e.connects_pair(edge.source, edge.target))
        {
            return false;
        }
        let index = index.min(self.edges.len());
        self.edges.insert(index, edge);
        true
    }

    /// True if any edge already connects this unordered socket pair.
    pub fn has_edge_between(&self, a: SocketRef, b: SocketRef) -> bool {
        self.edges.iter().any(|e| e.connects_pair(a, b))
    }

    // === Group containment ===

    /// True if `ancestor` is an ancestor of `node` in the group forest.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Reparent a node into a group (or detach to the root with `None`).
    ///
    /// Rejected (returns `false`) when the target is not a group, when it
    /// would create a cycle (the group is the node itself or one of its
    /// descendants), or when either id is missing.
    pub fn set_parent(&mut self, id: NodeId, group: Option<NodeId>) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        if let Some(group_id) = group {
            if group_id == id || self.is_ancestor(id, group_id) {
                return false;
            }
            match self.nodes.get(&group_id) {
                Some(g) if g.is_group() => {}
                _ => return false,
            }
        }
        let old_parent = self.nodes.get(&id).and_then(|n| n.parent);
        if old_parent == group {
            return true;
        }
        if let Some(old) = old_parent {
            if let Some(p) = self.nodes.get_mut(&old) {
                p.children.retain(|&c| c != id);
            }
        }
        if let Some(group_id) = group {
            if let Some(g) = self.nodes.get_mut(&group_id) {
                g.children.push(id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = group;
        }
        true
    }

    /// The given roots plus every transitive descendant, breadth-first,
    /// without duplicates.
    pub fn subtree(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue: std::collections::VecDeque<NodeId> = roots.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if result.contains(&id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                result.push(id);
                queue.extend(node.children.iter().copied());
            }
        }
        result
    }

    /// Rigidly translate the given roots and all their transitive
    /// descendants by the same delta, recomputing sockets for each.
    pub fn move_subtree(&mut self, roots: &[NodeId], dx: f32, dy: f32) {
        for id in self.subtree(roots) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.x += dx;
                node.y += dy;
            }
            self.recompute_sockets(id);
        }
    }

    /// The deepest group whose bounds contain the point, excluding any node
    /// in `exclude` (typically the subtree being dropped). Ties at equal
    /// depth break toward the newest group.
    pub fn group_at(&self, x: f32, y: f32, exclude: &[NodeId]) -> Option<NodeId> {
        let mut best: Option<(usize, NodeId)> = None;
        for node in self.nodes.values() {
            if !node.is_group() || exclude.contains(&node.id) {
                continue;
            }
            if !node.bounds().contains(x, y) {
                continue;
            }
            let depth = self.depth(node.id);
            if best.map_or(true, |(d, id)| depth > d || (depth == d && node.id > id)) {
                best = Some((depth, node.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.nodes.get(&p).and_then(|n| n.parent);
        }
        depth
    }

    // === State capture / restore ===

    /// Deep copy of the mutable content, for history snapshots.
    pub fn capture(&self) -> SceneState {
        SceneState {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            id_counter: self.id_counter,
        }
    }

    /// Replace the live content wholesale (undo/redo, snapshot load).
    pub fn restore(&mut self, state: SceneState) {
        self.nodes = state.nodes;
        self.edges = state.edges;
        self.id_counter = state.id_counter;
    }
}
