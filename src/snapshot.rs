//! JSON snapshot interchange and the persistence collaborator seam.
//!
//! A [`Snapshot`] is the serialized shape external storage consumes and
//! supplies: `{nodes, edges, tree, idCounter}` with camelCase fields.
//! Loading validates the whole document first and replaces the live scene
//! only on success; a corrupt snapshot leaves the scene untouched.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::socket_positions;
use crate::scene::{Edge, Node, NodeId, PathStyle, Point, Scene, SceneState, SocketRef};

/// Why a snapshot failed to load.
#[derive(Debug)]
pub enum SnapshotError {
    /// The document is not valid JSON for the snapshot shape.
    Json(serde_json::Error),
    DuplicateNodeId(NodeId),
    MissingEdgeEndpoint(NodeId),
    InvalidSocketIndex(usize),
    SelfLoopEdge(NodeId),
    DuplicateEdge { source: NodeId, target: NodeId },
    MissingParent { node: NodeId, parent: NodeId },
    ParentNotGroup { node: NodeId, parent: NodeId },
    CyclicParentage(NodeId),
    /// `idCounter` is behind an existing node id; new ids would collide.
    IdCounterBehind { id_counter: NodeId, max_id: NodeId },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Json(e) => write!(f, "malformed snapshot JSON: {e}"),
            SnapshotError::DuplicateNodeId(id) => write!(f, "duplicate node id {id}"),
            SnapshotError::MissingEdgeEndpoint(id) => {
                write!(f, "edge references missing node {id}")
            }
            SnapshotError::InvalidSocketIndex(i) => write!(f, "socket index {i} out of range"),
            SnapshotError::SelfLoopEdge(id) => write!(f, "edge connects node {id} to itself"),
            SnapshotError::DuplicateEdge { source, target } => {
                write!(f, "duplicate edge between nodes {source} and {target}")
            }
            SnapshotError::MissingParent { node, parent } => {
                write!(f, "node {node} references missing parent {parent}")
            }
            SnapshotError::ParentNotGroup { node, parent } => {
                write!(f, "parent {parent} of node {node} is not a group")
            }
            SnapshotError::CyclicParentage(id) => {
                write!(f, "cyclic group parentage involving node {id}")
            }
            SnapshotError::IdCounterBehind { id_counter, max_id } => {
                write!(f, "idCounter {id_counter} is behind max node id {max_id}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

/// A persistence collaborator failure. Logged by the caller, never rolled
/// back into the in-memory scene.
#[derive(Debug)]
pub struct PersistError {
    pub message: String,
}

impl PersistError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "persistence failed: {}", self.message)
    }
}

impl std::error::Error for PersistError {}

/// Fire-and-forget consumer of committed snapshots. The core never waits
/// on it and a failure must not corrupt in-memory state.
pub trait PersistenceSink {
    fn persist(&mut self, snapshot: &Snapshot) -> Result<(), PersistError>;
}

/// Serialized node record. Sockets are derived state and not part of the
/// interchange shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: SocketRef,
    pub target: SocketRef,
    #[serde(rename = "type", default)]
    pub style: PathStyle,
    #[serde(default)]
    pub points: Vec<Point>,
}

/// The full interchange document. The `tree` field belongs to the
/// external file-tree browser and is carried opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub tree: Option<serde_json::Value>,
    pub id_counter: NodeId,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Snapshot, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Capture the scene as an interchange snapshot. Ids are preserved.
pub fn save(scene: &Scene, tree: Option<serde_json::Value>) -> Snapshot {
    Snapshot {
        nodes: scene
            .nodes()
            .map(|n| NodeRecord {
                id: n.id,
                x: n.x,
                y: n.y,
                width: n.width,
                height: n.height,
                kind: n.kind.clone(),
                title: n.title.clone(),
                color: n.color.clone(),
                locked: n.locked,
                parent: n.parent,
            })
            .collect(),
        edges: scene
            .valid_edges()
            .map(|(_, e)| EdgeRecord {
                source: e.source,
                target: e.target,
                style: e.style,
                points: e.points.clone(),
            })
            .collect(),
        tree,
        id_counter: scene.id_counter(),
    }
}

/// Validate a snapshot and replace the scene's content with it.
///
/// The whole document is validated up front; on any error the live scene
/// is left exactly as it was. Child lists are rebuilt from the parent
/// pointers in id order.
pub fn load(scene: &mut Scene, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let state = build_state(snapshot, scene.socket_clearance())?;
    scene.restore(state);
    Ok(())
}

fn build_state(snapshot: &Snapshot, clearance: f32) -> Result<SceneState, SnapshotError> {
    let mut nodes: BTreeMap<NodeId, Node> = BTreeMap::new();
    let mut max_id = 0;
    for record in &snapshot.nodes {
        let node = Node {
            id: record.id,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            kind: record.kind.clone(),
            title: record.title.clone(),
            color: record.color.clone(),
            locked: record.locked,
            parent: record.parent,
            children: Vec::new(),
            sockets: socket_positions(record.x, record.y, record.width, record.height, clearance),
        };
        if nodes.insert(record.id, node).is_some() {
            return Err(SnapshotError::DuplicateNodeId(record.id));
        }
        max_id = max_id.max(record.id);
    }
    if snapshot.id_counter < max_id {
        return Err(SnapshotError::IdCounterBehind {
            id_counter: snapshot.id_counter,
            max_id,
        });
    }

    // Parentage: parents must exist, be groups, and form a forest.
    for node in nodes.values() {
        if let Some(parent) = node.parent {
            let p = nodes.get(&parent).ok_or(SnapshotError::MissingParent {
                node: node.id,
                parent,
            })?;
            if !p.is_group() {
                return Err(SnapshotError::ParentNotGroup {
                    node: node.id,
                    parent,
                });
            }
        }
    }
    for start in nodes.keys().copied().collect::<Vec<_>>() {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(SnapshotError::CyclicParentage(start));
            }
            current = nodes.get(&id).and_then(|n| n.parent);
        }
    }
    let ids: Vec<NodeId> = nodes.keys().copied().collect();
    for id in ids {
        if let Some(parent) = nodes.get(&id).and_then(|n| n.parent) {
            if let Some(p) = nodes.get_mut(&parent) {
                p.children.push(id);
            }
        }
    }

    let mut edges: Vec<Edge> = Vec::with_capacity(snapshot.edges.len());
    for record in &snapshot.edges {
        for endpoint in [record.source, record.target] {
            if !nodes.contains_key(&endpoint.node) {
                return Err(SnapshotError::MissingEdgeEndpoint(endpoint.node));
            }
            if endpoint.socket >= 4 {
                return Err(SnapshotError::InvalidSocketIndex(endpoint.socket));
            }
        }
        if record.source.node == record.target.node {
            return Err(SnapshotError::SelfLoopEdge(record.source.node));
        }
        if edges.iter().any(|e| e.connects_pair(record.source, record.target)) {
            return Err(SnapshotError::DuplicateEdge {
                source: record.source.node,
                target: record.target.node,
            });
        }
        edges.push(Edge {
            source: record.source,
            target: record.target,
            style: record.style,
            points: record.points.clone(),
        });
    }

    Ok(SceneState {
        nodes,
        edges,
        id_counter: snapshot.id_counter,
    })
}
