//! The interaction state machine and the [`Editor`] facade that owns it.
//!
//! All pointer and keyboard input funnels through the editor, which
//! transitions among mutually exclusive interaction states and drives the
//! scene, selection, history and viewport. Each state owns its transient
//! scratch data and discards it on exit; every gesture can be cancelled
//! (Escape or an invalid release) and restores pre-gesture invariants.

use log::{debug, warn};

use crate::config::{EditorConfig, Theme};
use crate::geometry::{self, EdgeGeometry};
use crate::hit_test::{self, HitTarget, ResizeCorner};
use crate::history::History;
use crate::registry::KindRegistry;
use crate::scene::{
    Edge, NodeId, PathStyle, Point, Scene, SceneState, SocketRef, SOCKET_BOTTOM, SOCKET_LEFT,
    SOCKET_RIGHT, SOCKET_TOP,
};
use crate::selection::Selection;
use crate::snap::{self, ObjectSnapTargets};
use crate::snapshot::{self, PersistenceSink, Snapshot, SnapshotError};
use crate::viewport::{Viewport, WorldRect};

/// Pointer buttons the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, alt: false };
    pub const ALT: Modifiers = Modifiers { shift: false, alt: true };
}

/// Abstract key events the editor reacts to. The mapping from physical
/// keys is the embedding application's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    /// Held to arm edge-cut mode for the next primary drag.
    Cut,
}

/// One of the mutually exclusive interaction modes. Scratch data lives in
/// the variant and is discarded on exit.
enum InteractionState {
    Idle,
    PanningView {
        last_screen: (f32, f32),
    },
    DraggingNodes {
        pre: SceneState,
        snapshotted: bool,
        primary: NodeId,
        roots: Vec<NodeId>,
        grab_offset: (f32, f32),
        targets: ObjectSnapTargets,
    },
    ResizingNode {
        pre: SceneState,
        snapshotted: bool,
        node: NodeId,
        anchor: (f32, f32),
        corner: ResizeCorner,
        targets: ObjectSnapTargets,
    },
    BoxSelecting {
        start_world: (f32, f32),
        current_world: (f32, f32),
    },
    ConnectingEdge {
        source: SocketRef,
        pointer_world: (f32, f32),
    },
    RewiringEdge {
        pre: SceneState,
        original: Edge,
        original_index: usize,
        source: SocketRef,
        pointer_world: (f32, f32),
        moved: bool,
    },
    DraggingRoutingPoint {
        pre: SceneState,
        snapshotted: bool,
        edge: usize,
        point: usize,
    },
    CuttingEdges {
        stroke: Vec<Point>,
    },
}

impl InteractionState {
    fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::PanningView { .. } => "panning",
            InteractionState::DraggingNodes { .. } => "dragging-nodes",
            InteractionState::ResizingNode { .. } => "resizing",
            InteractionState::BoxSelecting { .. } => "box-selecting",
            InteractionState::ConnectingEdge { .. } => "connecting",
            InteractionState::RewiringEdge { .. } => "rewiring",
            InteractionState::DraggingRoutingPoint { .. } => "dragging-waypoint",
            InteractionState::CuttingEdges { .. } => "cutting",
        }
    }
}

/// The "create node here and connect" affordance offered when an edge
/// gesture is released over empty canvas.
pub struct PendingConnect {
    source: SocketRef,
    x: f32,
    y: f32,
    /// The removed edge and its index, present when this came from a
    /// rewire and dismissal must restore it.
    restore: Option<(Edge, usize)>,
    pre: SceneState,
    style: PathStyle,
}

impl PendingConnect {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn source(&self) -> SocketRef {
        self.source
    }
}

/// The editor engine: scene, viewport, selection, history, node-kind
/// registry and the interaction state machine, behind one input API.
///
/// # Example
///
/// ```
/// use node_canvas::{Editor, EditorConfig, Modifiers, PointerButton};
///
/// let mut editor = Editor::new(EditorConfig::default(), 800.0, 600.0);
/// let id = editor.add_node_at(100.0, 100.0, "default");
/// editor.pointer_down(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
/// editor.pointer_up(100.0, 100.0);
/// assert!(editor.selection().contains_node(id));
/// ```
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    viewport: Viewport,
    selection: Selection,
    history: History,
    registry: KindRegistry,
    state: InteractionState,
    pending_connect: Option<PendingConnect>,
    sink: Option<Box<dyn PersistenceSink>>,
    cut_armed: bool,
}

impl Editor {
    pub fn new(config: EditorConfig, screen_width: f32, screen_height: f32) -> Self {
        let viewport = Viewport::new(screen_width, screen_height, config.min_zoom, config.max_zoom);
        let scene = Scene::new(config.socket_clearance);
        let history = History::new(config.history_limit);
        Self {
            config,
            scene,
            viewport,
            selection: Selection::new(),
            history,
            registry: KindRegistry::new(),
            state: InteractionState::Idle,
            pending_connect: None,
            sink: None,
            cut_armed: false,
        }
    }

    // === Accessors ===

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct mutable scene access for programmatic (non-gesture)
    /// mutation. Bypasses history, selection upkeep and persistence.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut KindRegistry {
        &mut self.registry
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Current interaction mode name, for logging and debugging.
    pub fn mode(&self) -> &'static str {
        self.state.name()
    }

    pub fn pending_connect(&self) -> Option<&PendingConnect> {
        self.pending_connect.as_ref()
    }

    /// The live box-selection rectangle, while one is being drawn.
    pub fn selection_rect(&self) -> Option<WorldRect> {
        match &self.state {
            InteractionState::BoxSelecting { start_world, current_world } => Some(
                WorldRect::new(
                    start_world.0,
                    start_world.1,
                    current_world.0 - start_world.0,
                    current_world.1 - start_world.1,
                )
                .normalized(),
            ),
            _ => None,
        }
    }

    /// Register the persistence collaborator notified after each
    /// committed mutation.
    pub fn set_sink(&mut self, sink: Box<dyn PersistenceSink>) {
        self.sink = Some(sink);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
    }

    // === View control ===

    pub fn resize_screen(&mut self, width: f32, height: f32) {
        self.viewport.set_screen_size(width, height);
    }

    /// Zoom about a screen-space pivot; `factor > 1` zooms out.
    pub fn zoom_at_screen(&mut self, factor: f32, sx: f32, sy: f32) {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        self.viewport.zoom_at(factor, wx, wy);
    }

    // === Programmatic commands ===

    /// Create a node of the given kind centered at a world position, as
    /// one undoable action. The node is selected and the kind's
    /// `on_created` hook runs.
    pub fn add_node_at(&mut self, x: f32, y: f32, kind: &str) -> NodeId {
        self.history.snapshot(&self.scene, "add node");
        let (width, height) = self.registry.default_size(kind);
        let id = self.scene.add_node(x, y, width, height, kind);
        if let Some(node) = self.scene.node(id) {
            self.registry.handler(&node.kind).on_created(node);
        }
        self.selection.select_single(id);
        self.notify_persist();
        id
    }

    /// Delete the current selection (nodes and edges) as one undoable
    /// action. No-op on an empty selection.
    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.snapshot(&self.scene, "delete selection");

        let edge_indices: Vec<usize> = self.selection.edges().collect();
        for index in edge_indices.into_iter().rev() {
            self.scene.remove_edge(index);
        }
        let node_ids = self.selection.node_vec();
        for id in &node_ids {
            if let Some(node) = self.scene.node(*id) {
                self.registry.handler(&node.kind).on_removed(node);
            }
        }
        for id in node_ids {
            self.scene.remove_node(id);
        }
        self.selection.clear();
        self.notify_persist();
    }

    /// Insert a waypoint on an edge at the given world position, placed
    /// into the waypoint list at the nearest polyline segment.
    pub fn add_waypoint(&mut self, edge_index: usize, x: f32, y: f32) {
        let Some(edge) = self.scene.edge(edge_index) else {
            return;
        };
        let (Some(source), Some(target)) = (
            self.scene.socket_position(edge.source),
            self.scene.socket_position(edge.target),
        ) else {
            return;
        };
        let polyline = geometry::edge_polyline(source, &edge.points, target);
        let mut insert_at = 0;
        let mut best = f32::MAX;
        for (i, pair) in polyline.windows(2).enumerate() {
            let d = geometry::distance_to_polyline(x, y, pair);
            if d < best {
                best = d;
                insert_at = i;
            }
        }
        self.history.snapshot(&self.scene, "add waypoint");
        if let Some(edge) = self.scene.edge_mut(edge_index) {
            edge.points.insert(insert_at, Point::new(x, y));
        }
        self.notify_persist();
    }

    /// Revert to the previous history snapshot. Clears both selection
    /// sets and notifies persistence.
    pub fn undo(&mut self) -> Option<String> {
        let label = self.history.undo(&mut self.scene)?;
        self.selection.clear();
        self.notify_persist();
        Some(label)
    }

    pub fn redo(&mut self) -> Option<String> {
        let label = self.history.redo(&mut self.scene)?;
        self.selection.clear();
        self.notify_persist();
        Some(label)
    }

    // === Snapshot interchange ===

    /// Capture the scene in the interchange shape, carrying `tree`
    /// opaquely for the external browser.
    pub fn save_snapshot(&self, tree: Option<serde_json::Value>) -> Snapshot {
        snapshot::save(&self.scene, tree)
    }

    /// Replace the scene from a snapshot. On error the scene, selection
    /// and history are all left untouched.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        snapshot::load(&mut self.scene, snapshot)?;
        self.selection.clear();
        self.history.clear();
        self.state = InteractionState::Idle;
        self.pending_connect = None;
        Ok(())
    }

    // === Render interchange ===

    /// Draw commands for a node body, dispatched through its kind.
    pub fn render_node(&self, id: NodeId) -> Option<String> {
        let node = self.scene.node(id)?;
        Some(self.registry.handler(&node.kind).render(node, &self.config.theme))
    }

    /// SVG path commands for an edge.
    pub fn edge_path(&self, index: usize) -> Option<String> {
        let edge = self.scene.edge(index)?;
        let source = self.scene.socket_position(edge.source)?;
        let target = self.scene.socket_position(edge.target)?;
        Some(geometry::generate_edge_path(
            &EdgeGeometry {
                source,
                source_socket: edge.source.socket,
                target,
                target_socket: edge.target.socket,
                style: edge.style,
                points: &edge.points,
            },
            &self.config,
        ))
    }

    /// The live preview path while connecting or rewiring, ending at the
    /// pointer.
    pub fn preview_path(&self) -> Option<String> {
        let (source, pointer) = match &self.state {
            InteractionState::ConnectingEdge { source, pointer_world } => (*source, *pointer_world),
            InteractionState::RewiringEdge { source, pointer_world, .. } => {
                (*source, *pointer_world)
            }
            _ => return None,
        };
        let start = self.scene.socket_position(source)?;
        let end = Point::new(pointer.0, pointer.1);
        Some(geometry::generate_edge_path(
            &EdgeGeometry {
                source: start,
                source_socket: source.socket,
                target: end,
                target_socket: facing_socket(end, start),
                style: PathStyle::default(),
                points: &[],
            },
            &self.config,
        ))
    }

    /// Context-menu labels contributed by the node kind under the
    /// pointer, if any.
    pub fn context_menu_at(&self, sx: f32, sy: f32) -> Vec<String> {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        match hit_test::node_at(&self.scene, wx, wy) {
            Some(id) => self
                .scene
                .node(id)
                .map(|n| self.registry.handler(&n.kind).context_menu_items())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    // === Pointer input ===

    pub fn pointer_down(&mut self, sx: f32, sy: f32, button: PointerButton, modifiers: Modifiers) {
        if !self.is_idle() {
            return;
        }
        // A new gesture supersedes any parked connect affordance.
        self.dismiss_pending_connect();
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);

        match button {
            PointerButton::Middle => {
                self.state = InteractionState::PanningView { last_screen: (sx, sy) };
            }
            PointerButton::Secondary => {}
            PointerButton::Primary => {
                if self.cut_armed {
                    self.state = InteractionState::CuttingEdges {
                        stroke: vec![Point::new(wx, wy)],
                    };
                } else {
                    self.primary_down(wx, wy, modifiers);
                }
            }
        }
        debug!("pointer down -> {}", self.state.name());
    }

    fn primary_down(&mut self, wx: f32, wy: f32, modifiers: Modifiers) {
        match hit_test::hit_test(&self.scene, &self.selection, wx, wy, &self.config) {
            Some(HitTarget::Socket(source)) => {
                self.state = InteractionState::ConnectingEdge {
                    source,
                    pointer_world: (wx, wy),
                };
            }
            Some(HitTarget::ResizeHandle { node, corner }) => {
                let locked = self.scene.node(node).is_some_and(|n| n.locked);
                if locked {
                    return;
                }
                let Some(bounds) = self.scene.node(node).map(|n| n.bounds()) else {
                    return;
                };
                self.state = InteractionState::ResizingNode {
                    pre: self.scene.capture(),
                    snapshotted: false,
                    node,
                    anchor: corner.anchor(&bounds),
                    corner,
                    targets: ObjectSnapTargets::collect(&self.scene, &[node]),
                };
            }
            Some(HitTarget::Waypoint { edge, point }) => {
                self.state = InteractionState::DraggingRoutingPoint {
                    pre: self.scene.capture(),
                    snapshotted: false,
                    edge,
                    point,
                };
            }
            Some(HitTarget::Node(id)) => {
                if modifiers.shift {
                    self.selection.select_range(&self.scene, id);
                    return;
                }
                if modifiers.alt {
                    self.selection.toggle_node(id);
                    return;
                }
                if !self.selection.contains_node(id) {
                    self.selection.select_single(id);
                }
                self.begin_node_drag(id, wx, wy);
            }
            Some(HitTarget::Edge(index)) => {
                if modifiers.shift || modifiers.alt {
                    self.selection.toggle_edge(index);
                    return;
                }
                self.selection.select_single_edge(index);
                self.begin_rewire(index, wx, wy);
            }
            None => {
                if !modifiers.shift && !modifiers.alt {
                    self.selection.clear();
                }
                self.state = InteractionState::BoxSelecting {
                    start_world: (wx, wy),
                    current_world: (wx, wy),
                };
            }
        }
    }

    /// Set up a node drag: the selected, unlocked subtree roots move
    /// together; locked nodes stay put.
    fn begin_node_drag(&mut self, primary: NodeId, wx: f32, wy: f32) {
        if self.scene.node(primary).map_or(true, |n| n.locked) {
            return;
        }
        let roots: Vec<NodeId> = self
            .selection
            .nodes()
            .filter(|&id| {
                let Some(node) = self.scene.node(id) else {
                    return false;
                };
                if node.locked {
                    return false;
                }
                // Skip nodes whose selected ancestor already carries them.
                !self
                    .selection
                    .nodes()
                    .any(|other| other != id && self.scene.is_ancestor(other, id))
            })
            .collect();
        if roots.is_empty() {
            return;
        }
        let Some(node) = self.scene.node(primary) else {
            return;
        };
        let moving = self.scene.subtree(&roots);
        self.state = InteractionState::DraggingNodes {
            pre: self.scene.capture(),
            snapshotted: false,
            primary,
            grab_offset: (wx - node.x, wy - node.y),
            targets: ObjectSnapTargets::collect(&self.scene, &moving),
            roots,
        };
    }

    /// Detach an edge's target end and follow the pointer; the edge is
    /// removed from the model until the gesture commits or cancels.
    fn begin_rewire(&mut self, index: usize, wx: f32, wy: f32) {
        let pre = self.scene.capture();
        let Some(original) = self.scene.remove_edge(index) else {
            return;
        };
        self.selection.retain_valid(&self.scene);
        self.state = InteractionState::RewiringEdge {
            pre,
            source: original.source,
            original,
            original_index: index,
            pointer_world: (wx, wy),
            moved: false,
        };
    }

    pub fn pointer_move(&mut self, sx: f32, sy: f32) {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::PanningView { last_screen } => {
                let (lx, ly) = *last_screen;
                *last_screen = (sx, sy);
                self.viewport.pan_by(lx - sx, ly - sy);
            }
            InteractionState::DraggingNodes {
                pre,
                snapshotted,
                primary,
                roots,
                grab_offset,
                targets,
            } => {
                if !*snapshotted {
                    self.history.push(pre.clone(), "move nodes");
                    *snapshotted = true;
                }
                let Some(node) = self.scene.node(*primary) else {
                    return;
                };
                let (width, height) = (node.width, node.height);
                let (cur_x, cur_y) = (node.x, node.y);
                let candidate = (wx - grab_offset.0, wy - grab_offset.1);
                let (tx, ty) = snap::resolve_position(
                    candidate.0,
                    candidate.1,
                    width,
                    height,
                    targets,
                    &self.config,
                );
                self.scene.move_subtree(roots, tx - cur_x, ty - cur_y);
            }
            InteractionState::ResizingNode {
                pre,
                snapshotted,
                node,
                anchor,
                targets,
                ..
            } => {
                if !*snapshotted {
                    self.history.push(pre.clone(), "resize node");
                    *snapshotted = true;
                }
                let corner_x = snap::resolve_coord(wx, &targets.xs, &self.config);
                let corner_y = snap::resolve_coord(wy, &targets.ys, &self.config);
                let min = self.config.grid_size;

                let dx = corner_x - anchor.0;
                let dy = corner_y - anchor.1;
                let width = dx.abs().max(min);
                let height = dy.abs().max(min);
                let sign_x = if dx < 0.0 { -1.0 } else { 1.0 };
                let sign_y = if dy < 0.0 { -1.0 } else { 1.0 };
                let center_x = anchor.0 + sign_x * width / 2.0;
                let center_y = anchor.1 + sign_y * height / 2.0;
                self.scene.set_bounds(*node, center_x, center_y, width, height);
            }
            InteractionState::BoxSelecting { start_world, current_world } => {
                *current_world = (wx, wy);
                let rect = WorldRect::new(
                    start_world.0,
                    start_world.1,
                    wx - start_world.0,
                    wy - start_world.1,
                );
                self.selection.box_select(&self.scene, &rect);
            }
            InteractionState::ConnectingEdge { pointer_world, .. } => {
                *pointer_world = (wx, wy);
            }
            InteractionState::RewiringEdge { pointer_world, moved, .. } => {
                *pointer_world = (wx, wy);
                *moved = true;
            }
            InteractionState::DraggingRoutingPoint {
                pre,
                snapshotted,
                edge,
                point,
            } => {
                if !*snapshotted {
                    self.history.push(pre.clone(), "move waypoint");
                    *snapshotted = true;
                }
                if let Some(e) = self.scene.edge_mut(*edge) {
                    if let Some(p) = e.points.get_mut(*point) {
                        *p = Point::new(wx, wy);
                    }
                }
            }
            InteractionState::CuttingEdges { stroke } => {
                stroke.push(Point::new(wx, wy));
            }
        }
    }

    pub fn pointer_up(&mut self, sx: f32, sy: f32) {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        match state {
            InteractionState::Idle | InteractionState::PanningView { .. } => {}
            InteractionState::BoxSelecting { .. } => {}
            InteractionState::DraggingNodes {
                snapshotted,
                primary,
                roots,
                ..
            } => {
                if snapshotted {
                    self.finish_node_drag(primary, &roots);
                    self.notify_persist();
                }
            }
            InteractionState::ResizingNode { snapshotted, .. } => {
                if snapshotted {
                    self.notify_persist();
                }
            }
            InteractionState::DraggingRoutingPoint { snapshotted, .. } => {
                if snapshotted {
                    self.notify_persist();
                }
            }
            InteractionState::ConnectingEdge { source, .. } => {
                self.finish_connect(source, wx, wy);
            }
            InteractionState::RewiringEdge {
                pre,
                original,
                original_index,
                source,
                moved,
                ..
            } => {
                if moved {
                    self.finish_rewire(pre, original, original_index, source, wx, wy);
                } else {
                    // A plain click on the edge: put it back, selected.
                    self.scene.insert_edge(original_index, original);
                    self.selection.select_single_edge(original_index);
                }
            }
            InteractionState::CuttingEdges { stroke } => {
                self.finish_cut(&stroke);
            }
        }
        debug!("pointer up -> idle");
    }

    /// Drop-reparent: if the dragged node's center now lies inside a
    /// different group it joins it; outside every group it detaches.
    fn finish_node_drag(&mut self, primary: NodeId, roots: &[NodeId]) {
        let Some((x, y, parent)) = self.scene.node(primary).map(|n| (n.x, n.y, n.parent)) else {
            return;
        };
        let exclude = self.scene.subtree(roots);
        match self.scene.group_at(x, y, &exclude) {
            Some(group) if Some(group) != parent => {
                self.scene.set_parent(primary, Some(group));
            }
            None if parent.is_some() => {
                self.scene.set_parent(primary, None);
            }
            _ => {}
        }
    }

    fn finish_connect(&mut self, source: SocketRef, wx: f32, wy: f32) {
        if let Some(target) = hit_test::socket_at(&self.scene, wx, wy, self.config.socket_hit_radius)
        {
            if target.node != source.node && !self.scene.has_edge_between(source, target) {
                self.history.snapshot(&self.scene, "connect");
                self.scene.add_edge(source, target, PathStyle::default());
                self.notify_persist();
            }
            return;
        }
        if hit_test::node_at(&self.scene, wx, wy).is_some() {
            // Released on a node body but not a socket: plain cancel.
            return;
        }
        self.pending_connect = Some(PendingConnect {
            source,
            x: wx,
            y: wy,
            restore: None,
            pre: self.scene.capture(),
            style: PathStyle::default(),
        });
    }

    fn finish_rewire(
        &mut self,
        pre: SceneState,
        original: Edge,
        original_index: usize,
        source: SocketRef,
        wx: f32,
        wy: f32,
    ) {
        if let Some(target) = hit_test::socket_at(&self.scene, wx, wy, self.config.socket_hit_radius)
        {
            let valid = target.node != source.node
                && !self.scene.has_edge_between(source, target);
            if valid {
                self.history.push(pre, "rewire edge");
                if self.scene.add_edge(source, target, original.style) {
                    let index = self.scene.edges().len() - 1;
                    if let Some(e) = self.scene.edge_mut(index) {
                        e.points = original.points;
                    }
                }
                self.notify_persist();
            } else {
                self.scene.insert_edge(original_index, original);
            }
            return;
        }
        if hit_test::node_at(&self.scene, wx, wy).is_some() {
            self.scene.insert_edge(original_index, original);
            return;
        }
        let style = original.style;
        self.pending_connect = Some(PendingConnect {
            source,
            x: wx,
            y: wy,
            restore: Some((original, original_index)),
            pre,
            style,
        });
    }

    fn finish_cut(&mut self, stroke: &[Point]) {
        if stroke.len() < 2 {
            return;
        }
        let mut hits: Vec<usize> = Vec::new();
        for (index, edge) in self.scene.valid_edges() {
            let (Some(source), Some(target)) = (
                self.scene.socket_position(edge.source),
                self.scene.socket_position(edge.target),
            ) else {
                continue;
            };
            let polyline = geometry::edge_polyline(source, &edge.points, target);
            if geometry::stroke_intersects_polyline(stroke, &polyline) {
                hits.push(index);
            }
        }
        if hits.is_empty() {
            return;
        }
        self.history.snapshot(&self.scene, "cut edges");
        for index in hits.into_iter().rev() {
            self.scene.remove_edge(index);
        }
        self.selection.retain_valid(&self.scene);
        self.notify_persist();
    }

    // === Keyboard input ===

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Escape => self.cancel(),
            Key::Delete => {
                if self.is_idle() {
                    self.delete_selection();
                }
            }
            Key::Cut => self.cut_armed = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Cut {
            self.cut_armed = false;
        }
    }

    /// Abort the current gesture, restoring every pre-gesture invariant.
    /// With no gesture active, dismisses a pending connect affordance.
    pub fn cancel(&mut self) {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        match state {
            InteractionState::Idle => {
                self.dismiss_pending_connect();
            }
            InteractionState::PanningView { .. }
            | InteractionState::BoxSelecting { .. }
            | InteractionState::ConnectingEdge { .. }
            | InteractionState::CuttingEdges { .. } => {}
            InteractionState::DraggingNodes { pre, snapshotted, .. }
            | InteractionState::ResizingNode { pre, snapshotted, .. }
            | InteractionState::DraggingRoutingPoint { pre, snapshotted, .. } => {
                if snapshotted {
                    self.scene.restore(pre);
                    self.history.discard_last();
                }
            }
            InteractionState::RewiringEdge {
                original,
                original_index,
                ..
            } => {
                self.scene.insert_edge(original_index, original);
            }
        }
    }

    // === Pending connect ===

    /// Materialize the parked affordance: create a node of `kind` at the
    /// release position, connect it to the source socket (on the side
    /// facing it), and commit as one history entry.
    pub fn confirm_pending_connect(&mut self, kind: &str) -> Option<NodeId> {
        let pending = self.pending_connect.take()?;
        let label = if pending.restore.is_some() { "rewire edge" } else { "connect" };
        self.history.push(pending.pre, label);

        let (width, height) = self.registry.default_size(kind);
        let id = self.scene.add_node(pending.x, pending.y, width, height, kind);
        if let Some(node) = self.scene.node(id) {
            self.registry.handler(&node.kind).on_created(node);
        }
        let source_pos = self
            .scene
            .socket_position(pending.source)
            .unwrap_or(Point::new(pending.x, pending.y));
        let socket = facing_socket(Point::new(pending.x, pending.y), source_pos);
        self.scene.add_edge(pending.source, SocketRef::new(id, socket), pending.style);
        self.selection.select_single(id);
        self.notify_persist();
        Some(id)
    }

    /// Drop the parked affordance. A rewired edge goes back to its
    /// original index; a plain connect leaves no trace.
    pub fn dismiss_pending_connect(&mut self) {
        if let Some(pending) = self.pending_connect.take() {
            if let Some((edge, index)) = pending.restore {
                self.scene.insert_edge(index, edge);
            }
        }
    }

    fn notify_persist(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let snapshot = snapshot::save(&self.scene, None);
            if let Err(err) = sink.persist(&snapshot) {
                warn!("persistence sink failed: {err}");
            }
        }
    }
}

/// The socket of a node at `center` that faces toward `toward`, by
/// dominant axis.
fn facing_socket(center: Point, toward: Point) -> usize {
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            SOCKET_RIGHT
        } else {
            SOCKET_LEFT
        }
    } else if dy >= 0.0 {
        SOCKET_BOTTOM
    } else {
        SOCKET_TOP
    }
}
