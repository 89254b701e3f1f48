//! Editor configuration.
//!
//! Every tunable constant the engine uses lives in [`EditorConfig`], which is
//! built once and handed to [`Editor`](crate::Editor) at construction. There
//! is no global state; components that need a constant receive the config (or
//! the individual value) explicitly.

/// Color palette consumed by external render passes.
///
/// The engine never interprets these values; they are opaque color strings
/// (typically `#rrggbb`) forwarded to node-kind renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: String,
    pub grid_line: String,
    pub node_fill: String,
    pub node_border: String,
    pub node_title: String,
    pub edge: String,
    pub selection: String,
    pub group_fill: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#1e1e1e".into(),
            grid_line: "#2a2a2a".into(),
            node_fill: "#2d2d30".into(),
            node_border: "#3f3f46".into(),
            node_title: "#d4d4d4".into(),
            edge: "#9a9a9a".into(),
            selection: "#4f9cf9".into(),
            group_fill: "#25252a".into(),
        }
    }
}

/// All engine constants in one place.
///
/// # Example
///
/// ```
/// use node_canvas::EditorConfig;
///
/// let config = EditorConfig {
///     grid_size: 16.0,
///     ..EditorConfig::default()
/// };
/// assert_eq!(config.grid_size, 16.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Distance between a node's border and its sockets, in world units.
    pub socket_clearance: f32,
    /// Grid cell size in world units. Also the minimum node width/height
    /// after a resize.
    pub grid_size: f32,
    /// Maximum distance at which an object-snap edge attracts a dragged
    /// node edge, per axis.
    pub snap_threshold: f32,
    /// Whether dragged/resized coordinates snap to the grid.
    pub grid_snap: bool,
    /// Whether dragged/resized coordinates snap to other nodes' edges.
    /// Takes precedence over grid snap on any axis where it applies.
    pub object_snap: bool,
    /// Gap left between an edge path's terminal point and the target
    /// socket, so an arrowhead marker never overlaps the node.
    pub arrow_gap: f32,
    /// Length of the straight lead-out a bezier path takes from each
    /// socket before curving.
    pub bezier_lead: f32,
    /// Control-point offset for bezier paths, along the socket normal.
    pub bezier_handle: f32,
    /// Zoom bounds; zoom requests outside this range are clamped.
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Hit radius for sockets, in world units.
    pub socket_hit_radius: f32,
    /// Hit radius for edge waypoints.
    pub waypoint_hit_radius: f32,
    /// Side length of the square resize handles on a selected node.
    pub resize_handle_size: f32,
    /// Maximum pointer distance at which an edge counts as hovered.
    pub edge_hover_distance: f32,
    /// Samples per bezier segment when flattening a path for hit tests.
    pub edge_hit_samples: usize,
    /// Maximum number of undo entries retained.
    pub history_limit: usize,
    pub theme: Theme,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            socket_clearance: 10.0,
            grid_size: 20.0,
            snap_threshold: 8.0,
            grid_snap: true,
            object_snap: true,
            arrow_gap: 8.0,
            bezier_lead: 12.0,
            bezier_handle: 60.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
            socket_hit_radius: 10.0,
            waypoint_hit_radius: 8.0,
            resize_handle_size: 10.0,
            edge_hover_distance: 6.0,
            edge_hit_samples: 16,
            history_limit: 100,
            theme: Theme::default(),
        }
    }
}
