//! Grid and object snapping for node drags and resizes.
//!
//! Object snap attracts a moving node edge toward the x/y edges of
//! stationary nodes; grid snap rounds toward grid-size multiples. On any
//! axis where an object-snap candidate is within the threshold, it takes
//! precedence over grid snap on that axis.

use crate::config::EditorConfig;
use crate::scene::{NodeId, Scene};

/// Round a coordinate to the nearest grid multiple.
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// The x- and y-edge coordinates (min/center/max) of every stationary
/// node, collected once at drag start.
#[derive(Debug, Clone, Default)]
pub struct ObjectSnapTargets {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
}

impl ObjectSnapTargets {
    /// Collect targets from every node not in `exclude` (the set being
    /// dragged), in id order.
    pub fn collect(scene: &Scene, exclude: &[NodeId]) -> Self {
        let mut targets = ObjectSnapTargets::default();
        for node in scene.nodes() {
            if exclude.contains(&node.id) {
                continue;
            }
            let b = node.bounds();
            targets.xs.push(b.x);
            targets.xs.push(node.x);
            targets.xs.push(b.x + b.width);
            targets.ys.push(b.y);
            targets.ys.push(node.y);
            targets.ys.push(b.y + b.height);
        }
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() && self.ys.is_empty()
    }
}

/// Smallest correction that aligns one of `edges` with one of `targets`,
/// if any pair is within `threshold`. Ties keep the first candidate found.
fn best_delta(edges: &[f32], targets: &[f32], threshold: f32) -> Option<f32> {
    let mut best: Option<f32> = None;
    for &edge in edges {
        for &target in targets {
            let delta = target - edge;
            if delta.abs() > threshold {
                continue;
            }
            match best {
                Some(b) if delta.abs() >= b.abs() => {}
                _ => best = Some(delta),
            }
        }
    }
    best
}

/// Snap a candidate center position for a node of the given size.
///
/// Per axis: the node's min/center/max edge is attracted to the nearest
/// object target within the threshold; if none applies, the center falls
/// back to the grid.
pub fn resolve_position(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    targets: &ObjectSnapTargets,
    config: &EditorConfig,
) -> (f32, f32) {
    let mut out_x = x;
    let mut out_y = y;

    let object_dx = if config.object_snap {
        best_delta(
            &[x - width / 2.0, x, x + width / 2.0],
            &targets.xs,
            config.snap_threshold,
        )
    } else {
        None
    };
    match object_dx {
        Some(dx) => out_x += dx,
        None if config.grid_snap => out_x = snap_to_grid(x, config.grid_size),
        None => {}
    }

    let object_dy = if config.object_snap {
        best_delta(
            &[y - height / 2.0, y, y + height / 2.0],
            &targets.ys,
            config.snap_threshold,
        )
    } else {
        None
    };
    match object_dy {
        Some(dy) => out_y += dy,
        None if config.grid_snap => out_y = snap_to_grid(y, config.grid_size),
        None => {}
    }

    (out_x, out_y)
}

/// Snap a single moving edge coordinate (used while resizing).
pub fn resolve_coord(value: f32, axis_targets: &[f32], config: &EditorConfig) -> f32 {
    if config.object_snap {
        if let Some(delta) = best_delta(&[value], axis_targets, config.snap_threshold) {
            return value + delta;
        }
    }
    if config.grid_snap {
        return snap_to_grid(value, config.grid_size);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::KIND_DEFAULT;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    // ========================================================================
    // Grid snap
    // ========================================================================

    #[test]
    fn test_grid_snap_rounds_to_nearest_multiple() {
        assert_eq!(snap_to_grid(207.0, 20.0), 200.0);
        assert_eq!(snap_to_grid(198.0, 20.0), 200.0);
        assert_eq!(snap_to_grid(210.0, 20.0), 220.0);
        assert_eq!(snap_to_grid(-13.0, 20.0), -20.0);
    }

    #[test]
    fn test_grid_snap_zero_grid_is_identity() {
        assert_eq!(snap_to_grid(207.0, 0.0), 207.0);
    }

    #[test]
    fn test_resolve_position_grid_only() {
        // Grid 20, no nearby objects: (207, 198) snaps to (200, 200).
        let cfg = config();
        let targets = ObjectSnapTargets::default();
        let (x, y) = resolve_position(207.0, 198.0, 100.0, 50.0, &targets, &cfg);
        assert_eq!((x, y), (200.0, 200.0));
    }

    #[test]
    fn test_resolve_position_snap_disabled_passes_through() {
        let cfg = EditorConfig { grid_snap: false, object_snap: false, ..config() };
        let targets = ObjectSnapTargets::default();
        let (x, y) = resolve_position(207.0, 198.0, 100.0, 50.0, &targets, &cfg);
        assert_eq!((x, y), (207.0, 198.0));
    }

    // ========================================================================
    // Object snap
    // ========================================================================

    #[test]
    fn test_collect_skips_excluded_nodes() {
        let mut scene = Scene::new(10.0);
        let a = scene.add_node(0.0, 0.0, 100.0, 50.0, KIND_DEFAULT);
        let b = scene.add_node(300.0, 0.0, 100.0, 50.0, KIND_DEFAULT);

        let targets = ObjectSnapTargets::collect(&scene, &[a]);
        // Only node b contributes: min/center/max per axis.
        assert_eq!(targets.xs, vec![250.0, 300.0, 350.0]);
        assert_eq!(targets.ys, vec![-25.0, 0.0, 25.0]);
        let _ = b;
    }

    #[test]
    fn test_object_snap_beats_grid_snap() {
        let cfg = config();
        // A stationary right edge at x = 253; grid would say 260.
        let targets = ObjectSnapTargets { xs: vec![253.0], ys: vec![] };
        // Dragged node 100 wide, candidate center 207: left edge 157,
        // right edge 257 — right edge is 4 from the target, inside the
        // threshold of 8, so x snaps by +(-4)... target - edge = -4.
        let (x, y) = resolve_position(207.0, 198.0, 100.0, 50.0, &targets, &cfg);
        assert_eq!(x, 203.0);
        // y has no object candidate and falls back to the grid.
        assert_eq!(y, 200.0);
    }

    #[test]
    fn test_object_snap_outside_threshold_falls_back_to_grid() {
        let cfg = config();
        let targets = ObjectSnapTargets { xs: vec![500.0], ys: vec![500.0] };
        let (x, y) = resolve_position(207.0, 198.0, 100.0, 50.0, &targets, &cfg);
        assert_eq!((x, y), (200.0, 200.0));
    }

    #[test]
    fn test_object_snap_ties_keep_first_candidate() {
        let cfg = config();
        // Two targets equidistant from the center (edge value 100):
        // first-found wins.
        let targets = ObjectSnapTargets { xs: vec![104.0, 96.0], ys: vec![] };
        let (x, _) = resolve_position(100.0, 0.0, 0.0, 0.0, &targets, &cfg);
        assert_eq!(x, 104.0);
    }

    #[test]
    fn test_object_snap_picks_minimum_distance() {
        let cfg = config();
        let targets = ObjectSnapTargets { xs: vec![107.0, 102.0], ys: vec![] };
        let (x, _) = resolve_position(100.0, 0.0, 0.0, 0.0, &targets, &cfg);
        assert_eq!(x, 102.0);
    }

    // ========================================================================
    // Edge (resize) snapping
    // ========================================================================

    #[test]
    fn test_resolve_coord_object_then_grid() {
        let cfg = config();
        assert_eq!(resolve_coord(155.0, &[152.0], &cfg), 152.0);
        assert_eq!(resolve_coord(155.0, &[400.0], &cfg), 160.0);
    }
}
