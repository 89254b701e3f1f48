//! Stateless geometry over scene data.
//!
//! Socket placement, edge path generation (straight/step/bezier with
//! arrowhead-gap trimming), path flattening for hover tests, and the
//! segment-intersection test used by edge cutting. Path generation emits
//! SVG-style command strings (`M`/`L`/`C`), the interchange format the
//! external render pass consumes.

use crate::config::EditorConfig;
use crate::scene::{PathStyle, Point};

/// Closed-form socket positions for a node centered at (x, y).
///
/// Order: top, bottom, left, right — matching the socket index constants
/// in [`crate::scene`]. Each socket sits `clearance` outside the border.
pub fn socket_positions(x: f32, y: f32, width: f32, height: f32, clearance: f32) -> [Point; 4] {
    let hw = width / 2.0;
    let hh = height / 2.0;
    [
        Point::new(x, y - hh - clearance),
        Point::new(x, y + hh + clearance),
        Point::new(x - hw - clearance, y),
        Point::new(x + hw + clearance, y),
    ]
}

/// Outward unit normal for a socket index (top, bottom, left, right).
pub fn socket_normal(socket: usize) -> (f32, f32) {
    match socket {
        0 => (0.0, -1.0),
        1 => (0.0, 1.0),
        2 => (-1.0, 0.0),
        _ => (1.0, 0.0),
    }
}

/// Everything needed to generate one edge's path.
#[derive(Debug, Clone, Copy)]
pub struct EdgeGeometry<'a> {
    pub source: Point,
    pub source_socket: usize,
    pub target: Point,
    pub target_socket: usize,
    pub style: PathStyle,
    pub points: &'a [Point],
}

/// One piece of a generated path.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PathSeg {
    Line(Point, Point),
    Cubic(Point, Point, Point, Point),
}

impl PathSeg {
    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(a, _) => a,
            PathSeg::Cubic(a, _, _, _) => a,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(_, b) => b,
            PathSeg::Cubic(_, _, _, b) => b,
        }
    }
}

fn eval_cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    Point::new(
        mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
        mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
    )
}

/// Shorten the final segment of a polyline by `gap` along its direction.
/// A gap longer than the final segment collapses it onto its start.
fn trim_polyline(points: &mut Vec<Point>, gap: f32) {
    if gap <= 0.0 || points.len() < 2 {
        return;
    }
    let last = points[points.len() - 1];
    let prev = points[points.len() - 2];
    let dx = last.x - prev.x;
    let dy = last.y - prev.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return;
    }
    let trim = gap.min(len);
    let n = points.len();
    points[n - 1] = Point::new(last.x - dx / len * trim, last.y - dy / len * trim);
}

fn straight_segments(geo: &EdgeGeometry, arrow_gap: f32) -> Vec<PathSeg> {
    let mut pts = Vec::with_capacity(geo.points.len() + 2);
    pts.push(geo.source);
    pts.extend_from_slice(geo.points);
    pts.push(geo.target);
    trim_polyline(&mut pts, arrow_gap);
    pts.windows(2).map(|w| PathSeg::Line(w[0], w[1])).collect()
}

fn step_segments(geo: &EdgeGeometry, arrow_gap: f32) -> Vec<PathSeg> {
    let mut anchors = Vec::with_capacity(geo.points.len() + 2);
    anchors.push(geo.source);
    anchors.extend_from_slice(geo.points);
    anchors.push(geo.target);

    // Orthogonal run between each anchor pair, breaking at the horizontal
    // midpoint.
    let mut pts: Vec<Point> = vec![anchors[0]];
    for w in anchors.windows(2) {
        let (p, q) = (w[0], w[1]);
        let mid_x = (p.x + q.x) / 2.0;
        for candidate in [Point::new(mid_x, p.y), Point::new(mid_x, q.y), q] {
            let last = *pts.last().unwrap();
            if (candidate.x - last.x).abs() > f32::EPSILON
                || (candidate.y - last.y).abs() > f32::EPSILON
            {
                pts.push(candidate);
            }
        }
    }
    trim_polyline(&mut pts, arrow_gap);
    pts.windows(2).map(|w| PathSeg::Line(w[0], w[1])).collect()
}

fn bezier_segments(geo: &EdgeGeometry, config: &EditorConfig) -> Vec<PathSeg> {
    let (nsx, nsy) = socket_normal(geo.source_socket);
    let (ntx, nty) = socket_normal(geo.target_socket);
    let lead = config.bezier_lead;
    let handle = config.bezier_handle;

    let lead_src = Point::new(geo.source.x + nsx * lead, geo.source.y + nsy * lead);
    let lead_tgt = Point::new(geo.target.x + ntx * lead, geo.target.y + nty * lead);

    // Anchor chain the cubic segments run through.
    let mut anchors = Vec::with_capacity(geo.points.len() + 2);
    anchors.push(lead_src);
    anchors.extend_from_slice(geo.points);
    anchors.push(lead_tgt);

    let mut segs = vec![PathSeg::Line(geo.source, lead_src)];

    for i in 0..anchors.len() - 1 {
        let a = anchors[i];
        let b = anchors[i + 1];

        // Outgoing handle of `a`: fixed-length along the source normal at
        // the lead anchor, midpoint-tangent continuation at a waypoint.
        let cp1 = if i == 0 {
            Point::new(a.x + nsx * handle, a.y + nsy * handle)
        } else {
            let prev = anchors[i - 1];
            Point::new(a.x + 0.5 * (a.x - prev.x), a.y + 0.5 * (a.y - prev.y))
        };
        // Incoming handle of `b`, mirrored.
        let cp2 = if i == anchors.len() - 2 {
            Point::new(b.x + ntx * handle, b.y + nty * handle)
        } else {
            let next = anchors[i + 2];
            Point::new(b.x - 0.5 * (next.x - b.x), b.y - 0.5 * (next.y - b.y))
        };
        segs.push(PathSeg::Cubic(a, cp1, cp2, b));
    }

    // Straight lead-in toward the target, stopping arrow_gap short. The
    // final tangent is the target normal, so the gap is applied along it.
    let gap = config.arrow_gap.min(lead);
    let terminal = Point::new(geo.target.x + ntx * gap, geo.target.y + nty * gap);
    segs.push(PathSeg::Line(lead_tgt, terminal));
    segs
}

fn build_segments(geo: &EdgeGeometry, config: &EditorConfig) -> Vec<PathSeg> {
    match geo.style {
        PathStyle::Straight => straight_segments(geo, config.arrow_gap),
        PathStyle::Step => step_segments(geo, config.arrow_gap),
        PathStyle::Bezier => bezier_segments(geo, config),
    }
}

/// Generate the SVG path command string for an edge.
///
/// The terminal point stops `arrow_gap` short of the true target socket
/// along the final tangent, so an arrowhead marker never overlaps the node.
///
/// # Returns
/// SVG path command string (e.g. `"M 160 0 L 832 0"`).
pub fn generate_edge_path(geo: &EdgeGeometry, config: &EditorConfig) -> String {
    let segs = build_segments(geo, config);
    let Some(first) = segs.first() else {
        return String::new();
    };
    let mut out = format!("M {} {}", first.start().x, first.start().y);
    for seg in &segs {
        match *seg {
            PathSeg::Line(_, b) => {
                out.push_str(&format!(" L {} {}", b.x, b.y));
            }
            PathSeg::Cubic(_, c1, c2, b) => {
                out.push_str(&format!(
                    " C {} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, b.x, b.y
                ));
            }
        }
    }
    out
}

/// The rendered path as a sampled polyline, for hover hit-testing.
///
/// Cubic segments are sampled `config.edge_hit_samples` times; lines
/// contribute their endpoints.
pub fn flatten_edge_path(geo: &EdgeGeometry, config: &EditorConfig) -> Vec<Point> {
    let segs = build_segments(geo, config);
    let mut pts = Vec::new();
    for seg in &segs {
        if pts.is_empty() {
            pts.push(seg.start());
        }
        match *seg {
            PathSeg::Line(_, b) => pts.push(b),
            PathSeg::Cubic(p0, c1, c2, p3) => {
                let samples = config.edge_hit_samples.max(1);
                for i in 1..=samples {
                    let t = i as f32 / samples as f32;
                    pts.push(eval_cubic(p0, c1, c2, p3, t));
                }
            }
        }
    }
    pts
}

/// The full unshortened polyline socket → waypoints → socket.
///
/// Cut-stroke tests run against this regardless of path style, so a cut
/// lands wherever the user sees the edge's logical span.
pub fn edge_polyline(source: Point, points: &[Point], target: Point) -> Vec<Point> {
    let mut pts = Vec::with_capacity(points.len() + 2);
    pts.push(source);
    pts.extend_from_slice(points);
    pts.push(target);
    pts
}

/// Minimum distance from a point to a polyline.
pub fn distance_to_polyline(x: f32, y: f32, pts: &[Point]) -> f32 {
    let mut min_sq = f32::MAX;
    for w in pts.windows(2) {
        let d = distance_to_segment_sq(x, y, w[0], w[1]);
        if d < min_sq {
            min_sq = d;
        }
    }
    if pts.len() == 1 {
        let dx = x - pts[0].x;
        let dy = y - pts[0].y;
        min_sq = dx * dx + dy * dy;
    }
    min_sq.sqrt()
}

fn distance_to_segment_sq(x: f32, y: f32, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let apx = x - a.x;
    let apy = y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq < f32::EPSILON {
        return apx * apx + apy * apy;
    }
    let t = ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * abx;
    let cy = a.y + t * aby;
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy
}

/// Orientation of the ordered triple (a, b, c): 0 collinear, 1 clockwise,
/// 2 counterclockwise.
fn orientation(a: Point, b: Point, c: Point) -> i32 {
    let v = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if v.abs() < f32::EPSILON {
        0
    } else if v > 0.0 {
        1
    } else {
        2
    }
}

/// For collinear a, b, c: does b lie on segment ac?
fn on_segment(a: Point, b: Point, c: Point) -> bool {
    b.x <= a.x.max(c.x) && b.x >= a.x.min(c.x) && b.y <= a.y.max(c.y) && b.y >= a.y.min(c.y)
}

/// Proper segment intersection test, orientation based, including the
/// collinear-overlap cases.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p3, p2))
        || (o2 == 0 && on_segment(p1, p4, p2))
        || (o3 == 0 && on_segment(p3, p1, p4))
        || (o4 == 0 && on_segment(p3, p2, p4))
}

/// True if any consecutive pair of stroke points crosses any segment of
/// the polyline.
pub fn stroke_intersects_polyline(stroke: &[Point], polyline: &[Point]) -> bool {
    for s in stroke.windows(2) {
        for e in polyline.windows(2) {
            if segments_intersect(s[0], s[1], e[0], e[1]) {
                return true;
            }
        }
    }
    false
}
