//! Flat-pattern geometry
//!
//! Plain data produced by the template builders: points, segments on
//! layers, bounding boxes, dimension labels and the [`GeometryResult`]
//! that bundles them. Coordinates are millimeters with the origin at the
//! top-left of the layout and y growing downwards.

use lyon::geom::{point, vector, Angle, ArcFlags, SvgArc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Chord tolerance used when arcs are approximated by lines.
pub const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.05;

/// Tolerance for treating two coordinates as the same point.
pub const POINT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn approx_eq(&self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Rounded coordinate key: x and y in thousandths of a millimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexKey(pub i64, pub i64);

impl VertexKey {
    pub fn of(p: Point) -> Self {
        Self((p.x * 1000.0).round() as i64, (p.y * 1000.0).round() as i64)
    }
}

/// One drawing command of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    /// Elliptical arc, SVG semantics, no axis rotation.
    ArcTo {
        rx: f64,
        ry: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

impl PathCommand {
    pub fn end_point(&self) -> Option<Point> {
        match self {
            Self::MoveTo { to } | Self::LineTo { to } | Self::ArcTo { to, .. } => Some(*to),
            Self::Close => None,
        }
    }

    fn map_point(self, f: &mut impl FnMut(Point) -> Point) -> Self {
        match self {
            Self::MoveTo { to } => Self::MoveTo { to: f(to) },
            Self::LineTo { to } => Self::LineTo { to: f(to) },
            Self::ArcTo {
                rx,
                ry,
                large_arc,
                sweep,
                to,
            } => Self::ArcTo {
                rx,
                ry,
                large_arc,
                sweep,
                to: f(to),
            },
            Self::Close => Self::Close,
        }
    }
}

/// A drawing primitive on one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Line { from: Point, to: Point },
    Rect { x: f64, y: f64, w: f64, h: f64 },
    /// Closed polygon; the last point connects back to the first.
    Polygon { points: Vec<Point> },
    Path { commands: Vec<PathCommand> },
}

impl Segment {
    pub fn line(from: Point, to: Point) -> Self {
        Self::Line { from, to }
    }

    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::Rect { x, y, w, h }
    }

    /// Horizontal line from `x1` to `x2` at `y`.
    pub fn hline(x1: f64, x2: f64, y: f64) -> Self {
        Self::line(Point::new(x1, y), Point::new(x2, y))
    }

    /// Vertical line from `y1` to `y2` at `x`.
    pub fn vline(x: f64, y1: f64, y2: f64) -> Self {
        Self::line(Point::new(x, y1), Point::new(x, y2))
    }

    /// Every point that can be grabbed as a vertex.
    pub fn endpoints(&self) -> Vec<Point> {
        match self {
            Self::Line { from, to } => vec![*from, *to],
            Self::Rect { x, y, w, h } => vec![
                Point::new(*x, *y),
                Point::new(x + w, *y),
                Point::new(x + w, y + h),
                Point::new(*x, y + h),
            ],
            Self::Polygon { points } => points.clone(),
            Self::Path { commands } => commands.iter().filter_map(PathCommand::end_point).collect(),
        }
    }

    /// Whether the segment encloses an area.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Line { .. } => false,
            Self::Rect { .. } => true,
            Self::Polygon { points } => points.len() >= 3,
            Self::Path { commands } => {
                let mut start = None;
                let mut last = None;
                for command in commands {
                    match command {
                        PathCommand::MoveTo { to } => {
                            start = Some(*to);
                            last = Some(*to);
                        }
                        PathCommand::Close => return start.is_some(),
                        other => last = other.end_point(),
                    }
                }
                matches!((start, last), (Some(s), Some(l)) if commands.len() > 2 && s.approx_eq(l, POINT_EPSILON))
            }
        }
    }

    /// Straight pieces approximating the segment; arcs are flattened within `tolerance`.
    pub fn pieces(&self, tolerance: f64) -> Vec<(Point, Point)> {
        match self {
            Self::Line { from, to } => vec![(*from, *to)],
            Self::Rect { .. } | Self::Polygon { .. } => {
                let points = self.endpoints();
                (0..points.len())
                    .map(|i| (points[i], points[(i + 1) % points.len()]))
                    .collect()
            }
            Self::Path { commands } => {
                let mut out = Vec::new();
                let mut start: Option<Point> = None;
                let mut current: Option<Point> = None;
                for command in commands {
                    match *command {
                        PathCommand::MoveTo { to } => {
                            start = Some(to);
                            current = Some(to);
                        }
                        PathCommand::LineTo { to } => {
                            if let Some(from) = current {
                                out.push((from, to));
                            }
                            current = Some(to);
                        }
                        PathCommand::ArcTo {
                            rx,
                            ry,
                            large_arc,
                            sweep,
                            to,
                        } => {
                            if let Some(from) = current {
                                let arc = SvgArc {
                                    from: point(from.x, from.y),
                                    to: point(to.x, to.y),
                                    radii: vector(rx, ry),
                                    x_rotation: Angle::radians(0.0),
                                    flags: ArcFlags { large_arc, sweep },
                                };
                                flatten_arc(&arc, tolerance, &mut out);
                            }
                            current = Some(to);
                        }
                        PathCommand::Close => {
                            if let (Some(from), Some(to)) = (current, start) {
                                if !from.approx_eq(to, POINT_EPSILON) {
                                    out.push((from, to));
                                }
                            }
                            current = start;
                        }
                    }
                }
                out
            }
        }
    }

    pub fn bounds(&self, tolerance: f64) -> Option<BoundingBox> {
        let mut points = self.endpoints();
        for (a, b) in self.pieces(tolerance) {
            points.push(a);
            points.push(b);
        }
        BoundingBox::from_points(points)
    }

    /// SVG path data (`d` attribute) for the segment.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        match self {
            Self::Line { from, to } => {
                d.push_str(&format!("M {} {} L {} {}", num(from.x), num(from.y), num(to.x), num(to.y)));
            }
            Self::Rect { .. } | Self::Polygon { .. } => {
                for (i, p) in self.endpoints().iter().enumerate() {
                    let op = if i == 0 { "M" } else { " L" };
                    d.push_str(&format!("{} {} {}", op, num(p.x), num(p.y)));
                }
                d.push_str(" Z");
            }
            Self::Path { commands } => {
                for (i, command) in commands.iter().enumerate() {
                    if i > 0 {
                        d.push(' ');
                    }
                    match command {
                        PathCommand::MoveTo { to } => d.push_str(&format!("M {} {}", num(to.x), num(to.y))),
                        PathCommand::LineTo { to } => d.push_str(&format!("L {} {}", num(to.x), num(to.y))),
                        PathCommand::ArcTo {
                            rx,
                            ry,
                            large_arc,
                            sweep,
                            to,
                        } => d.push_str(&format!(
                            "A {} {} 0 {} {} {} {}",
                            num(*rx),
                            num(*ry),
                            u8::from(*large_arc),
                            u8::from(*sweep),
                            num(to.x),
                            num(to.y)
                        )),
                        PathCommand::Close => d.push('Z'),
                    }
                }
            }
        }
        d
    }

    /// Apply `f` to every vertex. A rectangle becomes a polygon when a corner
    /// leaves its axis-aligned shape.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Segment {
        match self {
            Self::Line { from, to } => Self::Line {
                from: f(*from),
                to: f(*to),
            },
            Self::Rect { .. } => {
                let points: Vec<Point> = self.endpoints().into_iter().map(&mut f).collect();
                let axis_aligned = points[0].y == points[1].y
                    && points[1].x == points[2].x
                    && points[2].y == points[3].y
                    && points[3].x == points[0].x;
                if axis_aligned {
                    Self::Rect {
                        x: points[0].x,
                        y: points[0].y,
                        w: points[1].x - points[0].x,
                        h: points[3].y - points[0].y,
                    }
                } else {
                    Self::Polygon { points }
                }
            }
            Self::Polygon { points } => Self::Polygon {
                points: points.iter().map(|p| f(*p)).collect(),
            },
            Self::Path { commands } => Self::Path {
                commands: commands.iter().map(|c| c.map_point(&mut f)).collect(),
            },
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Segment {
        self.map_points(|p| p.offset(dx, dy))
    }

    /// Whether any vertex lies within `tolerance` of `p`.
    pub fn touches(&self, p: Point, tolerance: f64) -> bool {
        self.endpoints().iter().any(|q| q.approx_eq(p, tolerance))
    }
}

fn flatten_arc(arc: &SvgArc<f64>, tolerance: f64, out: &mut Vec<(Point, Point)>) {
    let from = Point::new(arc.from.x, arc.from.y);
    let to = Point::new(arc.to.x, arc.to.y);
    if arc.is_straight_line() {
        out.push((from, to));
        return;
    }

    let start = out.len();
    let mut prev = from;
    for p in arc.to_arc().flattened(tolerance) {
        let next = Point::new(p.x, p.y);
        out.push((prev, next));
        prev = next;
    }
    if out.len() == start {
        out.push((from, to));
    } else if let Some(last) = out.last_mut() {
        // Pin the final piece to the exact end point.
        last.1 = to;
    }
}

/// Format a coordinate with at most three decimals.
pub fn num(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Radius limited to a third of the shorter adjoining edge.
pub fn clamp_radius(r: f64, a: f64, b: f64) -> f64 {
    r.min(a.min(b) / 3.0).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Full separation
    Cut,
    /// Fold line
    Crease,
    /// Partial cut
    Perforation,
    /// Non-physical print guide
    Bleed,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Cut, Layer::Crease, Layer::Perforation, Layer::Bleed];

    /// Layer name used in exported files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cut => "CUT",
            Self::Crease => "CREASE",
            Self::Perforation => "PERF",
            Self::Bleed => "BLEED",
        }
    }

    pub fn stroke_color(self) -> &'static str {
        match self {
            Self::Cut => "#FF0000",
            Self::Crease => "#00A0FF",
            Self::Perforation => "#FF7F00",
            Self::Bleed => "#00C000",
        }
    }

    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Cut => None,
            Self::Crease => Some("4 2"),
            Self::Perforation => Some("2 2"),
            Self::Bleed => Some("1 3"),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    pub fn expand(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(self.x - margin, self.y - margin, self.w + 2.0 * margin, self.h + 2.0 * margin)
    }

    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.w - other.w).abs() <= tolerance
            && (self.h - other.h).abs() <= tolerance
    }
}

/// Text annotation placed in layout coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Horizontal extent of one strip panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpan {
    pub x: f64,
    pub width: f64,
}

impl PanelSpan {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Vertical extent of the body (the walls between the closure flaps).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyBand {
    pub top: f64,
    pub height: f64,
}

impl BodyBand {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn middle(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub flat_width: f64,
    pub flat_height: f64,
    /// Shoulder between the tuck tongue and the lid edge, when the style has one.
    pub tongue_clearance: Option<f64>,
}

/// Output of a template builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryResult {
    pub bbox: BoundingBox,
    pub cut: Vec<Segment>,
    #[serde(rename = "score", alias = "crease")]
    pub crease: Vec<Segment>,
    pub perf: Vec<Segment>,
    pub bleed: Vec<Segment>,
    pub dims: Vec<DimensionLabel>,
    pub vertices: Vec<Point>,
    pub panels: Vec<PanelSpan>,
    pub body: BodyBand,
    pub metrics: LayoutMetrics,
}

impl GeometryResult {
    pub fn layer(&self, layer: Layer) -> &[Segment] {
        match layer {
            Layer::Cut => &self.cut,
            Layer::Crease => &self.crease,
            Layer::Perforation => &self.perf,
            Layer::Bleed => &self.bleed,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Segment> {
        match layer {
            Layer::Cut => &mut self.cut,
            Layer::Crease => &mut self.crease,
            Layer::Perforation => &mut self.perf,
            Layer::Bleed => &mut self.bleed,
        }
    }

    /// Physical segments (cut, crease, perforation) in index order.
    pub fn editable_segments(&self) -> impl Iterator<Item = (Layer, &Segment)> {
        [Layer::Cut, Layer::Crease, Layer::Perforation]
            .into_iter()
            .flat_map(move |layer| self.layer(layer).iter().map(move |s| (layer, s)))
    }

    /// The outer cut boundary.
    pub fn silhouette(&self) -> Option<&Segment> {
        self.cut.first()
    }

    /// Rebuild the deduplicated vertex list from the physical layers.
    pub fn refresh_vertices(&mut self) {
        let mut seen = HashSet::new();
        let mut vertices = Vec::new();
        for (_, segment) in self.editable_segments() {
            for p in segment.endpoints() {
                if seen.insert(VertexKey::of(p)) {
                    vertices.push(p);
                }
            }
        }
        self.vertices = vertices;
    }

    /// Recompute `bbox` from the physical layers.
    pub fn refresh_bbox(&mut self, tolerance: f64) {
        let bounds = self
            .editable_segments()
            .filter_map(|(_, s)| s.bounds(tolerance))
            .reduce(|a, b| a.union(&b));
        if let Some(bbox) = bounds {
            self.bbox = bbox;
        }
    }

    /// Replace the bleed guide with the bbox grown by `margin`.
    pub fn set_bleed(&mut self, margin: f64) {
        self.bleed.clear();
        if margin > 0.0 {
            let r = self.bbox.expand(margin);
            self.bleed.push(Segment::rect(r.x, r.y, r.w, r.h));
        }
    }

    /// Bounding box including the bleed guide.
    pub fn extent(&self) -> BoundingBox {
        self.bleed
            .iter()
            .filter_map(|s| s.bounds(DEFAULT_FLATTEN_TOLERANCE))
            .fold(self.bbox, |acc, b| acc.union(&b))
    }

    pub fn segment_count(&self) -> usize {
        self.cut.len() + self.crease.len() + self.perf.len()
    }
}
