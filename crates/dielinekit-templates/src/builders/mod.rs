//! Dieline builders
//!
//! Every style is laid out as a horizontal strip of body panels. Closure
//! flaps hang off the top and bottom edge of a panel, and glue flaps or end
//! tucks hang off the left or right edge of the strip. A flap is described
//! once in its own frame (`u` along the hinge, `v` away from the body) and
//! placed on any edge by a rotation, so the whole silhouette is traced as a
//! single clockwise path.

pub mod auto_bottom;
pub mod mailer;
pub mod pizza;
pub mod rsc;
pub mod sleeve;
pub mod snap_lock;
pub mod tuck_end;

use dielinekit_core::{
    BodyBand, BoundingBox, DielineError, GeometryResult, LayoutMetrics, PanelSpan, PathCommand,
    Point, Result, Segment,
};

/// Narrowest shoulder between a tuck tongue and the sides of its lid.
pub const TONGUE_SHOULDER_MM: f64 = 3.0;

/// Nominal corner radius of tuck tongues before clamping.
pub const TUCK_CORNER_RADIUS_MM: f64 = 6.0;

/// Reject a derived length that is not positive.
pub(crate) fn positive(name: &str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(DielineError::invalid_dimension(name, value))
    }
}

/// Tongue shoulder for a board: at least 3 mm and never below `2c + 2`, but
/// no more than a quarter of the lid so the tongue keeps half its width.
pub fn tongue_shoulder(lid: f64, caliper: f64) -> f64 {
    TONGUE_SHOULDER_MM.max(2.0 * caliper + 2.0).min(lid / 4.0)
}

/// Panel width including the wrap allowance of `k` calipers.
pub(crate) fn wrapped(width: f64, k: f64, caliper: f64) -> f64 {
    width + k * caliper
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    Line { u: f64, v: f64 },
    Arc { r: f64, sweep: bool, u: f64, v: f64 },
}

impl Step {
    fn end(&self) -> (f64, f64) {
        match *self {
            Step::Line { u, v } | Step::Arc { u, v, .. } => (u, v),
        }
    }
}

/// Outline of a flap from (0, 0) to (len, 0) in its own frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Flap {
    len: f64,
    steps: Vec<Step>,
    hinge: (f64, f64),
    creases: Vec<[(f64, f64); 2]>,
}

impl Flap {
    /// Straight-edged flap through `points`; the last point must be (len, 0).
    pub fn polyline(len: f64, points: &[(f64, f64)]) -> Self {
        Self {
            len,
            steps: points.iter().map(|&(u, v)| Step::Line { u, v }).collect(),
            hinge: (0.0, len),
            creases: Vec::new(),
        }
    }

    /// Trapezoid; `left` and `right` are the insets at the tip.
    pub fn tapered(len: f64, depth: f64, left: f64, right: f64) -> Self {
        Self::polyline(len, &[(left, depth), (len - right, depth), (len, 0.0)])
    }

    pub fn rect(len: f64, depth: f64) -> Self {
        Self::polyline(len, &[(0.0, depth), (len, depth), (len, 0.0)])
    }

    /// Lid of depth `lid` carrying a tongue of depth `tongue` with rounded corners.
    pub fn tuck(len: f64, lid: f64, tongue: f64, shoulder: f64, radius: f64) -> Self {
        let top = lid + tongue;
        let (a, b) = (shoulder, len - shoulder);
        let mut steps = Vec::new();
        if lid > 0.0 {
            steps.push(Step::Line { u: 0.0, v: lid });
        }
        steps.push(Step::Line { u: a, v: lid });
        if radius > 0.0 {
            steps.push(Step::Line { u: a, v: top - radius });
            steps.push(Step::Arc { r: radius, sweep: true, u: a + radius, v: top });
            steps.push(Step::Line { u: b - radius, v: top });
            steps.push(Step::Arc { r: radius, sweep: true, u: b, v: top - radius });
        } else {
            steps.push(Step::Line { u: a, v: top });
            steps.push(Step::Line { u: b, v: top });
        }
        steps.push(Step::Line { u: b, v: lid });
        steps.push(Step::Line { u: len, v: lid });
        steps.push(Step::Line { u: len, v: 0.0 });

        let mut flap = Self {
            len,
            steps,
            hinge: (0.0, len),
            creases: Vec::new(),
        };
        if lid > 0.0 {
            flap.creases.push([(a, lid), (b, lid)]);
        }
        flap
    }

    /// Rectangle with a centred tab standing proud of the tip.
    pub fn with_tab(len: f64, depth: f64, tab_width: f64, tab_depth: f64) -> Self {
        let a = (len - tab_width) / 2.0;
        let b = a + tab_width;
        Self::polyline(
            len,
            &[
                (0.0, depth),
                (a, depth),
                (a, depth + tab_depth),
                (b, depth + tab_depth),
                (b, depth),
                (len, depth),
                (len, 0.0),
            ],
        )
    }

    /// Rectangle with a centred slot cut in from the tip.
    pub fn with_slot(len: f64, depth: f64, slot_width: f64, slot_depth: f64) -> Self {
        let a = (len - slot_width) / 2.0;
        let b = a + slot_width;
        Self::polyline(
            len,
            &[
                (0.0, depth),
                (a, depth),
                (a, depth - slot_depth),
                (b, depth - slot_depth),
                (b, depth),
                (len, depth),
                (len, 0.0),
            ],
        )
    }

    /// Rectangular flap set back from the panel sides by `left` and `right`.
    pub fn inset(len: f64, depth: f64, left: f64, right: f64) -> Self {
        let mut flap = Self::polyline(
            len,
            &[
                (left, 0.0),
                (left, depth),
                (len - right, depth),
                (len - right, 0.0),
                (len, 0.0),
            ],
        );
        flap.hinge = (left, len - right);
        flap
    }

    pub fn with_crease(mut self, from: (f64, f64), to: (f64, f64)) -> Self {
        self.creases.push([from, to]);
        self
    }

    /// Greatest distance from the hinge.
    pub fn depth(&self) -> f64 {
        self.steps.iter().map(|s| s.end().1).fold(0.0, f64::max)
    }

    /// The same flap seen from the other end of its hinge.
    pub fn mirrored(&self) -> Self {
        let mut points = vec![(0.0, 0.0)];
        points.extend(self.steps.iter().map(Step::end));

        let mut steps = Vec::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate().rev() {
            let (u, v) = points[i];
            let (u, v) = (self.len - u, v);
            // Reversal and reflection each flip the arc direction.
            steps.push(match *step {
                Step::Line { .. } => Step::Line { u, v },
                Step::Arc { r, sweep, .. } => Step::Arc { r, sweep, u, v },
            });
        }

        Self {
            len: self.len,
            steps,
            hinge: (self.len - self.hinge.1, self.len - self.hinge.0),
            creases: self
                .creases
                .iter()
                .map(|[a, b]| [(self.len - a.0, a.1), (self.len - b.0, b.1)])
                .collect(),
        }
    }
}

/// Places flap coordinates on an edge of the strip.
#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: Point,
    along: (f64, f64),
    out: (f64, f64),
}

impl Frame {
    fn at(&self, u: f64, v: f64) -> Point {
        Point::new(
            self.origin.x + u * self.along.0 + v * self.out.0,
            self.origin.y + u * self.along.1 + v * self.out.1,
        )
    }
}

/// Accumulates the silhouette path, dropping zero-length moves.
struct Outline {
    start: Point,
    current: Point,
    commands: Vec<PathCommand>,
}

impl Outline {
    fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
            commands: vec![PathCommand::MoveTo { to: start }],
        }
    }

    fn line_to(&mut self, to: Point) {
        if to.approx_eq(self.current, 1e-9) {
            return;
        }
        self.commands.push(PathCommand::LineTo { to });
        self.current = to;
    }

    fn arc_to(&mut self, r: f64, sweep: bool, to: Point) {
        if to.approx_eq(self.current, 1e-9) {
            return;
        }
        self.commands.push(PathCommand::ArcTo {
            rx: r,
            ry: r,
            large_arc: false,
            sweep,
            to,
        });
        self.current = to;
    }

    fn flap(&mut self, frame: &Frame, flap: &Flap) {
        for step in &flap.steps {
            match *step {
                Step::Line { u, v } => self.line_to(frame.at(u, v)),
                Step::Arc { r, sweep, u, v } => self.arc_to(r, sweep, frame.at(u, v)),
            }
        }
    }

    fn finish(mut self) -> Segment {
        if matches!(self.commands.last(), Some(PathCommand::LineTo { to }) if to.approx_eq(self.start, 1e-9)) {
            self.commands.pop();
        }
        self.commands.push(PathCommand::Close);
        Segment::Path {
            commands: self.commands,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StripPanel {
    pub width: f64,
    pub top: Option<Flap>,
    pub bottom: Option<Flap>,
}

impl StripPanel {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            top: None,
            bottom: None,
        }
    }

    pub fn top(mut self, flap: Flap) -> Self {
        self.top = Some(flap);
        self
    }

    pub fn bottom(mut self, flap: Flap) -> Self {
        self.bottom = Some(flap);
        self
    }
}

/// Body panels of equal height plus the flaps hanging off them.
#[derive(Debug, Clone, Default)]
pub(crate) struct Strip {
    pub panels: Vec<StripPanel>,
    pub left: Option<Flap>,
    pub right: Option<Flap>,
    pub height: f64,
}

impl Strip {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    pub fn panel(mut self, panel: StripPanel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn left(mut self, flap: Flap) -> Self {
        self.left = Some(flap);
        self
    }

    pub fn right(mut self, flap: Flap) -> Self {
        self.right = Some(flap);
        self
    }

    /// Trace the silhouette and creases.
    pub fn render(&self) -> GeometryResult {
        let left_depth = self.left.as_ref().map_or(0.0, Flap::depth);
        let right_depth = self.right.as_ref().map_or(0.0, Flap::depth);
        let top_depth = self
            .panels
            .iter()
            .filter_map(|p| p.top.as_ref().map(Flap::depth))
            .fold(0.0, f64::max);
        let bottom_depth = self
            .panels
            .iter()
            .filter_map(|p| p.bottom.as_ref().map(Flap::depth))
            .fold(0.0, f64::max);

        let top = top_depth;
        let bottom = top + self.height;

        let mut spans = Vec::with_capacity(self.panels.len());
        let mut x = left_depth;
        for panel in &self.panels {
            spans.push(PanelSpan { x, width: panel.width });
            x += panel.width;
        }
        let (x0, x1) = (left_depth, x);

        let mut outline = Outline::new(Point::new(x0, top));
        let mut creases = Vec::new();
        let mut place = |outline: &mut Outline, frame: Frame, flap: Option<&Flap>, end: Point| match flap {
            Some(flap) => {
                outline.flap(&frame, flap);
                creases.push(Segment::line(frame.at(flap.hinge.0, 0.0), frame.at(flap.hinge.1, 0.0)));
                for [a, b] in &flap.creases {
                    creases.push(Segment::line(frame.at(a.0, a.1), frame.at(b.0, b.1)));
                }
            }
            None => outline.line_to(end),
        };

        for (span, panel) in spans.iter().zip(&self.panels) {
            let frame = Frame {
                origin: Point::new(span.x, top),
                along: (1.0, 0.0),
                out: (0.0, -1.0),
            };
            place(&mut outline, frame, panel.top.as_ref(), Point::new(span.right(), top));
        }

        let frame = Frame {
            origin: Point::new(x1, top),
            along: (0.0, 1.0),
            out: (1.0, 0.0),
        };
        place(&mut outline, frame, self.right.as_ref(), Point::new(x1, bottom));

        for (span, panel) in spans.iter().zip(&self.panels).rev() {
            let frame = Frame {
                origin: Point::new(span.right(), bottom),
                along: (-1.0, 0.0),
                out: (0.0, 1.0),
            };
            place(&mut outline, frame, panel.bottom.as_ref(), Point::new(span.x, bottom));
        }

        let frame = Frame {
            origin: Point::new(x0, bottom),
            along: (0.0, -1.0),
            out: (-1.0, 0.0),
        };
        place(&mut outline, frame, self.left.as_ref(), Point::new(x0, top));

        for span in spans.iter().skip(1) {
            creases.push(Segment::vline(span.x, top, bottom));
        }

        let flat_width = left_depth + (x1 - x0) + right_depth;
        let flat_height = top_depth + self.height + bottom_depth;

        let mut geometry = GeometryResult {
            bbox: BoundingBox::new(0.0, 0.0, flat_width, flat_height),
            cut: vec![outline.finish()],
            crease: creases,
            panels: spans,
            body: BodyBand {
                top,
                height: self.height,
            },
            metrics: LayoutMetrics {
                flat_width,
                flat_height,
                tongue_clearance: None,
            },
            ..Default::default()
        };
        geometry.refresh_vertices();
        geometry
    }
}

/// Glue flap along the strip's short edge, tapered at both ends.
pub(crate) fn glue_flap(height: f64, glue: f64) -> Flap {
    let taper = (glue * 0.5).min(height / 4.0);
    Flap::tapered(height, glue, taper, taper)
}
