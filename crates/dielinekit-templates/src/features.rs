//! Add-on features layered over a built dieline
//!
//! Features add cuts or perforations; crease topology is never touched.
//! The thumb notch is spliced into the silhouette so it stays a single
//! closed path.

use dielinekit_core::{
    clamp_radius, DielineError, GeometryResult, PanelSpan, PathCommand, Point, Result, Segment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rounded window cut, positioned from the top-left of a panel's body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub panel: usize,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub r: f64,
}

/// Half-ellipse finger notch in the top edge over a panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbNotch {
    pub panel: usize,
    pub width: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub window: Option<Window>,
    #[serde(default)]
    pub thumb_notch: Option<ThumbNotch>,
    #[serde(default)]
    pub zip_strip: bool,
}

impl Features {
    pub fn is_empty(&self) -> bool {
        self.window.is_none() && self.thumb_notch.is_none() && !self.zip_strip
    }
}

fn panel_span(geometry: &GeometryResult, feature: &str, panel: usize) -> Result<PanelSpan> {
    geometry.panels.get(panel).copied().ok_or_else(|| {
        DielineError::invalid_value(
            format!("{}.panel", feature),
            format!("panel {} out of range 0..{}", panel, geometry.panels.len()),
        )
    })
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DielineError::invalid_value(name, format!("must be positive, got {}", value)))
    }
}

/// Board left between a notch may bite and the crease beneath it.
pub const NOTCH_CREASE_MARGIN_MM: f64 = 2.0;

/// Distance from an edge at `y` down to the first horizontal crease that
/// crosses `left..right`, or to `floor` when none does.
fn room_below(creases: &[Segment], y: f64, left: f64, right: f64, floor: f64) -> f64 {
    creases
        .iter()
        .filter_map(|crease| match crease {
            Segment::Line { from, to }
                if (from.y - to.y).abs() < 1e-9
                    && from.y > y + 1e-9
                    && from.x.min(to.x) < right
                    && from.x.max(to.x) > left =>
            {
                Some(from.y)
            }
            _ => None,
        })
        .fold(floor, f64::min)
        - y
}

/// Rounded rectangle traced clockwise.
fn rounded_rect(x0: f64, y0: f64, w: f64, h: f64, r: f64) -> Segment {
    if r <= 0.0 {
        return Segment::rect(x0, y0, w, h);
    }
    let (x1, y1) = (x0 + w, y0 + h);
    let arc = |to: Point| PathCommand::ArcTo {
        rx: r,
        ry: r,
        large_arc: false,
        sweep: true,
        to,
    };
    Segment::Path {
        commands: vec![
            PathCommand::MoveTo { to: Point::new(x0 + r, y0) },
            PathCommand::LineTo { to: Point::new(x1 - r, y0) },
            arc(Point::new(x1, y0 + r)),
            PathCommand::LineTo { to: Point::new(x1, y1 - r) },
            arc(Point::new(x1 - r, y1)),
            PathCommand::LineTo { to: Point::new(x0 + r, y1) },
            arc(Point::new(x0, y1 - r)),
            PathCommand::LineTo { to: Point::new(x0, y0 + r) },
            arc(Point::new(x0 + r, y0)),
            PathCommand::Close,
        ],
    }
}

pub fn add_window(geometry: &mut GeometryResult, window: &Window) -> Result<()> {
    let span = panel_span(geometry, "window", window.panel)?;
    require_positive("window.w", window.w)?;
    require_positive("window.h", window.h)?;
    require_positive("window.x", window.x)?;
    require_positive("window.y", window.y)?;
    if window.x + window.w >= span.width || window.y + window.h >= geometry.body.height {
        return Err(DielineError::invalid_value(
            "window",
            format!(
                "{}x{} window at ({}, {}) does not fit inside the {:.3}x{:.3} panel",
                window.w, window.h, window.x, window.y, span.width, geometry.body.height
            ),
        ));
    }

    let r = clamp_radius(window.r, window.w, window.h);
    geometry.cut.push(rounded_rect(
        span.x + window.x,
        geometry.body.top + window.y,
        window.w,
        window.h,
        r,
    ));
    Ok(())
}

pub fn add_thumb_notch(geometry: &mut GeometryResult, notch: &ThumbNotch) -> Result<()> {
    let span = panel_span(geometry, "thumb_notch", notch.panel)?;
    require_positive("thumb_notch.width", notch.width)?;
    require_positive("thumb_notch.depth", notch.depth)?;
    if notch.width >= span.width || notch.depth >= geometry.body.height {
        return Err(DielineError::invalid_value(
            "thumb_notch",
            "notch is larger than the panel",
        ));
    }

    let half = notch.width / 2.0;
    let (left, right) = (span.center() - half, span.center() + half);

    let Some(Segment::Path { commands }) = geometry.cut.first_mut() else {
        return Err(DielineError::invalid_value("thumb_notch", "dieline has no silhouette"));
    };

    // Topmost horizontal edge that covers the notch span.
    let mut best: Option<(usize, f64, bool)> = None;
    let mut current: Option<Point> = None;
    for (i, command) in commands.iter().enumerate() {
        if let (Some(from), PathCommand::LineTo { to }) = (current, command) {
            let horizontal = (from.y - to.y).abs() < 1e-9;
            let covers = from.x.min(to.x) <= left + 1e-9 && from.x.max(to.x) >= right - 1e-9;
            if horizontal && covers && best.map_or(true, |(_, y, _)| from.y < y) {
                best = Some((i, from.y, from.x < to.x));
            }
        }
        current = command.end_point().or(current);
    }

    let Some((index, y, rightward)) = best else {
        return Err(DielineError::invalid_value(
            "thumb_notch",
            format!("no straight edge spans x {:.3}..{:.3}", left, right),
        ));
    };

    // On a flap the notch must stop short of the hinge.
    if y < geometry.body.top - 1e-9 {
        let room = room_below(&geometry.crease, y, left, right, geometry.body.top) - NOTCH_CREASE_MARGIN_MM;
        if notch.depth > room {
            return Err(DielineError::invalid_value(
                "thumb_notch",
                format!(
                    "depth {} reaches the crease below the edge at y {:.3} (at most {:.3})",
                    notch.depth,
                    y,
                    room.max(0.0)
                ),
            ));
        }
    }

    let (a, b) = if rightward { (left, right) } else { (right, left) };
    // The silhouette runs clockwise, so a counter-clockwise arc bites into the board.
    let splice = [
        PathCommand::LineTo { to: Point::new(a, y) },
        PathCommand::ArcTo {
            rx: half,
            ry: notch.depth,
            large_arc: false,
            sweep: false,
            to: Point::new(b, y),
        },
    ];
    commands.splice(index..index, splice);
    debug!(panel = notch.panel, x = span.center(), y, "thumb notch spliced");
    Ok(())
}

/// Perforation across every body panel at body mid-height.
pub fn add_zip_strip(geometry: &mut GeometryResult) {
    if let (Some(first), Some(last)) = (geometry.panels.first(), geometry.panels.last()) {
        let y = geometry.body.middle();
        geometry.perf.push(Segment::hline(first.x, last.right(), y));
    }
}

/// Apply every enabled feature and refresh the vertex list.
pub fn apply_features(geometry: &mut GeometryResult, features: &Features) -> Result<()> {
    if let Some(window) = &features.window {
        add_window(geometry, window)?;
    }
    if let Some(notch) = &features.thumb_notch {
        add_thumb_notch(geometry, notch)?;
    }
    if features.zip_strip {
        add_zip_strip(geometry);
    }
    geometry.refresh_vertices();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateStyle;

    fn sleeve() -> GeometryResult {
        let style = TemplateStyle::Sleeve;
        style.build(&style.default_parameters(), 0.5).unwrap()
    }

    #[test]
    fn test_window_inside_panel() {
        let mut geometry = sleeve();
        let window = Window {
            panel: 1,
            x: 10.0,
            y: 20.0,
            w: 60.0,
            h: 30.0,
            r: 50.0,
        };
        add_window(&mut geometry, &window).unwrap();
        assert_eq!(geometry.cut.len(), 2);
        let bounds = geometry.cut[1].bounds(0.01).unwrap();
        assert!((bounds.x - (120.5 + 10.0)).abs() < 1e-6);
        assert!((bounds.w - 60.0).abs() < 1e-6);
        // radius clamped to a third of the height
        assert!(geometry.cut[1].path_data().contains("A 10 10"));
    }

    #[test]
    fn test_window_must_fit() {
        let mut geometry = sleeve();
        let window = Window {
            panel: 0,
            x: 100.0,
            y: 20.0,
            w: 60.0,
            h: 30.0,
            r: 0.0,
        };
        assert!(add_window(&mut geometry, &window).is_err());
        let window = Window { panel: 5, x: 1.0, ..window };
        assert!(add_window(&mut geometry, &window).is_err());
    }

    #[test]
    fn test_thumb_notch_keeps_single_closed_silhouette() {
        let mut geometry = sleeve();
        let notch = ThumbNotch {
            panel: 0,
            width: 30.0,
            depth: 10.0,
        };
        add_thumb_notch(&mut geometry, &notch).unwrap();
        assert_eq!(geometry.cut.len(), 1);
        let silhouette = &geometry.cut[0];
        assert!(silhouette.is_closed());
        assert!(silhouette.path_data().contains("A 15 10 0 0 0"));
        // the notch dips into the board, not above it
        let bounds = silhouette.bounds(0.01).unwrap();
        assert!(bounds.y.abs() < 1e-9);
        let deepest = silhouette
            .pieces(0.01)
            .iter()
            .filter(|(a, _)| a.x > 45.0 && a.x < 75.0)
            .map(|(a, _)| a.y)
            .fold(0.0, f64::max);
        assert!(deepest > 9.0);
    }

    #[test]
    fn test_thumb_notch_stops_short_of_flap_creases() {
        let style = TemplateStyle::StraightTuckEnd;
        let base = style.build(&style.default_parameters(), 0.3).unwrap();
        // The dust flap on panel 1 tips at y 9, its hinge sits at y 24.
        assert_eq!(base.body.top, 24.0);

        let mut geometry = base.clone();
        let deep = ThumbNotch {
            panel: 1,
            width: 30.0,
            depth: 30.0,
        };
        let err = add_thumb_notch(&mut geometry, &deep).unwrap_err();
        assert!(matches!(err, DielineError::InvalidParameter(_)), "{}", err);
        assert_eq!(geometry, base);

        let shallow = ThumbNotch { depth: 13.0, ..deep };
        add_thumb_notch(&mut geometry, &shallow).unwrap();
        let deepest = geometry.cut[0]
            .pieces(0.01)
            .iter()
            .filter(|(a, _)| a.x > 120.0 && a.x < 150.0 && a.y < base.body.top)
            .map(|(a, _)| a.y)
            .fold(0.0, f64::max);
        assert!(deepest <= base.body.top - NOTCH_CREASE_MARGIN_MM + 1e-6, "{}", deepest);

        // The tuck lid crease on panel 2 is closer than the hinge.
        let mut geometry = base.clone();
        let tongue = ThumbNotch { panel: 2, depth: 13.0, ..deep };
        assert!(add_thumb_notch(&mut geometry, &tongue).is_err());
        let tongue = ThumbNotch { depth: 6.0, ..tongue };
        assert!(add_thumb_notch(&mut geometry, &tongue).is_ok());
    }

    #[test]
    fn test_zip_strip_spans_body() {
        let mut geometry = sleeve();
        apply_features(
            &mut geometry,
            &Features {
                zip_strip: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(geometry.perf, vec![Segment::hline(0.0, 241.0, 80.0)]);
    }
}
