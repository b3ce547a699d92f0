//! SVG writer
//!
//! The document is sized in millimeters over the layout extent (bbox plus
//! bleed guide). Layers are written as groups named CUT, CREASE, PERF and
//! BLEED with distinct stroke colors so vector tools can map them to spot
//! colors.

use super::ExportOptions;
use dielinekit_core::geometry::num;
use dielinekit_core::{GeometryResult, Layer};

/// Stroke width of every layer, in millimeters.
pub const STROKE_WIDTH_MM: f64 = 0.25;

/// Room around the extent for dimension labels.
pub const DIMS_MARGIN_MM: f64 = 8.0;

const DIMS_FONT_SIZE_MM: f64 = 3.0;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn layer_group(svg: &mut String, geometry: &GeometryResult, layer: Layer) {
    let dash = layer
        .dash_array()
        .map(|d| format!(r#" stroke-dasharray="{}""#, d))
        .unwrap_or_default();
    svg.push_str(&format!(
        r#"  <g id="{}" stroke="{}" stroke-width="{}" fill="none"{}>"#,
        layer.name(),
        layer.stroke_color(),
        STROKE_WIDTH_MM,
        dash
    ));
    svg.push('\n');
    for segment in geometry.layer(layer) {
        svg.push_str(&format!(r#"    <path d="{}"/>"#, segment.path_data()));
        svg.push('\n');
    }
    svg.push_str("  </g>\n");
}

/// Render the geometry as a standalone SVG document.
pub fn svg_string(geometry: &GeometryResult, options: &ExportOptions) -> String {
    let mut extent = geometry.extent();
    if options.include_dims && !geometry.dims.is_empty() {
        extent = extent.expand(DIMS_MARGIN_MM);
    }

    let mut svg = String::new();
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="{x} {y} {w} {h}">"#,
        x = num(extent.x),
        y = num(extent.y),
        w = num(extent.w),
        h = num(extent.h),
    ));
    svg.push('\n');

    for layer in Layer::ALL {
        layer_group(&mut svg, geometry, layer);
    }

    if options.include_dims && !geometry.dims.is_empty() {
        svg.push_str(&format!(
            r##"  <g id="DIMS" fill="#000000" stroke="none" font-family="sans-serif" font-size="{}" text-anchor="middle">"##,
            DIMS_FONT_SIZE_MM
        ));
        svg.push('\n');
        for label in &geometry.dims {
            svg.push_str(&format!(
                r#"    <text x="{}" y="{}">{}</text>"#,
                num(label.x),
                num(label.y),
                escape_xml(&label.text)
            ));
            svg.push('\n');
        }
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}
