//! DXF writer
//!
//! One LINE entity per straight piece on the CUT, CREASE and PERF layers.
//! Rectangles, polygons and paths are exploded into lines and arcs are
//! flattened. DXF is Y-up, so every y coordinate is negated.

use crate::error::ExportResult;
use dielinekit_core::{GeometryResult, Layer};
use dxf::entities::{Entity, EntityType, Line};
use dxf::tables::Layer as DxfLayer;
use dxf::{Color, Drawing, Point as DxfPoint};
use std::io::Write;

/// Layers written to DXF. The bleed guide is not a production line.
pub const DXF_LAYERS: [Layer; 3] = [Layer::Cut, Layer::Crease, Layer::Perforation];

fn aci_color(layer: Layer) -> u8 {
    match layer {
        Layer::Cut => 1,
        Layer::Crease => 5,
        Layer::Perforation => 30,
        Layer::Bleed => 3,
    }
}

/// Build the drawing in memory.
pub fn drawing(geometry: &GeometryResult, tolerance: f64) -> Drawing {
    let mut drawing = Drawing::new();
    for layer in DXF_LAYERS {
        drawing.add_layer(DxfLayer {
            name: layer.name().to_string(),
            color: Color::from_index(aci_color(layer)),
            ..Default::default()
        });
    }

    for layer in DXF_LAYERS {
        for segment in geometry.layer(layer) {
            for (a, b) in segment.pieces(tolerance) {
                let line = Line::new(DxfPoint::new(a.x, -a.y, 0.0), DxfPoint::new(b.x, -b.y, 0.0));
                let mut entity = Entity::new(EntityType::Line(line));
                entity.common.layer = layer.name().to_string();
                drawing.add_entity(entity);
            }
        }
    }
    drawing
}

pub fn write_dxf<W: Write>(geometry: &GeometryResult, tolerance: f64, writer: &mut W) -> ExportResult<()> {
    drawing(geometry, tolerance).save(writer)?;
    Ok(())
}

pub fn dxf_string(geometry: &GeometryResult, tolerance: f64) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_dxf(geometry, tolerance, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dielinekit_core::{BoundingBox, Segment};

    fn sample() -> GeometryResult {
        let mut geometry = GeometryResult {
            bbox: BoundingBox::new(0.0, 0.0, 100.0, 50.0),
            cut: vec![Segment::rect(0.0, 0.0, 100.0, 50.0)],
            crease: vec![Segment::vline(40.0, 0.0, 50.0)],
            perf: vec![Segment::hline(0.0, 100.0, 25.0)],
            ..Default::default()
        };
        geometry.set_bleed(3.0);
        geometry
    }

    #[test]
    fn test_lines_on_layers_with_flipped_y() {
        let mut bytes = Vec::new();
        write_dxf(&sample(), 0.05, &mut bytes).unwrap();
        let drawing = Drawing::load(&mut bytes.as_slice()).unwrap();

        let lines: Vec<_> = drawing
            .entities()
            .filter_map(|e| match &e.specific {
                EntityType::Line(line) => Some((e.common.layer.clone(), line.clone())),
                _ => None,
            })
            .collect();
        // rect exploded into four, one crease, one perforation, no bleed
        assert_eq!(lines.len(), 6);
        assert_eq!(lines.iter().filter(|(l, _)| l == "CUT").count(), 4);

        let (layer, crease) = &lines[4];
        assert_eq!(layer, "CREASE");
        assert_eq!(crease.p1.y, 0.0);
        assert_eq!(crease.p2.y, -50.0);
        assert!(lines.iter().all(|(l, _)| l != "BLEED"));
    }

    #[test]
    fn test_dxf_string_names_layers() {
        let text = dxf_string(&sample(), 0.05).unwrap();
        assert!(text.contains("CUT"));
        assert!(text.contains("PERF"));
    }
}
