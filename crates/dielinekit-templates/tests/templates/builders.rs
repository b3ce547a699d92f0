use dielinekit_core::{Point, Segment, DEFAULT_FLATTEN_TOLERANCE};
use dielinekit_templates::{generate, BuildRequest, Features, TemplateStyle, ThumbNotch, Window};

const CALIPERS: [f64; 3] = [0.3, 1.5, 4.0];

#[test]
fn test_every_style_has_one_closed_silhouette() {
    for style in TemplateStyle::ALL {
        for caliper in CALIPERS {
            let geometry = style.build(&style.default_parameters(), caliper).unwrap();
            let silhouette = geometry.silhouette().unwrap();
            assert!(silhouette.is_closed(), "{} at {}", style, caliper);

            let bounds = silhouette.bounds(DEFAULT_FLATTEN_TOLERANCE).unwrap();
            assert!(
                bounds.approx_eq(&geometry.bbox, 1e-6),
                "{} at {}: {:?} vs {:?}",
                style,
                caliper,
                bounds,
                geometry.bbox
            );
        }
    }
}

#[test]
fn test_panel_boundaries_are_creased() {
    for style in TemplateStyle::ALL {
        let geometry = style.build(&style.default_parameters(), 0.5).unwrap();
        let (top, bottom) = (geometry.body.top, geometry.body.bottom());
        for span in geometry.panels.iter().skip(1) {
            assert!(
                geometry.crease.contains(&Segment::vline(span.x, top, bottom)),
                "{} lacks a crease at x = {}",
                style,
                span.x
            );
        }
    }
}

#[test]
fn test_every_crease_end_is_a_vertex() {
    for style in TemplateStyle::ALL {
        let geometry = style.build(&style.default_parameters(), 0.5).unwrap();
        for crease in &geometry.crease {
            for p in crease.endpoints() {
                assert!(
                    geometry.vertices.iter().any(|v| v.approx_eq(p, 1e-6)),
                    "{}: {} missing from vertices",
                    style,
                    p
                );
            }
        }
    }
}

#[test]
fn test_builds_are_idempotent() {
    for style in TemplateStyle::ALL {
        let params = style.default_parameters();
        let a = style.build(&params, 1.5).unwrap();
        let b = style.build(&params, 1.5).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_tuck_styles_report_tongue_clearance() {
    for style in TemplateStyle::ALL {
        let geometry = style.build(&style.default_parameters(), 0.4).unwrap();
        let expected = matches!(
            style,
            TemplateStyle::StraightTuckEnd
                | TemplateStyle::ReverseTuckEnd
                | TemplateStyle::TuckTopAutoBottom
                | TemplateStyle::TuckTopSnapLock
        );
        assert_eq!(geometry.metrics.tongue_clearance.is_some(), expected, "{}", style);
    }
}

#[test]
fn test_features_leave_creases_alone() {
    let mut request = BuildRequest::new(TemplateStyle::StraightTuckEnd, 0.4);
    let plain = generate(&request).unwrap();

    request.features = Features {
        window: Some(Window {
            panel: 2,
            x: 20.0,
            y: 30.0,
            w: 40.0,
            h: 50.0,
            r: 5.0,
        }),
        thumb_notch: Some(ThumbNotch {
            panel: 0,
            width: 20.0,
            depth: 8.0,
        }),
        zip_strip: true,
    };
    let featured = generate(&request).unwrap();

    assert_eq!(plain.geometry.crease, featured.geometry.crease);
    assert_eq!(plain.geometry.bbox, featured.geometry.bbox);
    assert_eq!(featured.geometry.cut.len(), 2);
    assert_eq!(featured.geometry.perf.len(), 1);
    assert!(featured.geometry.cut[0].is_closed());
    assert!(featured.preflight_context(3.0).perforation_present);
}

#[test]
fn test_feature_panel_out_of_range() {
    let mut request = BuildRequest::new(TemplateStyle::Sleeve, 0.4);
    request.features.window = Some(Window {
        panel: 2,
        x: 5.0,
        y: 5.0,
        w: 10.0,
        h: 10.0,
        r: 0.0,
    });
    assert!(generate(&request).is_err());
}

#[test]
fn test_thumb_notch_needs_a_straight_edge() {
    let mut request = BuildRequest::new(TemplateStyle::Sleeve, 0.4);
    request.features.thumb_notch = Some(ThumbNotch {
        panel: 1,
        width: 30.0,
        depth: 6.0,
    });
    let dieline = generate(&request).unwrap();
    let notch_start = Point::new(dieline.geometry.panels[1].center() - 15.0, 0.0);
    assert!(dieline.geometry.cut[0].touches(notch_start, 1e-9));
}

#[test]
fn test_geometry_json_uses_score_key() {
    let geometry = TemplateStyle::Sleeve
        .build(&TemplateStyle::Sleeve.default_parameters(), 0.4)
        .unwrap();
    let json = serde_json::to_value(&geometry).unwrap();
    assert!(json.get("score").is_some());
    assert!(json.get("crease").is_none());
    assert_eq!(json["bbox"]["x"], 0.0);

    let back: dielinekit_core::GeometryResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, geometry);
}
