use dielinekit_core::{init_standard_catalog, Material, MaterialCategory, MaterialId, Point};
use dielinekit_designer::{DesignState, DragSession, SnapPolicy, StatePatch};
use dielinekit_templates::{RuleId, TemplateStyle};

fn state(style: TemplateStyle, material: &str) -> DesignState {
    let material = init_standard_catalog().get_material(material).unwrap().clone();
    DesignState::new(style, material).unwrap()
}

#[test]
fn test_rejected_patch_reports_error() {
    let state = state(TemplateStyle::StraightTuckEnd, "sbs_18pt");
    assert!(state
        .update(StatePatch::SetParameter {
            key: "Q".into(),
            value: 10.0,
        })
        .is_err());
    assert!(state
        .update(StatePatch::SetParameter {
            key: "H".into(),
            value: -1.0,
        })
        .is_err());
    assert!(state.update(StatePatch::InsertPerforation { y: f64::NAN }).is_err());

    let zero = Material::new(MaterialId("zero".into()), "Zero".into(), 0.0, MaterialCategory::Custom);
    assert!(state.update(StatePatch::SetMaterial(zero)).is_err());
}

#[test]
fn test_parameter_change_rebuilds_geometry() {
    let state = state(TemplateStyle::StraightTuckEnd, "sbs_18pt");
    let taller = state
        .update(StatePatch::SetParameter {
            key: "H".into(),
            value: state.params().get("H").unwrap() + 10.0,
        })
        .unwrap();
    assert!((taller.geometry().bbox.h - state.geometry().bbox.h - 10.0).abs() < 1e-6);
    assert_eq!(taller.geometry().bbox.w, state.geometry().bbox.w);
}

#[test]
fn test_perforation_on_corrugated_warns() {
    let state = state(TemplateStyle::Rsc0201, "corr_b");
    assert!(state.messages().iter().all(|m| m.rule != RuleId::CorrugatedPerforation));

    let perforated = state.update(StatePatch::InsertPerforation { y: 100.0 }).unwrap();
    assert_eq!(perforated.geometry().perf.len(), state.geometry().perf.len() + 1);
    let warning = perforated
        .messages()
        .iter()
        .find(|m| m.rule == RuleId::CorrugatedPerforation)
        .unwrap();
    assert!(!warning.passed);

    let cleared = perforated.update(StatePatch::ClearPerforations).unwrap();
    assert_eq!(cleared.geometry(), state.geometry());
}

#[test]
fn test_drag_snaps_to_grid_and_cancels() {
    let state = state(TemplateStyle::StraightTuckEnd, "sbs_18pt");
    let origin = state.vertices().get(0).unwrap();

    let mut drag = DragSession::begin(&state, 0, SnapPolicy::grid(1.0)).unwrap();
    drag.drag_to(Point::new(origin.x + 10.4, origin.y + 0.3)).unwrap();
    let moved = drag.drag_to(Point::new(origin.x + 20.4, origin.y + 0.3)).unwrap();

    let expected = Point::new((origin.x + 20.4).round(), (origin.y + 0.3).round());
    assert!(moved.vertices().id_of(expected).is_some());
    assert!(moved.vertices().id_of(origin).is_none());
    assert_eq!(moved.params(), state.params());

    let restored = drag.cancel();
    assert_eq!(restored, state);
}

#[test]
fn test_vertex_snap_merges_vertices() {
    let state = state(TemplateStyle::StraightTuckEnd, "sbs_18pt");
    let target = state.vertices().get(1).unwrap();

    let merged = state
        .update(StatePatch::MoveVertex {
            id: 0,
            to: target,
            snap: SnapPolicy::vertex(4.0),
        })
        .unwrap();
    assert_eq!(merged.vertices().len(), state.vertices().len() - 1);
}

#[test]
fn test_drag_rejects_unknown_vertex() {
    let state = state(TemplateStyle::Sleeve, "sbs_18pt");
    assert!(DragSession::begin(&state, state.vertices().len(), SnapPolicy::default()).is_err());
}
