use dielinekit_core::DimensionMode;
use dielinekit_templates::{generate, BuildRequest, ParameterSet, TemplateStyle};

#[test]
fn test_straight_tuck_end_flat_size() {
    let params = ParameterSet::new()
        .with("W", 80.0)
        .with("H", 120.0)
        .with("D", 40.0)
        .with("glue", 15.0)
        .with("tuck", 18.0)
        .with("dust", 15.0);
    let geometry = TemplateStyle::StraightTuckEnd.build(&params, 0.3).unwrap();

    // glue + 4W
    assert_eq!(geometry.bbox.w, 335.0);
    // H + 2 dust + tuck
    assert_eq!(geometry.bbox.h, 168.0);
    assert_eq!(geometry.bbox.x, 0.0);
    assert_eq!(geometry.bbox.y, 0.0);
}

#[test]
fn test_rsc_flat_size() {
    let caliper = 3.0;
    let params = ParameterSet::new()
        .with("L", 250.0)
        .with("W", 150.0)
        .with("H", 120.0)
        .with("glue", 35.0)
        .with("slot", 6.0);
    let geometry = TemplateStyle::Rsc0201.build(&params, caliper).unwrap();

    assert_eq!(geometry.bbox.w, 835.0);
    assert_eq!(geometry.bbox.h, 420.0);
    assert_eq!(geometry.panels.len(), 4);
}

#[test]
fn test_reverse_tuck_end_matches_straight_size() {
    let params = TemplateStyle::StraightTuckEnd.default_parameters();
    let straight = TemplateStyle::StraightTuckEnd.build(&params, 0.4).unwrap();
    let reverse = TemplateStyle::ReverseTuckEnd.build(&params, 0.4).unwrap();
    assert_eq!(straight.bbox, reverse.bbox);
}

#[test]
fn test_product_clearance_through_pipeline() {
    let mut request = BuildRequest::new(TemplateStyle::Rsc0201, 1.5);
    request.params = request
        .params
        .with("L", 95.0)
        .with("W", 45.0)
        .with("H", 145.0);
    request.mode = DimensionMode::ProductClearance { clearance: 2.5 };

    let dieline = generate(&request).unwrap();
    assert_eq!(dieline.working.get("L"), Some(100.0));
    assert_eq!(dieline.working.get("W"), Some(50.0));
    assert_eq!(dieline.working.get("H"), Some(147.5));
    // non-dimension keys are untouched
    assert_eq!(dieline.working.get("slot"), Some(6.0));
}

#[test]
fn test_external_mode_rejects_collapsed_dimension() {
    let mut request = BuildRequest::new(TemplateStyle::Rsc0201, 4.0);
    request.params.set("H", 5.0);
    request.mode = DimensionMode::External;
    // 5 - 4 is still positive
    assert!(generate(&request).is_ok());

    request.caliper = 5.0;
    let err = generate(&request).unwrap_err();
    assert!(err.to_string().contains("'H'"), "{}", err);
}
