use dielinekit_core::{init_standard_catalog, MaterialCategory};
use dielinekit_templates::{
    generate, has_failures, validate, BuildRequest, PreflightContext, RuleId, TemplateStyle,
};

#[test]
fn test_glue_flap_scenario() {
    let catalog = init_standard_catalog();
    let material = catalog.get_material("paper_250gsm").unwrap();

    let mut params = TemplateStyle::StraightTuckEnd.default_parameters();
    params.set("glue", 8.0);
    let context = PreflightContext {
        bleed: 3.0,
        ..Default::default()
    };
    let messages = validate(&params, material, &context);

    let glue = messages.iter().find(|m| m.rule == RuleId::GlueFlap).unwrap();
    assert!(!glue.passed);
    assert_eq!(glue.text, "Glue flap too small (< 10.0 mm)");
    assert!(has_failures(&messages));
}

#[test]
fn test_glue_failure_is_isolated() {
    let catalog = init_standard_catalog();
    for material in catalog.get_all_materials() {
        for style in TemplateStyle::ALL {
            let mut params = style.default_parameters();
            let Some(glue) = params.get("glue") else {
                continue;
            };
            let context = PreflightContext {
                bleed: material.min_bleed(),
                ..Default::default()
            };
            let before = validate(&params, material, &context);

            let min = dielinekit_templates::preflight::min_glue_flap(material.caliper_mm);
            params.set("glue", (min - 0.5).min(glue));
            let after = validate(&params, material, &context);

            assert_eq!(before.len(), after.len());
            for (b, a) in before.iter().zip(&after) {
                assert_eq!(b.rule, a.rule);
                if a.rule == RuleId::GlueFlap {
                    assert!(!a.passed, "{} on {}", style, material.id);
                } else {
                    assert_eq!(a, b);
                }
            }
        }
    }
}

#[test]
fn test_default_designs_pass_on_their_board() {
    let catalog = init_standard_catalog();
    let cases = [
        (TemplateStyle::StraightTuckEnd, "paper_300gsm"),
        (TemplateStyle::TuckTopAutoBottom, "sbs_18pt"),
        (TemplateStyle::Sleeve, "paper_250gsm"),
        (TemplateStyle::Rsc0201, "corr_b"),
        (TemplateStyle::Mailer0427, "corr_e"),
        (TemplateStyle::Pizza0429, "corr_b"),
    ];
    for (style, material_id) in cases {
        let material = catalog.get_material(material_id).unwrap();
        let mut request = BuildRequest::new(style, material.caliper_mm);
        request.bleed = material.min_bleed();
        let dieline = generate(&request).unwrap();
        let messages = validate(&dieline.working, material, &dieline.preflight_context(request.bleed));
        assert!(!has_failures(&messages), "{}: {:?}", style, messages);
    }
}

#[test]
fn test_tuck_tongues_clear_every_paper_board() {
    let catalog = init_standard_catalog();
    let tuck_styles = [
        TemplateStyle::StraightTuckEnd,
        TemplateStyle::ReverseTuckEnd,
        TemplateStyle::TuckTopAutoBottom,
        TemplateStyle::TuckTopSnapLock,
    ];
    for material in catalog.get_materials_by_category(MaterialCategory::Paper) {
        for style in tuck_styles {
            let mut request = BuildRequest::new(style, material.caliper_mm);
            request.bleed = material.min_bleed();
            let dieline = generate(&request).unwrap();
            let messages = validate(&dieline.working, material, &dieline.preflight_context(request.bleed));
            assert!(
                messages.iter().all(|m| m.rule != RuleId::TongueClearance),
                "{} on {}: {:?}",
                style,
                material.id,
                messages
            );
        }
    }
}

#[test]
fn test_rules_are_order_stable() {
    let catalog = init_standard_catalog();
    let material = catalog.get_material("corr_b").unwrap();
    let mut params = TemplateStyle::Rsc0201.default_parameters();
    params.set("H", 5.0);
    params.set("slot", 4.0);
    let context = PreflightContext {
        bleed: 1.0,
        perforation_present: true,
        tongue_clearance: None,
    };
    let rules: Vec<_> = validate(&params, material, &context).iter().map(|m| m.rule).collect();
    assert_eq!(
        rules,
        vec![
            RuleId::GlueFlap,
            RuleId::MinimumDimension,
            RuleId::CreaseSpacing,
            RuleId::Bleed,
            RuleId::CorrugatedPerforation,
            RuleId::SlotGap,
        ]
    );
}
