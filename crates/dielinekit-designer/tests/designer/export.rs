use dielinekit_core::init_standard_catalog;
use dielinekit_designer::export::bundle::{DESIGN_ENTRY, DXF_ENTRY, PREFLIGHT_ENTRY};
use dielinekit_designer::{dxf_string, save_bundle, svg_string, DesignState, ExportOptions, StatePatch};
use dielinekit_templates::{Features, TemplateStyle};
use std::io::Read;
use zip::ZipArchive;

fn read_entry(archive: &mut ZipArchive<std::fs::File>, name: &str) -> String {
    let mut text = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

#[test]
fn test_every_style_exports() {
    let catalog = init_standard_catalog();
    let material = catalog.get_material("sbs_18pt").unwrap().clone();
    for style in TemplateStyle::ALL {
        let state = DesignState::new(style, material.clone()).unwrap();
        let svg = svg_string(state.geometry(), &ExportOptions::default());
        assert!(svg.contains(r#"<g id="CUT""#), "{}", style);
        assert!(svg.trim_end().ends_with("</svg>"));

        let dxf = dxf_string(state.geometry(), ExportOptions::default().dxf_tolerance).unwrap();
        assert!(dxf.contains("CREASE"), "{}", style);
    }
}

#[test]
fn test_saved_bundle_restores_design() {
    let catalog = init_standard_catalog();
    let material = catalog.get_material("corr_b").unwrap().clone();
    let state = DesignState::new(TemplateStyle::Rsc0201, material)
        .unwrap()
        .update(StatePatch::SetFeatures(Features {
            zip_strip: true,
            ..Default::default()
        }))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rsc.zip");
    save_bundle(&state, &ExportOptions::default(), &path).unwrap();

    let mut archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let design = read_entry(&mut archive, DESIGN_ENTRY);
    let restored = state.import_json(&design, &catalog).unwrap();
    assert_eq!(restored.geometry(), state.geometry());

    let report = read_entry(&mut archive, PREFLIGHT_ENTRY);
    assert!(report.contains("[WARN] Perforation on corrugated board may weaken structure"));
    assert!(read_entry(&mut archive, DXF_ENTRY).contains("PERF"));
}

#[test]
fn test_failed_bundle_writes_nothing() {
    let catalog = init_standard_catalog();
    let material = catalog.get_material("sbs_18pt").unwrap().clone();
    let state = DesignState::new(TemplateStyle::Sleeve, material).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("sleeve.zip");
    assert!(save_bundle(&state, &ExportOptions::default(), &path).is_err());
    assert!(!path.exists());
}
