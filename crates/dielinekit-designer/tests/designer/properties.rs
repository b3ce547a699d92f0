use dielinekit_core::{init_standard_catalog, Point, VertexKey};
use dielinekit_designer::{move_vertex, DesignState, SnapPolicy};
use dielinekit_templates::TemplateStyle;
use proptest::prelude::*;

fn state(style_index: usize) -> DesignState {
    let material = init_standard_catalog().get_material("sbs_18pt").unwrap().clone();
    DesignState::new(TemplateStyle::ALL[style_index], material).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moved_vertex_leaves_no_stale_endpoints(
        style_index in 0..TemplateStyle::ALL.len(),
        pick in 0.0f64..1.0,
        dx in -30.0f64..30.0,
        dy in -30.0f64..30.0,
    ) {
        let state = state(style_index);
        let index = state.vertices();
        let id = ((index.len() as f64 * pick) as usize).min(index.len() - 1);
        let old = index.get(id).unwrap();
        prop_assume!(dx.abs() > 0.01 || dy.abs() > 0.01);
        let to = Point::new(old.x + dx, old.y + dy);

        let (moved, moved_index) =
            move_vertex(state.geometry(), index, id, to, &SnapPolicy::default()).unwrap();

        let stale = VertexKey::of(old);
        for (_, segment) in moved.editable_segments() {
            for p in segment.endpoints() {
                prop_assert_ne!(VertexKey::of(p), stale);
                prop_assert!(moved_index.id_of(p).is_some());
            }
        }
        prop_assert!(moved_index.id_of(to).is_some());
        prop_assert_eq!(moved.vertices.len(), moved_index.len());
    }
}
