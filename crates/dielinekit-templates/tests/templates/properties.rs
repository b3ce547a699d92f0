use dielinekit_core::DEFAULT_FLATTEN_TOLERANCE;
use dielinekit_templates::{ParameterSet, TemplateStyle};
use proptest::prelude::*;

/// A style and a parameter set with every value inside the schema bounds.
fn style_and_params() -> impl Strategy<Value = (TemplateStyle, ParameterSet)> {
    (0..TemplateStyle::ALL.len()).prop_flat_map(|i| {
        let style = TemplateStyle::ALL[i];
        let ranges: Vec<_> = style.schema().iter().map(|spec| spec.min..=spec.max).collect();
        (Just(style), ranges).prop_map(|(style, values)| {
            let params = style
                .schema()
                .iter()
                .zip(values)
                .fold(ParameterSet::new(), |set, (spec, value)| set.with(spec.key, value));
            (style, params)
        })
    })
}

proptest! {
    #[test]
    fn prop_silhouette_closed_and_bounded(
        (style, params) in style_and_params(),
        caliper in 0.2f64..=4.0,
    ) {
        prop_assert!(params.validate(style.schema()).is_ok());
        let geometry = style.build(&params, caliper);
        prop_assert!(geometry.is_ok(), "{:?} {:?}: {}", style, params, geometry.unwrap_err());
        let geometry = geometry.unwrap();
        let silhouette = geometry.silhouette().unwrap();
        prop_assert!(silhouette.is_closed());
        let bounds = silhouette.bounds(DEFAULT_FLATTEN_TOLERANCE).unwrap();
        prop_assert!(bounds.approx_eq(&geometry.bbox, 1e-6), "{:?} vs {:?}", bounds, geometry.bbox);
    }

    #[test]
    fn prop_build_is_deterministic(
        (style, params) in style_and_params(),
        caliper in 0.2f64..4.0,
    ) {
        prop_assert_eq!(style.build(&params, caliper), style.build(&params, caliper));
    }
}
