//! Property tests for search path templates

use proptest::prelude::*;

use actor_modules::module::PathTemplate;

fn literal() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{0,12}"
}

proptest! {
    #[test]
    fn resolve_substitutes_each_segment(
        segments in prop::collection::vec((literal(), literal()), 1..6),
        name in "[a-z][a-z0-9_.]{0,15}",
    ) {
        let raw = segments
            .iter()
            .map(|(prefix, suffix)| format!("{}?{}", prefix, suffix))
            .collect::<Vec<_>>()
            .join(";");
        let template = PathTemplate::parse(&raw).unwrap();

        let resolved: Vec<String> = template
            .resolve(&name)
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let expected: Vec<String> = segments
            .iter()
            .map(|(prefix, suffix)| format!("{}{}{}", prefix, name, suffix))
            .collect();
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn segment_without_wildcard_rejected(
        good in literal(),
        bad in "[a-zA-Z0-9_./-]{1,12}",
    ) {
        let raw = format!("{}?;{}", good, bad);
        prop_assert!(PathTemplate::parse(&raw).is_err());
    }
}
