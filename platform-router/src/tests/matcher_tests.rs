//! Property-based tests for path matching

use crate::matcher::PathPattern;
use crate::query;
use proptest::prelude::*;

/// Literal segment
fn arb_literal() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

/// Concrete value for a `:param` segment
fn arb_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_~.-]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every `:param` captures exactly the concrete segment at its position.
    #[test]
    fn prop_params_extracted_in_place(
        parts in prop::collection::vec((arb_literal(), arb_value()), 1..5)
    ) {
        let template: String = parts
            .iter()
            .enumerate()
            .map(|(i, (literal, _))| format!("/{literal}/:p{i}"))
            .collect();
        let path: String = parts
            .iter()
            .map(|(literal, value)| format!("/{literal}/{value}"))
            .collect();

        let pattern = PathPattern::compile(&template).unwrap();
        let params = pattern.captures(&path).unwrap();

        prop_assert_eq!(params.len(), parts.len());
        for (i, (_, value)) in parts.iter().enumerate() {
            let key = format!("p{i}");
            prop_assert_eq!(params.get(&key), Some(value.as_str()));
        }
    }

    /// Templates without parameters match their own text, with or without a
    /// trailing slash or query, and nothing longer.
    #[test]
    fn prop_literal_template_matches_itself(
        segments in prop::collection::vec(arb_literal(), 1..5),
        extra in arb_literal(),
        query_key in "[a-z]{1,6}",
    ) {
        let template: String = segments.iter().map(|s| format!("/{s}")).collect();
        let pattern = PathPattern::compile(&template).unwrap();

        let with_slash = format!("{template}/");
        let with_query = format!("{template}?{query_key}=1");
        let longer = format!("{template}/{extra}");

        prop_assert!(pattern.is_match(&template));
        prop_assert!(pattern.is_match(&with_slash));
        prop_assert!(pattern.is_match(&with_query));
        prop_assert!(!pattern.is_match(&longer));
        prop_assert!(pattern.keys().is_empty());
    }

    /// Query keys without a value parse as present but empty.
    #[test]
    fn prop_bare_query_keys_are_valueless(keys in prop::collection::btree_set("[a-z]{1,6}", 1..5)) {
        let raw = keys.iter().cloned().collect::<Vec<_>>().join("&");
        let params = query::parse(&format!("?{raw}"));

        prop_assert_eq!(params.len(), keys.len());
        for key in &keys {
            prop_assert!(params.contains_key(key));
            prop_assert_eq!(params.get(key), None);
        }
    }
}
