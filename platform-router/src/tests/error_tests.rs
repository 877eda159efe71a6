//! Property-based tests for errors and configuration

use crate::{NavigationPolicy, RouterConfig, RouterError, RouterErrorCode};
use proptest::prelude::*;

fn arb_error_code() -> impl Strategy<Value = RouterErrorCode> {
    prop_oneof![
        Just(RouterErrorCode::InvalidRoute),
        Just(RouterErrorCode::DuplicateRoute),
        Just(RouterErrorCode::PathConflict),
        Just(RouterErrorCode::InvalidPath),
        Just(RouterErrorCode::NoRoutes),
        Just(RouterErrorCode::NoRenderCallback),
        Just(RouterErrorCode::NoDefaultRoute),
        Just(RouterErrorCode::NoFallbackRoute),
        Just(RouterErrorCode::FallbackLoop),
        Just(RouterErrorCode::RedirectLoop),
        Just(RouterErrorCode::GuardFailed),
        Just(RouterErrorCode::HookFailed),
        Just(RouterErrorCode::RenderFailed),
        Just(RouterErrorCode::LoadFailed),
        Just(RouterErrorCode::Internal),
    ]
}

fn arb_router_error() -> impl Strategy<Value = RouterError> {
    (
        arb_error_code(),
        ".*",
        proptest::option::of("[a-z-]{1,16}"),
        proptest::option::of(any::<String>()),
    )
        .prop_map(|(code, message, route, cause)| {
            let mut error = RouterError::new(code, message);
            if let Some(route) = route {
                error = error.with_route(route);
            }
            if let Some(cause) = cause {
                error = error.with_cause(cause);
            }
            error
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Errors survive a JSON round-trip with every field intact.
    #[test]
    fn prop_error_serialization_roundtrip(error in arb_router_error()) {
        let json = serde_json::to_value(&error).unwrap();
        prop_assert_eq!(&json["code"], error.code.as_str());

        let restored: RouterError = serde_json::from_value(json).unwrap();
        prop_assert_eq!(restored, error);
    }

    /// Display carries the code and the message.
    #[test]
    fn prop_error_display(error in arb_router_error()) {
        let display = error.to_string();
        let code_prefix = format!("[{}]", error.code);
        prop_assert!(display.starts_with(&code_prefix));
        prop_assert!(display.ends_with(&error.message));
    }

    /// Every code is either a configuration error, a collaborator error or
    /// internal, never two at once.
    #[test]
    fn prop_error_classes_are_disjoint(code in arb_error_code()) {
        let classes = [
            code.is_configuration_error(),
            code.is_collaborator_error(),
            code == RouterErrorCode::Internal,
        ];
        prop_assert_eq!(classes.iter().filter(|c| **c).count(), 1);
    }
}

#[test]
fn test_regex_error_maps_to_invalid_path() {
    let regex_err = regex::Regex::new("(").unwrap_err();
    let err: RouterError = regex_err.into();
    assert_eq!(err.code, RouterErrorCode::InvalidPath);
    assert!(err.cause.is_some());
}

#[test]
fn test_config_from_partial_json() {
    let config = RouterConfig::from_json(
        r#"{ "navigation_policy": "supersede", "widget_event_prefix": "w-" }"#,
    )
    .unwrap();
    assert_eq!(config.navigation_policy, NavigationPolicy::Supersede);
    assert_eq!(config.widget_event_prefix, "w-");
    assert_eq!(config.event_capacity, RouterConfig::default().event_capacity);
    assert!(config.sync_history);
}

#[test]
fn test_config_validation() {
    let err = RouterConfig::from_json(r#"{ "widget_event_prefix": "" }"#).unwrap_err();
    assert_eq!(err.code, RouterErrorCode::Internal);

    let err = RouterConfig::from_json("not json").unwrap_err();
    assert_eq!(err.code, RouterErrorCode::Internal);

    assert!(RouterConfig::new().with_event_capacity(0).validate().is_err());
    assert!(RouterConfig::new().validate().is_ok());
}
