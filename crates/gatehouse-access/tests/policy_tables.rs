//! Integration tests for the default policy tables and decision precedence.

use gatehouse_access::{
    default_rules, match_path_pattern, AccessConfig, AccessLevel, AccessManager, AccessRule,
    DecisionSource, DEFAULT_ADMIN_PATHS, DEFAULT_PUBLIC_PATHS,
};
use http::Method;
use proptest::prelude::*;

fn manager() -> AccessManager {
    AccessManager::new(AccessConfig::default_config(), default_rules()).unwrap()
}

#[test]
fn test_default_tables() {
    let manager = manager();

    for path in [
        "/login",
        "/signup",
        "/forgot-password",
        "/reset-password/abc",
        "/verify-email",
        "/health",
        "/metrics",
        "/assets/app.js",
        "/fonts/inter.woff2",
        "/css/main.css",
        "/js/vendor.js",
        "/images/logo.png",
        "/static/x",
        "/favicon.ico",
        "/robots.txt",
    ] {
        assert_eq!(
            manager.required_access(path, &Method::GET),
            AccessLevel::Public,
            "{path} should be public"
        );
    }

    for path in ["/dashboard", "/forms", "/profile", "/settings"] {
        let decision = manager.explain(path, &Method::POST);
        assert_eq!(decision.level, AccessLevel::Authenticated, "{path}");
        assert!(matches!(decision.source, DecisionSource::Rule { .. }));
    }

    assert_eq!(
        manager.required_access("/admin/users", &Method::GET),
        AccessLevel::Admin
    );
}

#[test]
fn test_schema_pattern_examples() {
    let pattern = "/api/v1/forms/:id/schema";
    assert!(match_path_pattern(
        pattern,
        "/api/v1/forms/61af2a0f-5b54-476f-9bf6-c2ee6ce5b822/schema"
    ));
    assert!(!match_path_pattern(pattern, "/api/v1/forms/123/submit"));
    assert!(!match_path_pattern(pattern, "/api/v1/forms/schema"));
    assert!(!match_path_pattern(pattern, "/api/v1/forms/123/schema/extra"));
}

#[test]
fn test_late_public_embed_rules() {
    let mut manager = manager();
    manager.add_rules([
        AccessRule::new("/api/v1/forms/:id/schema", AccessLevel::Public).with_methods([Method::GET]),
        AccessRule::new("/api/v1/forms/:id/submit", AccessLevel::Public).with_methods([Method::POST]),
    ])
    .unwrap();

    assert_eq!(
        manager.required_access("/api/v1/forms/abc/schema", &Method::GET),
        AccessLevel::Public
    );
    assert_eq!(
        manager.required_access("/api/v1/forms/abc/submit", &Method::POST),
        AccessLevel::Public
    );
    assert_eq!(
        manager.required_access("/api/v1/forms/abc/submit", &Method::GET),
        AccessLevel::Authenticated
    );
}

#[test]
fn test_config_from_toml() {
    let config: AccessConfig = toml::from_str(
        r#"
        default_access = 0
        public_paths = ["/embed"]
        admin_paths = ["/ops"]
        "#,
    )
    .unwrap();

    let manager = AccessManager::with_config(config).unwrap();
    assert_eq!(manager.required_access("/embed/1", &Method::GET), AccessLevel::Public);
    assert_eq!(manager.required_access("/ops", &Method::GET), AccessLevel::Admin);
    assert_eq!(manager.required_access("/anything", &Method::GET), AccessLevel::Public);
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,12}"
}

proptest! {
    #[test]
    fn prop_public_prefix_beats_later_rules(
        prefix_idx in 0..DEFAULT_PUBLIC_PATHS.len(),
        tail in proptest::collection::vec(segment(), 0..4),
        level in prop_oneof![Just(AccessLevel::Authenticated), Just(AccessLevel::Admin)],
    ) {
        let prefix = DEFAULT_PUBLIC_PATHS[prefix_idx];
        let mut path = prefix.to_string();
        for seg in &tail {
            path.push('/');
            path.push_str(seg);
        }

        let mut manager = manager();
        manager.add_rule(AccessRule::new(path.as_str(), level)).unwrap();

        prop_assert_eq!(manager.required_access(&path, &Method::GET), AccessLevel::Public);
    }

    #[test]
    fn prop_admin_prefix_beats_rules(
        tail in proptest::collection::vec(segment(), 0..4),
    ) {
        let mut path = DEFAULT_ADMIN_PATHS[0].to_string();
        for seg in &tail {
            path.push('/');
            path.push_str(seg);
        }

        let mut manager = manager();
        manager.add_rule(AccessRule::new(path.as_str(), AccessLevel::Public)).unwrap();

        prop_assert_eq!(manager.required_access(&path, &Method::DELETE), AccessLevel::Admin);
    }

    #[test]
    fn prop_param_segment_matches_any_single_segment(
        head in segment(),
        value in segment(),
        extra in segment(),
    ) {
        let pattern = format!("/{head}/:id");
        let matching_path = format!("/{head}/{value}");
        let longer_path = format!("/{head}/{value}/{extra}");
        prop_assert!(match_path_pattern(&pattern, &matching_path));
        prop_assert!(!match_path_pattern(&pattern, &longer_path));
    }

    #[test]
    fn prop_pattern_without_params_is_equality(a in segment(), b in segment()) {
        let pattern = format!("/{a}");
        let path = format!("/{b}");
        prop_assert_eq!(match_path_pattern(&pattern, &path), a == b);
    }
}
