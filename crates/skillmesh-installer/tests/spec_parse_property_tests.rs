//! Property-based tests for target spec parsing

use proptest::prelude::*;

use skillmesh_installer::{InstallError, TargetSpec};

fn valid_name_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9._-]{0,63}"
}

fn version_strategy() -> impl Strategy<Value = String> {
    (0u32..50, 0u32..50, 0u32..50).prop_map(|(major, minor, patch)| {
        format!("{major}.{minor}.{patch}")
    })
}

/// Property: any well-formed name parses to itself with no version pin
#[test]
fn prop_valid_names_parse_bare() {
    proptest!(|(name in valid_name_strategy())| {
        let spec: TargetSpec = name.parse().unwrap();
        prop_assert_eq!(&spec.name, &name);
        prop_assert!(spec.version.is_none());
        prop_assert_eq!(spec.to_string(), name);
    });
}

/// Property: `name@version` parses and displays back to the same string
#[test]
fn prop_pinned_specs_roundtrip_through_display() {
    proptest!(|(name in valid_name_strategy(), version in version_strategy())| {
        let raw = format!("{name}@{version}");
        let spec: TargetSpec = raw.parse().unwrap();
        prop_assert_eq!(&spec.name, &name);
        prop_assert_eq!(spec.version.as_deref(), Some(version.as_str()));
        prop_assert_eq!(spec.to_string(), raw);
    });
}

/// Property: names carrying characters outside the allowed set are rejected
#[test]
fn prop_names_with_forbidden_characters_rejected() {
    proptest!(|(prefix in "[a-z]{1,5}", bad in "[A-Z!+/]{1,5}", suffix in "[a-z]{0,5}")| {
        let raw = format!("{prefix}{bad}{suffix}");
        let err = raw.parse::<TargetSpec>().unwrap_err();
        prop_assert!(matches!(err, InstallError::Validation(_)));
    });
}

/// Property: version pins that are not full semver are rejected
#[test]
fn prop_non_semver_pins_rejected() {
    proptest!(|(name in valid_name_strategy(), pin in "[a-z]{1,8}")| {
        let raw = format!("{name}@{pin}");
        let err = raw.parse::<TargetSpec>().unwrap_err();
        prop_assert!(matches!(err, InstallError::Validation(_)));
    });
}
