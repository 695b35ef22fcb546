//! Integration tests for version parsing and successor calculation.

use incubate::error::VersionError;
use incubate::version::{LabelPolicy, apply_bump};
use incubate::{BumpPolicy, BumpSpecifier, SemanticVersion};

fn bump(text: &str, spec: BumpSpecifier, policy: &BumpPolicy) -> String {
    let version: SemanticVersion = text.parse().unwrap();
    apply_bump(&version, spec, policy).unwrap().to_string()
}

fn policy(pre: LabelPolicy, build: LabelPolicy) -> BumpPolicy {
    BumpPolicy { pre, build }
}

#[test]
fn test_release_parts_clear_suffixes() {
    let none = BumpPolicy::default();

    assert_eq!(bump("1.2.3-rc.4+build.5", BumpSpecifier::Major, &none), "2.0.0");
    assert_eq!(bump("1.2.3-rc.4+build.5", BumpSpecifier::Minor, &none), "1.3.0");
    assert_eq!(bump("1.2.3-rc.4+build.5", BumpSpecifier::Patch, &none), "1.2.4");
}

#[test]
fn test_pre_keeps_build_metadata() {
    assert_eq!(
        bump("1.0.0+build.2", BumpSpecifier::Pre, &BumpPolicy::default()),
        "1.0.0-rc.1+build.2"
    );
}

#[test]
fn test_configured_default_labels() {
    let configured = policy(
        LabelPolicy::new(None, Some("alpha".into())),
        LabelPolicy::new(None, Some("nightly".into())),
    );

    assert_eq!(bump("0.3.0", BumpSpecifier::Pre, &configured), "0.3.0-alpha.1");
    assert_eq!(bump("0.3.0", BumpSpecifier::Build, &configured), "0.3.0+nightly.1");
    // An existing label keeps counting even when the configured default differs.
    assert_eq!(bump("0.3.0-rc.3", BumpSpecifier::Pre, &configured), "0.3.0-rc.4");
}

#[test]
fn test_override_beats_configured_default() {
    let overridden = policy(
        LabelPolicy::new(Some("beta".into()), Some("alpha".into())),
        LabelPolicy::default(),
    );

    assert_eq!(bump("0.3.0", BumpSpecifier::Pre, &overridden), "0.3.0-beta.1");
    assert_eq!(bump("0.3.0-alpha.7", BumpSpecifier::Pre, &overridden), "0.3.0-beta.1");
    assert_eq!(bump("0.3.0-beta.7", BumpSpecifier::Pre, &overridden), "0.3.0-beta.8");
}

#[test]
fn test_fix_is_patch() {
    assert_eq!("fix".parse::<BumpSpecifier>().unwrap(), BumpSpecifier::Patch);
    assert!("prerelease".parse::<BumpSpecifier>().is_err());
}

#[test]
fn test_unsupported_versions_rejected() {
    for text in ["123", "1.0", "v1.0.0", "1.0.0-rc", "1.0.0-rc.1.2", "1.0.0+abc"] {
        let result = text.parse::<SemanticVersion>();
        assert!(result.is_err(), "{} should not parse", text);
    }

    assert!(matches!(
        "1.0.0-rc".parse::<SemanticVersion>(),
        Err(VersionError::UnsupportedSuffix { .. })
    ));
}

#[test]
fn test_invalid_override_label() {
    let bad = policy(LabelPolicy::new(Some("rc.1".into()), None), LabelPolicy::default());
    let version = SemanticVersion::new(1, 0, 0);

    assert!(matches!(
        apply_bump(&version, BumpSpecifier::Pre, &bad),
        Err(VersionError::InvalidLabel(_))
    ));
}
