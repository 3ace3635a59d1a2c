use std::cmp::Ordering;

use grabber_core::{
    all_older_than, compare_versions, extract_version_token, first_eligible_version, is_older,
    is_prerelease,
};
use pretty_assertions::assert_eq;

#[test]
fn prerelease_markers_are_found_anywhere_in_any_case() {
    for title in [
        "Messenger 458.0.0.54.108 alpha",
        "ALPHA build Messenger 12.0",
        "Messenger 12.0-Beta.2",
        "messenger (bEtA) 12.0",
        "Messengerbeta12",
    ] {
        assert!(is_prerelease(title), "{title} should be a pre-release");
    }
    assert!(!is_prerelease("Messenger 458.0.0.54.108"));
}

#[test]
fn version_token_is_exactly_the_matched_substring() {
    let cases = [
        ("Messenger 12.0 APK", Some("12.0")),
        ("X 12.0.1-beta.2 (arm64)", Some("12.0.1-beta.2")),
        ("Twitter 10.5.0-release.0", Some("10.5.0-release.0")),
        ("App 7", Some("7")),
        ("App 3.1-rc-2.4", Some("3.1-rc-2.4")),
        ("Version 4.2.", Some("4.2")),
        ("No digits here", None),
    ];
    for (title, expected) in cases {
        assert_eq!(extract_version_token(title), expected, "title: {title}");
    }
}

#[test]
fn first_eligible_version_skips_prereleases_in_listing_order() {
    let titles = [
        "Messenger 460.0.0.1 beta",
        "Messenger 459.0.0.0 Alpha",
        "  Messenger 458.0.0.54.108  ",
        "Messenger 457.0.0.1",
    ];
    assert_eq!(
        first_eligible_version(titles),
        Some("458.0.0.54.108".to_string())
    );
}

#[test]
fn first_eligible_version_skips_titles_without_token() {
    let titles = ["Messenger", "Messenger 12.5"];
    assert_eq!(first_eligible_version(titles), Some("12.5".to_string()));
}

#[test]
fn first_eligible_version_is_none_when_everything_is_filtered() {
    let titles = ["App 2.0 beta", "App 1.0 alpha", "App"];
    assert_eq!(first_eligible_version(titles), None);
    assert_eq!(first_eligible_version(Vec::<&str>::new()), None);
}

#[test]
fn numeric_segments_compare_numerically() {
    assert_eq!(compare_versions("12.10", "12.9"), Some(Ordering::Greater));
    assert_eq!(compare_versions("12.3", "12.3"), Some(Ordering::Equal));
    assert_eq!(compare_versions("12.03", "12.3"), Some(Ordering::Equal));
    assert_eq!(compare_versions("12.2", "12.3"), Some(Ordering::Less));
    assert_eq!(compare_versions("12", "12.0.1"), Some(Ordering::Less));
}

#[test]
fn text_qualifiers_compare_lexicographically() {
    assert_eq!(
        compare_versions("1.0-rc.2", "1.0-rc.1"),
        Some(Ordering::Greater)
    );
    assert_eq!(compare_versions("1.0-a", "1.0-b"), Some(Ordering::Less));
}

#[test]
fn mixed_segments_are_incomparable_and_never_older() {
    assert_eq!(compare_versions("1.x", "1.2"), None);
    assert!(!is_older("1.x", "1.2"));
    assert!(!is_older("1.2", "1.x"));
}

#[test]
fn page_is_exhausted_only_when_every_entry_is_older() {
    assert!(!all_older_than(["12.5", "12.4"], "12.3"));
    assert!(all_older_than(["12.2"], "12.3"));
    assert!(!all_older_than(["12.2", "12.3"], "12.3"));
    assert!(!all_older_than(["12.2", "weird"], "12.3"));
    assert!(all_older_than(Vec::<&str>::new(), "12.3"));
}
