use grabber_core::{KeywordMatcher, DEFAULT_ROW_KEYWORDS};
use pretty_assertions::assert_eq;

#[test]
fn default_matcher_requires_apk_and_nodpi() {
    let matcher = KeywordMatcher::default();
    assert_eq!(matcher.keywords(), DEFAULT_ROW_KEYWORDS);
    assert!(matcher.is_case_sensitive());
}

#[test]
fn partial_match_is_rejected() {
    let matcher = KeywordMatcher::new(["APK", "nodpi"], true);
    assert!(!matcher.matches("Messenger 12.5 APK arm64-v8a 480dpi"));
    assert!(!matcher.matches("Messenger 12.5 BUNDLE nodpi"));
    assert_eq!(matcher.missing("Messenger 12.5 APK"), vec!["nodpi"]);
}

#[test]
fn full_match_is_accepted_in_any_order() {
    let matcher = KeywordMatcher::new(["APK", "nodpi"], true);
    assert!(matcher.matches("Messenger 12.5 APK nodpi"));
    assert!(matcher.matches("nodpi universal APK"));
    assert!(matcher.matches("variantAPKarm64nodpi"));
}

#[test]
fn case_sensitivity_follows_configuration() {
    let strict = KeywordMatcher::new(["APK", "nodpi"], true);
    let relaxed = KeywordMatcher::new(["APK", "nodpi"], false);
    let row = "messenger 12.5 apk NODPI";

    assert!(!strict.matches(row));
    assert!(relaxed.matches(row));
}

#[test]
fn blank_keywords_are_dropped() {
    let matcher = KeywordMatcher::new(["APK", "  ", ""], true);
    assert_eq!(matcher.keywords(), ["APK".to_string()]);
}
