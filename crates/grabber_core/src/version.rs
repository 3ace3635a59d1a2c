use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

/// Dotted numeric groups with optional dash qualifiers, e.g. `12.0` or `12.0.1-beta.2`.
pub const VERSION_PATTERN: &str = r"\d+(\.\d+)*(-[a-zA-Z0-9]+(\.\d+)*)*";

const PRERELEASE_MARKERS: &[&str] = &["alpha", "beta"];

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// Returns the leftmost substring of `text` matching [`VERSION_PATTERN`].
pub fn extract_version_token(text: &str) -> Option<&str> {
    version_regex().find(text).map(|m| m.as_str())
}

/// True when the listing title names an alpha or beta build, in any case.
pub fn is_prerelease(title: &str) -> bool {
    let lower = title.to_lowercase();
    PRERELEASE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// First version token among `titles`, in listing order, skipping pre-releases
/// and titles with no version token.
pub fn first_eligible_version<'a, I>(titles: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    titles
        .into_iter()
        .map(str::trim)
        .filter(|title| !is_prerelease(title))
        .find_map(extract_version_token)
        .map(ToOwned::to_owned)
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Num(&'a str),
    Text(&'a str),
}

fn segments(version: &str) -> impl Iterator<Item = Segment<'_>> {
    version.trim().split(['.', '-']).map(|part| {
        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            Segment::Num(part.trim_start_matches('0'))
        } else {
            Segment::Text(part)
        }
    })
}

fn compare_segment(a: &Segment<'_>, b: &Segment<'_>) -> Option<Ordering> {
    match (a, b) {
        // Leading zeros are stripped, so longer digit runs are larger.
        (Segment::Num(x), Segment::Num(y)) => Some(x.len().cmp(&y.len()).then_with(|| x.cmp(y))),
        (Segment::Text(x), Segment::Text(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Orders two site version strings segment by segment.
///
/// Segments are split on `.` and `-`. Numeric segments compare numerically and
/// text segments lexicographically. A numeric segment facing a text segment makes
/// the pair incomparable and yields `None`. When one string is a prefix of the
/// other, the longer one is greater.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let mut left = segments(a);
    let mut right = segments(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Some(Ordering::Equal),
            (Some(_), None) => return Some(Ordering::Greater),
            (None, Some(_)) => return Some(Ordering::Less),
            (Some(x), Some(y)) => match compare_segment(&x, &y)? {
                Ordering::Equal => continue,
                other => return Some(other),
            },
        }
    }
}

/// True only when `candidate` is definitely older than `target`.
pub fn is_older(candidate: &str, target: &str) -> bool {
    compare_versions(candidate, target) == Some(Ordering::Less)
}

/// True when every version on a feed page is older than `target`.
///
/// An empty page counts as exhausted.
pub fn all_older_than<'a, I>(versions: I, target: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().all(|v| is_older(v, target))
}

#[cfg(test)]
mod tests {
    use super::{segments, Segment};

    #[test]
    fn segments_strip_leading_zeros_and_keep_text() {
        let parsed: Vec<_> = segments("012.0-rc").collect();
        assert_eq!(
            parsed,
            vec![Segment::Num("12"), Segment::Num(""), Segment::Text("rc")]
        );
    }
}
