//! Portal version feed and app-code lookup.

use scraper::Html;
use serde::Deserialize;

use crate::html::{attr, selector};
use crate::Failure;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FeedEntry {
    pub version: String,
    #[serde(rename = "versionURL", default)]
    pub version_url: Option<String>,
}

impl FeedEntry {
    pub fn detail_url(&self) -> Option<&str> {
        self.version_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// One page of the portal's version feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub(crate) struct VersionFeed {
    #[serde(default)]
    pub data: Vec<FeedEntry>,
}

impl VersionFeed {
    pub fn from_value(value: serde_json::Value) -> Result<Self, Failure> {
        serde_json::from_value(value)
            .map_err(|err| Failure::structure(format!("unexpected version feed shape: {err}")))
    }
}

/// Stable internal app code carried by the versions page heading.
pub(crate) fn parse_app_code(html: &str) -> Result<String, Failure> {
    let doc = Html::parse_document(html);
    let heading_sel = selector("h1#detail-app-name")?;
    let heading = doc
        .select(&heading_sel)
        .next()
        .ok_or_else(|| Failure::structure("versions page has no #detail-app-name heading"))?;
    attr(heading, "data-code")
        .map(ToOwned::to_owned)
        .ok_or_else(|| Failure::structure("#detail-app-name heading has no data-code"))
}

#[cfg(test)]
mod tests {
    use super::{parse_app_code, VersionFeed};
    use crate::FailureKind;
    use serde_json::json;

    #[test]
    fn feed_without_data_is_an_empty_page() {
        let feed = VersionFeed::from_value(json!({"success": 1})).unwrap();
        assert!(feed.data.is_empty());
    }

    #[test]
    fn blank_detail_url_counts_as_absent() {
        let feed = VersionFeed::from_value(json!({
            "data": [{"version": "1.0", "versionURL": "  "}, {"version": "0.9"}]
        }))
        .unwrap();
        assert_eq!(feed.data[0].detail_url(), None);
        assert_eq!(feed.data[1].detail_url(), None);
    }

    #[test]
    fn non_object_feed_is_a_structure_mismatch() {
        let err = VersionFeed::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.kind, FailureKind::StructureMismatch);
    }

    #[test]
    fn app_code_requires_heading_and_attribute() {
        let ok = r#"<h1 id="detail-app-name" data-code="1234">App</h1>"#;
        assert_eq!(parse_app_code(ok).unwrap(), "1234");

        let bare = r#"<h1 id="detail-app-name">App</h1>"#;
        assert_eq!(
            parse_app_code(bare).unwrap_err().kind,
            FailureKind::StructureMismatch
        );
        assert_eq!(
            parse_app_code("<h1>App</h1>").unwrap_err().kind,
            FailureKind::StructureMismatch
        );
    }
}
