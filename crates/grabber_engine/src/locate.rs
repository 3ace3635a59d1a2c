//! Finding the page that names the real binary for a resolved version.

use std::collections::BTreeSet;

use engine_logging::{engine_debug, engine_info, engine_warn};
use grabber_core::{all_older_than, AppTarget, KeywordMatcher, Source};
use scraper::Html;

use crate::feed::{parse_app_code, VersionFeed};
use crate::html::{attr, element_text, is_followable, resolve_link, selector};
use crate::sites::PORTAL_DETAIL_SUFFIX;
use crate::transport::Transport;
use crate::{CandidatePage, Failure, FetchSettings, SiteEndpoints};

pub async fn locate(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    settings: &FetchSettings,
    target: &AppTarget,
    version: &str,
) -> Result<CandidatePage, Failure> {
    let candidate = match target.source {
        Source::Mirror => locate_mirror(transport, sites, target, version).await?,
        Source::Portal => {
            locate_portal(transport, sites, settings.max_portal_pages, target, version).await?
        }
    };
    engine_info!("Candidate page for {} {}: {}", target.display_name, version, candidate.url);
    Ok(candidate)
}

async fn locate_mirror(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    target: &AppTarget,
    version: &str,
) -> Result<CandidatePage, Failure> {
    let url = sites.mirror_release_url(target, version)?;
    let page = transport.fetch_page(url.as_str()).await?;
    match_mirror_row(&page.html, &page.url, &target.row_keywords)
}

/// First variant row whose text carries every keyword.
///
/// No matching row is `NotFound`; matching rows that all lack a link mean the
/// layout changed and yield `StructureMismatch`.
pub(crate) fn match_mirror_row(
    html: &str,
    page_url: &str,
    keywords: &KeywordMatcher,
) -> Result<CandidatePage, Failure> {
    let doc = Html::parse_document(html);
    let row_sel = selector("div.table-row.headerFont")?;
    let link_sel = selector("a.accent_color")?;

    let mut matched_without_link = 0usize;
    for row in doc.select(&row_sel) {
        let text = element_text(row);
        if !keywords.matches(&text) {
            engine_debug!("row rejected, missing {:?}: {}", keywords.missing(&text), text);
            continue;
        }
        let href = row
            .select(&link_sel)
            .find_map(|link| attr(link, "href"))
            .filter(|href| is_followable(href));
        match href {
            Some(href) => {
                let url = resolve_link(page_url, href)?;
                return Ok(CandidatePage {
                    url: url.to_string(),
                    matched_keywords: keywords.keywords().iter().cloned().collect(),
                });
            }
            None => matched_without_link += 1,
        }
    }

    if matched_without_link > 0 {
        return Err(Failure::structure(format!(
            "{matched_without_link} row(s) matched {:?} but carried no variant link",
            keywords.keywords()
        )));
    }
    Err(Failure::not_found(format!(
        "no variant row contains all of {:?}",
        keywords.keywords()
    )))
}

async fn locate_portal(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    max_pages: u32,
    target: &AppTarget,
    version: &str,
) -> Result<CandidatePage, Failure> {
    let versions_url = sites.portal_versions_url(target)?;
    let page = transport.fetch_page(versions_url.as_str()).await?;
    let app_code = parse_app_code(&page.html)?;
    engine_debug!("portal app code for {} is {}", target.app_name, app_code);

    for page_no in 1..=max_pages {
        let feed_url = sites.portal_feed_url(target, &app_code, page_no)?;
        let feed = VersionFeed::from_value(transport.fetch_json(feed_url.as_str()).await?)?;

        match scan_feed_page(&feed, version) {
            FeedScan::Found(detail) => {
                let url = resolve_link(&page.url, detail)?;
                return Ok(CandidatePage {
                    url: format!("{url}{PORTAL_DETAIL_SUFFIX}"),
                    matched_keywords: BTreeSet::new(),
                });
            }
            FeedScan::Exhausted => {
                return Err(Failure::not_found(format!(
                    "version {version} not listed; feed page {page_no} holds only older versions"
                )));
            }
            FeedScan::Continue => {}
        }
    }

    Err(Failure::not_found(format!(
        "version {version} not found within {max_pages} feed pages"
    )))
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FeedScan<'a> {
    Found(&'a str),
    /// Every entry is older than the target, so later pages cannot hold it.
    Exhausted,
    Continue,
}

/// Looks for an exact version match on one feed page.
///
/// Assumes entries are in descending version order. Matching entries without a
/// detail URL are skipped.
pub(crate) fn scan_feed_page<'a>(feed: &'a VersionFeed, version: &str) -> FeedScan<'a> {
    for entry in feed.data.iter().filter(|entry| entry.version == version) {
        match entry.detail_url() {
            Some(detail) => return FeedScan::Found(detail),
            None => engine_warn!("feed entry for {} has no versionURL", entry.version),
        }
    }
    if all_older_than(feed.data.iter().map(|entry| entry.version.as_str()), version) {
        FeedScan::Exhausted
    } else {
        FeedScan::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::{match_mirror_row, scan_feed_page, FeedScan};
    use crate::feed::VersionFeed;
    use crate::FailureKind;
    use grabber_core::KeywordMatcher;
    use serde_json::json;
    const RELEASE_PAGE: &str = "https://site/apk/org/app/app-12-5-release/";

    fn feed(value: serde_json::Value) -> VersionFeed {
        VersionFeed::from_value(value).unwrap()
    }

    #[test]
    fn matching_row_yields_absolute_link() {
        let html = r#"<div class="table-row headerFont">
            <div class="table-cell"><a class="accent_color" href="/apk/x">Messenger 12.5</a></div>
            <div class="table-cell">APK</div><div class="table-cell">nodpi</div>
        </div>"#;
        let candidate = match_mirror_row(html, RELEASE_PAGE, &KeywordMatcher::default()).unwrap();
        assert_eq!(candidate.url, "https://site/apk/x");
        assert!(candidate.matched_keywords.contains("nodpi"));
    }

    #[test]
    fn document_relative_row_link_resolves_under_the_release_page() {
        let html = r#"<div class="table-row headerFont">
            <a class="accent_color" href="variant-1/">Messenger 12.5</a> APK nodpi
        </div>"#;
        let candidate = match_mirror_row(html, RELEASE_PAGE, &KeywordMatcher::default()).unwrap();
        assert_eq!(
            candidate.url,
            "https://site/apk/org/app/app-12-5-release/variant-1/"
        );
    }

    #[test]
    fn matching_row_without_link_is_structure_mismatch() {
        let html = r#"<div class="table-row headerFont">Messenger 12.5 APK nodpi</div>"#;
        let err = match_mirror_row(html, RELEASE_PAGE, &KeywordMatcher::default()).unwrap_err();
        assert_eq!(err.kind, FailureKind::StructureMismatch);
    }

    #[test]
    fn entry_without_detail_url_is_skipped() {
        let page = feed(json!({"data": [
            {"version": "12.3"},
            {"version": "12.3", "versionURL": "https://p/app/download/9"}
        ]}));
        assert_eq!(
            scan_feed_page(&page, "12.3"),
            FeedScan::Found("https://p/app/download/9")
        );
    }

    #[test]
    fn only_matching_entry_without_url_continues_when_not_all_older() {
        let page = feed(json!({"data": [{"version": "12.3"}, {"version": "12.2"}]}));
        assert_eq!(scan_feed_page(&page, "12.3"), FeedScan::Continue);
    }

    #[test]
    fn empty_page_is_exhausted() {
        assert_eq!(scan_feed_page(&VersionFeed::default(), "1.0"), FeedScan::Exhausted);
    }
}
