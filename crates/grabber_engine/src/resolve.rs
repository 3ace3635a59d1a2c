//! Latest-version discovery for both sites.

use engine_logging::{engine_debug, engine_info};
use grabber_core::{first_eligible_version, AppTarget, Source};
use scraper::Html;

use crate::feed::{parse_app_code, VersionFeed};
use crate::html::{element_text, selector};
use crate::transport::Transport;
use crate::{Failure, SiteEndpoints};

/// Latest non-pre-release version in listing order.
pub async fn resolve_latest(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    target: &AppTarget,
) -> Result<String, Failure> {
    let version = match target.source {
        Source::Mirror => resolve_mirror_latest(transport, sites, target).await?,
        Source::Portal => resolve_portal_latest(transport, sites, target).await?,
    };
    engine_info!("Latest version of {} is {}", target.display_name, version);
    Ok(version)
}

async fn resolve_mirror_latest(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    target: &AppTarget,
) -> Result<String, Failure> {
    let url = sites.mirror_uploads_url(target)?;
    let page = transport.fetch_page(url.as_str()).await?;
    let titles = mirror_listing_titles(&page.html)?;
    engine_debug!("{} listing entries at {}", titles.len(), page.url);

    first_eligible_version(titles.iter().map(String::as_str))
        .ok_or_else(|| Failure::not_found(format!("no eligible release listed at {}", page.url)))
}

async fn resolve_portal_latest(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    target: &AppTarget,
) -> Result<String, Failure> {
    let url = sites.portal_versions_url(target)?;
    let page = transport.fetch_page(url.as_str()).await?;
    let mut titles = portal_listing_titles(&page.html)?;

    // The HTML list is disclosed progressively; the feed's first page holds the
    // same entries.
    if titles.is_empty() {
        let app_code = parse_app_code(&page.html)?;
        let feed_url = sites.portal_feed_url(target, &app_code, 1)?;
        engine_debug!("versions list empty, reading feed {}", feed_url);
        let feed = VersionFeed::from_value(transport.fetch_json(feed_url.as_str()).await?)?;
        titles = feed.data.into_iter().map(|entry| entry.version).collect();
    }

    first_eligible_version(titles.iter().map(String::as_str))
        .ok_or_else(|| Failure::not_found(format!("no eligible release listed at {}", page.url)))
}

/// Title text of every upload row, skipping rows without a title link.
pub(crate) fn mirror_listing_titles(html: &str) -> Result<Vec<String>, Failure> {
    let doc = Html::parse_document(html);
    let row_sel = selector("div.appRow")?;
    let title_sel = selector("h5.appRowTitle a")?;

    Ok(doc
        .select(&row_sel)
        .filter_map(|row| row.select(&title_sel).next())
        .map(element_text)
        .collect())
}

pub(crate) fn portal_listing_titles(html: &str) -> Result<Vec<String>, Failure> {
    let doc = Html::parse_document(html);
    let version_sel = selector("#versions-items-list .version")?;

    Ok(doc
        .select(&version_sel)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect())
}
