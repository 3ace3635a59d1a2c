//! Following confirmation pages to the final binary URL.

use engine_logging::{engine_debug, engine_info};
use grabber_core::{artifact_file_name, AppTarget, Source};
use scraper::Html;

use crate::html::{attr, is_followable, resolve_link, selector};
use crate::transport::Transport;
use crate::{CandidatePage, DownloadTarget, Failure, SiteEndpoints};

const NOMINAL_EXTENSION: &str = "apk";

/// Resolves a candidate page to the final download URL.
///
/// No retries: a missing element is reported as `StructureMismatch`, distinct
/// from the transport failures the fetches themselves may raise.
pub async fn extract(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    target: &AppTarget,
    version: &str,
    candidate: &CandidatePage,
) -> Result<DownloadTarget, Failure> {
    let final_url = match target.source {
        Source::Mirror => extract_mirror(transport, candidate).await?,
        Source::Portal => extract_portal(transport, sites, candidate).await?,
    };
    engine_info!("Download link for {} {}: {}", target.display_name, version, final_url);
    Ok(DownloadTarget {
        final_url,
        suggested_filename: artifact_file_name(&target.app_name, version, NOMINAL_EXTENSION),
    })
}

async fn extract_mirror(
    transport: &dyn Transport,
    candidate: &CandidatePage,
) -> Result<String, Failure> {
    let variant = transport.fetch_page(&candidate.url).await?;
    let button_href = find_download_button(&variant.html)?;
    let confirm_url = resolve_link(&variant.url, &button_href)?;
    engine_debug!("following download button to {}", confirm_url);

    let confirm = transport.fetch_page(confirm_url.as_str()).await?;
    let binary_href = find_nofollow_link(&confirm.html)?;
    Ok(resolve_link(&confirm.url, &binary_href)?.to_string())
}

async fn extract_portal(
    transport: &dyn Transport,
    sites: &SiteEndpoints,
    candidate: &CandidatePage,
) -> Result<String, Failure> {
    let detail = transport.fetch_page(&candidate.url).await?;
    let token = find_download_token(&detail.html)?;
    Ok(sites.portal_download_url(&token)?.to_string())
}

pub(crate) fn find_download_button(html: &str) -> Result<String, Failure> {
    let doc = Html::parse_document(html);
    let button_sel = selector("a.downloadButton")?;
    let button = doc
        .select(&button_sel)
        .next()
        .ok_or_else(|| Failure::structure("variant page has no a.downloadButton"))?;
    attr(button, "href")
        .filter(|href| is_followable(href))
        .map(ToOwned::to_owned)
        .ok_or_else(|| Failure::structure("a.downloadButton has no usable href"))
}

/// The outbound `rel="nofollow"` link on the confirmation page is the binary.
pub(crate) fn find_nofollow_link(html: &str) -> Result<String, Failure> {
    let doc = Html::parse_document(html);
    let link_sel = selector(r#"a[rel="nofollow"]"#)?;
    let link = doc
        .select(&link_sel)
        .next()
        .ok_or_else(|| Failure::structure("confirmation page has no a[rel=nofollow]"))?;
    attr(link, "href")
        .filter(|href| is_followable(href))
        .map(ToOwned::to_owned)
        .ok_or_else(|| Failure::structure("a[rel=nofollow] has no usable href"))
}

pub(crate) fn find_download_token(html: &str) -> Result<String, Failure> {
    let doc = Html::parse_document(html);
    let button_sel = selector("button#detail-download-button")?;
    let button = doc
        .select(&button_sel)
        .next()
        .ok_or_else(|| Failure::structure("detail page has no #detail-download-button"))?;
    attr(button, "data-url")
        .map(ToOwned::to_owned)
        .ok_or_else(|| Failure::structure("#detail-download-button has no data-url"))
}

#[cfg(test)]
mod tests {
    use super::{find_download_button, find_download_token, find_nofollow_link};
    use crate::FailureKind;

    #[test]
    fn download_button_href_is_returned_verbatim() {
        let html = r#"<a class="btn downloadButton" href="/apk/x/download/">Download APK</a>"#;
        assert_eq!(find_download_button(html).unwrap(), "/apk/x/download/");
    }

    #[test]
    fn first_nofollow_link_wins() {
        let html = r#"
            <a href="/elsewhere">home</a>
            <a rel="nofollow" href="/wp-content/download.php?id=1">here</a>
            <a rel="nofollow" href="/other">other</a>
        "#;
        assert_eq!(
            find_nofollow_link(html).unwrap(),
            "/wp-content/download.php?id=1"
        );
    }

    #[test]
    fn button_without_token_is_structure_mismatch() {
        let html = r#"<button id="detail-download-button">Download</button>"#;
        let err = find_download_token(html).unwrap_err();
        assert_eq!(err.kind, FailureKind::StructureMismatch);
        assert!(err.message.contains("data-url"));
    }

    #[test]
    fn token_is_read_from_data_url() {
        let html = r#"<button id="detail-download-button" data-url="abc123==">Download</button>"#;
        assert_eq!(find_download_token(html).unwrap(), "abc123==");
    }
}
