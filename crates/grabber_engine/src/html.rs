//! Thin selection helpers over `scraper`.
//!
//! Parsed documents are not `Send`, so callers parse, select and copy out the
//! strings they need before the next `.await`.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::{Failure, FailureKind};

pub(crate) fn selector(css: &str) -> Result<Selector, Failure> {
    Selector::parse(css).map_err(|err| Failure::structure(format!("bad selector {css}: {err}")))
}

/// Text content with whitespace runs collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty, trimmed attribute value.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Rejects fragment, query-only and script references before URL joining.
pub(crate) fn is_followable(reference: &str) -> bool {
    let lower = reference.trim().to_ascii_lowercase();
    !(lower.is_empty()
        || lower.starts_with('#')
        || lower.starts_with('?')
        || lower.starts_with("javascript:"))
}

/// Resolves `href` against the post-redirect URL of the page it was found on.
pub(crate) fn resolve_link(page_url: &str, href: &str) -> Result<Url, Failure> {
    let base = Url::parse(page_url)
        .map_err(|err| Failure::new(FailureKind::InvalidUrl, format!("{page_url}: {err}")))?;
    base.join(href.trim()).map_err(|err| {
        Failure::new(
            FailureKind::InvalidUrl,
            format!("{href} against {page_url}: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{element_text, is_followable, resolve_link, selector};
    use scraper::Html;

    #[test]
    fn element_text_collapses_whitespace() {
        let doc = Html::parse_fragment("<div> Messenger\n  <b>12.5</b>\tAPK </div>");
        let sel = selector("div").unwrap();
        let div = doc.select(&sel).next().unwrap();
        assert_eq!(element_text(div), "Messenger 12.5 APK");
    }

    #[test]
    fn script_and_fragment_links_are_not_followable() {
        assert!(!is_followable("#top"));
        assert!(!is_followable("javascript:void(0)"));
        assert!(!is_followable("   "));
        assert!(is_followable("/apk/x"));
    }

    #[test]
    fn links_resolve_against_the_page_they_came_from() {
        let page = "https://site/apk/x/";
        assert_eq!(
            resolve_link(page, "download/?key=1").unwrap().as_str(),
            "https://site/apk/x/download/?key=1"
        );
        assert_eq!(
            resolve_link(page, "/wp-content/d.php").unwrap().as_str(),
            "https://site/wp-content/d.php"
        );
        assert_eq!(
            resolve_link(page, "https://cdn/f.apk").unwrap().as_str(),
            "https://cdn/f.apk"
        );
    }
}
