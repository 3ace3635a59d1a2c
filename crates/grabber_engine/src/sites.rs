use grabber_core::{mirror_release_path, AppTarget};
use url::Url;

use crate::{Failure, FailureKind};

const DEFAULT_MIRROR_BASE: &str = "https://www.apkmirror.com/";
const DEFAULT_PORTAL_TEMPLATE: &str = "https://{name}.en.uptodown.com/android";
const DEFAULT_PORTAL_DOWNLOAD_BASE: &str = "https://dw.uptodown.com/dwn/";

/// Suffix that turns a portal version URL into its download detail page.
pub(crate) const PORTAL_DETAIL_SUFFIX: &str = "-x";

/// Hosts and URL templates for both distribution sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEndpoints {
    pub mirror_base: String,
    /// Per-app portal root; `{name}` is replaced with the app name.
    pub portal_base_template: String,
    /// Prefix the portal download token is appended to.
    pub portal_download_base: String,
}

impl Default for SiteEndpoints {
    fn default() -> Self {
        Self {
            mirror_base: DEFAULT_MIRROR_BASE.to_string(),
            portal_base_template: DEFAULT_PORTAL_TEMPLATE.to_string(),
            portal_download_base: DEFAULT_PORTAL_DOWNLOAD_BASE.to_string(),
        }
    }
}

impl SiteEndpoints {
    pub fn mirror_base_url(&self) -> Result<Url, Failure> {
        parse_url(&with_trailing_slash(&self.mirror_base))
    }

    pub fn mirror_uploads_url(&self, target: &AppTarget) -> Result<Url, Failure> {
        let mut url = join(&self.mirror_base_url()?, "uploads/")?;
        url.query_pairs_mut()
            .append_pair("appcategory", &target.app_name);
        Ok(url)
    }

    pub fn mirror_release_url(&self, target: &AppTarget, version: &str) -> Result<Url, Failure> {
        let path = mirror_release_path(target.organization_or_name(), &target.app_name, version);
        join(&self.mirror_base_url()?, &path)
    }

    pub fn portal_base_url(&self, target: &AppTarget) -> Result<Url, Failure> {
        let base = self
            .portal_base_template
            .replace("{name}", &target.app_name);
        parse_url(&with_trailing_slash(&base))
    }

    pub fn portal_versions_url(&self, target: &AppTarget) -> Result<Url, Failure> {
        join(&self.portal_base_url(target)?, "versions")
    }

    pub fn portal_feed_url(
        &self,
        target: &AppTarget,
        app_code: &str,
        page: u32,
    ) -> Result<Url, Failure> {
        join(
            &self.portal_base_url(target)?,
            &format!("apps/{app_code}/versions/{page}"),
        )
    }

    pub fn portal_download_url(&self, token: &str) -> Result<Url, Failure> {
        parse_url(&format!("{}{}", with_trailing_slash(&self.portal_download_base), token))
    }
}

fn with_trailing_slash(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}

fn parse_url(raw: &str) -> Result<Url, Failure> {
    Url::parse(raw).map_err(|err| Failure::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
}

fn join(base: &Url, reference: &str) -> Result<Url, Failure> {
    base.join(reference.trim()).map_err(|err| {
        Failure::new(
            FailureKind::InvalidUrl,
            format!("{reference} against {base}: {err}"),
        )
    })
}
