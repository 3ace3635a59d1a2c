//! Per-app JSON configuration, loaded once per invocation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use grabber_core::{AppTarget, KeywordMatcher, Source, DEFAULT_ROW_KEYWORDS};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mirror,
    Portal,
}

impl From<SourceKind> for Source {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Mirror => Source::Mirror,
            SourceKind::Portal => Source::Portal,
        }
    }
}

/// Contents of `{config_dir}/{app_id}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub source: SourceKind,
    /// Site-internal app name (mirror slug or portal subdomain).
    pub name: String,
    /// Mirror organization path segment.
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Pinned version; empty or absent means "latest".
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive_keywords: bool,
}

fn default_case_sensitive() -> bool {
    true
}

pub fn config_path(config_dir: &Path, app_id: &str) -> Result<PathBuf> {
    let valid = !app_id.is_empty()
        && app_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !app_id.starts_with('.');
    if !valid {
        bail!("invalid app identifier {app_id:?}");
    }
    Ok(config_dir.join(format!("{app_id}.json")))
}

impl AppConfig {
    pub fn load(config_dir: &Path, app_id: &str) -> Result<Self> {
        let path = config_path(config_dir, app_id)?;
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("`name` must not be empty");
        }
        if self.source == SourceKind::Mirror
            && self.org.as_deref().map_or(true, |org| org.trim().is_empty())
        {
            bail!("mirror apps need an `org`");
        }
        if let Some(keywords) = &self.keywords {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                bail!("`keywords` must name at least one keyword");
            }
        }
        Ok(())
    }

    pub fn pinned_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }

    pub fn to_target(&self) -> AppTarget {
        let name = self.name.trim();
        let target = match self.source {
            SourceKind::Mirror => AppTarget::mirror(self.org.as_deref().unwrap_or(name).trim(), name),
            SourceKind::Portal => AppTarget::portal(name),
        };
        let keywords = match &self.keywords {
            Some(keywords) => KeywordMatcher::new(keywords.iter().cloned(), self.case_sensitive_keywords),
            None => KeywordMatcher::new(DEFAULT_ROW_KEYWORDS, self.case_sensitive_keywords),
        };
        let target = target.with_row_keywords(keywords);
        match &self.display_name {
            Some(display) if !display.trim().is_empty() => target.with_display_name(display.trim()),
            _ => target,
        }
    }
}
