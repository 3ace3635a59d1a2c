use std::fmt;
use std::str::FromStr;

use crate::KeywordMatcher;

/// Distribution site an app is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Mirror-listing site with `org/app/version` detail pages.
    Mirror,
    /// Download portal with a paginated JSON version feed.
    Portal,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Mirror => write!(f, "mirror"),
            Source::Portal => write!(f, "portal"),
        }
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirror" => Ok(Source::Mirror),
            "portal" => Ok(Source::Portal),
            other => Err(format!("unknown source {other:?} (expected mirror or portal)")),
        }
    }
}

/// Which site and path segments to use for one app. Built once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    pub source: Source,
    pub organization: Option<String>,
    pub app_name: String,
    pub display_name: String,
    /// Keywords a mirror variant row must contain to be accepted.
    pub row_keywords: KeywordMatcher,
}

impl AppTarget {
    pub fn mirror(organization: impl Into<String>, app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            source: Source::Mirror,
            organization: Some(organization.into()),
            display_name: app_name.clone(),
            app_name,
            row_keywords: KeywordMatcher::default(),
        }
    }

    pub fn portal(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            source: Source::Portal,
            organization: None,
            display_name: app_name.clone(),
            app_name,
            row_keywords: KeywordMatcher::default(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_row_keywords(mut self, keywords: KeywordMatcher) -> Self {
        self.row_keywords = keywords;
        self
    }

    /// Organization path segment, falling back to the app name when unset.
    pub fn organization_or_name(&self) -> &str {
        self.organization.as_deref().unwrap_or(&self.app_name)
    }
}

impl fmt::Display for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.organization {
            Some(org) => write!(f, "{}:{}/{}", self.source, org, self.app_name),
            None => write!(f, "{}:{}", self.source, self.app_name),
        }
    }
}
