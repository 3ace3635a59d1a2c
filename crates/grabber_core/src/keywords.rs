/// Row keywords used when configuration does not name any.
pub const DEFAULT_ROW_KEYWORDS: [&str; 2] = ["APK", "nodpi"];

/// Conjunctive keyword predicate over a row's concatenated text.
///
/// A row is accepted only when every keyword occurs in it. A partial match is a
/// non-match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    case_sensitive: bool,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(Into::into)
            .map(|k: String| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords,
            case_sensitive,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn matches(&self, text: &str) -> bool {
        self.missing(text).is_empty()
    }

    /// Keywords absent from `text`, in configured order.
    pub fn missing<'a>(&'a self, text: &str) -> Vec<&'a str> {
        let haystack = if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        self.keywords
            .iter()
            .filter(|keyword| {
                if self.case_sensitive {
                    !haystack.contains(keyword.as_str())
                } else {
                    !haystack.contains(&keyword.to_lowercase())
                }
            })
            .map(String::as_str)
            .collect()
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_KEYWORDS, true)
    }
}
