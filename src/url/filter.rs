/// A single exclude pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExcludePattern {
    /// `*.ext` - rejects URLs whose lowercased form ends with `.ext`
    Extension(String),
    /// Any other pattern - rejects URLs whose lowercased form contains it
    Substring(String),
}

impl ExcludePattern {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix("*.") {
            Some(extension) => Self::Extension(format!(".{}", extension.to_lowercase())),
            None => Self::Substring(pattern.to_lowercase()),
        }
    }

    fn matches(&self, url_lower: &str) -> bool {
        match self {
            Self::Extension(suffix) => url_lower.ends_with(suffix.as_str()),
            Self::Substring(needle) => url_lower.contains(needle.as_str()),
        }
    }
}

/// Static URL filter built from the configured exclude patterns
///
/// This filter supports two kinds of patterns:
/// 1. Extension patterns: `"*.pdf"` rejects any URL ending in `.pdf`
/// 2. Substring patterns: `"/admin/"` rejects any URL containing `/admin/`
///
/// Matching is case-insensitive and the first matching pattern rejects the
/// URL. A URL that matches no pattern is allowed.
///
/// # Examples
///
/// ```
/// use site_harvest::url::UrlFilter;
///
/// let filter = UrlFilter::new(&["*.pdf".to_string(), "/admin/".to_string()]);
///
/// assert!(filter.is_allowed("https://example.com/docs/intro"));
/// assert!(!filter.is_allowed("https://example.com/files/Report.PDF"));
/// assert!(!filter.is_allowed("https://example.com/admin/users"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    patterns: Vec<ExcludePattern>,
}

impl UrlFilter {
    /// Builds a filter from raw pattern strings; empty patterns are ignored
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(ExcludePattern::parse)
                .collect(),
        }
    }

    /// Returns true if no exclude pattern matches the URL
    pub fn is_allowed(&self, url: &str) -> bool {
        let url_lower = url.to_lowercase();
        !self.patterns.iter().any(|p| p.matches(&url_lower))
    }

    /// Number of active patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the filter has no patterns and allows everything
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
