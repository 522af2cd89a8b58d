use crate::UrlError;
use std::fmt;
use url::Url;

/// A URL with its fragment removed, used as the crawl's identity for deduplication
///
/// Two URLs that differ only in their fragment canonicalize to the same value.
/// Everything else (scheme, host, port, path, query) is kept exactly as the
/// `url` crate serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Parses and canonicalizes a URL string
    ///
    /// # Canonicalization Steps
    ///
    /// 1. Parse the URL; reject if malformed
    /// 2. Require an `http` or `https` scheme
    /// 3. Require a host
    /// 4. Remove the fragment (everything after #)
    ///
    /// # Arguments
    ///
    /// * `url_str` - The URL string to canonicalize
    ///
    /// # Returns
    ///
    /// * `Ok(CanonicalUrl)` - Canonical URL
    /// * `Err(UrlError)` - Failed to parse or validate the URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("https://example.com/page#section").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/page");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Canonicalizes an already parsed URL
    pub fn from_url(mut url: Url) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the canonical URL as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Consumes the wrapper and returns the parsed URL
    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_fragment() {
        let result = CanonicalUrl::parse("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = CanonicalUrl::parse("https://example.com/docs/page#section").unwrap();
        let twice = CanonicalUrl::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.as_str(), "https://example.com/docs/page");
    }

    #[test]
    fn test_fragment_variants_share_identity() {
        let a = CanonicalUrl::parse("https://example.com/page#one").unwrap();
        let b = CanonicalUrl::parse("https://example.com/page#two").unwrap();
        let c = CanonicalUrl::parse("https://example.com/page").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_query_is_preserved() {
        let result = CanonicalUrl::parse("https://example.com/search?q=rust&page=2#top").unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_http_scheme_is_kept() {
        let result = CanonicalUrl::parse("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(result.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = CanonicalUrl::parse("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let result = CanonicalUrl::parse("  https://example.com/page \n").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = CanonicalUrl::parse("ftp://example.com/file");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = CanonicalUrl::parse("not a url");
        assert!(matches!(result.unwrap_err(), UrlError::Parse(_)));
    }

    #[test]
    fn test_empty_string() {
        assert!(CanonicalUrl::parse("").is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        let url = CanonicalUrl::parse("https://example.com/a#b").unwrap();
        assert_eq!(url.to_string(), url.as_str());
    }
}
