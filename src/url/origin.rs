use url::{Origin, Url};

/// Derives the origin (scheme + host + port) of a URL
///
/// The returned string is the key for robots.txt scoping. Default ports are
/// omitted, so `https://example.com:443/` and `https://example.com/` share an
/// origin.
///
/// # Returns
///
/// * `Some(String)` - e.g. `"https://example.com"` or `"http://127.0.0.1:8080"`
/// * `None` - If the URL has an opaque origin (no host, non-network scheme)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::origin_of;
///
/// let url = Url::parse("https://example.com/path?q=1").unwrap();
/// assert_eq!(origin_of(&url), Some("https://example.com".to_string()));
/// ```
pub fn origin_of(url: &Url) -> Option<String> {
    match url.origin() {
        origin @ Origin::Tuple(..) => Some(origin.ascii_serialization()),
        Origin::Opaque(_) => None,
    }
}

/// Checks whether two URLs point at the same host and effective port
///
/// This is the same-site test the link extractor uses to keep the crawl from
/// leaving the seed's site.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(host_a), Some(host_b)) => {
            host_a.eq_ignore_ascii_case(host_b)
                && a.port_or_known_default() == b.port_or_known_default()
        }
        _ => false,
    }
}

/// Extracts a short site name from a URL for use in output file names
///
/// The host is lowercased, a leading `www.` is dropped, and only the first
/// label is kept: `https://www.Example.co.jp/` becomes `example`.
pub fn site_name(url: &Url) -> String {
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return "unknown_site".to_string(),
    };

    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.split('.').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_origin_simple() {
        assert_eq!(
            origin_of(&url("https://example.com/page")),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_origin_keeps_non_default_port() {
        assert_eq!(
            origin_of(&url("http://127.0.0.1:8080/a/b")),
            Some("http://127.0.0.1:8080".to_string())
        );
    }

    #[test]
    fn test_origin_drops_default_port() {
        assert_eq!(
            origin_of(&url("https://example.com:443/")),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_origin_lowercases_host() {
        assert_eq!(
            origin_of(&url("https://EXAMPLE.COM/")),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_origin_opaque() {
        assert_eq!(origin_of(&url("data:text/plain,hello")), None);
    }

    #[test]
    fn test_same_host() {
        assert!(same_host(&url("https://example.com/a"), &url("https://example.com/b")));
        assert!(same_host(&url("https://example.com/"), &url("https://example.com:443/x")));
        assert!(!same_host(&url("https://example.com/"), &url("https://other.com/")));
        assert!(!same_host(&url("https://example.com/"), &url("https://blog.example.com/")));
        assert!(!same_host(&url("http://localhost:8080/"), &url("http://localhost:9090/")));
    }

    #[test]
    fn test_site_name() {
        assert_eq!(site_name(&url("https://www.example.com/")), "example");
        assert_eq!(site_name(&url("https://docs.rust-lang.org/book")), "docs");
        assert_eq!(site_name(&url("https://Example.co.jp/")), "example");
        assert_eq!(site_name(&url("http://127.0.0.1:3000/")), "127");
    }
}
