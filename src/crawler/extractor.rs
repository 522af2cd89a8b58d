//! HTML content and link extraction
//!
//! This module handles parsing HTML content to extract:
//! - Page title
//! - Visible text with noise regions (navigation, footers, scripts...) removed
//! - Same-host links to follow, canonicalized and de-duplicated

use crate::url::{same_host, CanonicalUrl};
use crate::ConfigError;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static HORIZONTAL_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());
static SPACES_AROUND_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// The page title, or empty when the page has none
    pub title: String,

    /// Visible text with noise removed
    pub text: String,

    /// Same-host links in order of first appearance
    pub links: Vec<CanonicalUrl>,
}

/// Content and link extractor with pre-compiled noise selectors
#[derive(Debug, Clone)]
pub struct Extractor {
    noise: Vec<Selector>,
    clean_whitespace: bool,
    title: Selector,
    heading: Selector,
    body: Selector,
    anchor: Selector,
}

impl Extractor {
    /// Builds an extractor from CSS selectors of regions to strip
    ///
    /// # Arguments
    ///
    /// * `noise_selectors` - e.g. `["nav", "footer", ".ads", "script"]`
    /// * `clean_whitespace` - Whether to normalize whitespace in extracted text
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - All selectors compiled
    /// * `Err(ConfigError)` - A selector is not valid CSS
    pub fn new(noise_selectors: &[String], clean_whitespace: bool) -> Result<Self, ConfigError> {
        let noise = noise_selectors
            .iter()
            .map(|s| compile(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            noise,
            clean_whitespace,
            title: compile("title")?,
            heading: compile("h1")?,
            body: compile("body")?,
            anchor: compile("a[href]")?,
        })
    }

    /// Parses HTML content and extracts title, text, and links
    ///
    /// # Link Extraction Rules
    ///
    /// - Only `<a href="...">` targets are considered
    /// - `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only hrefs are skipped
    /// - Targets are resolved against `base_url`
    /// - Only links on the same host and port as `base_url` are kept
    /// - Each link is canonicalized (fragment removed) and kept once
    ///
    /// Links inside noise regions are dropped along with their text, so
    /// menus and footers do not feed the crawl.
    ///
    /// # Example
    ///
    /// ```
    /// use site_harvest::crawler::Extractor;
    /// use url::Url;
    ///
    /// let extractor = Extractor::new(&["nav".to_string()], true).unwrap();
    /// let html = r#"<html><head><title>Test</title></head>
    ///     <body><nav><a href="/menu">Menu</a></nav><p><a href="/hello">Hello</a></p></body></html>"#;
    /// let base = Url::parse("https://example.com/").unwrap();
    ///
    /// let page = extractor.extract(html, &base);
    /// assert_eq!(page.title, "Test");
    /// assert_eq!(page.text, "Hello");
    /// assert_eq!(page.links.len(), 1);
    /// assert_eq!(page.links[0].as_str(), "https://example.com/hello");
    /// ```
    pub fn extract(&self, html: &str, base_url: &Url) -> ExtractedContent {
        let mut document = Html::parse_document(html);

        let title = self.extract_title(&document);

        self.strip_noise(&mut document);
        let links = self.extract_links(&document, base_url);
        let raw_text = self.extract_text(&document);
        let text = if self.clean_whitespace {
            normalize_whitespace(&raw_text)
        } else {
            raw_text
        };

        ExtractedContent { title, text, links }
    }

    /// First non-empty `<title>`, falling back to the first `<h1>`
    fn extract_title(&self, document: &Html) -> String {
        [&self.title, &self.heading]
            .into_iter()
            .find_map(|selector| {
                document
                    .select(selector)
                    .next()
                    .map(|element| collapse_inline(&element.text().collect::<String>()))
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_default()
    }

    fn extract_links(&self, document: &Html, base_url: &Url) -> Vec<CanonicalUrl> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.anchor) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Some(link) = resolve_link(href, base_url) else {
                continue;
            };

            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        links
    }

    /// Detaches every element matched by a noise selector
    fn strip_noise(&self, document: &mut Html) {
        let doomed: Vec<_> = self
            .noise
            .iter()
            .flat_map(|selector| document.select(selector).map(|element| element.id()))
            .collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn extract_text(&self, document: &Html) -> String {
        match document.select(&self.body).next() {
            Some(body) => body.text().collect(),
            None => document.root_element().text().collect(),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Resolves a link href to a canonical same-host URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid or non-HTTP(S) URLs after resolution
/// - Links to another host or port
fn resolve_link(href: &str, base_url: &Url) -> Option<CanonicalUrl> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if !same_host(&absolute, base_url) {
        return None;
    }

    CanonicalUrl::from_url(absolute).ok()
}

/// Collapses all whitespace runs to single spaces (for one-line values)
fn collapse_inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes whitespace in extracted text
///
/// 1. Runs of horizontal whitespace collapse to one space
/// 2. Spaces hugging a newline are dropped
/// 3. Three or more consecutive newlines collapse to exactly two
/// 4. Leading and trailing whitespace is trimmed
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = SPACES_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extractor() -> Extractor {
        let noise: Vec<String> = ["nav", "footer", "aside", ".ads", "script", "style"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Extractor::new(&noise, true).unwrap()
    }

    fn links_of(html: &str) -> Vec<String> {
        extractor()
            .extract(html, &base_url())
            .links
            .into_iter()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test   Page  </title></head><body></body></html>"#;
        assert_eq!(extractor().extract(html, &base_url()).title, "Test Page");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = r#"<html><head></head><body><h1>Main Heading</h1></body></html>"#;
        assert_eq!(extractor().extract(html, &base_url()).title, "Main Heading");
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body><p>text</p></body></html>"#;
        assert_eq!(extractor().extract(html, &base_url()).title, "");
    }

    #[test]
    fn test_noise_regions_removed_from_text() {
        let html = r#"<html><body>
            <nav>Home | About</nav>
            <div class="ads">Buy now</div>
            <p>Real content</p>
            <script>var x = 1;</script>
            <style>p { color: red; }</style>
            <footer>Copyright</footer>
        </body></html>"#;
        let text = extractor().extract(html, &base_url()).text;
        assert_eq!(text, "Real content");
    }

    #[test]
    fn test_title_not_in_body_text() {
        let html = r#"<html><head><title>Title</title></head><body><p>Body</p></body></html>"#;
        assert_eq!(extractor().extract(html, &base_url()).text, "Body");
    }

    #[test]
    fn test_paragraph_breaks_preserved() {
        let html = "<html><body><p>First</p>\n\n\n\n<p>Second</p>\n<p>Third</p></body></html>";
        let text = extractor().extract(html, &base_url()).text;
        assert_eq!(text, "First\n\nSecond\nThird");
    }

    #[test]
    fn test_whitespace_disabled_keeps_raw_text() {
        let raw = Extractor::new(&[], false).unwrap();
        let html = "<html><body><p>a    b</p></body></html>";
        assert_eq!(raw.extract(html, &base_url()).text, "a    b");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t  b  "), "a b");
        assert_eq!(normalize_whitespace("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a  \n   \n  \n b"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\r\n\r\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\nb"), "a\nb");
        assert_eq!(normalize_whitespace("\n\n  "), "");
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        assert_eq!(links_of(html), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        assert_eq!(links_of(html), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_cross_domain_link_dropped() {
        let html = r#"<html><body>
            <a href="https://other.com/page">Other</a>
            <a href="https://sub.example.com/page">Sub</a>
            <a href="https://example.com:8443/page">Port</a>
            <a href="/kept">Kept</a>
        </body></html>"#;
        assert_eq!(links_of(html), vec!["https://example.com/kept"]);
    }

    #[test]
    fn test_fragment_stripped_and_deduplicated() {
        let html = r#"<html><body>
            <a href="/a#one">A1</a>
            <a href="/b">B</a>
            <a href="/a#two">A2</a>
            <a href="/a">A3</a>
        </body></html>"#;
        assert_eq!(
            links_of(html),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="JavaScript:alert(1)">JS2</a>
            <a href="mailto:test@example.com">Mail</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>x</h1>">Data</a>
            <a href="ftp://example.com/file">FTP</a>
        </body></html>"#;
        assert!(links_of(html).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a><a href="">Empty</a></body></html>"##;
        assert!(links_of(html).is_empty());
    }

    #[test]
    fn test_links_in_noise_regions_dropped() {
        let html = r#"<html><body>
            <nav><a href="/menu">Menu</a></nav>
            <p><a href="/article">Article</a></p>
            <footer><a href="/legal">Legal</a></footer>
            <aside><a href="/related">Related</a></aside>
        </body></html>"#;
        assert_eq!(links_of(html), vec!["https://example.com/article"]);
    }

    #[test]
    fn test_title_survives_noise_removal() {
        let noisy = Extractor::new(&["header".to_string()], true).unwrap();
        let html = r#"<html><body><header><h1>Site Name</h1></header><p>text</p></body></html>"#;
        assert_eq!(noisy.extract(html, &base_url()).title, "Site Name");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let result = Extractor::new(&["div[".to_string()], true);
        assert!(matches!(result, Err(ConfigError::InvalidSelector(_))));
    }

    #[test]
    fn test_non_html_input_does_not_panic() {
        let extracted = extractor().extract("just some plain text", &base_url());
        assert_eq!(extracted.text, "just some plain text");
        assert!(extracted.links.is_empty());
    }
}
