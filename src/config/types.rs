use serde::Deserialize;

/// Settings file structure for Site-Harvest
///
/// Every section and key is optional; missing values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub scraping: ScrapingConfig,
    pub crawler: CrawlerConfig,
    pub parsing: ParsingConfig,
    pub output: OutputConfig,
}

/// HTTP and politeness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrapingConfig {
    /// User-Agent header sent with every request, robots.txt included
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout: u64,

    /// Maximum redirects followed per request
    pub max_redirects: usize,

    /// Whether robots.txt rules are enforced
    pub respect_robots_txt: bool,

    /// Exclude patterns (`*.ext` or substrings)
    pub exclude_patterns: Vec<String>,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; SiteHarvestBot/1.0)".to_string(),
            timeout: 30,
            max_redirects: 5,
            respect_robots_txt: true,
            exclude_patterns: ["/admin/", "/login/", "*.pdf", "*.jpg", "*.png", "*.gif", "*.svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Crawl loop settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Pause between batches, in seconds
    pub delay: f64,

    /// Maximum fetches in flight per batch
    pub concurrent: usize,

    /// Frontier soft cap multiplier: pending + collected stays below
    /// `queue_growth_factor * max_pages`
    pub queue_growth_factor: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay: 1.0,
            concurrent: 3,
            queue_growth_factor: 2,
        }
    }
}

/// Content extraction and cleanup settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParsingConfig {
    /// CSS selectors of noise regions removed before text extraction
    pub remove_elements: Vec<String>,

    /// Pages with less text than this are left out of the knowledge files
    pub min_text_length: usize,

    /// Whether extracted text gets whitespace normalization
    pub clean_whitespace: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            remove_elements: [
                "nav",
                "footer",
                "aside",
                "header",
                ".advertisement",
                ".ads",
                ".sidebar",
                ".menu",
                ".navigation",
                "script",
                "style",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_text_length: 100,
            clean_whitespace: true,
        }
    }
}

/// Knowledge-file output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// File name template; `{site_name}` and `{timestamp}` are substituted
    pub filename_template: String,

    /// Maximum size of one generated file, in megabytes
    pub max_file_size_mb: u64,

    /// Emit a table of contents in markdown output (only when more than 5 pages)
    pub add_table_of_contents: bool,

    /// Emit per-page metadata lines (URL, fetch time, character count)
    pub include_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_template: "{site_name}_{timestamp}".to_string(),
            max_file_size_mb: 15,
            add_table_of_contents: true,
            include_metadata: true,
        }
    }
}

impl OutputConfig {
    /// Maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
