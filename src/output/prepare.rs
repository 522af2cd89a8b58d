//! Page preparation for knowledge files
//!
//! Filters out pages too short to be useful, cleans their text, and groups
//! them into parts that respect the file size limit.

use crate::crawler::Page;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static SPECIAL_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{00A0}\u{2000}-\u{200B}\u{2028}\u{2029}]").unwrap());
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());
static JAPANESE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Hiragana}\p{Katakana}\p{Han}]").unwrap());

/// Estimated bytes of header and footer per file
pub const HEADER_ESTIMATE: usize = 1000;

/// Estimated formatting overhead per page
pub const PAGE_OVERHEAD: usize = 200;

/// A page ready to be written into a knowledge file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPage {
    pub url: String,
    pub title: String,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
    pub depth: u32,
    pub char_count: usize,
    pub tokens: usize,
}

impl PreparedPage {
    /// Estimated bytes this page adds to a file
    pub fn estimated_size(&self) -> usize {
        self.content.len() + self.title.len() + PAGE_OVERHEAD
    }

    /// Title, or `Untitled` when the page had none
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

/// Prepares crawled pages for output
///
/// Pages whose raw content is shorter than `min_text_length` characters are
/// dropped, the rest are cleaned, and pages left empty by cleaning are
/// dropped too. Order is preserved.
pub fn prepare_pages(pages: &[Page], min_text_length: usize) -> Vec<PreparedPage> {
    let prepared: Vec<PreparedPage> = pages
        .iter()
        .filter_map(|page| {
            if page.content.chars().count() < min_text_length {
                tracing::debug!("Too short, not written: {}", page.url);
                return None;
            }

            let content = clean_content(&page.content);
            if content.is_empty() {
                tracing::debug!("Empty after cleaning, not written: {}", page.url);
                return None;
            }

            Some(PreparedPage {
                url: page.url.to_string(),
                title: page.title.clone(),
                char_count: content.chars().count(),
                tokens: estimate_tokens(&content),
                content,
                fetched_at: page.fetched_at,
                depth: page.depth,
            })
        })
        .collect();

    tracing::info!(
        "Prepared {} of {} pages for output",
        prepared.len(),
        pages.len()
    );
    prepared
}

/// Cleans page text for output
///
/// - Every line is trimmed
/// - Runs of blank lines collapse to a single blank line
/// - Non-breaking and zero-width spaces become plain spaces
/// - Control characters other than newline and tab are removed
pub fn clean_content(content: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in content.trim().lines() {
        let line = line.trim();
        if !line.is_empty() || lines.last().is_some_and(|last| !last.is_empty()) {
            lines.push(line);
        }
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    let text = lines.join("\n");
    let text = SPECIAL_SPACES.replace_all(&text, " ");
    CONTROL_CHARS.replace_all(&text, "").into_owned()
}

/// Rough token count for a piece of text
///
/// Text where more than 30% of characters are hiragana, katakana or kanji
/// counts 0.7 tokens per character. Anything else counts 1.3 tokens per
/// whitespace-separated word. Results are floored.
pub fn estimate_tokens(text: &str) -> usize {
    let total_chars = text.chars().count();
    if total_chars == 0 {
        return 0;
    }

    let japanese_chars = JAPANESE_CHARS.find_iter(text).count();
    if japanese_chars * 10 > total_chars * 3 {
        total_chars * 7 / 10
    } else {
        text.split_whitespace().count() * 13 / 10
    }
}

/// Groups pages into parts whose estimated size stays under `max_bytes`
///
/// A page larger than the limit on its own still gets a part of its own.
pub fn split_into_chunks(pages: &[PreparedPage], max_bytes: usize) -> Vec<&[PreparedPage]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut current_size = 0;

    for (i, page) in pages.iter().enumerate() {
        let page_size = page.estimated_size();
        if i > start && current_size + page_size + HEADER_ESTIMATE > max_bytes {
            chunks.push(&pages[start..i]);
            start = i;
            current_size = 0;
        }
        current_size += page_size;
    }

    if start < pages.len() {
        chunks.push(&pages[start..]);
    }

    if chunks.len() > 1 {
        tracing::info!("Size limit splits output into {} parts", chunks.len());
    }
    chunks
}
