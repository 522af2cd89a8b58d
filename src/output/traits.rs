//! Output format traits and types
//!
//! This module defines the trait interface for knowledge-file formats and
//! the document model every format renders from.

use crate::output::prepare::PreparedPage;
use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One knowledge file's worth of content
#[derive(Debug, Clone)]
pub struct KnowledgeDocument<'a> {
    /// Short site name, e.g. `example` for `www.example.com`
    pub site_name: &'a str,

    /// The seed URL the crawl started from
    pub source_url: &'a str,

    /// Pages in this part
    pub pages: &'a [PreparedPage],

    /// When the file is generated
    pub generated_at: DateTime<Local>,

    /// Whether per-page metadata lines are written
    pub include_metadata: bool,

    /// Whether a table of contents may be written
    pub add_table_of_contents: bool,
}

impl KnowledgeDocument<'_> {
    /// Total characters of page content
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.char_count).sum()
    }

    /// Total estimated tokens of page content
    pub fn total_tokens(&self) -> usize {
        self.pages.iter().map(|p| p.tokens).sum()
    }

    /// Site name with its first letter upper-cased, for headings
    pub fn display_name(&self) -> String {
        let mut chars = self.site_name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Trait for knowledge-file formats
///
/// Implementations turn a [`KnowledgeDocument`] into the full file text.
/// Writing to disk is handled by the generator.
pub trait KnowledgeFormat {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Renders the complete file content
    fn render(&self, document: &KnowledgeDocument<'_>) -> String;
}

/// Formats a count with thousands separators (`12,345`)
pub(crate) fn with_separators(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
