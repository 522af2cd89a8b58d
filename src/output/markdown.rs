//! Markdown knowledge files
//!
//! This module renders collected pages as a single markdown document with a
//! site header, an optional table of contents, and one section per page.

use crate::output::traits::{with_separators, KnowledgeDocument, KnowledgeFormat};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Table of contents is only written above this many pages
const TOC_MIN_PAGES: usize = 5;

/// Markdown format
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormat;

impl KnowledgeFormat for MarkdownFormat {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, document: &KnowledgeDocument<'_>) -> String {
        let mut md = String::new();

        // Header (trailing double spaces are markdown line breaks)
        md.push_str(&format!("# {} - Knowledge Base\n\n", document.display_name()));
        md.push_str(&format!("**Source URL**: {}  \n", document.source_url));
        md.push_str(&format!(
            "**Retrieved**: {}  \n",
            document.generated_at.format(TIME_FORMAT)
        ));
        md.push_str(&format!("**Pages**: {}  \n", document.pages.len()));
        md.push_str(&format!(
            "**Characters**: {}  \n",
            with_separators(document.total_chars())
        ));
        md.push_str(&format!(
            "**Tokens**: {}\n\n",
            with_separators(document.total_tokens())
        ));

        if document.add_table_of_contents && document.pages.len() > TOC_MIN_PAGES {
            md.push_str(&format_toc(document));
            md.push_str("\n\n");
        }

        for (i, page) in document.pages.iter().enumerate() {
            if i > 0 {
                md.push_str("\n---\n\n");
            }

            md.push_str(&format!("## {}\n\n", page.display_title()));
            if document.include_metadata {
                md.push_str(&format!("**URL**: {}  \n", page.url));
                md.push_str(&format!(
                    "**Retrieved**: {}  \n",
                    page.fetched_at.format(TIME_FORMAT)
                ));
                md.push_str(&format!(
                    "**Characters**: {}  \n",
                    with_separators(page.char_count)
                ));
                md.push_str(&format!(
                    "**Tokens**: {}\n\n",
                    with_separators(page.tokens)
                ));
            }
            md.push_str(&page.content);
        }

        md.push_str("\n\n---\n\n");
        md.push_str("## Generation Info\n\n");
        md.push_str(&format!(
            "**Generated**: {}  \n",
            document.generated_at.format(TIME_FORMAT)
        ));
        md.push_str("**Note**: This file was generated automatically by crawling the site above. ");
        md.push_str("Follow the source site's terms of use.\n");

        md
    }
}

/// Numbered list of page titles linking to their section anchors
fn format_toc(document: &KnowledgeDocument<'_>) -> String {
    let mut toc = String::from("## Table of Contents\n\n");
    for (i, page) in document.pages.iter().enumerate() {
        let title = page.display_title();
        toc.push_str(&format!("{}. [{}](#{})\n", i + 1, title, anchor(title)));
    }
    toc
}

/// Heading anchor: lowercased, spaces (including ideographic) become `-`
fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '\u{3000}' { '-' } else { c })
        .collect()
}
