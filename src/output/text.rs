//! Plain-text knowledge files

use crate::output::traits::{with_separators, KnowledgeDocument, KnowledgeFormat};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn separator() -> String {
    "=".repeat(50)
}

/// Plain-text format: header block, one `【title】` section per page, footer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl KnowledgeFormat for TextFormat {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &KnowledgeDocument<'_>) -> String {
        let mut out = String::new();

        out.push_str(&format!("Site: {}\n", document.source_url));
        out.push_str(&format!(
            "Retrieved: {}\n",
            document.generated_at.format(TIME_FORMAT)
        ));
        out.push_str(&format!("Pages: {}\n", document.pages.len()));
        out.push_str(&format!(
            "Characters: {}\n",
            with_separators(document.total_chars())
        ));
        out.push_str(&format!(
            "Tokens: {}\n",
            with_separators(document.total_tokens())
        ));
        out.push_str(&separator());
        out.push_str("\n\n");

        for (i, page) in document.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(&format!("\n{}\n\n", separator()));
            }

            out.push_str(&format!("【{}】\n", page.display_title()));
            if document.include_metadata {
                out.push_str(&format!("URL: {}\n", page.url));
                out.push_str(&format!(
                    "Retrieved: {}\n",
                    page.fetched_at.format(TIME_FORMAT)
                ));
                out.push_str(&format!(
                    "Characters: {}\n",
                    with_separators(page.char_count)
                ));
                out.push_str(&format!("Tokens: {}\n", with_separators(page.tokens)));
            }
            out.push('\n');
            out.push_str(&page.content);
        }

        out.push_str(&format!("\n\n{}\n", separator()));
        out.push_str(&format!(
            "Generated: {}\n",
            document.generated_at.format(TIME_FORMAT)
        ));
        out.push_str("Note: this file was generated automatically by crawling the site above. ");
        out.push_str("Follow the source site's terms of use.\n");

        out
    }
}
