//! Output module for generating knowledge files
//!
//! This module handles:
//! - Filtering and cleaning collected pages
//! - Splitting output into size-limited parts
//! - Rendering plain-text and markdown knowledge files

mod generator;
mod markdown;
mod prepare;
mod text;
mod traits;

pub use generator::{sanitize_filename, KnowledgeFileGenerator, OutputFormat};
pub use markdown::MarkdownFormat;
pub use prepare::{clean_content, estimate_tokens, prepare_pages, split_into_chunks, PreparedPage};
pub use text::TextFormat;
pub use traits::{KnowledgeDocument, KnowledgeFormat, OutputError, OutputResult};
