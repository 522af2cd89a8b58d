//! Knowledge file generation
//!
//! Turns the crawler's page list into one or more files per format, split
//! by the configured size limit.

use crate::config::OutputConfig;
use crate::crawler::Page;
use crate::output::markdown::MarkdownFormat;
use crate::output::prepare::{prepare_pages, split_into_chunks};
use crate::output::text::TextFormat;
use crate::output::traits::{KnowledgeDocument, KnowledgeFormat, OutputError, OutputResult};
use crate::url::site_name;
use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

static PATH_HOSTILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

const MAX_FILENAME_CHARS: usize = 200;

/// Which file formats to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Txt,
    Md,
    #[default]
    All,
}

impl OutputFormat {
    /// Formats selected by this option, in write order
    pub fn formats(self) -> Vec<Box<dyn KnowledgeFormat>> {
        match self {
            OutputFormat::Txt => vec![Box::new(TextFormat)],
            OutputFormat::Md => vec![Box::new(MarkdownFormat)],
            OutputFormat::All => vec![Box::new(TextFormat), Box::new(MarkdownFormat)],
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "md" => Ok(OutputFormat::Md),
            "all" => Ok(OutputFormat::All),
            other => Err(OutputError::Format(format!(
                "unknown output format '{}' (expected txt, md or all)",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Md => "md",
            OutputFormat::All => "all",
        };
        f.write_str(name)
    }
}

/// Writes knowledge files for one crawl
#[derive(Debug, Clone)]
pub struct KnowledgeFileGenerator {
    output_dir: PathBuf,
    config: OutputConfig,
    format: OutputFormat,
    min_text_length: usize,
}

impl KnowledgeFileGenerator {
    /// Creates a generator
    ///
    /// # Arguments
    ///
    /// * `output_dir` - Directory files are written to (created if missing)
    /// * `config` - Output settings (template, size limit, TOC, metadata)
    /// * `format` - Which formats to write
    /// * `min_text_length` - Pages with less content are left out
    pub fn new(
        output_dir: impl Into<PathBuf>,
        config: OutputConfig,
        format: OutputFormat,
        min_text_length: usize,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
            format,
            min_text_length,
        }
    }

    /// Generates the files for a crawl of `source_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PathBuf>)` - Paths written, empty if no page survived preparation
    /// * `Err(OutputError)` - The directory or a file could not be written
    pub fn generate(&self, pages: &[Page], source_url: &str) -> OutputResult<Vec<PathBuf>> {
        let prepared = prepare_pages(pages, self.min_text_length);
        if prepared.is_empty() {
            tracing::warn!("No pages to write");
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let site = Url::parse(source_url)
            .map(|url| site_name(&url))
            .unwrap_or_else(|_| "unknown_site".to_string());
        let generated_at = Local::now();
        let base_name = sanitize_filename(&self.base_filename(&site, &generated_at));

        let max_bytes = usize::try_from(self.config.max_file_size_bytes()).unwrap_or(usize::MAX);
        let chunks = split_into_chunks(&prepared, max_bytes);
        let formats = self.format.formats();

        let mut written = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let suffix = if chunks.len() > 1 {
                format!("_part{}", i + 1)
            } else {
                String::new()
            };

            let document = KnowledgeDocument {
                site_name: &site,
                source_url,
                pages: chunk,
                generated_at,
                include_metadata: self.config.include_metadata,
                add_table_of_contents: self.config.add_table_of_contents,
            };

            for format in &formats {
                let filename = format!("{}{}.{}", base_name, suffix, format.extension());
                let path = self.output_dir.join(filename);
                write_file(&path, &format.render(&document))?;
                written.push(path);
            }
        }

        tracing::info!("Generated {} files in {}", written.len(), self.output_dir.display());
        Ok(written)
    }

    fn base_filename(&self, site: &str, generated_at: &DateTime<Local>) -> String {
        self.config
            .filename_template
            .replace("{site_name}", site)
            .replace("{timestamp}", &generated_at.format("%Y%m%d_%H%M%S").to_string())
    }
}

fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    std::fs::write(path, content)?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Makes a string safe to use as a file name
///
/// Path-hostile characters become `_`, runs of `_` collapse, leading and
/// trailing `_` are dropped, and the result is capped at 200 characters.
/// An empty result becomes `untitled`.
pub fn sanitize_filename(name: &str) -> String {
    let name = PATH_HOSTILE.replace_all(name, "_");
    let name = UNDERSCORE_RUNS.replace_all(&name, "_");
    let name = name.trim_matches('_');

    if name.is_empty() {
        return "untitled".to_string();
    }

    name.chars().take(MAX_FILENAME_CHARS).collect()
}
