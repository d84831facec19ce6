//! # Export Pipeline
//!
//! Turns a draft (title + Markdown content) into a downloadable artifact in one
//! of four encodings. Export is read-only: nothing here touches the store.
//!
//! - `md` / `txt`: the content as-is, only the MIME type differs.
//! - `html`: [`html`] renders with pulldown-cmark and wraps the result in a
//!   self-contained page with an inline stylesheet.
//! - `pdf`: the content is parsed into a block list ([`blocks`]), laid out on
//!   A4 pages ([`layout`]) and written with printpdf ([`pdf`]).

use crate::error::{Result, RmdifyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub mod blocks;
pub mod html;
pub mod layout;
pub mod pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "txt")]
    Text,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "pdf")]
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Text => "text/plain",
            ExportFormat::Html => "text/html",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RmdifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            "html" | "htm" => Ok(ExportFormat::Html),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(RmdifyError::Api(format!(
                "Unknown export format: '{}' (expected md, txt, html or pdf)",
                other
            ))),
        }
    }
}

/// A rendered export, ready to be written out.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `content` in the requested format.
///
/// `file_name` is the base name without extension; the format's extension is
/// appended (an existing matching extension is not doubled).
pub fn export(
    title: &str,
    content: &str,
    file_name: &str,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Markdown | ExportFormat::Text => content.as_bytes().to_vec(),
        ExportFormat::Html => html::render_document(title, content).into_bytes(),
        ExportFormat::Pdf => {
            let blocks = blocks::parse(content);
            let pages = layout::layout(&blocks, &layout::PageSetup::a4());
            pdf::render(title, &pages)?
        }
    };

    let artifact = ExportArtifact {
        file_name: output_file_name(file_name, format),
        mime_type: format.mime_type(),
        bytes,
    };
    debug!(
        file = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "export rendered"
    );
    Ok(artifact)
}

/// Default export name for a title: whitespace runs become `-`, lowercase.
pub fn default_file_name(title: &str) -> String {
    let name = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    let name = sanitize_filename(&name);
    if name.is_empty() {
        "document".to_string()
    } else {
        name
    }
}

fn output_file_name(base: &str, format: ExportFormat) -> String {
    let ext = format.extension();
    let base = base.trim();
    let base = base
        .strip_suffix(&format!(".{}", ext))
        .unwrap_or(base);
    let base = sanitize_filename(base);
    let base = if base.is_empty() { "document" } else { &base };
    format!("{}.{}", base, ext)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string()
}
