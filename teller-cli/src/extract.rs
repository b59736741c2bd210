//! Statement text acquisition.
//!
//! PDF statements go through `pdf-extract`, one page after another; `CSV`
//! inputs are statement text that was already extracted elsewhere and are read
//! as-is.

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Pdf,
    #[default]
    Csv,
}

pub fn statement_text(path: &Path, filetype: FileType) -> Result<String> {
    let text = match filetype {
        FileType::Pdf => pdf_text(path)?,
        FileType::Csv => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
    };
    debug!(path = %path.display(), ?filetype, chars = text.len(), "extracted statement text");
    Ok(text)
}

fn pdf_text(path: &Path) -> Result<String> {
    let full_text = pdf_extract::extract_text(path)
        .map_err(|e| anyhow!("extracting text from {}: {e}", path.display()))?;

    // Pages come back separated by form feeds.
    let pages: Vec<&str> = full_text
        .split('\u{000C}')
        .filter(|page| !page.trim().is_empty())
        .collect();
    Ok(pages.join("\n"))
}
