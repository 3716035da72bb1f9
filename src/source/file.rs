use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::source::SourceText;

/// Read a plain-text file for processing. The title is the file name.
pub fn read_text(path: &Path) -> Result<SourceText> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let body = raw.strip_prefix('\u{feff}').unwrap_or(&raw).to_string();
    if body.trim().is_empty() {
        bail!("{} contains no text", path.display());
    }

    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    Ok(SourceText { title, body })
}
