//! Loading the form input from the filesystem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cvmatch_core::models::DocumentFile;

/// Read a résumé document. The filename sent to the service is the path's
/// final component.
pub async fn load_document(path: &Path) -> Result<DocumentFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;

    Ok(DocumentFile::new(filename, bytes))
}

/// Job text from `--job-file` or `--job`. Missing text becomes an empty
/// string and is rejected by validation like any other blank input.
pub async fn load_job_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (_, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read job posting: {}", path.display())),
        (Some(text), None) => Ok(text),
        (None, None) => Ok(String::new()),
    }
}
