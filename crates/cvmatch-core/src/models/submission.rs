use std::path::Path;

use bytes::Bytes;

use crate::error::ValidationError;

/// Multipart field carrying the résumé document.
pub const DOCUMENT_FIELD: &str = "file";
/// Multipart field carrying the job posting text.
pub const JOB_TEXT_FIELD: &str = "job_text";

/// Document formats the analysis service can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A user-selected document: filename plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl DocumentFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Raw form input, exactly as the user left it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub document: Option<DocumentFile>,
    pub job_text: String,
}

impl SubmissionInput {
    pub fn new(document: Option<DocumentFile>, job_text: impl Into<String>) -> Self {
        Self {
            document,
            job_text: job_text.into(),
        }
    }

    /// Check the input locally. Nothing reaches the network unless this passes.
    pub fn validate(self) -> Result<Submission, ValidationError> {
        let document = self.document.ok_or(ValidationError::MissingDocument)?;
        if self.job_text.trim().is_empty() {
            return Err(ValidationError::EmptyJobText);
        }
        if document.bytes.is_empty() {
            return Err(ValidationError::EmptyDocument {
                filename: document.filename,
            });
        }
        let format = DocumentFormat::from_filename(&document.filename).ok_or_else(|| {
            ValidationError::UnsupportedFormat {
                filename: document.filename.clone(),
            }
        })?;

        Ok(Submission {
            document,
            format,
            job_text: self.job_text,
        })
    }
}

/// Input that passed validation; the only thing an `AnalysisService` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    document: DocumentFile,
    format: DocumentFormat,
    job_text: String,
}

impl Submission {
    pub fn document(&self) -> &DocumentFile {
        &self.document
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn job_text(&self) -> &str {
        &self.job_text
    }
}
