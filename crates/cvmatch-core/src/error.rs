//! Error types module
//!
//! Three layers of errors live here:
//! - [`ValidationError`]: the form input was rejected locally, before any I/O.
//! - [`ServiceError`]: what an [`AnalysisService`](crate::service::AnalysisService)
//!   implementation reports for a single call.
//! - [`WorkflowError`]: what a submission attempt ends with, classified by the
//!   phase in which the underlying call failed.
//!
//! None of these reach the user directly. The controller turns them into a
//! single localized message through [`UserFacing`].

use std::fmt;
use std::time::Duration;

use crate::i18n::{Locale, Message};
use crate::models::JobId;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures caused by the remote service
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error is presented to the user and to the logs.
pub trait UserFacing {
    /// Machine-readable error code (e.g., "SUBMISSION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether submitting the same input again may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Localized message shown in the error banner
    fn user_message(&self, locale: Locale) -> String;
}

/// Coarse classification of a failed attempt, kept alongside the message in
/// the workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Submission,
    Lookup,
    Transport,
    Busy,
    Cancelled,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No document selected")]
    MissingDocument,

    #[error("Document is empty: {filename}")]
    EmptyDocument { filename: String },

    #[error("Unsupported document format: {filename}")]
    UnsupportedFormat { filename: String },

    #[error("Job text is empty")]
    EmptyJobText,
}

/// Failure of a single call to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    Decode(String),

    /// The request could not be built locally; nothing was sent.
    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,
}

impl ServiceError {
    /// True when the service was never reached or never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_) | ServiceError::Timeout)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

/// The two network phases of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Submit,
    Lookup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Submit => f.write_str("submit"),
            Phase::Lookup => f.write_str("lookup"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Submission failed: {0}")]
    Submission(#[source] ServiceError),

    #[error("Lookup of analysis {id} failed: {source}")]
    Lookup {
        id: JobId,
        #[source]
        source: ServiceError,
    },

    #[error("Transport failure during {phase}: {source}")]
    Transport {
        phase: Phase,
        #[source]
        source: ServiceError,
    },

    #[error("An analysis is already in progress")]
    Busy,

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Analysis timed out after {0:?}")]
    TimedOut(Duration),
}

impl WorkflowError {
    /// Classify a failed creation call.
    pub fn from_submit(source: ServiceError) -> Self {
        if source.is_transport() {
            WorkflowError::Transport {
                phase: Phase::Submit,
                source,
            }
        } else {
            WorkflowError::Submission(source)
        }
    }

    /// Classify a failed lookup call for the given job.
    pub fn from_lookup(id: JobId, source: ServiceError) -> Self {
        if source.is_transport() {
            WorkflowError::Transport {
                phase: Phase::Lookup,
                source,
            }
        } else {
            WorkflowError::Lookup { id, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::Submission(_) => ErrorKind::Submission,
            WorkflowError::Lookup { .. } => ErrorKind::Lookup,
            WorkflowError::Transport { .. } => ErrorKind::Transport,
            WorkflowError::Busy => ErrorKind::Busy,
            WorkflowError::Cancelled => ErrorKind::Cancelled,
            WorkflowError::TimedOut(_) => ErrorKind::TimedOut,
        }
    }
}

/// Static metadata for each kind: (error_code, recoverable, log_level).
fn static_metadata(kind: ErrorKind) -> (&'static str, bool, LogLevel) {
    match kind {
        ErrorKind::Validation => ("VALIDATION_ERROR", false, LogLevel::Debug),
        ErrorKind::Submission => ("SUBMISSION_ERROR", true, LogLevel::Warn),
        ErrorKind::Lookup => ("LOOKUP_ERROR", true, LogLevel::Warn),
        ErrorKind::Transport => ("TRANSPORT_ERROR", true, LogLevel::Error),
        ErrorKind::Busy => ("BUSY", true, LogLevel::Debug),
        ErrorKind::Cancelled => ("CANCELLED", true, LogLevel::Debug),
        ErrorKind::TimedOut => ("TIMED_OUT", true, LogLevel::Warn),
    }
}

impl UserFacing for WorkflowError {
    fn error_code(&self) -> &'static str {
        static_metadata(self.kind()).0
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self.kind()).1
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self.kind()).2
    }

    fn user_message(&self, locale: Locale) -> String {
        let message = match self {
            WorkflowError::Validation(ValidationError::UnsupportedFormat { .. }) => {
                Message::UnsupportedFormat
            }
            WorkflowError::Validation(_) => Message::MissingInput,
            // Transport failures share the generic banner with rejected submissions.
            WorkflowError::Submission(_) | WorkflowError::Transport { .. } => {
                Message::SubmissionFailed
            }
            WorkflowError::Lookup { .. } => Message::LookupFailed,
            WorkflowError::Busy => Message::Busy,
            WorkflowError::Cancelled => Message::Cancelled,
            WorkflowError::TimedOut(_) => Message::TimedOut,
        };
        message.text(locale).to_string()
    }
}
