//! Analysis endpoints of the service.
//!
//! `POST /analysis/upload` takes the document and job text as a multipart form
//! and answers with a job reference; `GET /analysis/{id}` returns the result.

use async_trait::async_trait;
use cvmatch_core::models::{
    AnalysisJobReference, AnalysisResult, JobId, Submission, DOCUMENT_FIELD, JOB_TEXT_FIELD,
};
use cvmatch_core::{AnalysisService, ServiceError};
use reqwest::multipart::{Form, Part};
use reqwest::Body;

use crate::ApiClient;

pub const UPLOAD_PATH: &str = "/analysis/upload";

/// Path of a single analysis, with the id percent-encoded.
pub fn analysis_path(id: &JobId) -> String {
    format!("/analysis/{}", urlencoding::encode(&id.to_string()))
}

/// Multipart body for a submission: the document under `file`, the job text
/// under `job_text`.
pub fn upload_form(submission: &Submission) -> Result<Form, ServiceError> {
    let document = submission.document();
    let length = document.bytes.len() as u64;
    let part = Part::stream_with_length(Body::from(document.bytes.clone()), length)
        .file_name(document.filename.clone())
        .mime_str(submission.format().content_type())
        .map_err(|e| ServiceError::Request(format!("Invalid content type: {}", e)))?;

    Ok(Form::new()
        .part(DOCUMENT_FIELD, part)
        .text(JOB_TEXT_FIELD, submission.job_text().to_string()))
}

#[async_trait]
impl AnalysisService for ApiClient {
    async fn create_analysis(
        &self,
        submission: &Submission,
    ) -> Result<AnalysisJobReference, ServiceError> {
        let form = upload_form(submission)?;
        self.post_multipart(UPLOAD_PATH, form).await
    }

    async fn fetch_analysis(&self, id: &JobId) -> Result<AnalysisResult, ServiceError> {
        self.get(&analysis_path(id)).await
    }
}
