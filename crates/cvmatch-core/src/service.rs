//! Seam between the workflow controller and the remote analysis service.
//!
//! The HTTP implementation lives in `cvmatch-api-client`; tests substitute an
//! in-memory service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{AnalysisJobReference, AnalysisResult, JobId, Submission};

/// Remote service that runs the compatibility analysis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit a document and job text. Maps to `POST /analysis/upload`.
    async fn create_analysis(
        &self,
        submission: &Submission,
    ) -> Result<AnalysisJobReference, ServiceError>;

    /// Fetch the full result of a submitted analysis. Maps to `GET /analysis/{id}`.
    async fn fetch_analysis(&self, id: &JobId) -> Result<AnalysisResult, ServiceError>;
}

#[async_trait]
impl<T: AnalysisService + ?Sized> AnalysisService for Arc<T> {
    async fn create_analysis(
        &self,
        submission: &Submission,
    ) -> Result<AnalysisJobReference, ServiceError> {
        (**self).create_analysis(submission).await
    }

    async fn fetch_analysis(&self, id: &JobId) -> Result<AnalysisResult, ServiceError> {
        (**self).fetch_analysis(id).await
    }
}
