//! Analysis workflow controller.
//!
//! Owns the only mutable state of the client and sequences the two calls of a
//! submission: create the analysis, then fetch its full result by id. The
//! state is published on a `tokio::sync::watch` channel so that any number of
//! renderers can follow it without being able to change it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{ErrorKind, LogLevel, UserFacing, WorkflowError};
use crate::i18n::Locale;
use crate::models::{AnalysisResult, Submission, SubmissionInput};
use crate::service::AnalysisService;
use crate::view::View;

/// Error kind plus the localized message shown in the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// A submission is in flight. `stale` is whatever result was on screen
    /// when it started; it is superseded but stays visible until resolution.
    Submitting { stale: Option<Arc<AnalysisResult>> },
    Success { result: Arc<AnalysisResult> },
    /// `stale` is only ever set for validation failures; a failed network
    /// attempt clears the previous result.
    Failed {
        failure: Failure,
        stale: Option<Arc<AnalysisResult>>,
    },
}

impl WorkflowState {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Submitting { .. })
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            WorkflowState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Result currently on screen, current or stale.
    pub fn displayed_result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::Submitting { stale } | WorkflowState::Failed { stale, .. } => {
                stale.as_ref()
            }
            WorkflowState::Success { result } => Some(result),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowSettings {
    pub locale: Locale,
    /// Bound on the whole two-call sequence; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl From<&ClientConfig> for WorkflowSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            locale: config.locale,
            timeout: config.analysis_timeout(),
        }
    }
}

pub struct WorkflowController<S> {
    service: S,
    state: watch::Sender<WorkflowState>,
    settings: WorkflowSettings,
}

impl<S: AnalysisService> WorkflowController<S> {
    pub fn new(service: S, settings: WorkflowSettings) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            service,
            state,
            settings,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Follow state changes; the receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// False while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        !self.state.borrow().is_busy()
    }

    pub fn view(&self) -> View {
        View::from_state(&self.state.borrow(), self.settings.locale)
    }

    /// Validate the input, create the analysis and fetch its result.
    ///
    /// The outcome is always reflected in the published state as well as
    /// returned. A `Busy` rejection is the only error that leaves the state
    /// untouched.
    pub async fn submit(
        &self,
        input: SubmissionInput,
    ) -> Result<Arc<AnalysisResult>, WorkflowError> {
        self.submit_with_cancel(input, CancellationToken::new())
            .await
    }

    /// Like [`submit`](Self::submit), aborting the in-flight calls when
    /// `cancel` fires.
    pub async fn submit_with_cancel(
        &self,
        input: SubmissionInput,
        cancel: CancellationToken,
    ) -> Result<Arc<AnalysisResult>, WorkflowError> {
        let submission = self.begin(input)?;
        let mut guard = InFlight::new(&self.state, self.failure_for(&WorkflowError::Cancelled));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WorkflowError::Cancelled),
            outcome = self.run_with_timeout(&submission) => outcome,
        };

        guard.disarm();
        self.finish(outcome)
    }

    /// Single-flight gate and validation, applied in one state update.
    fn begin(&self, input: SubmissionInput) -> Result<Submission, WorkflowError> {
        let validated = input.validate();
        let mut admitted = Err(WorkflowError::Busy);

        self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            let stale = state.displayed_result().cloned();
            match validated {
                Ok(submission) => {
                    *state = WorkflowState::Submitting { stale };
                    admitted = Ok(submission);
                }
                Err(err) => {
                    let err = WorkflowError::from(err);
                    *state = WorkflowState::Failed {
                        failure: self.failure_for(&err),
                        stale,
                    };
                    admitted = Err(err);
                }
            }
            true
        });

        match &admitted {
            Ok(submission) => tracing::info!(
                filename = %submission.document().filename,
                format = submission.format().extension(),
                job_text_len = submission.job_text().len(),
                "Starting analysis"
            ),
            Err(err) => log_failure(err),
        }
        admitted
    }

    async fn run_with_timeout(
        &self,
        submission: &Submission,
    ) -> Result<AnalysisResult, WorkflowError> {
        match self.settings.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(submission))
                .await
                .unwrap_or(Err(WorkflowError::TimedOut(limit))),
            None => self.run(submission).await,
        }
    }

    async fn run(&self, submission: &Submission) -> Result<AnalysisResult, WorkflowError> {
        let reference = self
            .service
            .create_analysis(submission)
            .await
            .map_err(WorkflowError::from_submit)?;
        tracing::info!(
            job_id = %reference.id,
            status = reference.status.as_deref().unwrap_or("unknown"),
            "Analysis created"
        );

        let result = self
            .service
            .fetch_analysis(&reference.id)
            .await
            .map_err(|source| WorkflowError::from_lookup(reference.id.clone(), source))?;
        if result.id != reference.id {
            tracing::warn!(
                requested = %reference.id,
                returned = %result.id,
                "Lookup returned a different analysis id"
            );
        }
        Ok(result)
    }

    fn finish(
        &self,
        outcome: Result<AnalysisResult, WorkflowError>,
    ) -> Result<Arc<AnalysisResult>, WorkflowError> {
        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                tracing::info!(
                    job_id = %result.id,
                    score = result.score.value(),
                    missing_skills = result.result.missing_skills.len(),
                    "Analysis complete"
                );
                self.state.send_replace(WorkflowState::Success {
                    result: Arc::clone(&result),
                });
                Ok(result)
            }
            Err(err) => {
                log_failure(&err);
                self.state.send_replace(WorkflowState::Failed {
                    failure: self.failure_for(&err),
                    stale: None,
                });
                Err(err)
            }
        }
    }

    fn failure_for(&self, err: &WorkflowError) -> Failure {
        Failure {
            kind: err.kind(),
            message: err.user_message(self.settings.locale),
        }
    }
}

fn log_failure(err: &WorkflowError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code, error = %err, "Analysis not started"),
        LogLevel::Warn => tracing::warn!(code, error = %err, "Analysis failed"),
        LogLevel::Error => tracing::error!(code, error = %err, "Analysis failed"),
    }
}

/// Leaves the state consistent when a submit future is dropped mid-flight,
/// so the gate does not stay closed forever.
struct InFlight<'a> {
    state: &'a watch::Sender<WorkflowState>,
    on_drop: Option<Failure>,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<WorkflowState>, on_drop: Failure) -> Self {
        Self {
            state,
            on_drop: Some(on_drop),
        }
    }

    fn disarm(&mut self) {
        self.on_drop = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(failure) = self.on_drop.take() {
            tracing::debug!("Submission dropped while in flight");
            self.state.send_if_modified(|state| {
                if !state.is_busy() {
                    return false;
                }
                *state = WorkflowState::Failed {
                    failure,
                    stale: None,
                };
                true
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::ServiceError;
    use crate::models::{AnalysisDetails, AnalysisJobReference, DocumentFile, JobId, Score};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create { filename: String, job_text: String },
        Fetch(JobId),
    }

    /// Replays scripted responses and records every call.
    #[derive(Default)]
    struct ScriptedService {
        creates: Mutex<VecDeque<Result<AnalysisJobReference, ServiceError>>>,
        fetches: Mutex<VecDeque<Result<AnalysisResult, ServiceError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedService {
        fn on_create(self, response: Result<AnalysisJobReference, ServiceError>) -> Self {
            self.creates.lock().unwrap().push_back(response);
            self
        }

        fn on_fetch(self, response: Result<AnalysisResult, ServiceError>) -> Self {
            self.fetches.lock().unwrap().push_back(response);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisService for ScriptedService {
        async fn create_analysis(
            &self,
            submission: &Submission,
        ) -> Result<AnalysisJobReference, ServiceError> {
            self.calls.lock().unwrap().push(Call::Create {
                filename: submission.document().filename.clone(),
                job_text: submission.job_text().to_string(),
            });
            self.creates
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected create call")
        }

        async fn fetch_analysis(&self, id: &JobId) -> Result<AnalysisResult, ServiceError> {
            self.calls.lock().unwrap().push(Call::Fetch(id.clone()));
            self.fetches
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch call")
        }
    }

    /// Blocks every create call until released; `pending` never releases.
    struct GatedService {
        gate: Notify,
        pending: bool,
    }

    #[async_trait]
    impl AnalysisService for GatedService {
        async fn create_analysis(
            &self,
            _submission: &Submission,
        ) -> Result<AnalysisJobReference, ServiceError> {
            if self.pending {
                std::future::pending::<()>().await;
            }
            self.gate.notified().await;
            Ok(reference(1))
        }

        async fn fetch_analysis(&self, id: &JobId) -> Result<AnalysisResult, ServiceError> {
            let JobId::Numeric(n) = id else {
                panic!("numeric id expected")
            };
            Ok(analysis(*n, 64, &[], &[]))
        }
    }

    fn reference(id: i64) -> AnalysisJobReference {
        AnalysisJobReference {
            id: JobId::Numeric(id),
            status: Some("COMPLETED".to_string()),
            score: Some(10.0),
        }
    }

    fn analysis(id: i64, score: u8, missing: &[&str], recs: &[&str]) -> AnalysisResult {
        AnalysisResult {
            id: JobId::Numeric(id),
            status: "done".to_string(),
            score: Score::new(score).unwrap(),
            result: AnalysisDetails {
                overall_score: Some(f64::from(score)),
                missing_skills: missing.iter().map(|s| s.to_string()).collect(),
                recommendations: recs.iter().map(|s| s.to_string()).collect(),
            },
            cv_text_preview: "...".to_string(),
        }
    }

    fn input(job_text: &str) -> SubmissionInput {
        SubmissionInput::new(
            Some(DocumentFile::new("resume.pdf", b"%PDF-1.7".to_vec())),
            job_text,
        )
    }

    fn controller<S: AnalysisService>(service: S) -> WorkflowController<S> {
        WorkflowController::new(service, WorkflowSettings::default())
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let controller = controller(ScriptedService::default());
        assert_eq!(controller.state(), WorkflowState::Idle);
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn test_successful_submission_uses_lookup_score() {
        let service = Arc::new(
            ScriptedService::default()
                .on_create(Ok(reference(42)))
                .on_fetch(Ok(analysis(42, 85, &[], &["Add more backend projects"]))),
        );
        let controller = controller(Arc::clone(&service));

        let result = controller
            .submit(input("Backend engineer, Go, Kubernetes"))
            .await
            .unwrap();

        assert_eq!(result.score.value(), 85);
        assert_eq!(
            controller.state(),
            WorkflowState::Success {
                result: Arc::clone(&result)
            }
        );
        assert_eq!(
            service.calls(),
            vec![
                Call::Create {
                    filename: "resume.pdf".to_string(),
                    job_text: "Backend engineer, Go, Kubernetes".to_string(),
                },
                Call::Fetch(JobId::Numeric(42)),
            ]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_calls() {
        let service = Arc::new(ScriptedService::default());
        let controller = controller(Arc::clone(&service));

        let err = controller.submit(input("   ")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let err = controller
            .submit(SubmissionInput::new(None, "Backend engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        assert!(service.calls().is_empty());
        let failure = controller.state().failure().cloned().unwrap();
        assert_eq!(failure.kind, ErrorKind::Validation);
        assert_eq!(
            failure.message,
            "Please upload your CV and enter the job posting text."
        );
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_previous_result_on_screen() {
        let service = ScriptedService::default()
            .on_create(Ok(reference(1)))
            .on_fetch(Ok(analysis(1, 50, &[], &[])));
        let controller = controller(service);
        let first = controller.submit(input("Data analyst")).await.unwrap();

        controller.submit(input("")).await.unwrap_err();

        let state = controller.state();
        assert_eq!(state.failure().unwrap().kind, ErrorKind::Validation);
        assert_eq!(state.displayed_result(), Some(&first));
    }

    #[tokio::test]
    async fn test_submit_error_skips_lookup() {
        let service = Arc::new(ScriptedService::default().on_create(Err(ServiceError::Status {
            status: 500,
            body: "Internal Server Error".to_string(),
        })));
        let controller = controller(Arc::clone(&service));

        let err = controller.submit(input("Backend engineer")).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Submission(_)));
        assert_eq!(service.calls().len(), 1);
        let failure = controller.state().failure().cloned().unwrap();
        assert_eq!(failure.kind, ErrorKind::Submission);
        assert_eq!(failure.message, "An error occurred during the analysis.");
    }

    #[tokio::test]
    async fn test_lookup_error_clears_previous_result() {
        let service = ScriptedService::default()
            .on_create(Ok(reference(1)))
            .on_fetch(Ok(analysis(1, 90, &[], &[])))
            .on_create(Ok(reference(2)))
            .on_fetch(Err(ServiceError::Status {
                status: 404,
                body: "not found".to_string(),
            }));
        let controller = controller(service);
        controller.submit(input("Backend engineer")).await.unwrap();

        let err = controller.submit(input("Backend engineer")).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Lookup { id: JobId::Numeric(2), .. }));
        let state = controller.state();
        assert_eq!(state.failure().unwrap().kind, ErrorKind::Lookup);
        assert_eq!(state.displayed_result(), None);
    }

    #[tokio::test]
    async fn test_transport_error_is_classified() {
        let service = ScriptedService::default()
            .on_create(Err(ServiceError::Transport("connection refused".to_string())));
        let controller = controller(service);

        let err = controller.submit(input("Backend engineer")).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Transport { .. }));
        assert_eq!(
            controller.state().failure().unwrap().message,
            "An error occurred during the analysis."
        );
    }

    #[tokio::test]
    async fn test_second_success_fully_replaces_first() {
        let service = ScriptedService::default()
            .on_create(Ok(reference(1)))
            .on_fetch(Ok(analysis(1, 80, &["go"], &["Ship a Go service"])))
            .on_create(Ok(reference(2)))
            .on_fetch(Ok(analysis(2, 35, &[], &[])));
        let controller = controller(service);

        controller.submit(input("Backend engineer")).await.unwrap();
        let second = controller.submit(input("Backend engineer")).await.unwrap();

        let state = controller.state();
        let shown = state.displayed_result().unwrap();
        assert!(Arc::ptr_eq(shown, &second));
        assert_eq!(shown.id, JobId::Numeric(2));
        assert!(shown.result.missing_skills.is_empty());
        assert!(shown.result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_busy_rejects_concurrent_submit() {
        let service = Arc::new(GatedService {
            gate: Notify::new(),
            pending: false,
        });
        let controller = Arc::new(controller(Arc::clone(&service)));
        let mut states = controller.subscribe();

        let running = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit(input("Backend engineer")).await })
        };
        states.wait_for(|state| state.is_busy()).await.unwrap();
        assert!(!controller.can_submit());

        let err = controller.submit(input("Backend engineer")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Busy));
        assert!(controller.state().is_busy());

        service.gate.notify_one();
        let result = running.await.unwrap().unwrap();
        assert_eq!(result.score.value(), 64);
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn test_cancellation_fails_attempt() {
        let controller = Arc::new(controller(GatedService {
            gate: Notify::new(),
            pending: true,
        }));
        let cancel = CancellationToken::new();
        let mut states = controller.subscribe();

        let running = {
            let controller = Arc::clone(&controller);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                controller
                    .submit_with_cancel(input("Backend engineer"), cancel)
                    .await
            })
        };
        states.wait_for(|state| state.is_busy()).await.unwrap();
        cancel.cancel();

        let err = running.await.unwrap().unwrap_err();
        assert!(matches!(err, WorkflowError::Cancelled));
        assert_eq!(
            controller.state().failure().unwrap().kind,
            ErrorKind::Cancelled
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_attempt() {
        let controller = WorkflowController::new(
            GatedService {
                gate: Notify::new(),
                pending: true,
            },
            WorkflowSettings {
                locale: Locale::En,
                timeout: Some(Duration::from_secs(30)),
            },
        );

        let err = controller.submit(input("Backend engineer")).await.unwrap_err();

        assert!(matches!(err, WorkflowError::TimedOut(d) if d == Duration::from_secs(30)));
        let failure = controller.state().failure().cloned().unwrap();
        assert_eq!(failure.kind, ErrorKind::TimedOut);
        assert_eq!(failure.message, "The analysis did not finish in time.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submission_reopens_gate() {
        let controller = controller(GatedService {
            gate: Notify::new(),
            pending: true,
        });

        let attempt = tokio::time::timeout(
            Duration::from_millis(10),
            controller.submit(input("Backend engineer")),
        )
        .await;

        assert!(attempt.is_err());
        assert!(controller.can_submit());
        assert_eq!(
            controller.state().failure().unwrap().kind,
            ErrorKind::Cancelled
        );
    }
}
