//! Busy reporting for a running submission.

use std::sync::Arc;

use cvmatch_core::models::{AnalysisResult, SubmissionInput};
use cvmatch_core::{AnalysisService, Locale, View, WorkflowController, WorkflowError};
use tokio_util::sync::CancellationToken;

/// Drive a submission and call `on_busy` with the busy label whenever the
/// published state is busy.
///
/// The submission and the state subscriber are polled on the same task, so a
/// submission that suspends after entering `Submitting` is always reported
/// before its outcome. Attempts rejected before any I/O report nothing.
pub async fn submit_with_progress<S, F>(
    controller: &WorkflowController<S>,
    input: SubmissionInput,
    cancel: CancellationToken,
    locale: Locale,
    mut on_busy: F,
) -> Result<Arc<AnalysisResult>, WorkflowError>
where
    S: AnalysisService,
    F: FnMut(&str),
{
    let mut states = controller.subscribe();
    let submission = controller.submit_with_cancel(input, cancel);
    tokio::pin!(submission);

    loop {
        tokio::select! {
            biased;
            outcome = &mut submission => return outcome,
            Ok(()) = states.changed() => {
                let busy = View::from_state(&states.borrow_and_update(), locale).busy_indicator;
                if let Some(label) = busy {
                    on_busy(&label);
                }
            }
        }
    }
}
