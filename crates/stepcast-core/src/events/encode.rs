//! Pure event constructors. No side effects, no hidden state.

use super::{CompletionEvent, ErrorEvent, ProgressEvent, StepSummary};
use crate::domain::StepResult;

/// Message carried by every `error` event; the cause goes into `details`.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected server error occurred.";

/// Suffix of the completion `result` string.
pub const COMPLETION_RESULT_SUFFIX: &str = "completed successfully!";

/// `floor(completed / total * 100)`, clamped to `[0, 100]`.
///
/// Truncates rather than rounds, so 1 of 3 is 33. Totals that do not divide
/// 100 evenly may never hit exactly 100 before the last step; the completion
/// event is the authoritative done signal. A zero total reports 0.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = completed.min(total).saturating_mul(100) / total;
    u8::try_from(percent).unwrap_or(100)
}

/// Progress message naming the step and its status.
pub fn progress_message(label: &str, result: &StepResult) -> String {
    format!("{label} Operation Complete. Status: {result}")
}

/// Completion `result` string listing every step label in order.
pub fn completion_result<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let labels: Vec<&str> = labels.into_iter().collect();
    format!(
        "All operations ({}) {COMPLETION_RESULT_SUFFIX}",
        labels.join(", ")
    )
}

/// Build a `progress` payload.
pub fn encode_progress(
    completed: usize,
    total: usize,
    message: impl Into<String>,
) -> ProgressEvent {
    ProgressEvent {
        percent: progress_percent(completed, total),
        message: message.into(),
    }
}

/// Build a `complete` payload.
pub fn encode_completion(result: impl Into<String>, summary: StepSummary) -> CompletionEvent {
    CompletionEvent {
        result: result.into(),
        summary,
    }
}

/// Build an `error` payload.
pub fn encode_error(error: impl Into<String>, details: impl Into<String>) -> ErrorEvent {
    ErrorEvent {
        error: error.into(),
        details: details.into(),
    }
}
