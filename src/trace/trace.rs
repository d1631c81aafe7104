use serde::Serialize;

use crate::transport::transport_model::{SubmitFailure, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// Event-loop clock, milliseconds
    pub timestamp_ms: u64,
    pub submission: Option<u64>,

    pub event: String,

    pub url: Option<String>,
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn new(timestamp_ms: u64, event: &str) -> Self {
        Self {
            timestamp_ms,
            submission: None,
            event: event.to_string(),
            url: None,
            status: None,
            detail: None,
        }
    }

    pub fn with_submission(mut self, submission: u64) -> Self {
        self.submission = Some(submission);
        self
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    /// `succeeded` or `failed`, with status and network error if any.
    pub fn completed(timestamp_ms: u64, submission: u64, outcome: &SubmitOutcome) -> Self {
        let event = if outcome.is_success() { "succeeded" } else { "failed" };
        let mut trace = Self::new(timestamp_ms, event).with_submission(submission);
        trace.status = outcome.status();
        if let SubmitOutcome::Failure(SubmitFailure::Network { message }) = outcome {
            trace.detail = Some(message.clone());
        }
        trace
    }
}
