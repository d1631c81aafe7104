use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::transport_model::{FormRequest, SubmitOutcome, Transport};

/// Scripted transport for testing without a server.
///
/// Outcomes are handed out in the order they were queued; once the
/// script runs out every request gets `200` with an empty body.
/// Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<SubmitOutcome>>,
    requests: Mutex<Vec<FormRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, outcome: SubmitOutcome) -> Self {
        self.push(outcome);
        self
    }

    pub fn succeed(self, body: &str) -> Self {
        self.respond(SubmitOutcome::from_status(200, body.to_string()))
    }

    pub fn fail(self, status: u16, body: &str) -> Self {
        self.respond(SubmitOutcome::from_status(status, body.to_string()))
    }

    /// Queue another outcome on a shared transport.
    pub fn push(&self, outcome: SubmitOutcome) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    pub fn requests(&self) -> Vec<FormRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Transport for MockTransport {
    fn post_form(&self, request: &FormRequest) -> SubmitOutcome {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| SubmitOutcome::from_status(200, String::new()))
    }
}
