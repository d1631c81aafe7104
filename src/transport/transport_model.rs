pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A form POST ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub url: String,
    pub body: String,
    pub content_type: &'static str,
}

impl FormRequest {
    pub fn new(url: &str, body: String) -> Self {
        FormRequest {
            url: url.to_string(),
            body,
            content_type: FORM_CONTENT_TYPE,
        }
    }
}

/// How a submission ended. Bodies are opaque text and never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success { status: u16, body: String },
    Failure(SubmitFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Server answered with a non-success status
    Status { status: u16, body: String },

    /// No usable response (connect error, timeout, unreadable body, no URL)
    Network { message: String },
}

impl SubmitOutcome {
    /// 2xx and 304 count as success; everything else is a failure.
    pub fn from_status(status: u16, body: String) -> Self {
        if (200..300).contains(&status) || status == 304 {
            SubmitOutcome::Success { status, body }
        } else {
            SubmitOutcome::Failure(SubmitFailure::Status { status, body })
        }
    }

    pub fn network(message: impl ToString) -> Self {
        SubmitOutcome::Failure(SubmitFailure::Network {
            message: message.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitOutcome::Success { status, .. } => Some(*status),
            SubmitOutcome::Failure(SubmitFailure::Status { status, .. }) => Some(*status),
            SubmitOutcome::Failure(SubmitFailure::Network { .. }) => None,
        }
    }
}

impl SubmitFailure {
    /// The server's reply, if one arrived. A network failure has none.
    pub fn response_text(&self) -> Option<&str> {
        match self {
            SubmitFailure::Status { body, .. } => Some(body),
            SubmitFailure::Network { .. } => None,
        }
    }
}

/// Sends form posts. Implementations run on worker threads.
pub trait Transport: Send + Sync {
    fn post_form(&self, request: &FormRequest) -> SubmitOutcome;
}
