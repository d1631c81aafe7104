use url::Url;

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::message::MessageArea;
use crate::error::FormError;
use crate::form::clear::clear_fields;
use crate::form::serialize::{SerializedPayload, serialize};
use crate::transport::transport_model::{FormRequest, SubmitFailure};

pub const DEFAULT_HIDE_DELAY_MS: u64 = 10_000;

/// A submit event on a form. Handlers cancel navigation through
/// `prevent_default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub form: NodeId,
    /// The button that triggered the submit, if any
    pub submitter: Option<NodeId>,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: NodeId, submitter: Option<NodeId>) -> Self {
        SubmitEvent {
            form,
            submitter,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What `on_submit` hands to the event loop to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub payload: SerializedPayload,
    /// The POST, or why no target URL could be determined
    pub request: Result<FormRequest, String>,
}

/// Asks the event loop to hide `area` after `delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledHide {
    pub area: MessageArea,
    pub delay_ms: u64,
}

/// Posts one form asynchronously and reports the answer in a message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmitter {
    pub form: NodeId,
    pub message: MessageArea,
    pub hide_delay_ms: u64,
}

impl FormSubmitter {
    pub fn new(form: NodeId, message: NodeId) -> Self {
        FormSubmitter {
            form,
            message: MessageArea::new(message),
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
        }
    }

    pub fn with_hide_delay(mut self, delay_ms: u64) -> Self {
        self.hide_delay_ms = delay_ms;
        self
    }

    /// One submitter per `form` element matching `form_selector`, all
    /// reporting into the first element matching `message_selector`.
    ///
    /// Nothing matching is not an error: the result is simply empty.
    pub fn initialize(
        doc: &Document,
        form_selector: &str,
        message_selector: &str,
    ) -> Result<Vec<FormSubmitter>, FormError> {
        let forms: Vec<NodeId> = doc
            .query_selector_all(form_selector)?
            .into_iter()
            .filter(|id| doc.get(*id).map(|el| el.tag == "form").unwrap_or(false))
            .collect();
        let message = doc.query_selector(message_selector)?;

        Ok(match message {
            Some(message) => forms
                .into_iter()
                .map(|form| FormSubmitter::new(form, message))
                .collect(),
            None => Vec::new(),
        })
    }

    /// Cancel navigation, serialize the form and build its POST.
    pub fn on_submit(&self, doc: &Document, event: &mut SubmitEvent) -> PreparedSubmission {
        event.prevent_default();

        let payload = serialize(doc, self.form);
        let request =
            resolve_action(doc, self.form).map(|url| FormRequest::new(&url, payload.encode()));

        PreparedSubmission { payload, request }
    }

    /// Show the server's text, schedule the hide and empty the fields.
    pub fn on_success(&self, doc: &mut Document, body: &str) -> Result<ScheduledHide, FormError> {
        let hide = self.show_message(doc, Some(body));
        clear_fields(doc, self.form)?;
        Ok(hide)
    }

    /// Show the error text and schedule the hide. Fields are kept.
    ///
    /// Without a response (network error, timeout) the area is shown with
    /// whatever it held before.
    pub fn on_failure(&self, doc: &mut Document, failure: &SubmitFailure) -> ScheduledHide {
        self.show_message(doc, failure.response_text())
    }

    fn show_message(&self, doc: &mut Document, html: Option<&str>) -> ScheduledHide {
        self.message.show(doc);
        if let Some(html) = html {
            self.message.set_html(doc, html);
        }
        ScheduledHide {
            area: self.message,
            delay_ms: self.hide_delay_ms,
        }
    }
}

/// The absolute URL the form posts to.
///
/// A relative `action` resolves against the page URL; a missing or empty
/// `action` posts back to the page itself.
pub fn resolve_action(doc: &Document, form: NodeId) -> Result<String, String> {
    let action = doc
        .get(form)
        .and_then(|el| el.attr("action"))
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let base = doc.url.as_deref();

    match (action, base) {
        (Some(action), Some(base)) => Url::parse(base)
            .and_then(|b| b.join(action))
            .map(String::from)
            .map_err(|e| format!("Cannot resolve action '{}' against '{}': {}", action, base, e)),
        (Some(action), None) => Url::parse(action)
            .map(String::from)
            .map_err(|e| format!("Relative action '{}' on a page without URL: {}", action, e)),
        (None, Some(base)) => Url::parse(base)
            .map(String::from)
            .map_err(|e| format!("Invalid page URL '{}': {}", base, e)),
        (None, None) => Err("Form has no action and the page has no URL".to_string()),
    }
}
