use std::sync::Arc;

use crate::{
    dom::dom_model::Document,
    error::FormError,
    runtime::{clock::Clock, event_loop::EventLoop, timer::TimerPolicy},
    submitter::form_submitter::DEFAULT_HIDE_DELAY_MS,
    transport::transport_model::Transport,
};

pub mod cli;
pub mod dom;
pub mod error;
pub mod form;
pub mod page;
pub mod report;
pub mod runtime;
pub mod submitter;
pub mod trace;
pub mod transport;

pub const CONTACT_FORM_SELECTOR: &str = ".contact_form";
pub const CONTACT_MESSAGE_SELECTOR: &str = ".contact_msg";

/// Bind the contact form of `document` the way a page script would on
/// load: `.contact_form` posts, `.contact_msg` shows the reply for ten
/// seconds. Pages without those elements get a loop with nothing bound.
pub fn bind_contact_form(
    document: Document,
    transport: Arc<dyn Transport>,
    clock: Box<dyn Clock>,
    policy: TimerPolicy,
) -> Result<EventLoop, FormError> {
    let mut event_loop = EventLoop::new(document, transport, clock).with_policy(policy);
    event_loop.initialize(
        CONTACT_FORM_SELECTOR,
        CONTACT_MESSAGE_SELECTOR,
        DEFAULT_HIDE_DELAY_MS,
    )?;
    Ok(event_loop)
}
