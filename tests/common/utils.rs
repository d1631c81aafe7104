use std::sync::Arc;

use form_submitter::{
    bind_contact_form,
    dom::{dom_model::NodeId, message::MessageArea},
    page::loader::load_page,
    runtime::{clock::ManualClock, event_loop::EventLoop, timer::TimerPolicy},
    transport::mock::MockTransport,
};

pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    path.display().to_string()
}

/// `contact.yaml` bound on a virtual clock.
pub fn contact_loop(transport: Arc<MockTransport>, policy: TimerPolicy) -> EventLoop {
    let document = load_page(&fixture("contact.yaml")).unwrap();
    let event_loop =
        bind_contact_form(document, transport, Box::new(ManualClock::new()), policy).unwrap();
    assert_eq!(event_loop.submitters().len(), 1);
    event_loop
}

pub fn contact_form(event_loop: &EventLoop) -> NodeId {
    event_loop.submitters()[0].form
}

pub fn message_area(event_loop: &EventLoop) -> MessageArea {
    event_loop.submitters()[0].message
}

pub fn field_value(event_loop: &EventLoop, name: &str) -> String {
    let doc = event_loop.document();
    let field = doc.field_by_name(contact_form(event_loop), name).unwrap();
    doc.get(field).unwrap().value.clone()
}

pub fn fill(event_loop: &mut EventLoop, values: &[(&str, &str)]) {
    let form = contact_form(event_loop);
    let owned: Vec<(String, String)> = values
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    form_submitter::form::fill::fill_fields(event_loop.document_mut(), form, &owned).unwrap();
}

/// A unique scratch file path under the system temp dir.
pub fn temp_path(name: &str) -> String {
    let path = std::env::temp_dir().join(format!(
        "form-submitter-{}-{}",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_file(&path);
    path.display().to_string()
}
