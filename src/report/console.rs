use crate::dom::dom_model::Document;
use crate::dom::message::MessageArea;
use crate::form::serialize::SerializedPayload;

// ============================================================================
// Console reporter — terminal output for the CLI
// ============================================================================

/// One line describing the message area.
///
/// ```text
/// [visible] Thanks, we'll be in touch!
/// [hidden] Thanks, we'll be in touch!
/// ```
pub fn format_message_area(doc: &Document, area: &MessageArea) -> String {
    let state = if area.is_visible(doc) { "visible" } else { "hidden" };
    let content = area.content(doc);
    if content.is_empty() {
        format!("[{}] (empty)", state)
    } else {
        format!("[{}] {}", state, content)
    }
}

/// The encoded body followed by one decoded pair per line.
///
/// ```text
/// name=Jane+Doe&email=jane%40example.com
///   name = "Jane Doe"
///   email = "jane@example.com"
/// ```
pub fn format_payload(payload: &SerializedPayload) -> String {
    let mut out = String::new();
    out.push_str(&payload.encode());
    out.push('\n');
    for (name, value) in &payload.pairs {
        out.push_str(&format!("  {} = {:?}\n", name, value));
    }
    out
}
