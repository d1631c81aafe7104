use url::form_urlencoded;

use crate::dom::dom_model::{Document, Element, NodeId};

/// Ordered name/value pairs of a form's successful controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedPayload {
    pub pairs: Vec<(String, String)>,
}

impl SerializedPayload {
    /// `application/x-www-form-urlencoded` body: `a=1&b=two+words`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

const SUBMITTABLE_TAGS: [&str; 4] = ["input", "select", "textarea", "keygen"];
const SUBMITTER_TYPES: [&str; 5] = ["submit", "button", "image", "reset", "file"];

/// Collect the form's successful controls in document order.
pub fn serialize(doc: &Document, form: NodeId) -> SerializedPayload {
    let mut pairs = Vec::new();

    for node in doc.descendants(form) {
        let Some(el) = doc.get(node) else { continue };
        if !is_successful(doc, node, el) {
            continue;
        }
        let Some(name) = el.name() else { continue };

        for value in control_values(doc, node, el) {
            pairs.push((name.to_string(), normalize_newlines(&value)));
        }
    }

    SerializedPayload { pairs }
}

fn is_successful(doc: &Document, node: NodeId, el: &Element) -> bool {
    if !SUBMITTABLE_TAGS.contains(&el.tag.as_str()) {
        return false;
    }
    if el.name().is_none() || is_disabled(doc, node, el) {
        return false;
    }
    if el.tag != "input" {
        return true;
    }

    match el.input_type().as_deref() {
        Some(t) if SUBMITTER_TYPES.contains(&t) => false,
        Some("checkbox") | Some("radio") => el.checked,
        _ => true,
    }
}

/// Disabled directly or through an enclosing disabled fieldset.
fn is_disabled(doc: &Document, node: NodeId, el: &Element) -> bool {
    el.disabled
        || doc.ancestors(node).into_iter().any(|a| {
            doc.get(a)
                .map(|p| p.tag == "fieldset" && p.disabled)
                .unwrap_or(false)
        })
}

fn control_values(doc: &Document, node: NodeId, el: &Element) -> Vec<String> {
    if el.tag != "select" {
        return vec![el.value.clone()];
    }

    let options: Vec<&Element> = doc
        .descendants(node)
        .into_iter()
        .filter_map(|id| doc.get(id))
        .filter(|opt| opt.tag == "option")
        .collect();

    let selected: Vec<String> = options
        .iter()
        .filter(|opt| opt.selected && !opt.disabled)
        .map(|opt| opt.value.clone())
        .collect();

    if el.attr("multiple").is_some() {
        return selected;
    }
    match selected.into_iter().next() {
        Some(v) => vec![v],
        // A single select with nothing marked shows its first option
        None => options
            .iter()
            .find(|opt| !opt.disabled)
            .map(|opt| vec![opt.value.clone()])
            .unwrap_or_default(),
    }
}

fn normalize_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\n', "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_crlf() {
        assert_eq!(normalize_newlines("a\nb\r\nc"), "a\r\nb\r\nc");
    }

    #[test]
    fn encode_uses_plus_for_spaces() {
        let payload = SerializedPayload {
            pairs: vec![
                ("name".into(), "Jane Doe".into()),
                ("msg".into(), "a&b=c".into()),
            ],
        };
        assert_eq!(payload.encode(), "name=Jane+Doe&msg=a%26b%3Dc");
    }

    #[test]
    fn empty_payload_encodes_to_empty_string() {
        assert_eq!(SerializedPayload::default().encode(), "");
    }
}
