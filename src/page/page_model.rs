use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{Document, Element, NodeId, Visibility};

/// A page description: the document a form lives in.
///
/// ```yaml
/// url: https://example.com/contact
/// elements:
///   - tag: form
///     class: contact_form
///     attributes: { action: /send.php }
///     children:
///       - { tag: input, name: email, type: email }
///       - { tag: input, type: submit, value: Send }
///   - { tag: div, class: contact_msg, hidden: true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Text content (textarea default value, option label, message HTML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Any other attributes (action, method, placeholder, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl PageSpec {
    /// Build the element tree.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new(self.url.as_deref());
        for spec in &self.elements {
            append_spec(&mut doc, None, spec);
        }
        doc
    }
}

fn append_spec(doc: &mut Document, parent: Option<NodeId>, spec: &ElementSpec) -> NodeId {
    let id = doc.append(parent, to_element(spec));
    for child in &spec.children {
        append_spec(doc, Some(id), child);
    }
    id
}

fn to_element(spec: &ElementSpec) -> Element {
    let mut el = Element::new(&spec.tag);

    for (name, value) in &spec.attributes {
        el = el.with_attr(name, value);
    }
    let named = [
        ("id", &spec.id),
        ("class", &spec.class),
        ("name", &spec.name),
        ("type", &spec.input_type),
        ("value", &spec.value),
    ];
    for (attr, value) in named {
        if let Some(v) = value {
            el = el.with_attr(attr, v);
        }
    }

    let text = spec.text.clone().unwrap_or_default();
    el.value = match el.tag.as_str() {
        "textarea" => spec.value.clone().unwrap_or(text.clone()),
        "option" => spec.value.clone().unwrap_or(text.clone()),
        "input" => match (spec.value.as_ref(), el.input_type().as_deref()) {
            (Some(v), _) => v.clone(),
            // Browsers report "on" for value-less checkboxes and radios
            (None, Some("checkbox")) | (None, Some("radio")) => "on".to_string(),
            (None, _) => String::new(),
        },
        _ => spec.value.clone().unwrap_or_default(),
    };

    el.inner_html = text;
    el.checked = spec.checked;
    el.selected = spec.selected;
    el.disabled = spec.disabled;
    el.visibility = if spec.hidden {
        Visibility::Hidden
    } else {
        Visibility::Visible
    };
    el
}
