use std::collections::BTreeMap;

use crate::dom::selector::Selector;
use crate::error::FormError;

/// Index of an element inside its `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercase tag name, e.g. "form", "input", "textarea"
    pub tag: String,

    /// Markup attributes (id, class, name, type, action, ...)
    pub attributes: BTreeMap<String, String>,

    /// Current value of a form control. Starts from the `value` attribute
    /// (or the text of a textarea / option) and is what editing changes.
    pub value: String,

    pub checked: bool,
    pub selected: bool,
    pub disabled: bool,

    /// Inner HTML, assigned verbatim.
    pub inner_html: String,

    pub visibility: Visibility,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            value: String::new(),
            checked: false,
            selected: false,
            disabled: false,
            inner_html: String::new(),
            visibility: Visibility::Visible,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name").filter(|n| !n.is_empty())
    }

    /// Lowercased `type` attribute.
    pub fn input_type(&self) -> Option<String> {
        self.attr("type").map(|t| t.to_ascii_lowercase())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    /// Submit buttons: `input[type=submit|image]` and `button` elements
    /// whose type is missing or `submit`.
    pub fn is_submit_control(&self) -> bool {
        match self.tag.as_str() {
            "input" => matches!(self.input_type().as_deref(), Some("submit") | Some("image")),
            "button" => matches!(self.input_type().as_deref(), None | Some("submit")),
            _ => false,
        }
    }

    /// Controls where Enter triggers implicit submission of the owning form.
    pub fn is_text_entry(&self) -> bool {
        if self.tag != "input" {
            return false;
        }
        matches!(
            self.input_type().as_deref(),
            None | Some("text")
                | Some("email")
                | Some("password")
                | Some("search")
                | Some("tel")
                | Some("url")
                | Some("number")
                | Some("date")
        )
    }
}

/// An arena-backed element tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Page URL; relative form actions are resolved against it.
    pub url: Option<String>,
    nodes: Vec<Element>,
    roots: Vec<NodeId>,
}

impl Document {
    pub fn new(url: Option<&str>) -> Self {
        Document {
            url: url.map(str::to_string),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Append `element` as the last child of `parent` (or as a new root).
    pub fn append(&mut self, parent: Option<NodeId>, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.parent = parent;
        element.children.clear();
        self.nodes.push(element);

        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every element in document (pre-)order.
    pub fn all(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(el) = self.get(node) {
            for child in &el.children {
                self.collect_subtree(*child, &mut out);
            }
        }
        out
    }

    fn collect_subtree(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        if let Some(el) = self.get(node) {
            for child in &el.children {
                self.collect_subtree(*child, out);
            }
        }
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(node).and_then(|el| el.parent);
        while let Some(id) = current {
            out.push(id);
            current = self.get(id).and_then(|el| el.parent);
        }
        out
    }

    /// The nearest enclosing `form` element.
    pub fn owning_form(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|id| self.get(*id).map(|el| el.tag == "form").unwrap_or(false))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, FormError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .all()
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, FormError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Descendants of `root` that match `selector` (jQuery `.find()`).
    pub fn find_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, FormError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect())
    }

    /// First control named `name` inside `form`.
    pub fn field_by_name(&self, form: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(form).into_iter().find(|id| {
            self.get(*id)
                .map(|el| {
                    matches!(el.tag.as_str(), "input" | "select" | "textarea")
                        && el.name() == Some(name)
                })
                .unwrap_or(false)
        })
    }

    /// Edit a control the way a user would.
    ///
    /// Checkboxes and radios are toggled by truthiness of `value`;
    /// selects mark the option whose value matches; everything else
    /// gets its value replaced.
    pub fn set_field(&mut self, field: NodeId, value: &str) {
        let Some(el) = self.get(field) else { return };
        let tag = el.tag.clone();
        let input_type = el.input_type();

        match (tag.as_str(), input_type.as_deref()) {
            ("input", Some("checkbox")) => {
                if let Some(el) = self.get_mut(field) {
                    el.checked = is_truthy(value);
                }
            }
            ("input", Some("radio")) => {
                let checked = is_truthy(value);
                if checked {
                    self.uncheck_radio_group(field);
                }
                if let Some(el) = self.get_mut(field) {
                    el.checked = checked;
                }
            }
            ("select", _) => {
                for option in self.descendants(field) {
                    if let Some(opt) = self.get_mut(option) {
                        if opt.tag == "option" {
                            opt.selected = opt.value == value;
                        }
                    }
                }
            }
            _ => {
                if let Some(el) = self.get_mut(field) {
                    el.value = value.to_string();
                }
            }
        }
    }

    fn uncheck_radio_group(&mut self, radio: NodeId) {
        let Some(name) = self.get(radio).and_then(|el| el.name()).map(str::to_string) else {
            return;
        };
        let scope = self.owning_form(radio);
        let group: Vec<NodeId> = self
            .all()
            .into_iter()
            .filter(|id| {
                self.get(*id)
                    .map(|el| {
                        el.tag == "input"
                            && el.input_type().as_deref() == Some("radio")
                            && el.name() == Some(name.as_str())
                    })
                    .unwrap_or(false)
                    && self.owning_form(*id) == scope
            })
            .collect();
        for id in group {
            if let Some(el) = self.get_mut(id) {
                el.checked = false;
            }
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new(Some("https://example.com/contact"));
        let body = doc.append(None, Element::new("body"));
        let form = doc.append(Some(body), Element::new("form").with_attr("class", "contact_form"));
        let email = doc.append(
            Some(form),
            Element::new("input").with_attr("name", "email").with_attr("type", "email"),
        );
        (doc, form, email)
    }

    #[test]
    fn owning_form_walks_up_the_tree() {
        let (doc, form, email) = sample();
        assert_eq!(doc.owning_form(email), Some(form));
        assert_eq!(doc.owning_form(form), None);
    }

    #[test]
    fn set_field_replaces_text_value() {
        let (mut doc, _form, email) = sample();
        doc.set_field(email, "jane@example.com");
        assert_eq!(doc.get(email).unwrap().value, "jane@example.com");
    }

    #[test]
    fn checking_a_radio_unchecks_its_group() {
        let (mut doc, form, _) = sample();
        let a = doc.append(
            Some(form),
            Element::new("input").with_attr("type", "radio").with_attr("name", "topic"),
        );
        let b = doc.append(
            Some(form),
            Element::new("input").with_attr("type", "radio").with_attr("name", "topic"),
        );
        doc.set_field(a, "true");
        doc.set_field(b, "true");
        assert!(!doc.get(a).unwrap().checked);
        assert!(doc.get(b).unwrap().checked);
    }

    #[test]
    fn submit_controls() {
        assert!(Element::new("button").is_submit_control());
        assert!(Element::new("input").with_attr("type", "SUBMIT").is_submit_control());
        assert!(!Element::new("button").with_attr("type", "button").is_submit_control());
        assert!(!Element::new("input").is_submit_control());
    }
}
