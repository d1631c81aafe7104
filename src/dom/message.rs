use crate::dom::dom_model::{Document, NodeId, Visibility};

/// The element a submitter writes its status text into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageArea {
    pub node: NodeId,
}

impl MessageArea {
    pub fn new(node: NodeId) -> Self {
        MessageArea { node }
    }

    pub fn show(&self, doc: &mut Document) {
        if let Some(el) = doc.get_mut(self.node) {
            el.visibility = Visibility::Visible;
        }
    }

    pub fn hide(&self, doc: &mut Document) {
        if let Some(el) = doc.get_mut(self.node) {
            el.visibility = Visibility::Hidden;
        }
    }

    /// Replace the content with `html`, unescaped.
    pub fn set_html(&self, doc: &mut Document, html: &str) {
        if let Some(el) = doc.get_mut(self.node) {
            el.inner_html = html.to_string();
        }
    }

    pub fn visibility(&self, doc: &Document) -> Visibility {
        doc.get(self.node)
            .map(|el| el.visibility)
            .unwrap_or(Visibility::Hidden)
    }

    pub fn is_visible(&self, doc: &Document) -> bool {
        self.visibility(doc) == Visibility::Visible
    }

    pub fn content<'a>(&self, doc: &'a Document) -> &'a str {
        doc.get(self.node).map(|el| el.inner_html.as_str()).unwrap_or("")
    }
}
