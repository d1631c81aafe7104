use crate::dom::dom_model::{Document, NodeId};
use crate::error::FormError;

/// Set each named field in `form`, in order.
pub fn fill_fields(
    doc: &mut Document,
    form: NodeId,
    values: &[(String, String)],
) -> Result<(), FormError> {
    for (name, value) in values {
        let field = doc
            .field_by_name(form, name)
            .ok_or_else(|| FormError::FieldNotFound {
                form: describe_form(doc, form),
                name: name.clone(),
            })?;
        doc.set_field(field, value);
    }
    Ok(())
}

/// `#id`, `.first-class`, or the node index when neither exists.
pub fn describe_form(doc: &Document, form: NodeId) -> String {
    let Some(el) = doc.get(form) else {
        return format!("node {}", form.0);
    };
    if let Some(id) = el.id() {
        return format!("#{}", id);
    }
    match el.attr("class").and_then(|c| c.split_whitespace().next()) {
        Some(class) => format!(".{}", class),
        None => format!("form (node {})", form.0),
    }
}
