use crate::dom::dom_model::{Document, NodeId};
use crate::error::FormError;

/// Every input except submit buttons, plus textareas.
pub const CLEARABLE_FIELDS: &str = "input[type!=submit], textarea";

/// Reset the value of every clearable field in `form` to "".
///
/// Only the value changes: checkboxes and radios keep their checked
/// state, selects are left alone. Returns the cleared nodes.
pub fn clear_fields(doc: &mut Document, form: NodeId) -> Result<Vec<NodeId>, FormError> {
    let fields = doc.find_within(form, CLEARABLE_FIELDS)?;
    for field in &fields {
        if let Some(el) = doc.get_mut(*field) {
            el.value.clear();
        }
    }
    Ok(fields)
}
