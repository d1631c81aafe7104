use form_submitter::{
    dom::dom_model::{Document, Element, NodeId},
    form::{
        clear::clear_fields,
        fill::fill_fields,
        serialize::serialize,
    },
    page::loader::load_page,
};

use crate::common::utils::fixture;

mod common;

fn contact_document() -> (Document, NodeId) {
    let doc = load_page(&fixture("contact.yaml")).unwrap();
    let form = doc.query_selector(".contact_form").unwrap().unwrap();
    (doc, form)
}

fn pairs(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    serialize(doc, form).pairs
}

fn owned(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}

// =========================================================================
// Successful controls
// =========================================================================

#[test]
fn untouched_form_serializes_defaults_in_document_order() {
    let (doc, form) = contact_document();
    assert_eq!(
        pairs(&doc, form),
        owned(&[
            ("name", ""),
            ("email", ""),
            ("source", "site"),
            ("topic", "general"),
            ("message", ""),
        ])
    );
    assert_eq!(
        serialize(&doc, form).encode(),
        "name=&email=&source=site&topic=general&message="
    );
}

#[test]
fn filled_form_serializes_current_values() {
    let (mut doc, form) = contact_document();
    fill_fields(
        &mut doc,
        form,
        &owned(&[
            ("name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("subscribe", "yes"),
            ("topic", "sales"),
            ("message", "Hi\nthere"),
        ]),
    )
    .unwrap();

    assert_eq!(
        serialize(&doc, form).encode(),
        "name=Jane+Doe&email=jane%40example.com&source=site&subscribe=on&topic=sales&message=Hi%0D%0Athere"
    );
}

#[test]
fn disabled_and_button_controls_are_skipped() {
    let (doc, form) = contact_document();
    let payload = serialize(&doc, form);
    assert_eq!(payload.get("nickname"), None);
    assert_eq!(payload.get("send"), None);
}

#[test]
fn unnamed_controls_are_skipped() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    doc.append(Some(form), Element::new("input"));
    doc.append(Some(form), Element::new("input").with_attr("name", ""));
    doc.append(Some(form), Element::new("input").with_attr("name", "kept"));

    assert_eq!(pairs(&doc, form), owned(&[("kept", "")]));
}

#[test]
fn every_submitter_type_is_skipped() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    for t in ["submit", "button", "image", "reset", "file"] {
        doc.append(
            Some(form),
            Element::new("input").with_attr("type", t).with_attr("name", t),
        );
    }
    doc.append(
        Some(form),
        Element::new("input").with_attr("type", "search").with_attr("name", "q"),
    );

    assert_eq!(pairs(&doc, form), owned(&[("q", "")]));
}

#[test]
fn checked_radio_contributes_its_value() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    let mut a = Element::new("input")
        .with_attr("type", "radio")
        .with_attr("name", "size");
    a.value = "small".into();
    let mut b = a.clone();
    b.value = "large".into();
    b.checked = true;
    doc.append(Some(form), a);
    doc.append(Some(form), b);

    assert_eq!(pairs(&doc, form), owned(&[("size", "large")]));
}

#[test]
fn disabled_fieldset_disables_its_controls() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    let mut fieldset = Element::new("fieldset");
    fieldset.disabled = true;
    let fieldset = doc.append(Some(form), fieldset);
    doc.append(Some(fieldset), Element::new("input").with_attr("name", "inner"));
    doc.append(Some(form), Element::new("input").with_attr("name", "outer"));

    assert_eq!(pairs(&doc, form), owned(&[("outer", "")]));
}

#[test]
fn multiple_select_emits_one_pair_per_selected_option() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    let select = doc.append(
        Some(form),
        Element::new("select")
            .with_attr("name", "tags")
            .with_attr("multiple", ""),
    );
    for (value, selected) in [("a", true), ("b", false), ("c", true)] {
        let mut option = Element::new("option");
        option.value = value.into();
        option.selected = selected;
        doc.append(Some(select), option);
    }

    assert_eq!(pairs(&doc, form), owned(&[("tags", "a"), ("tags", "c")]));
}

#[test]
fn multiple_select_with_nothing_selected_is_omitted() {
    let mut doc = Document::new(None);
    let form = doc.append(None, Element::new("form"));
    let select = doc.append(
        Some(form),
        Element::new("select")
            .with_attr("name", "tags")
            .with_attr("multiple", ""),
    );
    let mut option = Element::new("option");
    option.value = "a".into();
    doc.append(Some(select), option);

    assert!(serialize(&doc, form).is_empty());
}

#[test]
fn only_the_submitted_forms_fields_are_serialized() {
    let mut doc = Document::new(None);
    let first = doc.append(None, Element::new("form"));
    doc.append(Some(first), Element::new("input").with_attr("name", "a"));
    let second = doc.append(None, Element::new("form"));
    doc.append(Some(second), Element::new("input").with_attr("name", "b"));

    assert_eq!(pairs(&doc, second), owned(&[("b", "")]));
}

// =========================================================================
// Clearing
// =========================================================================

#[test]
fn clear_targets_inputs_except_submit_and_textareas() {
    let (mut doc, form) = contact_document();
    let cleared = clear_fields(&mut doc, form).unwrap();

    let names: Vec<String> = cleared
        .iter()
        .filter_map(|id| doc.get(*id).and_then(|el| el.name()).map(str::to_string))
        .collect();
    assert_eq!(
        names,
        vec!["name", "email", "source", "subscribe", "message", "nickname"]
    );
}

#[test]
fn clear_skips_submit_button_whatever_the_type_case() {
    let mut doc = Document::new(Some("https://example.com/contact"));
    let form = doc.append(None, Element::new("form"));
    let email = doc.append(Some(form), Element::new("input").with_attr("name", "email"));
    let mut send = Element::new("input")
        .with_attr("type", "Submit")
        .with_attr("name", "send");
    send.value = "Send".to_string();
    let send = doc.append(Some(form), send);
    let mut upper = Element::new("input").with_attr("type", "SUBMIT");
    upper.value = "Go".to_string();
    let upper = doc.append(Some(form), upper);
    doc.get_mut(email).unwrap().value = "jane@example.com".to_string();

    let cleared = clear_fields(&mut doc, form).unwrap();

    assert_eq!(cleared, vec![email]);
    assert_eq!(doc.get(email).unwrap().value, "");
    assert_eq!(doc.get(send).unwrap().value, "Send");
    assert_eq!(doc.get(upper).unwrap().value, "Go");
}

#[test]
fn clear_leaves_selects_alone() {
    let (mut doc, form) = contact_document();
    fill_fields(&mut doc, form, &owned(&[("topic", "sales")])).unwrap();
    clear_fields(&mut doc, form).unwrap();

    assert_eq!(serialize(&doc, form).get("topic"), Some("sales"));
}

#[test]
fn fill_unknown_field_is_an_error() {
    let (mut doc, form) = contact_document();
    let err = fill_fields(&mut doc, form, &owned(&[("phone", "555")])).unwrap_err();
    assert_eq!(err.to_string(), "Form '.contact_form' has no field named 'phone'");
}
