use crate::dom::dom_model::{Document, NodeId};
use crate::error::FormError;

// ============================================================================
// A small CSS selector subset:
//   tag, *, #id, .class, [attr], [attr=value], [attr!=value]
//   descendant combinator (whitespace), selector groups (comma)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    groups: Vec<ComplexSelector>,
}

/// Compound selectors joined by the descendant combinator, outermost first.
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    parts: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrMatch {
    Present(String),
    Equals(String, String),
    /// jQuery's `[attr!=value]`: true when the attribute is absent too
    NotEquals(String, String),
}

impl Selector {
    pub fn parse(text: &str) -> Result<Self, FormError> {
        let invalid = || FormError::InvalidSelector(text.to_string());

        let mut groups = Vec::new();
        for group in split_outside_brackets(text, |c| c == ',') {
            let mut parts = Vec::new();
            for part in split_outside_brackets(&group, char::is_whitespace) {
                if part.is_empty() {
                    continue;
                }
                parts.push(parse_compound(&part).ok_or_else(invalid)?);
            }
            if parts.is_empty() {
                return Err(invalid());
            }
            groups.push(ComplexSelector { parts });
        }

        if groups.is_empty() {
            return Err(invalid());
        }
        Ok(Selector { groups })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|g| g.matches(doc, node))
    }
}

impl ComplexSelector {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }

        // Greedy right-to-left walk over ancestors is sufficient for the
        // descendant combinator.
        let mut remaining = rest.iter().rev().peekable();
        for ancestor in doc.ancestors(node) {
            let Some(compound) = remaining.peek() else {
                break;
            };
            if compound.matches(doc, ancestor) {
                remaining.next();
            }
        }
        remaining.peek().is_none()
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.get(node) else {
            return false;
        };

        if let Some(tag) = &self.tag {
            if &el.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| match a {
            AttrMatch::Present(name) => el.attr(name).is_some(),
            AttrMatch::Equals(name, value) => attr_equals(name, el.attr(name), value),
            AttrMatch::NotEquals(name, value) => !attr_equals(name, el.attr(name), value),
        })
    }
}

/// HTML attributes whose values match without regard to ASCII case.
const CASE_INSENSITIVE_ATTRS: [&str; 4] = ["type", "method", "enctype", "autocomplete"];

fn attr_equals(name: &str, actual: Option<&str>, expected: &str) -> bool {
    match actual {
        Some(actual) if CASE_INSENSITIVE_ATTRS.contains(&name) => actual.eq_ignore_ascii_case(expected),
        Some(actual) => actual == expected,
        None => false,
    }
}

fn parse_compound(text: &str) -> Option<Compound> {
    let chars: Vec<char> = text.chars().collect();
    let mut compound = Compound::default();
    let mut i = 0;
    let mut universal = false;

    let tag = read_ident(&chars, &mut i);
    if !tag.is_empty() {
        compound.tag = Some(tag.to_lowercase());
    } else if chars.first() == Some(&'*') {
        universal = true;
        i += 1;
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let class = read_ident(&chars, &mut i);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class);
            }
            '#' => {
                i += 1;
                let id = read_ident(&chars, &mut i);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id);
            }
            '[' => {
                let close = closing_bracket(&chars, i)?;
                let inner: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&inner)?);
                i = close + 1;
            }
            _ => return None,
        }
    }

    let empty = compound.tag.is_none()
        && compound.id.is_none()
        && compound.classes.is_empty()
        && compound.attrs.is_empty();
    if empty && !universal {
        return None;
    }
    Some(compound)
}

/// Index of the `]` closing the bracket at `open`, skipping quoted text.
fn closing_bracket(chars: &[char], open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, &c) in chars[open + 1..].iter().enumerate() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, ']') => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

fn parse_attr(inner: &str) -> Option<AttrMatch> {
    let inner = inner.trim();
    if let Some((name, value)) = inner.split_once("!=") {
        return Some(AttrMatch::NotEquals(attr_name(name)?, unquote(value)));
    }
    if let Some((name, value)) = inner.split_once('=') {
        return Some(AttrMatch::Equals(attr_name(name)?, unquote(value)));
    }
    Some(AttrMatch::Present(attr_name(inner)?))
}

fn attr_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(name.to_lowercase())
}

fn unquote(raw: &str) -> String {
    let v = raw.trim();
    let quoted = v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"')) || (v.starts_with('\'') && v.ends_with('\'')));
    if quoted {
        v[1..v.len() - 1].to_string()
    } else {
        v.to_string()
    }
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Split on `sep`, ignoring separators inside `[...]` and quotes.
fn split_outside_brackets(text: &str, sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, _) if depth == 0 && sep(c) => {
                out.push(std::mem::take(&mut current).trim().to_string());
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    out.push(current.trim().to_string());
    out
}
