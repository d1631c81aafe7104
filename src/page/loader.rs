use std::path::Path;

use crate::dom::dom_model::Document;
use crate::error::FormError;
use crate::page::page_model::PageSpec;

/// Load a page description from a `.json`, `.yaml` or `.yml` file.
pub fn load_page(path: &str) -> Result<Document, FormError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormError::PageRead {
        path: path.to_string(),
        source: e,
    })?;

    let is_json = Path::new(path)
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("json"));

    let spec = if is_json {
        parse_page_json(&content, path)?
    } else {
        parse_page_yaml(&content, path)?
    };
    Ok(spec.to_document())
}

pub fn parse_page_yaml(content: &str, context: &str) -> Result<PageSpec, FormError> {
    serde_yaml::from_str(content).map_err(|e| FormError::YamlParse {
        context: context.to_string(),
        source: e,
    })
}

pub fn parse_page_json(content: &str, context: &str) -> Result<PageSpec, FormError> {
    serde_json::from_str(content).map_err(|e| FormError::JsonParse {
        context: context.to_string(),
        source: e,
    })
}
