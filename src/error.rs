use std::fmt;

#[derive(Debug)]
pub enum FormError {
    /// Page description could not be read from disk
    PageRead { path: String, source: std::io::Error },

    /// Page description is not valid YAML
    YamlParse { context: String, source: serde_yaml::Error },

    /// Page description is not valid JSON
    JsonParse { context: String, source: serde_json::Error },

    /// Selector text could not be parsed
    InvalidSelector(String),

    /// No element matched a selector the caller required
    ElementNotFound { selector: String },

    /// No field with this name inside the form
    FieldNotFound { form: String, name: String },

    /// `--field` argument not in `name=value` form
    InvalidFieldArg(String),

    /// reqwest client could not be constructed
    HttpClient(reqwest::Error),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::PageRead { path, source } => {
                write!(f, "Failed to read page '{}': {}", path, source)
            }
            FormError::YamlParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            FormError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            FormError::InvalidSelector(selector) => {
                write!(f, "Invalid selector: '{}'", selector)
            }
            FormError::ElementNotFound { selector } => {
                write!(f, "No element matches '{}'", selector)
            }
            FormError::FieldNotFound { form, name } => {
                write!(f, "Form '{}' has no field named '{}'", form, name)
            }
            FormError::InvalidFieldArg(arg) => {
                write!(f, "Expected name=value, got '{}'", arg)
            }
            FormError::HttpClient(e) => {
                write!(f, "Failed to build HTTP client: {}", e)
            }
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormError::PageRead { source, .. } => Some(source),
            FormError::YamlParse { source, .. } => Some(source),
            FormError::JsonParse { source, .. } => Some(source),
            FormError::HttpClient(e) => Some(e),
            _ => None,
        }
    }
}
