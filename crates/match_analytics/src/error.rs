use thiserror::Error;

/// Errors surfaced by the analytics engine.
///
/// Malformed per-event data is never an error: it is filtered out where it is
/// read. These variants cover caller mistakes (wrong JSON shape, bad config).
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Expected a JSON array for `{field}`, found {found}")]
    NotAnArray { field: String, found: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl AnalyticsError {
    pub(crate) fn not_an_array(field: &str, value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        AnalyticsError::NotAnArray { field: field.to_string(), found }
    }

    /// Whether the caller can fix the problem by correcting its input.
    pub fn is_input_error(&self) -> bool {
        match self {
            AnalyticsError::NotAnArray { .. } => true,
            AnalyticsError::Json(err) => err.is_data() || err.is_syntax() || err.is_eof(),
            AnalyticsError::Yaml(_) => true,
            AnalyticsError::InvalidConfig(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
