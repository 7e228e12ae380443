//! Structured error types for the Quire composition engine.
//!
//! Only fatal conditions live here. Content that is too tall for a page is
//! not an error: it is reported as a
//! [`ContentOverflowWarning`](crate::layout::ContentOverflowWarning) next to
//! the finished document.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuireError>;

/// The unified error type returned by all public Quire API functions.
#[derive(Debug, Error)]
pub enum QuireError {
    /// Page geometry or typography settings cannot produce a layout.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Text was measured against a non-positive width. This is a bug in
    /// block height computation, not a property of the input.
    #[error("Text measured with non-positive max width {max_width}")]
    MeasurementContractViolation { max_width: f64 },

    /// JSON input failed to parse as a report or configuration.
    #[error("Failed to parse input: {source}{}", format_hint(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be decoded or parsed.
    #[error("Font error: {0}")]
    FontError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check field names and the section \"type\" tags.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        QuireError::ParseError { source: e, hint }
    }
}
