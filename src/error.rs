//! Error types for activity summarization.

use thiserror::Error;

/// Failures that abort a summarization call.
///
/// Optional readings that are missing never produce an error; they surface as
/// `None` on the record instead. Numeric text that does not parse is not an
/// error either and becomes `NaN`.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The XML is not well formed or a required element/attribute is missing.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid timestamp `{raw}`: {source}")]
    InvalidTimestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::de::DeError> for SummaryError {
    fn from(err: quick_xml::de::DeError) -> Self {
        SummaryError::MalformedInput(err.to_string())
    }
}

/// Result type alias for summarization.
pub type Result<T> = std::result::Result<T, SummaryError>;
