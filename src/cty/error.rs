// Error types for cty.dat parsing
//
// A failed parse is fatal for the whole table. An unknown callsign is not an
// error: lookups return None.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CtyError {
    /// Malformed country definition or override value
    #[error("cty.dat line {line}: {reason}: {content:?}")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },

    /// Prefix list with no preceding country definition
    #[error("cty.dat line {line}: prefix list before any country definition: {content:?}")]
    MissingCountry { line: usize, content: String },

    #[error("Failed to read cty.dat: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize prefix table: {0}")]
    Json(#[from] serde_json::Error),
}

impl CtyError {
    pub(crate) fn format(line: usize, content: &str, reason: impl Into<String>) -> Self {
        CtyError::Format {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    /// Line number the error refers to, if it came from the text itself
    pub fn line(&self) -> Option<usize> {
        match self {
            CtyError::Format { line, .. } | CtyError::MissingCountry { line, .. } => Some(*line),
            CtyError::Io(_) | CtyError::Json(_) => None,
        }
    }
}
