//! Error types for the estimation engine.

use thiserror::Error;

/// Errors raised by engine operations.
///
/// Scoring never fails; errors only come from malformed model input or from
/// string-addressed edits that name something the engine does not know.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A feature vector field is outside its documented range.
    #[error("invalid feature `{field}`: {message}")]
    InvalidFeature {
        /// Feature name (e.g., `"hour"`).
        field: &'static str,
        /// Constraint description.
        message: String,
    },

    /// A profile update path does not address a known field.
    #[error("unknown profile field `{0}`")]
    UnknownField(String),

    /// A profile update value cannot be read for its field.
    #[error("invalid value \"{value}\" for `{path}`: {message}")]
    InvalidValue {
        path: String,
        value: String,
        message: String,
    },

    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },

    /// No currently generated recommendation carries this id.
    #[error("no active recommendation with id {0}")]
    UnknownRecommendation(u8),
}

impl EngineError {
    pub(crate) fn invalid_feature(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFeature {
            field,
            message: message.into(),
        }
    }
}
