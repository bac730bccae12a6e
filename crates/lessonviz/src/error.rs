//! Error types for lessonviz operations.
//!
//! This module provides the main error type [`LessonVizError`] which wraps
//! the error conditions of a render: unknown tool names, parameters that do
//! not decode or violate a variant's constraints, unreadable configuration,
//! and drawing surface failures.

use thiserror::Error;

use crate::request::VariantTag;

/// The main error type for lessonviz operations.
///
/// Optional inputs never produce an error: an absent or unparsable optional
/// field falls back to its default. Overflowing element lists are truncated,
/// not rejected.
#[derive(Debug, Error)]
pub enum LessonVizError {
    #[error("unknown diagram tool `{tool_name}`")]
    UnknownVariant { tool_name: String },

    #[error("malformed parameters for `{variant}`: {message}")]
    MalformedParameters { variant: VariantTag, message: String },

    #[error("request JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl LessonVizError {
    /// Create a new `MalformedParameters` error for the given variant.
    pub fn malformed(variant: VariantTag, message: impl Into<String>) -> Self {
        Self::MalformedParameters {
            variant,
            message: message.into(),
        }
    }

    /// Returns the variant the error belongs to, when it is known.
    pub fn variant(&self) -> Option<VariantTag> {
        match self {
            Self::MalformedParameters { variant, .. } => Some(*variant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_message() {
        let err = LessonVizError::UnknownVariant {
            tool_name: "pieChart".to_string(),
        };
        assert_eq!(err.to_string(), "unknown diagram tool `pieChart`");
        assert_eq!(err.variant(), None);
    }

    #[test]
    fn test_malformed_names_variant() {
        let err = LessonVizError::malformed(VariantTag::NumberLine, "max must be greater than min");
        assert_eq!(
            err.to_string(),
            "malformed parameters for `numberLine`: max must be greater than min"
        );
        assert_eq!(err.variant(), Some(VariantTag::NumberLine));
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LessonVizError = json_err.into();
        assert!(matches!(err, LessonVizError::Json(_)));
    }
}
