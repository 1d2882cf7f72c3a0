//! Error types for metrics query parsing.

use prometheus_client::encoding::EncodeLabelValue;
use thiserror::Error;

/// Errors produced while turning a query URI into a [`MetricsRequest`](crate::MetricsRequest).
///
/// Every variant describes a malformed client request. None of them are
/// transient, so callers should surface them to the client instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A path segment holds an invalid percent-encoding.
    #[error("Bad encoding in path segment '{segment}': {reason}")]
    BadEncoding { segment: String, reason: String },

    /// The scope segment is not one of the known scopes.
    #[error("Unrecognized scope '{0}', expected 'reactor' or 'user'")]
    UnrecognizedScope(String),

    /// A query parameter could not be interpreted.
    #[error("Malformed parameter {name}={value:?}: {reason}")]
    MalformedParameter {
        name: String,
        value: String,
        reason: String,
    },

    /// The path does not match any recognized shape.
    #[error("Malformed path: {0}")]
    MalformedPath(String),
}

/// Fieldless discriminant of [`ParseError`], used as a metrics label.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum ParseErrorKind {
    BadEncoding,
    UnrecognizedScope,
    MalformedParameter,
    MalformedPath,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::BadEncoding { .. } => ParseErrorKind::BadEncoding,
            ParseError::UnrecognizedScope(_) => ParseErrorKind::UnrecognizedScope,
            ParseError::MalformedParameter { .. } => ParseErrorKind::MalformedParameter,
            ParseError::MalformedPath(_) => ParseErrorKind::MalformedPath,
        }
    }

    pub(crate) fn malformed_parameter(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        ParseError::MalformedParameter {
            name: name.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
