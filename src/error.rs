//! 错误类型：参数校验错误与请求错误。
//!
//! Unified error type for the SDK.
//!
//! Callers see two families of failures: [`Error::Validation`] for bad arguments
//! (raised before any network I/O) and [`Error::Request`] for everything that
//! happened on the wire. Malformed frames inside a stream are never surfaced as
//! errors; see [`crate::pipeline`].

use crate::transport::RequestError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "text", "options.temperature")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "datamind", "client_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Network failure, HTTP status >= 400, or an undecodable response body.
    #[error("{0}")]
    Request(#[from] RequestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Validation failure attributed to a named parameter.
    pub fn invalid_param(param: &str, msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new().with_field_path(param),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// The bare human-readable message, without the category prefix or context.
    pub fn message(&self) -> String {
        match self {
            Error::Validation { message, .. } | Error::Configuration { message, .. } => {
                message.clone()
            }
            Error::Request(e) => e.message.clone(),
            Error::Io(e) => e.to_string(),
            Error::Serialization(e) => e.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// HTTP status code, when the error came from a response with status >= 400.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request(e) => e.status,
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestErrorKind;

    #[test]
    fn validation_display_includes_field() {
        let err = Error::invalid_param("text", "text must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: text must not be empty (field: text)"
        );
        assert_eq!(err.message(), "text must not be empty");
        assert!(err.is_validation());
    }

    #[test]
    fn request_error_displays_bare_message() {
        let err: Error = RequestError::status(403, "forbidden").into();
        assert_eq!(err.to_string(), "forbidden");
        assert_eq!(err.status(), Some(403));
        assert!(matches!(
            err,
            Error::Request(RequestError {
                kind: RequestErrorKind::Status,
                ..
            })
        ));
    }
}
