use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that can occur while building, sending, or decoding agent requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgentError {
    /// Caller input was missing or malformed. Raised before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Client configuration was rejected at construction.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The HTTP exchange did not complete with status 200.
    ///
    /// `status` is `None` when no response was received at all
    /// (connection failure, timeout).
    #[error("transport error: {}", format_status(*.status, .status_text))]
    Transport {
        /// HTTP status code, if a response arrived.
        status: Option<u16>,
        /// Reason phrase or underlying transport error text.
        status_text: String,
    },

    /// The service reported a business-level failure, either through the
    /// error headers or an error node in the XML body.
    #[error("service error {code}: {message}")]
    Service {
        /// Service-defined error code (e.g. "57").
        code: String,
        /// Human-readable message as sent by the service.
        message: String,
    },

    /// The response body was expected to be XML but is not well-formed.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The response was well-formed but lacks a field the operation needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

fn format_status(status: Option<u16>, text: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code} {text}"),
        None => text.to_string(),
    }
}

impl AgentError {
    /// Shorthand for a [`AgentError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The service error code, if this is a [`AgentError::Service`] error.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// HTTP status of a [`AgentError::Transport`] error, when one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
