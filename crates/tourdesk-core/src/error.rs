// ── Core error types ──
//
// User-facing errors from tourdesk-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the `From<tourdesk_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;
use tourdesk_api::error::GENERIC_FAILURE;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unexpected response from the API: {message}")]
    MalformedResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: String,
        operation: String,
    },

    #[error("{message}")]
    Rejected { message: String },

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Cannot go from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Could not locate address: {message}")]
    Geocoding { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Text for an error notification: the server's own message when it
    /// sent one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message }
            | Self::Api { message, .. }
            | Self::NotFound { message }
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::Rejected { .. } | Self::Api { .. } | Self::MalformedResponse { .. } => {
                GENERIC_FAILURE.to_owned()
            }
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Geocoding { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tourdesk_api::Error> for CoreError {
    fn from(err: tourdesk_api::Error) -> Self {
        match err {
            tourdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tourdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            tourdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            tourdesk_api::Error::Tls(message) => CoreError::Config { message },
            tourdesk_api::Error::Io(e) => CoreError::Io(e),
            tourdesk_api::Error::Api { status: 404, message } => CoreError::NotFound { message },
            tourdesk_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            tourdesk_api::Error::Rejected { message } => CoreError::Rejected { message },
            tourdesk_api::Error::Deserialization { message, .. } => {
                CoreError::MalformedResponse { message }
            }
            tourdesk_api::Error::Unsupported {
                resource,
                operation,
            } => CoreError::Unsupported {
                resource: resource.into(),
                operation: operation.into(),
            },
            tourdesk_api::Error::Geocoding { message } => CoreError::Geocoding { message },
        }
    }
}
