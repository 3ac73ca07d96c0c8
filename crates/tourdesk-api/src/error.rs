use thiserror::Error;

/// Message shown when a failure carries no server-provided text.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Top-level error type for the `tourdesk-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, HTTP-level rejections, body-level `success: false`
/// rejections, envelope shape mismatches, and the geocoding collaborator.
/// `tourdesk-core` wraps these in its own `CoreError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the token (HTTP 401), or the token itself
    /// cannot be placed in a header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client-construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Reading a local upload file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Server responses ────────────────────────────────────────────
    /// Non-2xx response. `message` is the server's message when the
    /// body carried one, else the status text.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// The body did not match the response envelope.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Routing ─────────────────────────────────────────────────────
    /// The resource has no endpoint for this operation.
    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },

    // ── Geocoding ───────────────────────────────────────────────────
    /// The address could not be resolved to coordinates.
    #[error("Geocoding failed: {message}")]
    Geocoding { message: String },
}

impl Error {
    /// Returns `true` if the server rejected our credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Api { status: 403, .. })
    }

    /// Returns `true` for network-level failures the user can simply retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The server-provided message when there is one, else a generic
    /// fallback suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Rejected { message } if !message.is_empty() => {
                message.clone()
            }
            Self::Authentication { message } => message.clone(),
            Self::Geocoding { message } => message.clone(),
            Self::Unsupported { .. } => self.to_string(),
            _ => GENERIC_FAILURE.to_owned(),
        }
    }
}
