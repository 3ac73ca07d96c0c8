//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tourdesk_config::ConfigError;
use tourdesk_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VALIDATION: i32 = 5;
    pub const NETWORK: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the API at {url}")]
    #[diagnostic(
        code(tourdesk::connection_failed),
        help(
            "Check that the API server is running.\n\
             URL: {url}\n\
             Override it with --api-url or: tourdesk config set api_url <url>"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(tourdesk::timeout),
        help("Increase the timeout with --timeout or check the server's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tourdesk::auth_failed),
        help(
            "Check the access token.\n\
             Store one with: tourdesk config set-token\n\
             Or set the TOURDESK_TOKEN environment variable."
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(tourdesk::not_found),
        help("Run: tourdesk {list_command} to see available records")
    )]
    NotFound {
        message: String,
        list_command: String,
    },

    #[error("{resource} does not support {operation}")]
    #[diagnostic(code(tourdesk::unsupported))]
    Unsupported { resource: String, operation: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(tourdesk::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tourdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Rejected {count} file(s)")]
    #[diagnostic(
        code(tourdesk::upload),
        help("{details}\nImages must be JPEG, PNG or WebP; videos MP4 or WebM up to 100 MB.")
    )]
    Uploads { count: usize, details: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tourdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tourdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(tourdesk::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tourdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(tourdesk::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::NETWORK,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Uploads { .. } | Self::Json(_) => {
                exit_code::VALIDATION
            }
            Self::NonInteractiveRequiresYes { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(message: String, list_command: &str) -> Self {
        Self::NotFound {
            message,
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.user_message();
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotFound { .. } => CliError::NotFound {
                message,
                list_command: "<entity> list".into(),
            },
            CoreError::Unsupported {
                resource,
                operation,
            } => CliError::Unsupported {
                resource,
                operation,
            },
            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },
            CoreError::Geocoding { message } => CliError::Validation {
                field: "address".into(),
                reason: message,
            },
            CoreError::InvalidTransition { from, to } => CliError::Validation {
                field: "mode".into(),
                reason: format!("cannot go from {from} to {to}"),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Io(e) => CliError::Io(e),
            CoreError::Rejected { .. } | CoreError::Api { .. } | CoreError::MalformedResponse { .. } => {
                CliError::Api { message }
            }
        }
    }
}
