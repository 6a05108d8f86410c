//! CLI error types with miette diagnostics and exit-code mapping.

use miette::Diagnostic;
use thiserror::Error;

use uniblock_config::ConfigError;
use uniblock_core::CoreError;

/// Exit codes, one per failure category.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(uniblock::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             URL: {url}\n\
             Self-signed certificates need `insecure = true` in the config."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out")]
    #[diagnostic(
        code(uniblock::timeout),
        help("Raise `timeout_secs` in the config or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(uniblock::auth_failed),
        help(
            "Verify `username` and `password`.\n\
             The account needs admin rights on the site to block clients."
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("No accessory for client '{identifier}'")]
    #[diagnostic(
        code(uniblock::not_found),
        help("Run: uniblock discover to see the known clients")
    )]
    NotFound { identifier: String },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller error: {message}")]
    #[diagnostic(code(uniblock::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(uniblock::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(
        code(uniblock::config),
        help(
            "Set the value in {path} or through a UNIBLOCK_* environment variable."
        )
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── Accessory cache ──────────────────────────────────────────────
    #[error("Accessory cache at {path} is unusable: {reason}")]
    #[diagnostic(
        code(uniblock::cache),
        help("Delete the file to rebuild it from the controller on the next run.")
    )]
    Cache { path: String, reason: String },

    #[error("Accessory cache update failed: {message}")]
    #[diagnostic(code(uniblock::cache_write))]
    CacheWrite { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(uniblock::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn config(source: ConfigError, path: &std::path::Path) -> Self {
        Self::Config {
            source,
            path: path.display().to_string(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AccessoryNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Host { message } => CliError::CacheWrite { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            e @ (CoreError::UnboundCharacteristic { .. }
            | CoreError::InvalidCharacteristicValue { .. }) => CliError::Validation {
                field: "characteristic".into(),
                reason: e.to_string(),
            },
            e @ (CoreError::Api { .. }
            | CoreError::EmptyAcknowledgment { .. }
            | CoreError::Internal(_)) => CliError::ApiError {
                message: e.to_string(),
            },
        }
    }
}
