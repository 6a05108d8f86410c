use thiserror::Error;

/// Failures of a single legacy API call.
///
/// `uniblock-core` folds these into its domain error; nothing above the
/// core sees HTTP details.
#[derive(Debug, Error)]
pub enum Error {
    /// The controller refused the credentials or the session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the HTTP client failed, usually over the CA certificate.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-`ok` `meta.rc`, a UniFi OS error body, or an unexpected status.
    #[error("Legacy API error: {message}")]
    LegacyApi { message: String },

    /// The body was not the expected envelope. `body` keeps a preview of it.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
