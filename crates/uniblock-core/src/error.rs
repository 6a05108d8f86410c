// ── Core error types ──
//
// Domain errors from uniblock-core. Consumers never see HTTP status codes
// or JSON parse failures directly: the `From<uniblock_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::model::{Characteristic, ServiceKind};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Controller errors ────────────────────────────────────────────
    #[error("Controller rejected the request: {message}")]
    Api { message: String },

    #[error("Controller returned no acknowledgment for {mac}")]
    EmptyAcknowledgment { mac: String },

    // ── Accessory errors ─────────────────────────────────────────────
    #[error("{characteristic} has no {access} handler on the {service} service")]
    UnboundCharacteristic {
        service: ServiceKind,
        characteristic: Characteristic,
        access: &'static str,
    },

    #[error("Invalid value for {characteristic}: expected {expected}")]
    InvalidCharacteristicValue {
        characteristic: Characteristic,
        expected: &'static str,
    },

    #[error("No accessory for client {identifier}")]
    AccessoryNotFound { identifier: String },

    // ── Host errors ──────────────────────────────────────────────────
    #[error("Accessory host failed: {message}")]
    Host { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<uniblock_api::Error> for CoreError {
    fn from(err: uniblock_api::Error) -> Self {
        match err {
            uniblock_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            uniblock_api::Error::Transport(ref e) => {
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
                    }
                }
            }
            uniblock_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            uniblock_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            uniblock_api::Error::LegacyApi { message } => CoreError::Api { message },
            uniblock_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
