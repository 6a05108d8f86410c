// ── Runtime configuration ──
//
// These types describe how to reach the controller and how to present
// its clients. They carry credentials but never touch disk: the binary
// loads a config file and hands these in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::PresentationMode;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

/// Which flavor of controller to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlatformHint {
    /// Probe the controller's login endpoints.
    #[default]
    Detect,
    UnifiOs,
    Classic,
}

/// Connection settings for the single controller session.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller root URL (e.g. `https://unifi.local:8443`).
    pub url: Url,
    /// Site every call is scoped to.
    pub site: String,
    pub platform: PlatformHint,
    pub tls: TlsVerification,
    /// `None` leaves controller calls without a deadline.
    pub timeout: Option<Duration>,
}

/// Settings the platform coordinator needs after the session exists.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform display name, used in log lines.
    pub name: String,
    pub username: String,
    pub password: SecretString,
    pub mode: PresentationMode,
}
