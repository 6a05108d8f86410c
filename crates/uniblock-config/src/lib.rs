//! Configuration for uniblock.
//!
//! A TOML file layered under `UNIBLOCK_*` environment variables, validated
//! into the runtime `uniblock_core` types. Missing required settings fail
//! fast instead of leaving the platform to run on absent values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use url::Url;

use uniblock_core::{
    ControllerConfig, PlatformConfig, PlatformHint, PresentationMode, TlsVerification,
};

/// Port of a standalone Network Application.
pub const DEFAULT_CONTROLLER_PORT: u16 = 8443;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is required. Check the config file.")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// The file/env shape of the configuration. Required fields are optional
/// here so that absence can be reported by name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Platform display name.
    #[serde(default = "default_name")]
    pub name: String,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Controller host name or IP, optionally with a scheme.
    pub controller_address: Option<String>,

    #[serde(default = "default_port")]
    pub controller_port: u16,

    #[serde(default = "default_site")]
    pub site_name: String,

    /// Present clients as locks instead of switches.
    #[serde(default)]
    pub notifications: bool,

    /// Force the UniFi OS (`true`) or classic (`false`) API layout.
    /// Absent means probe the controller.
    #[serde(default)]
    pub unifi_os: Option<bool>,

    /// Accept self-signed controller certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Path to a custom CA certificate. Ignored when `insecure` is set.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout. Absent means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Where accessories are persisted between runs.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            username: None,
            password: None,
            controller_address: None,
            controller_port: default_port(),
            site_name: default_site(),
            notifications: false,
            unifi_os: None,
            insecure: default_insecure(),
            ca_cert: None,
            timeout_secs: None,
            cache_path: None,
        }
    }
}

fn default_name() -> String {
    "UniFi".into()
}
fn default_port() -> u16 {
    DEFAULT_CONTROLLER_PORT
}
fn default_site() -> String {
    "default".into()
}
fn default_insecure() -> bool {
    true
}

/// Everything the binary needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub platform: PlatformConfig,
    pub cache_path: PathBuf,
}

impl Config {
    /// Check required fields and build the runtime settings.
    ///
    /// Every missing required field is logged; the first one is returned.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("controller_address", &self.controller_address),
        ];
        for (field, value) in required {
            if value.as_deref().is_none_or(str::is_empty) {
                error!("{field} is required. Check the config file.");
            }
        }
        let [username, password, address] = required.map(|(field, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing { field })
        });
        let (username, password, address) = (username?, password?, address?);

        let url = controller_url(address, self.controller_port)?;

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let platform = match self.unifi_os {
            None => PlatformHint::Detect,
            Some(true) => PlatformHint::UnifiOs,
            Some(false) => PlatformHint::Classic,
        };

        Ok(Settings {
            controller: ControllerConfig {
                url,
                site: self.site_name.clone(),
                platform,
                tls,
                timeout: self.timeout_secs.map(Duration::from_secs),
            },
            platform: PlatformConfig {
                name: self.name.clone(),
                username: username.to_owned(),
                password: SecretString::from(password.to_owned()),
                mode: PresentationMode::from_notifications(self.notifications),
            },
            cache_path: self.cache_path.clone().unwrap_or_else(default_cache_path),
        })
    }
}

/// `https://{address}:{port}`. An address that already carries a scheme
/// keeps it; an explicit port in the address wins over `port`.
pub fn controller_url(address: &str, port: u16) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "controller_address".into(),
        reason,
    };

    if port == 0 {
        return Err(ConfigError::Validation {
            field: "controller_port".into(),
            reason: "port must be non-zero".into(),
        });
    }

    let raw = if address.contains("://") {
        address.to_owned()
    } else {
        format!("https://{address}")
    };

    let mut url = Url::parse(&raw).map_err(|e| invalid(format!("{e}: {address}")))?;
    if url.host_str().is_none() {
        return Err(invalid(format!("no host in {address}")));
    }
    if url.port().is_none() {
        url.set_port(Some(port))
            .map_err(|()| invalid(format!("cannot set port on {address}")))?;
    }
    Ok(url)
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "uniblock", "uniblock")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(".").join("uniblock.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted accessory cache.
pub fn default_cache_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(".").join("accessories.json"),
        |dirs| dirs.data_dir().join("accessories.json"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// The provider stack: defaults, then the TOML file, then `UNIBLOCK_*`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNIBLOCK_"))
}

/// Load the config from `path` (or the default path) plus the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    Ok(figment(&path).extract()?)
}

/// Load and validate in one step.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_config(path)?.validate()
}
