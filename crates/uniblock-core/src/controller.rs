// ── Controller contract ──
//
// Everything the platform and its accessories need from the controller,
// expressed as single-shot async calls with explicit results. The
// production implementation is `uniblock_api::LegacyClient`; tests plug
// in an in-memory fake.

use std::future::Future;

use secrecy::SecretString;
use tracing::debug;
use uniblock_api::{ControllerPlatform, LegacyClient, LegacyUserEntry, TlsMode, TransportConfig};

use crate::config::{ControllerConfig, PlatformHint, TlsVerification};
use crate::error::CoreError;
use crate::model::{ClientDevice, MacAddress};

/// One authenticated controller session scoped to one site.
///
/// Shared behind an `Arc` by the platform and every accessory; all methods
/// take `&self`.
pub trait ClientController: Send + Sync {
    /// The site all calls are scoped to.
    fn site(&self) -> &str;

    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Every client the controller knows about.
    fn all_users(&self) -> impl Future<Output = Result<Vec<ClientDevice>, CoreError>> + Send;

    /// Clients currently denied network access.
    fn blocked_users(&self) -> impl Future<Output = Result<Vec<ClientDevice>, CoreError>> + Send;

    /// Block `mac`, returning the controller's acknowledged `blocked` flag.
    fn block_client(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Unblock `mac`, returning the controller's acknowledged `blocked` flag.
    fn unblock_client(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

impl From<LegacyUserEntry> for ClientDevice {
    fn from(entry: LegacyUserEntry) -> Self {
        Self {
            mac: MacAddress::new(entry.mac),
            name: entry.name,
            hostname: entry.hostname,
            device_name: entry.device_name,
        }
    }
}

/// Pull the `blocked` flag out of a block/unblock acknowledgment.
fn acknowledged_blocked(mac: &MacAddress, ack: &[LegacyUserEntry]) -> Result<bool, CoreError> {
    ack.iter()
        .find(|entry| MacAddress::new(&entry.mac) == *mac)
        .or_else(|| ack.first())
        .map(|entry| entry.blocked)
        .ok_or_else(|| CoreError::EmptyAcknowledgment {
            mac: mac.to_string(),
        })
}

impl ClientController for LegacyClient {
    fn site(&self) -> &str {
        LegacyClient::site(self)
    }

    async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        Ok(LegacyClient::login(self, username, password).await?)
    }

    async fn all_users(&self) -> Result<Vec<ClientDevice>, CoreError> {
        let users = self.list_all_users().await?;
        Ok(users.into_iter().map(ClientDevice::from).collect())
    }

    async fn blocked_users(&self) -> Result<Vec<ClientDevice>, CoreError> {
        let users = self.list_blocked_users().await?;
        Ok(users.into_iter().map(ClientDevice::from).collect())
    }

    async fn block_client(&self, mac: &MacAddress) -> Result<bool, CoreError> {
        let ack = LegacyClient::block_client(self, mac.as_str()).await?;
        acknowledged_blocked(mac, &ack)
    }

    async fn unblock_client(&self, mac: &MacAddress) -> Result<bool, CoreError> {
        let ack = LegacyClient::unblock_client(self, mac.as_str()).await?;
        acknowledged_blocked(mac, &ack)
    }
}

/// Build the legacy client for `config`, probing the platform if needed.
///
/// No request is authenticated yet; call [`ClientController::login`] next.
pub async fn connect(config: &ControllerConfig) -> Result<LegacyClient, CoreError> {
    let transport = TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None,
    };

    let platform = match config.platform {
        PlatformHint::UnifiOs => ControllerPlatform::UnifiOs,
        PlatformHint::Classic => ControllerPlatform::ClassicController,
        PlatformHint::Detect => LegacyClient::detect_platform(&config.url, &transport).await?,
    };
    debug!(url = %config.url, ?platform, site = %config.site, "building controller client");

    Ok(LegacyClient::new(
        config.url.clone(),
        config.site.clone(),
        platform,
        &transport,
    )?)
}
