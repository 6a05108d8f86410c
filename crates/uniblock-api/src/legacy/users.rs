// Legacy API user endpoints
//
// Known-client listing via stat/alluser and access control via
// cmd/stamgr. The controller calls every client it has ever seen a "user".

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::LegacyUserEntry;

/// Lookback window for `stat/alluser`, in hours (one year).
pub const USER_HISTORY_HOURS: u32 = 8760;

impl LegacyClient {
    /// List every client the controller has seen within the lookback window.
    ///
    /// `POST /api/s/{site}/stat/alluser` with `{"type": "all", "conn": "all"}`
    pub async fn list_all_users(&self) -> Result<Vec<LegacyUserEntry>, Error> {
        debug!(site = self.site(), "listing all users");
        self.list_users("all").await
    }

    /// List clients currently denied network access.
    ///
    /// `POST /api/s/{site}/stat/alluser` with `{"type": "blocked", "conn": "all"}`
    pub async fn list_blocked_users(&self) -> Result<Vec<LegacyUserEntry>, Error> {
        debug!(site = self.site(), "listing blocked users");
        self.list_users("blocked").await
    }

    async fn list_users(&self, kind: &str) -> Result<Vec<LegacyUserEntry>, Error> {
        let url = self.site_url("stat/alluser")?;
        self.post(
            url,
            &json!({
                "type": kind,
                "conn": "all",
                "within": USER_HISTORY_HOURS,
            }),
        )
        .await
    }

    /// Block a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`.
    /// The controller answers with the updated user record(s).
    pub async fn block_client(&self, mac: &str) -> Result<Vec<LegacyUserEntry>, Error> {
        debug!(mac, "blocking client");
        self.station_command("block-sta", mac).await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&self, mac: &str) -> Result<Vec<LegacyUserEntry>, Error> {
        debug!(mac, "unblocking client");
        self.station_command("unblock-sta", mac).await
    }

    async fn station_command(&self, cmd: &str, mac: &str) -> Result<Vec<LegacyUserEntry>, Error> {
        let url = self.site_url("cmd/stamgr")?;
        self.post(
            url,
            &json!({
                "cmd": cmd,
                "mac": mac.to_lowercase(),
            }),
        )
        .await
    }
}
