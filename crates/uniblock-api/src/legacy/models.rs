// Legacy API response types
//
// Fields use `#[serde(default)]` liberally because the controller is
// inconsistent about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── User ─────────────────────────────────────────────────────────────

/// A known client ("user" in controller terms) from `stat/alluser`.
///
/// The same shape comes back from `cmd/stamgr` block/unblock commands,
/// where `blocked` carries the acknowledged state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUserEntry {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    /// Unix timestamp of the last time the controller saw this client.
    #[serde(default)]
    pub last_seen: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
