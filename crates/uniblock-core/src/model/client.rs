// ── Client device identity ──
//
// A client device is a snapshot of one controller "user" taken at
// discovery time. Its MAC is the only stable identifier; everything
// else is optional display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for accessory UUIDs. Changing it orphans every persisted accessory.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x3d1c_9a5e_8f2b_4c71_a0e4_5b7d_2c9f_1e83);

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize a MAC written with colons, dashes, dotted quads
    /// (`aabb.ccdd.eeff`) or as 12 bare hex digits. Anything that is not
    /// six octets is only lowercased with dashes turned into colons.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lowered = raw.as_ref().trim().to_ascii_lowercase();
        let digits: String = lowered
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();

        if digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            let octets: Vec<&str> = (0..12).step_by(2).map(|i| &digits[i..i + 2]).collect();
            return Self(octets.join(":"));
        }
        Self(lowered.replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

/// Stable accessory UUID for a client MAC.
///
/// Deterministic across runs and hosts: the same MAC always maps to the
/// same UUID, which is what lets a restored accessory be matched to a
/// freshly discovered client.
pub fn accessory_uuid(mac: &MacAddress) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, mac.as_str().as_bytes())
}

// ── ClientDevice ────────────────────────────────────────────────────

/// A network client known to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDevice {
    pub mac: MacAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

impl ClientDevice {
    pub fn new(mac: impl AsRef<str>) -> Self {
        Self {
            mac: MacAddress::new(mac),
            name: None,
            hostname: None,
            device_name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    #[must_use]
    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// The label shown for this client: name, then hostname, then device
    /// name, then the MAC. Empty strings are skipped.
    pub fn display_label(&self) -> &str {
        [&self.name, &self.hostname, &self.device_name]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|label| !label.is_empty())
            .unwrap_or_else(|| self.mac.as_str())
    }

    /// Whether the label had to fall back to the MAC address.
    pub fn is_unnamed(&self) -> bool {
        self.display_label() == self.mac.as_str()
    }
}
