//! Accessory synchronization between a UniFi controller and a home
//! automation host.
//!
//! - **[`Platform`]** -- restores cached accessories, logs in once, and
//!   reconciles the controller's client listings into accessory records.
//! - **[`ClientAccessory`]** -- presents one client as a switch or a lock and
//!   turns characteristic reads/writes into block/unblock calls.
//! - **[`ClientController`]** -- the controller contract, implemented for
//!   `uniblock_api::LegacyClient`.
//! - **[`AccessoryHost`]** -- the persistence contract of the host framework.
//! - **Domain model** ([`model`]) -- `ClientDevice`, `AccessoryRecord`, and the
//!   service/characteristic vocabulary.

pub mod accessory;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod model;
pub mod platform;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::ClientAccessory;
pub use config::{ControllerConfig, PlatformConfig, PlatformHint, TlsVerification};
pub use controller::{ClientController, connect};
pub use error::CoreError;
pub use host::{AccessoryHost, PLATFORM_NAME, PLUGIN_NAME};
pub use platform::{DiscoveryReport, Listing, Platform, RegisterSummary};

pub use model::{
    AccessoryContext, AccessoryRecord, Characteristic, CharacteristicValue, ClientDevice,
    HandlerAccess, LockState, MacAddress, PresentationMode, Service, ServiceKind, accessory_uuid,
};
