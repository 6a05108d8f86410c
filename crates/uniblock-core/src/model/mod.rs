// ── Domain model ──
//
// Client devices as discovered on the controller, and the accessory
// records/services/characteristics they are presented through.

pub mod client;
pub mod record;
pub mod service;

pub use client::{ClientDevice, MacAddress, accessory_uuid};
pub use record::{AccessoryContext, AccessoryRecord};
pub use service::{
    Characteristic, CharacteristicValue, HandlerAccess, LockState, PresentationMode, Service,
    ServiceKind,
};
