// ── Services and characteristics ──
//
// A minimal model of the HomeKit service/characteristic vocabulary this
// crate needs: accessory information, a switch, and a lock mechanism.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Service types an accessory can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum ServiceKind {
    AccessoryInformation,
    Switch,
    LockMechanism,
}

/// Characteristics read or written on those services.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Characteristic {
    Name,
    SerialNumber,
    On,
    LockCurrentState,
    LockTargetState,
}

/// Lock states, with their HomeKit numeric codes.
///
/// Only the two states this crate produces are modeled; HomeKit's
/// `JAMMED` and `UNKNOWN` current states are never reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LockState {
    /// Network access allowed.
    Unsecured,
    /// Network access blocked.
    Secured,
}

impl LockState {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed { Self::Unsecured } else { Self::Secured }
    }

    pub fn is_allowed(self) -> bool {
        self == Self::Unsecured
    }

    /// HomeKit `LockCurrentState` / `LockTargetState` code.
    pub fn as_hap(self) -> u8 {
        match self {
            Self::Unsecured => 0,
            Self::Secured => 1,
        }
    }
}

/// A value carried by a characteristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacteristicValue {
    Bool(bool),
    Lock(LockState),
    Text(String),
}

impl CharacteristicValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_lock(&self) -> Option<LockState> {
        match self {
            Self::Lock(state) => Some(*state),
            _ => None,
        }
    }
}

/// Which handlers are bound to a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAccess {
    Read,
    ReadWrite,
}

impl HandlerAccess {
    pub fn can_write(self) -> bool {
        self == Self::ReadWrite
    }
}

/// How a client is presented: as a switch (on = allowed) or as a lock
/// (unsecured = allowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Switch,
    Lock,
}

impl PresentationMode {
    /// The `notifications` flag selects the lock presentation, which the
    /// Home app notifies on by default.
    pub fn from_notifications(notifications: bool) -> Self {
        if notifications { Self::Lock } else { Self::Switch }
    }

    /// The service this mode exposes.
    pub fn service_kind(self) -> ServiceKind {
        match self {
            Self::Switch => ServiceKind::Switch,
            Self::Lock => ServiceKind::LockMechanism,
        }
    }

    /// The service of the other mode, which must not coexist with ours.
    pub fn conflicting_kind(self) -> ServiceKind {
        match self {
            Self::Switch => ServiceKind::LockMechanism,
            Self::Lock => ServiceKind::Switch,
        }
    }

    /// Characteristics that get handlers in this mode.
    pub fn bindings(self) -> &'static [(Characteristic, HandlerAccess)] {
        match self {
            Self::Switch => &[(Characteristic::On, HandlerAccess::ReadWrite)],
            Self::Lock => &[
                (Characteristic::LockCurrentState, HandlerAccess::Read),
                (Characteristic::LockTargetState, HandlerAccess::ReadWrite),
            ],
        }
    }
}

/// One service on an accessory.
///
/// Static characteristic values persist with the accessory; handler
/// bindings are runtime state and must be re-established after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    kind: ServiceKind,
    #[serde(default)]
    values: BTreeMap<Characteristic, CharacteristicValue>,
    #[serde(skip)]
    handlers: BTreeMap<Characteristic, HandlerAccess>,
}

impl Service {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
            handlers: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn set_characteristic(
        &mut self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> &mut Self {
        self.values.insert(characteristic, value);
        self
    }

    pub fn characteristic(&self, characteristic: Characteristic) -> Option<&CharacteristicValue> {
        self.values.get(&characteristic)
    }

    pub fn bind_handler(&mut self, characteristic: Characteristic, access: HandlerAccess) {
        self.handlers.insert(characteristic, access);
    }

    pub fn handler(&self, characteristic: Characteristic) -> Option<HandlerAccess> {
        self.handlers.get(&characteristic).copied()
    }
}
