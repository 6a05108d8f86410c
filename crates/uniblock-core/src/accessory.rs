// ── Accessory wrapper ──
//
// Presents one client device as a switch or a lock and translates
// characteristic reads/writes into controller calls. The controller's
// blocked list is the source of truth; the cached flag only mirrors the
// last discovery or acknowledged write.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};
use uuid::Uuid;

use crate::controller::ClientController;
use crate::error::CoreError;
use crate::model::{
    AccessoryRecord, Characteristic, CharacteristicValue, ClientDevice, LockState,
    PresentationMode, ServiceKind,
};

/// Runtime handle for one accessory.
pub struct ClientAccessory<C> {
    session: Arc<C>,
    uuid: Uuid,
    device: ClientDevice,
    label: String,
    mode: PresentationMode,
    /// On = allowed on the network.
    on: AtomicBool,
}

impl<C: ClientController> ClientAccessory<C> {
    /// Bind a wrapper to `record`, reshaping its services for `mode`.
    ///
    /// Afterwards the record carries exactly one of Switch/LockMechanism,
    /// named after the client, with handlers bound for the mode's
    /// characteristics.
    pub fn bind(
        session: Arc<C>,
        record: &mut AccessoryRecord,
        initial_on: bool,
        mode: PresentationMode,
    ) -> Self {
        let device = record.device().clone();
        let label = device.display_label().to_owned();

        if device.is_unnamed() {
            debug!(mac = %device.mac, "no name for client");
        }

        record
            .get_or_add_service(ServiceKind::AccessoryInformation)
            .set_characteristic(
                Characteristic::SerialNumber,
                CharacteristicValue::Text(label.clone()),
            );

        let stray = mode.conflicting_kind();
        if record.remove_service(stray).is_some() {
            debug!(uuid = %record.uuid, service = %stray, "removed service from previous mode");
        }

        debug!(uuid = %record.uuid, %mode, "building service");
        let service = record.get_or_add_service(mode.service_kind());
        for &(characteristic, access) in mode.bindings() {
            service.bind_handler(characteristic, access);
        }
        service.set_characteristic(Characteristic::Name, CharacteristicValue::Text(label.clone()));

        Self {
            session,
            uuid: record.uuid,
            device,
            label,
            mode,
            on: AtomicBool::new(initial_on),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn device(&self) -> &ClientDevice {
        &self.device
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// The locally cached on/off flag.
    pub fn cached_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }

    // ── Switch presentation ──────────────────────────────────────────

    /// Whether the client is allowed: true iff its MAC is absent from the
    /// controller's blocked list.
    pub async fn get_on(&self) -> Result<bool, CoreError> {
        let blocked = self.session.blocked_users().await.inspect_err(|e| {
            error!(mac = %self.device.mac, error = %e, "failed to read client state");
        })?;

        let on = !blocked.iter().any(|client| client.mac == self.device.mac);
        debug!(mac = %self.device.mac, on, "read client state");
        Ok(on)
    }

    /// Allow (`true`) or block (`false`) the client.
    ///
    /// On success the cache takes the controller's acknowledged state. On
    /// failure the cache is left as it was.
    pub async fn set_on(&self, value: bool) -> Result<bool, CoreError> {
        let result = if value {
            self.session.unblock_client(&self.device.mac).await
        } else {
            self.session.block_client(&self.device.mac).await
        };

        match result {
            Ok(blocked) => {
                let on = !blocked;
                self.on.store(on, Ordering::Release);
                debug!(mac = %self.device.mac, requested = value, on, "client state updated");
                Ok(on)
            }
            Err(e) => {
                error!(mac = %self.device.mac, requested = value, error = %e, "failed to set client state");
                Err(e)
            }
        }
    }

    // ── Lock presentation ────────────────────────────────────────────

    /// Unsecured when the client is allowed, secured when it is blocked.
    pub async fn lock_current_state(&self) -> Result<LockState, CoreError> {
        self.get_on().await.map(LockState::from_allowed)
    }

    /// Unsecured unblocks the client, secured blocks it.
    pub async fn set_lock_target(&self, target: LockState) -> Result<LockState, CoreError> {
        self.set_on(target.is_allowed())
            .await
            .map(LockState::from_allowed)
    }

    // ── Characteristic dispatch ──────────────────────────────────────

    /// Serve a characteristic read delivered by the host.
    pub async fn read(
        &self,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, CoreError> {
        self.ensure_bound(characteristic, false)?;
        match characteristic {
            Characteristic::On => self.get_on().await.map(CharacteristicValue::Bool),
            Characteristic::LockCurrentState | Characteristic::LockTargetState => {
                self.lock_current_state().await.map(CharacteristicValue::Lock)
            }
            Characteristic::Name | Characteristic::SerialNumber => {
                Ok(CharacteristicValue::Text(self.label.clone()))
            }
        }
    }

    /// Serve a characteristic write delivered by the host.
    pub async fn write(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<CharacteristicValue, CoreError> {
        self.ensure_bound(characteristic, true)?;
        match characteristic {
            Characteristic::On => {
                let on = value
                    .as_bool()
                    .ok_or(CoreError::InvalidCharacteristicValue {
                        characteristic,
                        expected: "a boolean",
                    })?;
                self.set_on(on).await.map(CharacteristicValue::Bool)
            }
            _ => {
                let target = value
                    .as_lock()
                    .ok_or(CoreError::InvalidCharacteristicValue {
                        characteristic,
                        expected: "a lock state",
                    })?;
                self.set_lock_target(target)
                    .await
                    .map(CharacteristicValue::Lock)
            }
        }
    }

    fn ensure_bound(&self, characteristic: Characteristic, write: bool) -> Result<(), CoreError> {
        let bound = self
            .mode
            .bindings()
            .iter()
            .find(|(c, _)| *c == characteristic)
            .map(|(_, access)| *access);

        let static_read = !write
            && matches!(
                characteristic,
                Characteristic::Name | Characteristic::SerialNumber
            );

        match bound {
            Some(access) if !write || access.can_write() => Ok(()),
            None if static_read => Ok(()),
            _ => Err(CoreError::UnboundCharacteristic {
                service: self.mode.service_kind(),
                characteristic,
                access: if write { "set" } else { "get" },
            }),
        }
    }
}
