#![allow(clippy::unwrap_used)]
// Accessory wrapper behavior against an in-memory controller.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::{Call, FakeController, capture_logs};
use uniblock_core::{
    AccessoryRecord, Characteristic, CharacteristicValue, ClientAccessory, ClientDevice,
    CoreError, HandlerAccess, LockState, PresentationMode, ServiceKind, accessory_uuid,
};

const MAC: &str = "aa:bb:cc:dd:ee:ff";

fn record_for(device: ClientDevice) -> AccessoryRecord {
    let uuid = accessory_uuid(&device.mac);
    AccessoryRecord::new(device.display_label().to_owned(), uuid, device)
}

fn bind(
    controller: &Arc<FakeController>,
    initial_on: bool,
    mode: PresentationMode,
) -> (AccessoryRecord, ClientAccessory<FakeController>) {
    let mut record = record_for(ClientDevice::new(MAC).with_hostname("kids-ipad"));
    let accessory = ClientAccessory::bind(Arc::clone(controller), &mut record, initial_on, mode);
    (record, accessory)
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn switch_mode_builds_named_switch() {
    let controller = FakeController::new(vec![], vec![]);
    let (record, accessory) = bind(&controller, true, PresentationMode::Switch);

    let switch = record.get_service(ServiceKind::Switch).unwrap();
    assert_eq!(
        switch.characteristic(Characteristic::Name),
        Some(&CharacteristicValue::Text("kids-ipad".into()))
    );
    assert_eq!(switch.handler(Characteristic::On), Some(HandlerAccess::ReadWrite));
    assert!(!record.has_service(ServiceKind::LockMechanism));

    let info = record.get_service(ServiceKind::AccessoryInformation).unwrap();
    assert_eq!(
        info.characteristic(Characteristic::SerialNumber),
        Some(&CharacteristicValue::Text("kids-ipad".into()))
    );
    assert_eq!(accessory.label(), "kids-ipad");
    assert!(accessory.cached_on());
}

#[test]
fn lock_mode_replaces_switch_service() {
    let controller = FakeController::new(vec![], vec![]);
    let mut record = record_for(ClientDevice::new(MAC));
    record.add_service(ServiceKind::Switch);

    let accessory = ClientAccessory::bind(
        Arc::clone(&controller),
        &mut record,
        false,
        PresentationMode::Lock,
    );

    assert!(!record.has_service(ServiceKind::Switch));
    let lock = record.get_service(ServiceKind::LockMechanism).unwrap();
    assert_eq!(lock.handler(Characteristic::LockCurrentState), Some(HandlerAccess::Read));
    assert_eq!(
        lock.handler(Characteristic::LockTargetState),
        Some(HandlerAccess::ReadWrite)
    );
    assert_eq!(accessory.label(), MAC);
    assert_eq!(accessory.mode(), PresentationMode::Lock);
}

#[test]
fn rebinding_keeps_a_single_service() {
    let controller = FakeController::new(vec![], vec![]);
    let mut record = record_for(ClientDevice::new(MAC));

    ClientAccessory::bind(Arc::clone(&controller), &mut record, true, PresentationMode::Switch);
    ClientAccessory::bind(Arc::clone(&controller), &mut record, true, PresentationMode::Switch);

    assert_eq!(record.services().len(), 2);
    assert!(record.has_service(ServiceKind::AccessoryInformation));
    assert!(record.has_service(ServiceKind::Switch));
}

// ── Switch reads ────────────────────────────────────────────────────

#[tokio::test]
async fn switch_is_on_when_mac_absent_from_blocked_list() {
    let controller = FakeController::new(vec![], vec![ClientDevice::new("11:22:33:44:55:66")]);
    let (_, accessory) = bind(&controller, false, PresentationMode::Switch);

    assert!(accessory.get_on().await.unwrap());
    assert_eq!(controller.calls(), vec![Call::BlockedUsers]);
}

#[tokio::test]
async fn switch_is_off_when_mac_blocked() {
    let controller = FakeController::new(vec![], vec![ClientDevice::new("AA:BB:CC:DD:EE:FF")]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    assert!(!accessory.get_on().await.unwrap());
}

#[tokio::test]
async fn read_failure_propagates() {
    let controller = FakeController::with_state(|s| s.fail_blocked = true);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    let err = accessory.read(Characteristic::On).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }), "got {err:?}");
}

// ── Lock reads ──────────────────────────────────────────────────────

#[tokio::test]
async fn lock_state_mirrors_switch_state() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, switch) = bind(&controller, true, PresentationMode::Switch);
    let (_, lock) = bind(&controller, true, PresentationMode::Lock);

    assert!(switch.get_on().await.unwrap());
    assert_eq!(lock.lock_current_state().await.unwrap(), LockState::Unsecured);

    controller.update(|s| s.blocked.push(ClientDevice::new(MAC)));

    assert!(!switch.get_on().await.unwrap());
    assert_eq!(lock.lock_current_state().await.unwrap(), LockState::Secured);
    assert_eq!(
        lock.read(Characteristic::LockTargetState).await.unwrap(),
        CharacteristicValue::Lock(LockState::Secured)
    );
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn switching_off_blocks_and_caches_inverted_ack() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    let on = accessory.set_on(false).await.unwrap();

    assert!(!on);
    assert!(!accessory.cached_on());
    assert!(controller.is_blocked(MAC));
    assert_eq!(controller.calls(), vec![Call::Block(MAC.into())]);
}

#[tokio::test]
async fn switching_on_unblocks() {
    let controller = FakeController::new(vec![], vec![ClientDevice::new(MAC)]);
    let (_, accessory) = bind(&controller, false, PresentationMode::Switch);

    let value = accessory
        .write(Characteristic::On, CharacteristicValue::Bool(true))
        .await
        .unwrap();

    assert_eq!(value, CharacteristicValue::Bool(true));
    assert!(accessory.cached_on());
    assert!(!controller.is_blocked(MAC));
    assert_eq!(controller.calls(), vec![Call::Unblock(MAC.into())]);
}

#[tokio::test]
async fn cache_follows_acknowledged_flag_not_request() {
    // The controller acknowledges an unblock but reports the client still blocked.
    let controller = FakeController::with_state(|s| s.ack_override = Some(true));
    let (_, accessory) = bind(&controller, false, PresentationMode::Switch);

    let on = accessory.set_on(true).await.unwrap();

    assert!(!on);
    assert!(!accessory.cached_on());
}

#[tokio::test]
async fn failed_write_leaves_cache_unchanged() {
    let controller = FakeController::with_state(|s| s.fail_commands = true);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    let err = accessory.set_on(false).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { .. }));
    assert!(accessory.cached_on());
    assert_eq!(controller.calls(), vec![Call::Block(MAC.into())]);
}

#[tokio::test]
async fn failed_write_is_logged_as_error() {
    let controller = FakeController::with_state(|s| s.fail_commands = true);
    let (_, accessory) = bind(&controller, true, PresentationMode::Lock);
    let (logs, _guard) = capture_logs();

    accessory.set_lock_target(LockState::Secured).await.unwrap_err();

    let logs = logs.contents();
    let line = logs
        .lines()
        .find(|line| line.contains("failed to set client state"))
        .unwrap_or_else(|| panic!("no error line in:\n{logs}"));
    assert!(line.contains("ERROR"));
    assert!(line.contains(MAC));
    assert!(line.contains("UnknownStation"));
}

#[tokio::test]
async fn lock_target_secured_blocks() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Lock);

    let state = accessory
        .write(
            Characteristic::LockTargetState,
            CharacteristicValue::Lock(LockState::Secured),
        )
        .await
        .unwrap();

    assert_eq!(state, CharacteristicValue::Lock(LockState::Secured));
    assert!(!accessory.cached_on());
    assert!(controller.is_blocked(MAC));
}

#[tokio::test]
async fn lock_target_unsecured_unblocks() {
    let controller = FakeController::new(vec![], vec![ClientDevice::new(MAC)]);
    let (_, accessory) = bind(&controller, false, PresentationMode::Lock);

    let state = accessory.set_lock_target(LockState::Unsecured).await.unwrap();

    assert_eq!(state, LockState::Unsecured);
    assert!(accessory.cached_on());
    assert_eq!(controller.calls(), vec![Call::Unblock(MAC.into())]);
}

// ── Dispatch errors ─────────────────────────────────────────────────

#[tokio::test]
async fn lock_characteristics_are_unbound_in_switch_mode() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    let err = accessory
        .read(Characteristic::LockCurrentState)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::UnboundCharacteristic {
            service: ServiceKind::Switch,
            characteristic: Characteristic::LockCurrentState,
            access: "get",
        }
    ));
    assert!(controller.calls().is_empty());
}

#[tokio::test]
async fn lock_current_state_is_not_writable() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Lock);

    let err = accessory
        .write(
            Characteristic::LockCurrentState,
            CharacteristicValue::Lock(LockState::Secured),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::UnboundCharacteristic { access: "set", .. }));
    assert!(controller.calls().is_empty());
}

#[tokio::test]
async fn wrong_value_type_is_rejected() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Switch);

    let err = accessory
        .write(
            Characteristic::On,
            CharacteristicValue::Lock(LockState::Secured),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::InvalidCharacteristicValue {
            characteristic: Characteristic::On,
            ..
        }
    ));
    assert!(accessory.cached_on());
}

#[tokio::test]
async fn name_is_readable_without_controller_call() {
    let controller = FakeController::new(vec![], vec![]);
    let (_, accessory) = bind(&controller, true, PresentationMode::Lock);

    let value = accessory.read(Characteristic::Name).await.unwrap();

    assert_eq!(value, CharacteristicValue::Text("kids-ipad".into()));
    assert!(controller.calls().is_empty());
}
