// ── Platform coordinator ──
//
// Owns the controller session, restores cached accessories, and
// reconciles them with the clients the controller reports at startup.
// Discovery runs once; there is no polling afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use strum::Display;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::accessory::ClientAccessory;
use crate::config::PlatformConfig;
use crate::controller::ClientController;
use crate::error::CoreError;
use crate::host::{AccessoryHost, PLATFORM_NAME, PLUGIN_NAME};
use crate::model::{AccessoryRecord, ClientDevice, MacAddress, accessory_uuid};

/// The two discovery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Listing {
    #[strum(to_string = "all users")]
    AllUsers,
    #[strum(to_string = "blocked users")]
    BlockedUsers,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct RegisterSummary {
    /// Records handed over by the host's cache.
    pub restored: usize,
    /// Records created this run.
    pub added: usize,
    /// Records already bound earlier this run, bound again.
    pub rebound: usize,
    /// Host writes that failed. The accessories involved are still bound.
    pub host_errors: Vec<CoreError>,
}

/// Outcome of startup discovery.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub restored: usize,
    pub added: usize,
    pub rebound: usize,
    /// Listings that failed. The other listing still ran.
    pub errors: Vec<(Listing, CoreError)>,
    pub host_errors: Vec<CoreError>,
}

impl DiscoveryReport {
    fn absorb(&mut self, summary: RegisterSummary) {
        self.restored += summary.restored;
        self.added += summary.added;
        self.rebound += summary.rebound;
        self.host_errors.extend(summary.host_errors);
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.host_errors.is_empty()
    }
}

/// Coordinates the controller session and the accessory set.
pub struct Platform<C> {
    config: PlatformConfig,
    session: Arc<C>,
    records: IndexMap<Uuid, AccessoryRecord>,
    accessories: HashMap<Uuid, ClientAccessory<C>>,
}

impl<C: ClientController> Platform<C> {
    pub fn new(config: PlatformConfig, session: Arc<C>) -> Self {
        debug!(name = %config.name, site = session.site(), "finished initializing platform");
        Self {
            config,
            session,
            records: IndexMap::new(),
            accessories: HashMap::new(),
        }
    }

    /// Host callback: one accessory restored from the host's cache.
    pub fn configure_accessory(&mut self, record: AccessoryRecord) {
        info!(name = %record.display_name, "loading accessory from cache");
        if let Some(previous) = self.records.insert(record.uuid, record) {
            warn!(uuid = %previous.uuid, "duplicate cached accessory replaced");
        }
    }

    /// Host startup hook: log in once, then discover.
    ///
    /// A failed login skips discovery entirely; there is no retry.
    pub async fn did_finish_launching<H: AccessoryHost>(
        &mut self,
        host: &mut H,
    ) -> Result<DiscoveryReport, CoreError> {
        debug!("executed did-finish-launching callback");

        let config = &self.config;
        if let Err(e) = self.session.login(&config.username, &config.password).await {
            error!(error = %e, "can't login");
            return Err(e);
        }

        Ok(self.discover_devices(host).await)
    }

    /// Fetch both listings and reconcile them, all-users first.
    ///
    /// A client present in both ends up with the blocked classification,
    /// since the blocked pass runs last.
    pub async fn discover_devices<H: AccessoryHost>(&mut self, host: &mut H) -> DiscoveryReport {
        let session = Arc::clone(&self.session);
        let (all, blocked) = tokio::join!(session.all_users(), session.blocked_users());

        let mut report = DiscoveryReport::default();
        for (listing, result, is_on) in [
            (Listing::AllUsers, all, true),
            (Listing::BlockedUsers, blocked, false),
        ] {
            match result {
                Ok(devices) => report.absorb(self.register_devices(host, devices, is_on)),
                Err(e) => {
                    error!(%listing, error = %e, "can't discover");
                    report.errors.push((listing, e));
                }
            }
        }

        info!(
            restored = report.restored,
            added = report.added,
            rebound = report.rebound,
            failed = report.errors.len(),
            host_failures = report.host_errors.len(),
            "discovery finished"
        );
        report
    }

    /// Bind an accessory to every device, creating and registering records
    /// for devices seen for the first time.
    ///
    /// A failed host write is logged and recorded; the remaining devices
    /// are still processed.
    pub fn register_devices<H: AccessoryHost>(
        &mut self,
        host: &mut H,
        devices: Vec<ClientDevice>,
        is_on: bool,
    ) -> RegisterSummary {
        let mut summary = RegisterSummary::default();
        let mut restored = Vec::new();

        for device in devices {
            let uuid = accessory_uuid(&device.mac);
            debug!(mac = %device.mac, %uuid, is_on, "processing client");

            if let Some(record) = self.records.get_mut(&uuid) {
                let bound_this_run = self.accessories.contains_key(&uuid);
                let accessory =
                    ClientAccessory::bind(Arc::clone(&self.session), record, is_on, self.config.mode);
                self.accessories.insert(uuid, accessory);

                if bound_this_run {
                    debug!(name = %record.display_name, "rebinding accessory");
                    summary.rebound += 1;
                } else {
                    info!(name = %record.display_name, "restoring existing accessory from cache");
                    restored.push(record.clone());
                    summary.restored += 1;
                }
            } else {
                let display_name = device.display_label().to_owned();
                info!(name = %display_name, "adding new accessory");

                let mut record = AccessoryRecord::new(display_name, uuid, device);
                let accessory = ClientAccessory::bind(
                    Arc::clone(&self.session),
                    &mut record,
                    is_on,
                    self.config.mode,
                );

                if let Err(e) = host.register_platform_accessories(
                    PLUGIN_NAME,
                    PLATFORM_NAME,
                    std::slice::from_ref(&record),
                ) {
                    error!(name = %record.display_name, %uuid, error = %e, "can't register accessory");
                    summary.host_errors.push(e);
                }
                self.accessories.insert(uuid, accessory);
                self.records.insert(uuid, record);
                summary.added += 1;
            }
        }

        if !restored.is_empty() {
            if let Err(e) = host.update_platform_accessories(&restored) {
                error!(count = restored.len(), error = %e, "can't update restored accessories");
                summary.host_errors.push(e);
            }
        }

        summary
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Every known record, cached ones first, in arrival order.
    pub fn records(&self) -> impl Iterator<Item = &AccessoryRecord> {
        self.records.values()
    }

    pub fn record(&self, uuid: &Uuid) -> Option<&AccessoryRecord> {
        self.records.get(uuid)
    }

    /// Accessories bound during this run.
    pub fn accessories(&self) -> impl Iterator<Item = &ClientAccessory<C>> {
        self.accessories.values()
    }

    /// The bound accessory for `uuid`. Cached records the controller did
    /// not report this run have none.
    pub fn accessory(&self, uuid: &Uuid) -> Option<&ClientAccessory<C>> {
        self.accessories.get(uuid)
    }

    pub fn accessory_by_mac(&self, mac: &MacAddress) -> Option<&ClientAccessory<C>> {
        self.accessory(&accessory_uuid(mac))
    }

    /// Like [`accessory_by_mac`](Self::accessory_by_mac), but an error when absent.
    pub fn require_accessory(&self, mac: &MacAddress) -> Result<&ClientAccessory<C>, CoreError> {
        self.accessory_by_mac(mac)
            .ok_or_else(|| CoreError::AccessoryNotFound {
                identifier: mac.to_string(),
            })
    }
}
