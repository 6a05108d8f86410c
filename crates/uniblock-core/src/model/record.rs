// ── Accessory records ──
//
// The persisted form of one accessory: identity, display name, the
// client snapshot it was created from, and its services.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client::ClientDevice;
use super::service::{Service, ServiceKind};

/// Opaque per-accessory context carried across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryContext {
    pub device: ClientDevice,
}

/// One accessory as the host persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryRecord {
    pub uuid: Uuid,
    pub display_name: String,
    pub context: AccessoryContext,
    #[serde(default)]
    services: Vec<Service>,
}

impl AccessoryRecord {
    /// A fresh record for a newly discovered client. Carries only the
    /// accessory information service.
    pub fn new(display_name: impl Into<String>, uuid: Uuid, device: ClientDevice) -> Self {
        Self {
            uuid,
            display_name: display_name.into(),
            context: AccessoryContext { device },
            services: vec![Service::new(ServiceKind::AccessoryInformation)],
        }
    }

    pub fn device(&self) -> &ClientDevice {
        &self.context.device
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn get_service(&self, kind: ServiceKind) -> Option<&Service> {
        self.services.iter().find(|s| s.kind() == kind)
    }

    pub fn has_service(&self, kind: ServiceKind) -> bool {
        self.get_service(kind).is_some()
    }

    /// Add a service of `kind`. A record holds at most one service per kind,
    /// so an existing one is returned instead of adding a duplicate.
    pub fn add_service(&mut self, kind: ServiceKind) -> &mut Service {
        self.get_or_add_service(kind)
    }

    pub fn get_or_add_service(&mut self, kind: ServiceKind) -> &mut Service {
        let idx = match self.services.iter().position(|s| s.kind() == kind) {
            Some(idx) => idx,
            None => {
                self.services.push(Service::new(kind));
                self.services.len() - 1
            }
        };
        &mut self.services[idx]
    }

    /// Remove the service of `kind`, returning it if it was present.
    pub fn remove_service(&mut self, kind: ServiceKind) -> Option<Service> {
        let idx = self.services.iter().position(|s| s.kind() == kind)?;
        Some(self.services.remove(idx))
    }
}
