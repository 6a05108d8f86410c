//! Command handlers.
//!
//! Every command runs the same startup as the host would: restore cached
//! accessories, log in, discover. The command then works on the
//! resulting accessory set.

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use uniblock_core::{
    AccessoryRecord, Characteristic, CharacteristicValue, ClientAccessory, ClientController,
    DiscoveryReport, LockState, MacAddress, Platform, PresentationMode,
};

use crate::cache::FileAccessoryCache;
use crate::cli::{Access, Command, GlobalOpts, SetArgs, TargetArgs};
use crate::error::CliError;
use crate::output;

// ── Startup ─────────────────────────────────────────────────────────

/// Replay the cache into the platform, then log in and discover.
pub async fn launch<C: ClientController>(
    platform: &mut Platform<C>,
    cache: &mut FileAccessoryCache,
) -> Result<DiscoveryReport, CliError> {
    debug!(path = %cache.path().display(), cached = cache.len(), "restoring accessories");
    let cached: Vec<AccessoryRecord> = cache.records().cloned().collect();
    for record in cached {
        platform.configure_accessory(record);
    }

    let report = platform.did_finish_launching(cache).await?;
    for (listing, err) in &report.errors {
        output::warn(&format!("could not list {listing}: {err}"));
    }
    for err in &report.host_errors {
        output::warn(&format!("accessory cache not updated: {err}"));
    }
    Ok(report)
}

pub async fn dispatch<C: ClientController>(
    command: Command,
    platform: &Platform<C>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Discover => discover(platform, global),
        Command::Get(args) => get(platform, &args, global).await,
        Command::Set(args) => set(platform, &args, global).await,
    }
}

// ── discover ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AccessoryView {
    name: String,
    mac: String,
    uuid: String,
    /// `None` for cached accessories the controller no longer reports.
    mode: Option<PresentationMode>,
    allowed: Option<bool>,
}

#[derive(Tabled)]
struct AccessoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Access")]
    access: String,
    #[tabled(rename = "UUID")]
    uuid: String,
}

impl From<&AccessoryView> for AccessoryRow {
    fn from(v: &AccessoryView) -> Self {
        Self {
            name: v.name.clone(),
            mac: v.mac.clone(),
            mode: v.mode.map_or_else(|| "-".into(), |m| m.to_string()),
            access: v
                .allowed
                .map_or_else(|| "stale".into(), |a| output::access_label(a, false)),
            uuid: v.uuid.clone(),
        }
    }
}

fn discover<C: ClientController>(
    platform: &Platform<C>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let views: Vec<AccessoryView> = platform
        .records()
        .map(|record| {
            let accessory = platform.accessory(&record.uuid);
            AccessoryView {
                name: record.display_name.clone(),
                mac: record.device().mac.to_string(),
                uuid: record.uuid.to_string(),
                mode: accessory.map(ClientAccessory::mode),
                allowed: accessory.map(ClientAccessory::cached_on),
            }
        })
        .collect();

    let out = output::render_list(global.output, &views, |v| AccessoryRow::from(v))?;
    output::print_output(&out);
    Ok(())
}

// ── get / set ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StateView {
    name: String,
    mac: String,
    mode: PresentationMode,
    characteristic: Characteristic,
    value: String,
    /// The value as HomeKit encodes it.
    hap_value: u8,
    allowed: bool,
}

impl StateView {
    fn new<C: ClientController>(
        accessory: &ClientAccessory<C>,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) -> Result<Self, CliError> {
        let (value, hap_value, allowed) = match value {
            CharacteristicValue::Bool(on) => {
                ((if *on { "on" } else { "off" }).to_owned(), u8::from(*on), *on)
            }
            CharacteristicValue::Lock(state) => {
                (state.to_string(), state.as_hap(), state.is_allowed())
            }
            CharacteristicValue::Text(_) => {
                return Err(CliError::Validation {
                    field: characteristic.to_string(),
                    reason: "not an access state".into(),
                });
            }
        };
        Ok(Self {
            name: accessory.label().to_owned(),
            mac: accessory.device().mac.to_string(),
            mode: accessory.mode(),
            characteristic,
            value,
            hap_value,
            allowed,
        })
    }

    fn detail(&self) -> String {
        format!(
            "{} ({}): {} = {} [{}]",
            self.name,
            self.mac,
            self.characteristic,
            self.value,
            output::access_label(self.allowed, output::should_color()),
        )
    }
}

fn target<'a, C: ClientController>(
    platform: &'a Platform<C>,
    mac: &str,
) -> Result<&'a ClientAccessory<C>, CliError> {
    Ok(platform.require_accessory(&MacAddress::new(mac))?)
}

async fn get<C: ClientController>(
    platform: &Platform<C>,
    args: &TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let accessory = target(platform, &args.mac)?;
    let characteristic = match accessory.mode() {
        PresentationMode::Switch => Characteristic::On,
        PresentationMode::Lock => Characteristic::LockCurrentState,
    };
    let value = accessory.read(characteristic).await?;

    let view = StateView::new(accessory, characteristic, &value)?;
    let out = output::render_single(global.output, &view, StateView::detail)?;
    output::print_output(&out);
    Ok(())
}

async fn set<C: ClientController>(
    platform: &Platform<C>,
    args: &SetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let accessory = target(platform, &args.mac)?;
    let allow = args.access == Access::Allow;
    let (characteristic, value) = match accessory.mode() {
        PresentationMode::Switch => (Characteristic::On, CharacteristicValue::Bool(allow)),
        PresentationMode::Lock => (
            Characteristic::LockTargetState,
            CharacteristicValue::Lock(LockState::from_allowed(allow)),
        ),
    };
    let acknowledged = accessory.write(characteristic, value).await?;

    let view = StateView::new(accessory, characteristic, &acknowledged)?;
    let out = output::render_single(global.output, &view, StateView::detail)?;
    output::print_output(&out);
    Ok(())
}
