// ── Host framework contract ──
//
// The host owns accessory persistence across restarts and delivers
// characteristic events. The platform only needs to hand it records.

use crate::error::CoreError;
use crate::model::AccessoryRecord;

/// Identifier the host files accessories under.
pub const PLUGIN_NAME: &str = "uniblock";

/// Platform identifier within the plugin.
pub const PLATFORM_NAME: &str = "UnifiClientControl";

/// Persistence side of the host framework.
pub trait AccessoryHost {
    /// Persist newly created accessories.
    fn register_platform_accessories(
        &mut self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError>;

    /// Persist changes to accessories the host already knows about.
    fn update_platform_accessories(
        &mut self,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError>;
}
