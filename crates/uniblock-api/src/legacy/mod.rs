// Legacy API client modules
//
// Hand-written client for the UniFi controller's legacy endpoints used to
// control client access: session login, stat/alluser, and cmd/stamgr. All
// responses arrive wrapped in `{ meta: { rc, msg }, data: [...] }`.

pub mod auth;
pub mod client;
pub mod models;
pub mod users;

pub use client::LegacyClient;
