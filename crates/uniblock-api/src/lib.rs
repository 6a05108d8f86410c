// uniblock-api: Async client for the UniFi controller legacy API

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::LegacyUserEntry;
pub use transport::{TlsMode, TransportConfig};
