// Shared fakes for the platform and accessory tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::io;
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};

use uniblock_core::{
    AccessoryHost, AccessoryRecord, ClientController, ClientDevice, CoreError, MacAddress,
    Platform, PlatformConfig, PresentationMode,
};

/// A controller call, as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    AllUsers,
    BlockedUsers,
    Block(String),
    Unblock(String),
}

#[derive(Default)]
pub struct FakeState {
    pub all: Vec<ClientDevice>,
    pub blocked: Vec<ClientDevice>,
    pub password: Option<String>,
    pub fail_all: bool,
    pub fail_blocked: bool,
    pub fail_commands: bool,
    /// Forces the acknowledged `blocked` flag of block/unblock.
    pub ack_override: Option<bool>,
    pub calls: Vec<Call>,
}

/// In-memory controller: a user list and a blocked list.
#[derive(Default)]
pub struct FakeController {
    pub state: Mutex<FakeState>,
}

impl FakeController {
    pub fn new(all: Vec<ClientDevice>, blocked: Vec<ClientDevice>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                all,
                blocked,
                ..FakeState::default()
            }),
        })
    }

    pub fn with_state(f: impl FnOnce(&mut FakeState)) -> Arc<Self> {
        let controller = Self::default();
        f(&mut controller.state.lock().unwrap());
        Arc::new(controller)
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn is_blocked(&self, mac: &str) -> bool {
        let mac = MacAddress::new(mac);
        self.state
            .lock()
            .unwrap()
            .blocked
            .iter()
            .any(|d| d.mac == mac)
    }

    fn command(&self, mac: &MacAddress, block: bool) -> Result<bool, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(if block {
            Call::Block(mac.to_string())
        } else {
            Call::Unblock(mac.to_string())
        });
        if state.fail_commands {
            return Err(CoreError::Api {
                message: "api.err.UnknownStation".into(),
            });
        }
        state.blocked.retain(|d| d.mac != *mac);
        if block {
            state.blocked.push(ClientDevice {
                mac: mac.clone(),
                name: None,
                hostname: None,
                device_name: None,
            });
        }
        Ok(state.ack_override.unwrap_or(block))
    }
}

impl ClientController for FakeController {
    fn site(&self) -> &str {
        "default"
    }

    async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Login(username.to_owned()));
        match state.password.as_deref() {
            Some(expected) if expected != password.expose_secret() => {
                Err(CoreError::AuthenticationFailed {
                    message: "login failed (HTTP 400): api.err.Invalid".into(),
                })
            }
            _ => Ok(()),
        }
    }

    async fn all_users(&self) -> Result<Vec<ClientDevice>, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AllUsers);
        if state.fail_all {
            return Err(CoreError::Timeout);
        }
        Ok(state.all.clone())
    }

    async fn blocked_users(&self) -> Result<Vec<ClientDevice>, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::BlockedUsers);
        if state.fail_blocked {
            return Err(CoreError::Api {
                message: "HTTP 500 Internal Server Error".into(),
            });
        }
        Ok(state.blocked.clone())
    }

    async fn block_client(&self, mac: &MacAddress) -> Result<bool, CoreError> {
        self.command(mac, true)
    }

    async fn unblock_client(&self, mac: &MacAddress) -> Result<bool, CoreError> {
        self.command(mac, false)
    }
}

/// Host that keeps what it was asked to persist.
#[derive(Default)]
pub struct RecordingHost {
    pub registered: Vec<AccessoryRecord>,
    pub updated: Vec<AccessoryRecord>,
    pub fail_register: bool,
    pub fail_update: bool,
}

impl RecordingHost {
    /// Everything persisted so far, newest write per UUID winning.
    pub fn persisted(&self) -> Vec<AccessoryRecord> {
        let mut out: Vec<AccessoryRecord> = Vec::new();
        for record in self.registered.iter().chain(&self.updated) {
            match out.iter_mut().find(|r| r.uuid == record.uuid) {
                Some(existing) => *existing = record.clone(),
                None => out.push(record.clone()),
            }
        }
        out
    }
}

impl AccessoryHost for RecordingHost {
    fn register_platform_accessories(
        &mut self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError> {
        assert_eq!(plugin, uniblock_core::PLUGIN_NAME);
        assert_eq!(platform, uniblock_core::PLATFORM_NAME);
        if self.fail_register {
            return Err(CoreError::Host {
                message: "disk full".into(),
            });
        }
        self.registered.extend_from_slice(accessories);
        Ok(())
    }

    fn update_platform_accessories(
        &mut self,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError> {
        if self.fail_update {
            return Err(CoreError::Host {
                message: "read-only cache".into(),
            });
        }
        self.updated.extend_from_slice(accessories);
        Ok(())
    }
}

pub fn config(mode: PresentationMode) -> PlatformConfig {
    PlatformConfig {
        name: "UniFi".into(),
        username: "admin".into(),
        password: SecretString::from("hunter2".to_string()),
        mode,
    }
}

pub fn platform(
    controller: &Arc<FakeController>,
    mode: PresentationMode,
) -> Platform<FakeController> {
    Platform::new(config(mode), Arc::clone(controller))
}

/// Log lines written while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output into a buffer until the guard drops.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}
