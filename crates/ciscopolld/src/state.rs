//! Shared application state and the global allocator.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use ciscopoll_core::collector::{DevicePoller, PollReport, poll_targets};
use ciscopoll_core::config::Inventory;
use ciscopoll_core::metrics::Exposition;
use ciscopoll_core::session::{Session, SshConfig, SshSession, TransportError};

/// Opens the session for one host with its resolved transport settings.
pub(crate) type Opener =
    Arc<dyn Fn(&str, &SshConfig) -> Result<Box<dyn Session>, TransportError> + Send + Sync>;

pub(crate) struct AppState {
    pub(crate) poller: DevicePoller,
    pub(crate) exposition: Exposition,
    pub(crate) inventory: Inventory,
    /// Transport settings for hosts the inventory does not override.
    pub(crate) defaults: SshConfig,
    pub(crate) opener: Opener,
}

pub(crate) type SharedState = Arc<AppState>;

impl AppState {
    /// Transport settings for `host`, inventory entries layered over the defaults.
    pub(crate) fn device_config(&self, host: &str) -> SshConfig {
        match self.inventory.get(host) {
            Some(device) => device.ssh_config(&self.defaults),
            None => self.defaults.clone(),
        }
    }

    /// Polls `targets` concurrently. Blocks until every device is done.
    pub(crate) fn poll(&self, targets: &[String]) -> Vec<PollReport> {
        poll_targets(&self.poller, targets, |host| {
            let config = self.device_config(host);
            (self.opener)(host, &config)
        })
    }
}

/// Opener backed by the system OpenSSH client.
pub(crate) fn ssh_opener() -> Opener {
    Arc::new(
        |host: &str, config: &SshConfig| -> Result<Box<dyn Session>, TransportError> {
            Ok(Box::new(SshSession::connect(host, config)?))
        },
    )
}
