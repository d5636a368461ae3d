use std::time::Duration;

use bon::Builder;
use serde::Deserialize;

use super::PingOptions;
use super::SwitchError;
use crate::action::client::HostKeyPolicy;
use crate::util::secret::SecureString;

/// Port used when a config does not name one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Everything needed to talk to one switch.
///
/// Only `host` is needed to probe reachability. Link queries also need
/// credentials, an interface and a host key policy that can trust the switch.
#[derive(Debug, Clone, Deserialize, Builder)]
pub struct SwitchConfig {
    /// Management address or host name.
    #[builder(into)]
    pub host: String,

    #[serde(default = "default_ssh_port")]
    #[builder(default = DEFAULT_SSH_PORT)]
    pub ssh_port: u16,

    #[serde(default)]
    #[builder(into)]
    pub username: Option<String>,

    #[serde(default)]
    #[builder(into)]
    pub password: Option<SecureString>,

    /// Interface whose link state is queried, eg `eth0`.
    #[serde(default)]
    #[builder(into)]
    pub device_intf: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub host_key: HostKeyPolicy,

    #[serde(default)]
    #[builder(default)]
    pub ping: PingOptions,

    /// Bound on the TCP connect of a link query. Unbounded when absent.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl SwitchConfig {
    /// The management address, if it is usable.
    ///
    /// # Errors
    ///
    /// If the host is empty, or starts with `-` and would be read as an
    /// option by `ping`.
    pub fn host(&self) -> Result<&str, SwitchError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(SwitchError::configuration("host is empty"));
        }
        if host.starts_with('-') {
            return Err(SwitchError::configuration(format!(
                "host {host:?} may not start with '-'"
            )));
        }
        Ok(host)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}
