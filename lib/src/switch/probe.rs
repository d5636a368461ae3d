use std::process::Stdio;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use bon::Builder;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use tracing::info;
use tracing::instrument::WithSubscriber;
use tracing::warn;
use tracing::Dispatch;

use super::SwitchConfig;

/// How a reachability probe pings the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Builder)]
#[serde(default)]
pub struct PingOptions {
    /// Number of echo requests to send.
    #[builder(default = 5)]
    pub count: u32,

    /// Seconds to wait for each reply. The platform default when absent.
    pub timeout_secs: Option<u64>,
}

impl Default for PingOptions {
    fn default() -> Self {
        Self {
            count: 5,
            timeout_secs: None,
        }
    }
}

/// Something that can send ICMP echo requests to a host.
#[async_trait]
pub trait Pinger {
    /// Returns whether `host` answered.
    ///
    /// # Errors
    ///
    /// If the ping could not be attempted at all.
    async fn ping(&self, host: &str, options: &PingOptions) -> Result<bool>;
}

/// [`Pinger`] backed by the host's `ping` utility.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
}

impl SystemPinger {
    /// Uses `program` instead of `ping`. It must accept `ping`'s `-c` and
    /// `-W` flags.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(host: &str, options: &PingOptions) -> Vec<String> {
        let mut args = vec!["-c".to_owned(), options.count.to_string()];
        if let Some(secs) = options.timeout_secs {
            args.push("-W".to_owned());
            args.push(secs.to_string());
        }
        args.push(host.to_owned());
        args
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        Self::with_program("ping")
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, host: &str, options: &PingOptions) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(Self::args(host, options))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("unable to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = %output.status, stderr = %stderr.trim(), "ping failed");
        }

        Ok(output.status.success())
    }
}

/// Answers "is the switch online?".
pub struct ReachabilityProber<P = SystemPinger> {
    pinger: P,
    dispatch: Dispatch,
}

impl<P> ReachabilityProber<P>
where
    P: Pinger + Sync,
{
    /// Events are emitted through `dispatch` only.
    pub fn new(pinger: P, dispatch: Dispatch) -> Self {
        Self { pinger, dispatch }
    }

    /// Pings the switch management address.
    ///
    /// An unreachable switch, an empty host or a ping utility that cannot be
    /// run all yield `false`.
    pub async fn is_switch_online(&self, config: &SwitchConfig) -> bool {
        self.probe(config)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn probe(&self, config: &SwitchConfig) -> bool {
        let host = match config.host() {
            Ok(host) => host,
            Err(error) => {
                warn!(%error, "not probing switch");
                return false;
            }
        };

        let online = match self.pinger.ping(host, &config.ping).await {
            Ok(online) => online,
            Err(error) => {
                warn!(host, ?error, "unable to ping switch");
                false
            }
        };

        if online {
            info!(host, "Switch has been detected");
        } else {
            info!(host, "Switch has not been detected");
        }
        online
    }
}
