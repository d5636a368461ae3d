use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use switchctl::switch::SwitchConfig;
use tracing::debug;
use tracing::Dispatch;
use tracing_glog::Glog;
use tracing_glog::GlogFields;
use tracing_glog::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

const HEADING: Option<&str> = Some("Global Options");

/// Global arguments that apply to every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Path to the switch config JSON file
    #[clap(short, long, env = "SWITCHCTL_CONFIG", help_heading = HEADING, global = true)]
    pub config: Utf8PathBuf,

    /// Filter directive for stderr logs
    #[clap(long, env = "RUST_LOG", default_value = "info", help_heading = HEADING, global = true)]
    pub log_level: String,

    /// Time to allow the query to complete. Unbounded if unset
    #[clap(long, help_heading = HEADING, global = true)]
    pub timeout: Option<humantime::Duration>,
}

impl GlobalArgs {
    /// Builds the [`tracing`] dispatcher handed to the switch components and
    /// installs it for the CLI's own events.
    pub fn init_tracing(&self) -> Result<Dispatch> {
        let stderr_filter = EnvFilter::builder().parse_lossy(&self.log_level);
        let stderr_layer = tracing_subscriber::fmt::layer()
            .event_format(Glog::default().with_timer(LocalTime::default()))
            .fmt_fields(GlogFields::default())
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .with_filter(stderr_filter);

        let dispatch = Dispatch::new(Registry::default().with(stderr_layer));
        tracing::dispatcher::set_global_default(dispatch.clone())?;

        debug!("Initialized tracing");

        Ok(dispatch)
    }

    /// Reads the switch config file.
    pub fn load_config(&self) -> Result<SwitchConfig> {
        let raw = std::fs::read_to_string(&self.config)
            .with_context(|| format!("unable to read config file {}", self.config))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("unable to parse config file {}", self.config))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Into::into)
    }
}
