use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use switchctl::switch::ReachabilityProber;
use switchctl::switch::SystemPinger;
use switchctl::util::tokio::deadline;

use crate::cmd::Context;
use crate::cmd::Run;

/// Check whether the switch answers ping
///
/// Prints `online` or `offline`. Exits non-zero when offline.
#[derive(Debug, Args)]
pub struct OnlineArgs {
    /// Number of echo requests to send, overriding the config
    #[clap(long)]
    pub count: Option<u32>,
}

impl Run for OnlineArgs {
    async fn run(&self, ctx: Context) -> Result<ExitCode> {
        let mut config = ctx.config;
        if let Some(count) = self.count {
            config.ping.count = count;
        }

        let prober = ReachabilityProber::new(SystemPinger::default(), ctx.dispatch);
        let online = deadline(ctx.timeout, prober.is_switch_online(&config)).await?;

        if online {
            println!("online");
            Ok(ExitCode::SUCCESS)
        } else {
            println!("offline");
            Ok(ExitCode::FAILURE)
        }
    }
}
