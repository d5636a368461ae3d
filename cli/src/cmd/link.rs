use std::process::ExitCode;

use anyhow::Context as _;
use anyhow::Result;
use clap::Args;
use switchctl::switch::LinkState;
use switchctl::switch::PortLinkRunner;
use switchctl::util::tokio::deadline;

use crate::cmd::Context;
use crate::cmd::Run;

/// Query the link state of the configured interface over SSH
///
/// Prints `up`, `down` or `unknown`. Exits non-zero unless the link is up.
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Interface to query, overriding the config
    #[clap(long)]
    pub intf: Option<String>,
}

impl Run for LinkArgs {
    async fn run(&self, ctx: Context) -> Result<ExitCode> {
        let mut config = ctx.config;
        if let Some(ref intf) = self.intf {
            config.device_intf = Some(intf.clone());
        }

        let runner = PortLinkRunner::ssh(ctx.dispatch);
        let state = deadline(ctx.timeout, runner.get_port_link(&config))
            .await?
            .context("link query failed")?;

        println!("{state}");
        Ok(exit_code(state))
    }
}

fn exit_code(state: LinkState) -> ExitCode {
    match state {
        LinkState::Up => ExitCode::SUCCESS,
        LinkState::Down => ExitCode::from(1),
        LinkState::Unknown => ExitCode::from(2),
    }
}
