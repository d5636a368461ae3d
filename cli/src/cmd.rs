mod link;
mod online;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use switchctl::switch::SwitchConfig;
use tracing::Dispatch;

use crate::args::GlobalArgs;

/// Switch reachability and port link probe
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    global_args: GlobalArgs,
}

/// Inputs shared by every subcommand.
pub struct Context {
    pub config: SwitchConfig,
    pub dispatch: Dispatch,
    pub timeout: Option<Duration>,
}

/// Subcommands must implement [`Run`] to be executed at runtime.
#[enum_dispatch]
pub trait Run {
    async fn run(&self, ctx: Context) -> Result<ExitCode>;
}

#[enum_dispatch(Run)]
#[derive(Debug, Subcommand)]
enum Command {
    Online(online::OnlineArgs),
    Link(link::LinkArgs),
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let dispatch = cli.global_args.init_tracing()?;

    let ctx = Context {
        config: cli.global_args.load_config()?,
        dispatch,
        timeout: cli.global_args.timeout(),
    };

    cli.command.run(ctx).await
}
