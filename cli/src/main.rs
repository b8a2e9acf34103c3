mod cli;
mod commands;
mod error;
mod session;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use error::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.session.verbose);

    if let Err(err) = run(cli).await {
        ui::error(err.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = &cli.session;

    match cli.command {
        Commands::Balance => commands::balance::run(options),
        Commands::CreateNft(args) => commands::action::run(options, args.into()).await,
        Commands::CreateToken(args) => commands::action::run(options, args.into()).await,
        Commands::DeployStorage => {
            commands::action::run(options, base_moon::ActionRequest::StorageDeploy).await
        }
        Commands::Check => commands::check::run(options),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn init_tracing(verbose: bool) {
    // user-facing messages go through `ui`; tracing is for diagnostics only
    let default = if verbose { "base_moon=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
