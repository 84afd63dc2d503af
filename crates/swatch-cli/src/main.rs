#![allow(clippy::unused_async)]

use anyhow::Context;
use clap::Parser;
use swatch_config::SwatchConfig;

mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("swt error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    // Classification is pure; it needs neither config nor a database.
    if let cli::Commands::Color { action } = &cli.command {
        return commands::color::handle(action, &flags);
    }

    let config = SwatchConfig::load_with_dotenv().context("failed to load swatch configuration")?;
    let ctx = context::AppContext::init(config, &flags)
        .await
        .context("failed to initialize swatch application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SWATCH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
