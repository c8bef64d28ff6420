use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;
use commands::{handle_data_commands, handle_plot_commands};
use services::config::load_config;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "cujson_bench=warn",
        1 => "cujson_bench=info",
        _ => "cujson_bench=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    if handle_data_commands(&cli, &config)? {
        return Ok(());
    }
    if handle_plot_commands(&cli, &config)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}
