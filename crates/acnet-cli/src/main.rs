use acnet_cli::cli::{Cli, Commands};
use acnet_cli::config::load_config;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let level = match cli.log_level {
        Some(level) => level,
        None => config.logging.level()?,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    debug!(?config, "configuration loaded");

    match &cli.command {
        Commands::Show {
            netlist,
            frequency,
            format,
        } => commands::show::handle(netlist, *frequency, *format, &config),
        Commands::Validate { netlist, format } => {
            commands::validate::handle(netlist, *format, &config)
        }
        Commands::Graph { command } => commands::graph::handle(command, &config),
        Commands::Scale { value, quantity } => commands::scale::handle(*value, *quantity),
    }
}
