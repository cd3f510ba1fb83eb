//! icinga - command-line client for the Icinga 2 API

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Cli, Command};
use icinga_core::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = Client::new(resolve_config(&cli)?).context("creating API client")?;

    match cli.command {
        Command::Status { component } => {
            let status = client.status().list(component.as_deref()).await?;
            commands::print_json(&status)
        }
        Command::Objects(command) => commands::objects::run(&client, command).await,
        Command::Actions(command) => commands::actions::run(&client, command).await,
        Command::Events(args) => commands::events::run(&client, args).await,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("icinga={default_level},icinga_core={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flags win over the config file
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let explicit = ClientConfig {
        url: cli.url.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        timeout: cli.timeout,
        stream_idle_timeout: cli.idle_timeout,
        ..Default::default()
    };

    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => ClientConfig::default_path().filter(|p| p.exists()),
    };

    let from_file = match path {
        Some(path) => ClientConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };

    Ok(explicit.or(from_file))
}
