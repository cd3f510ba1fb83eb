//! Command-line definitions

pub mod actions;
pub mod events;
pub mod objects;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "icinga", version, about = "Icinga 2 API client")]
pub struct Cli {
    /// Config file with an [api] table (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, e.g. https://localhost:5665
    #[arg(long, env = "ICINGA_URL", global = true)]
    pub url: Option<String>,

    #[arg(long, env = "ICINGA_USERNAME", global = true)]
    pub username: Option<String>,

    #[arg(long, env = "ICINGA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Give up on an event stream after this many seconds without data
    #[arg(long, global = true)]
    pub idle_timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show status and statistics
    Status {
        /// Only this component, e.g. IcingaApplication
        component: Option<String>,
    },
    /// Query and manage config objects
    #[command(subcommand)]
    Objects(objects::ObjectsCommand),
    /// Run actions on hosts and services
    #[command(subcommand)]
    Actions(actions::ActionsCommand),
    /// Subscribe to an event stream and print one JSON event per line
    Events(events::EventsArgs),
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_events_command() {
        let cli = Cli::try_parse_from([
            "icinga",
            "--url",
            "https://localhost:5665",
            "events",
            "CheckResult",
            "StateChange",
            "--queue",
            "michi",
        ])
        .unwrap();

        match cli.command {
            Command::Events(args) => {
                assert_eq!(args.types.len(), 2);
                assert_eq!(args.queue, "michi");
                assert!(args.filter.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
