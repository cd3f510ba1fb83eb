//! `icinga actions ...`

use anyhow::Result;
use clap::{Args, Subcommand};
use icinga_core::actions::{Acknowledgement, CheckResult, Target};
use icinga_core::objects::ObjectType;
use icinga_core::Client;

use super::print_json;

/// Hosts or services an action applies to
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Host or Service
    #[arg(long = "type", default_value = "Service")]
    pub object_type: String,
    /// Filter expression, e.g. 'service.name=="ping4"'
    #[arg(long)]
    pub filter: Option<String>,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Target {
            object_type: args.object_type,
            filter: args.filter,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ActionsCommand {
    /// Submit a passive check result
    ProcessCheckResult {
        object_type: ObjectType,
        /// host name, or host!service
        name: String,
        #[arg(long)]
        exit_status: u8,
        #[arg(long)]
        output: String,
        /// Performance data label (repeatable)
        #[arg(long = "perfdata")]
        performance_data: Vec<String>,
    },
    /// Reschedule checks now
    RescheduleCheck {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        force: bool,
    },
    /// Acknowledge a problem
    Acknowledge {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        author: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        sticky: bool,
        #[arg(long)]
        notify: bool,
    },
    RemoveAcknowledgement {
        #[command(flatten)]
        target: TargetArgs,
    },
    AddComment {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        author: String,
        #[arg(long)]
        comment: String,
    },
}

pub async fn run(client: &Client, command: ActionsCommand) -> Result<()> {
    let actions = client.actions();
    let result = match command {
        ActionsCommand::ProcessCheckResult {
            object_type,
            name,
            exit_status,
            output,
            performance_data,
        } => {
            let check_result = CheckResult {
                exit_status,
                plugin_output: output,
                performance_data,
                check_source: Some("icinga-cli".to_string()),
                ..Default::default()
            };
            actions
                .process_check_result(object_type, &name, &check_result)
                .await?
        }
        ActionsCommand::RescheduleCheck { target, force } => {
            actions.reschedule_check(&target.into(), None, force).await?
        }
        ActionsCommand::Acknowledge {
            target,
            author,
            comment,
            sticky,
            notify,
        } => {
            let acknowledgement = Acknowledgement {
                author,
                comment,
                sticky,
                notify,
                ..Default::default()
            };
            actions
                .acknowledge_problem(&target.into(), &acknowledgement)
                .await?
        }
        ActionsCommand::RemoveAcknowledgement { target } => {
            actions.remove_acknowledgement(&target.into()).await?
        }
        ActionsCommand::AddComment {
            target,
            author,
            comment,
        } => {
            actions
                .add_comment(&target.into(), &author, &comment)
                .await?
        }
    };
    print_json(&result)
}
