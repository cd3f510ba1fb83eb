//! `icinga objects ...`

use anyhow::Result;
use clap::Subcommand;
use icinga_core::objects::{Joins, ListOptions, ObjectType};
use icinga_core::Client;

use super::print_json;

#[derive(Debug, Subcommand)]
pub enum ObjectsCommand {
    /// List objects of a type, or one object by name
    List {
        /// Object type, e.g. Host or Service
        object_type: ObjectType,
        name: Option<String>,
        /// Only return this attribute (repeatable)
        #[arg(long = "attr")]
        attrs: Vec<String>,
        #[arg(long)]
        filter: Option<String>,
        /// Include this joined object (repeatable), e.g. host.name
        #[arg(long = "join", conflicts_with = "all_joins")]
        joins: Vec<String>,
        #[arg(long)]
        all_joins: bool,
    },
    /// Delete one object by name, or all objects matching a filter
    Delete {
        object_type: ObjectType,
        name: Option<String>,
        #[arg(long, required_unless_present = "name")]
        filter: Option<String>,
        /// Keep dependent objects
        #[arg(long)]
        no_cascade: bool,
    },
}

pub async fn run(client: &Client, command: ObjectsCommand) -> Result<()> {
    let objects = client.objects();
    let result = match command {
        ObjectsCommand::List {
            object_type,
            name,
            attrs,
            filter,
            joins,
            all_joins,
        } => {
            let joins = if all_joins {
                Some(Joins::All)
            } else if !joins.is_empty() {
                Some(Joins::Named(joins))
            } else {
                None
            };
            let options = ListOptions {
                attrs,
                filter,
                joins,
            };
            objects.list(object_type, name.as_deref(), &options).await?
        }
        ObjectsCommand::Delete {
            object_type,
            name,
            filter,
            no_cascade,
        } => {
            objects
                .delete(object_type, name.as_deref(), filter.as_deref(), !no_cascade)
                .await?
        }
    };
    print_json(&result)
}
