//! `icinga events ...`

use anyhow::{Context, Result};
use clap::Args;
use icinga_core::events::{EventType, SubscribeRequest};
use icinga_core::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Event types, e.g. CheckResult StateChange
    #[arg(required = true)]
    pub types: Vec<EventType>,
    /// Queue name; clients sharing a queue must use the same types and filter
    #[arg(long)]
    pub queue: String,
    /// Filter expression, e.g. 'event.check_result.exit_status==2'
    #[arg(long)]
    pub filter: Option<String>,
}

/// Print events until the stream ends or Ctrl-C is pressed
pub async fn run(client: &Client, args: EventsArgs) -> Result<()> {
    let mut request = SubscribeRequest::new(args.types, args.queue);
    if let Some(filter) = args.filter {
        request = request.with_filters(filter);
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let mut subscription = client
        .events()
        .subscribe(request)
        .await
        .context("subscribing to event stream")?
        .with_cancellation(cancel);

    while let Some(event) = subscription.next().await {
        let event = event?;
        println!("{}", serde_json::to_string(event.raw())?);
    }

    info!(
        "Event stream closed after {} events",
        subscription.events_received()
    );
    Ok(())
}
