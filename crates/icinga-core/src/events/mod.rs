//! Event streams (`/v1/events`)
//!
//! A subscription is one long-lived POST whose response body is a never-ending
//! sequence of JSON objects, one per line:
//!
//! ```no_run
//! # async fn run(client: icinga_core::Client) -> icinga_core::Result<()> {
//! use icinga_core::events::{EventType, SubscribeRequest};
//!
//! let request = SubscribeRequest::new([EventType::CheckResult], "michi")
//!     .with_filters("event.check_result.exit_status==2");
//! let mut subscription = client.events().subscribe(request).await?;
//! while let Some(event) = subscription.next().await {
//!     println!("{:?}", event?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod reassembler;
pub mod source;
pub mod subscriber;
pub mod types;

pub use reassembler::{FrameReassembler, DEFAULT_DELIMITER};
pub use source::{ChunkSource, HttpChunkSource};
pub use subscriber::EventSubscription;
pub use types::{Event, EventType, SubscribeRequest};

use tracing::info;

use crate::client::Client;
use crate::error::{ApiError, Result};

const BASE_URL_PATH: &str = "/v1/events";

/// Event stream endpoint
pub struct Events<'a> {
    client: &'a Client,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Open a subscription and return it as a lazy sequence of events
    ///
    /// Fails before connecting when `types` is empty. Each call opens its own
    /// connection, which stays open until the subscription is closed or dropped.
    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<EventSubscription> {
        if request.types.is_empty() {
            return Err(ApiError::Configuration(
                "at least one event type is required".to_string(),
            ));
        }

        let payload = serde_json::to_value(&request)?;
        let response = self.client.open_stream(BASE_URL_PATH, &payload).await?;

        info!(
            "Subscribed to {} events on queue '{}'",
            request
                .types
                .iter()
                .map(EventType::as_str)
                .collect::<Vec<_>>()
                .join(","),
            request.queue
        );

        Ok(EventSubscription::new(HttpChunkSource::new(response))
            .with_idle_timeout(self.client.config().stream_idle_timeout()))
    }
}
