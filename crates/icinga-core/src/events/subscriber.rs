//! Event subscription consumer
//!
//! Pulls chunks from a [`ChunkSource`], reassembles newline-delimited records
//! and parses each one into an [`Event`]. The only suspension point is the
//! wait for the next chunk.

use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::reassembler::FrameReassembler;
use super::source::{ChunkSource, HttpChunkSource};
use super::types::Event;
use crate::error::{ApiError, Result};

/// One open event subscription, consumed as a lazy sequence of events
///
/// Errors are terminal: after `next` returns an error the subscription is
/// closed and every later call returns `None`. Dropping the subscription
/// closes the connection.
pub struct EventSubscription<S: ChunkSource = HttpChunkSource> {
    source: S,
    reassembler: FrameReassembler,
    /// Records completed by the last chunk but not yet handed out
    pending: VecDeque<Bytes>,
    idle_timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
    finished: bool,
    started: Instant,
    events_received: usize,
}

enum Read {
    Chunk(Bytes),
    End,
    Cancelled,
}

impl<S: ChunkSource> EventSubscription<S> {
    pub fn new(source: S) -> Self {
        Self::with_reassembler(source, FrameReassembler::new())
    }

    pub fn with_reassembler(source: S, reassembler: FrameReassembler) -> Self {
        Self {
            source,
            reassembler,
            pending: VecDeque::new(),
            idle_timeout: None,
            cancel: None,
            finished: false,
            started: Instant::now(),
            events_received: 0,
        }
    }

    /// Fail with [`ApiError::Timeout`] when no chunk arrives for this long
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// End the subscription (and close the connection) once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn events_received(&self) -> usize {
        self.events_received
    }

    pub fn is_closed(&self) -> bool {
        self.finished
    }

    /// Next event, or `None` once the stream has ended or was closed
    pub async fn next(&mut self) -> Option<Result<Event>> {
        loop {
            if self.finished {
                return None;
            }

            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                info!("Event subscription cancelled");
                self.close();
                return None;
            }

            if let Some(record) = self.pending.pop_front() {
                if record.iter().all(u8::is_ascii_whitespace) {
                    debug!("Skipping blank event record ({} bytes)", record.len());
                    continue;
                }
                return Some(self.parse(record));
            }

            match self.read_chunk().await {
                Ok(Read::Chunk(chunk)) => {
                    let records = self.reassembler.feed(&chunk);
                    self.pending.extend(records);
                }
                Ok(Read::End) => {
                    if let Some(residual) = self.reassembler.finish() {
                        warn!(
                            "Event stream ended with {} bytes of unterminated trailing data, discarded",
                            residual.len()
                        );
                    }
                    info!(
                        "Event stream ended after {:?}, {} events",
                        self.started.elapsed(),
                        self.events_received
                    );
                    self.close();
                    return None;
                }
                Ok(Read::Cancelled) => {
                    info!("Event subscription cancelled");
                    self.close();
                    return None;
                }
                Err(e) => {
                    warn!("Event stream failed: {}", e);
                    self.close();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Stop consuming and release the connection
    pub fn close(&mut self) {
        self.finished = true;
        self.pending.clear();
        self.reassembler.finish();
        self.source.close();
    }

    /// Adapt the subscription into a [`Stream`]; dropping the stream closes it
    pub fn into_stream(self) -> impl Stream<Item = Result<Event>> {
        futures::stream::unfold(self, |mut subscription| async move {
            let event = subscription.next().await?;
            Some((event, subscription))
        })
    }

    async fn read_chunk(&mut self) -> Result<Read> {
        let cancel = self.cancel.clone();
        let idle_timeout = self.idle_timeout;
        let read = async {
            let next = self.source.next_chunk();
            match idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, next).await {
                    Ok(chunk) => chunk,
                    Err(_) => Err(ApiError::Timeout(format!(
                        "no event stream data within {limit:?}"
                    ))),
                },
                None => next.await,
            }
        };

        let chunk = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Ok(Read::Cancelled),
                chunk = read => chunk?,
            },
            None => read.await?,
        };

        Ok(match chunk {
            Some(chunk) => Read::Chunk(chunk),
            None => Read::End,
        })
    }

    fn parse(&mut self, record: Bytes) -> Result<Event> {
        let parsed = serde_json::from_slice::<Value>(&record).and_then(Event::from_value);
        match parsed {
            Ok(event) => {
                self.events_received += 1;
                debug!(
                    "Event #{}: type={}",
                    self.events_received, event.event_type
                );
                Ok(event)
            }
            Err(source) => {
                let record = String::from_utf8_lossy(&record).into_owned();
                warn!("Malformed event record, closing subscription: {}", source);
                self.close();
                Err(ApiError::RecordParse { source, record })
            }
        }
    }
}

impl<S: ChunkSource> Drop for EventSubscription<S> {
    fn drop(&mut self) {
        self.source.close();
    }
}
