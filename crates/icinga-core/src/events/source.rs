//! Chunk sources feeding the event stream

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Response;
use tracing::debug;

use crate::error::Result;

/// A live response body read one chunk at a time
#[async_trait]
pub trait ChunkSource: Send {
    /// Next chunk as it arrives, `None` once the body has ended or the source is closed
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;

    /// Release the underlying connection; later reads return `None`
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Chunk source over a streaming `reqwest` response
pub struct HttpChunkSource {
    response: Option<Response>,
    bytes_received: usize,
}

impl HttpChunkSource {
    pub fn new(response: Response) -> Self {
        Self {
            response: Some(response),
            bytes_received: 0,
        }
    }

    pub fn bytes_received(&self) -> usize {
        self.bytes_received
    }
}

#[async_trait]
impl ChunkSource for HttpChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let Some(response) = self.response.as_mut() else {
            return Ok(None);
        };

        let chunk = response.chunk().await?;
        if let Some(bytes) = &chunk {
            self.bytes_received += bytes.len();
            debug!(
                "Event stream chunk: {} bytes (total: {} bytes)",
                bytes.len(),
                self.bytes_received
            );
        }
        Ok(chunk)
    }

    fn close(&mut self) {
        // Dropping the response tears down the connection
        if self.response.take().is_some() {
            debug!(
                "Event stream connection closed after {} bytes",
                self.bytes_received
            );
        }
    }

    fn is_closed(&self) -> bool {
        self.response.is_none()
    }
}
