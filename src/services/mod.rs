//! Service layer for the model-serving collaborator
//!
//! Provides the [`ChatBackend`] seam over the serving endpoint and the
//! convenience driver that runs a full streamed turn through the response
//! orchestrator.

pub mod http;
pub mod streaming;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tracing::warn;

use self::streaming::{ResponseOrchestrator, ResponseSink};
use crate::error::Result;

/// Raw reply body as it arrives off the wire
pub type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Seam over the serving endpoint
///
/// One submission carries a single text field; the reply is either a
/// complete answer or a stream of reasoning/content records.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Request a complete (non-streamed) reply for one user turn
    async fn complete(&self, message: &str) -> Result<String>;

    /// Open the record stream replying to one user turn
    async fn open_reply_stream(&self, message: &str) -> Result<ByteStream>;
}

/// Run one streamed turn end to end
///
/// Opens the reply stream and drives it through the orchestrator. Failure
/// to even open the stream resolves the turn the same way a mid-stream
/// transport error does: one fallback content delta, one completion. The
/// sink always observes a well-formed turn.
pub async fn stream_reply(
    backend: &dyn ChatBackend,
    message: &str,
    idle_timeout: Duration,
    sink: &mut impl ResponseSink,
) {
    match backend.open_reply_stream(message).await {
        Ok(byte_stream) => {
            ResponseOrchestrator::new()
                .run(byte_stream, idle_timeout, sink)
                .await;
        }
        Err(err) => {
            warn!(%err, "failed to open reply stream");
            ResponseOrchestrator::new().fail(sink);
        }
    }
}
