//! Transport reader
//!
//! Decodes an HTTP response body into text fragments incrementally. The
//! decoder is multi-byte safe: a UTF-8 sequence that spans a chunk boundary
//! is carried over and yielded with the next fragment, never split.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::warn;

use crate::error::{Result, RillError};

/// Incremental UTF-8 decoder carrying partial sequences across chunks
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    /// Bytes of an incomplete trailing sequence from the previous chunk
    carry: Vec<u8>,
}

impl FragmentDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning the complete prefix as text
    ///
    /// An incomplete trailing sequence is held back for the next call. A
    /// byte sequence that can never form a valid character is an error.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String> {
        let bytes: Vec<u8> = if self.carry.is_empty() {
            chunk.to_vec()
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(chunk);
            joined
        };

        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                if err.error_len().is_some() {
                    // Not a boundary split: these bytes are simply invalid.
                    return Err(RillError::Decode(err.to_string()));
                }
                self.carry = rest.to_vec();
                // valid_up_to guarantees this prefix decodes
                Ok(std::str::from_utf8(valid)
                    .map_err(|e| RillError::Decode(e.to_string()))?
                    .to_string())
            }
        }
    }

    /// True if the stream ended mid-character
    #[must_use]
    pub fn has_partial(&self) -> bool {
        !self.carry.is_empty()
    }
}

/// Turn a byte stream into a lazy stream of decoded text fragments
///
/// Fragments are yielded as chunks arrive. The sequence ends when the
/// source does; a read or decode error terminates it abnormally with that
/// error as the final item. An incomplete character at end-of-stream is
/// discarded.
pub fn text_fragments(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String>> + Send + 'static {
    async_stream::stream! {
        let mut decoder = FragmentDecoder::new();
        let mut byte_stream = Box::pin(byte_stream);

        while let Some(chunk) = byte_stream.next().await {
            match chunk {
                Ok(bytes) => match decoder.decode(&bytes) {
                    Ok(text) => {
                        if !text.is_empty() {
                            yield Ok(text);
                        }
                    }
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                },
                Err(err) => {
                    yield Err(RillError::Http(err));
                    return;
                }
            }
        }

        if decoder.has_partial() {
            warn!("discarding incomplete UTF-8 sequence at end of stream");
        }
    }
}
