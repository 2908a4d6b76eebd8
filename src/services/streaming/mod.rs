//! Streaming support for model replies
//!
//! The serving endpoint streams a reply as newline-delimited JSON records,
//! each tagged `reasoning` or `content`. This module reconstructs those
//! records from the raw byte stream and applies the buffering policy that
//! keeps the visible answer hidden until the reasoning trace is complete.

pub mod orchestrator;
pub mod reader;
pub mod record_parser;

pub use self::orchestrator::{ResponseOrchestrator, ResponseSink, FALLBACK_ERROR_REPLY};
pub use self::reader::text_fragments;
pub use self::record_parser::RecordParser;

use serde::{Deserialize, Serialize};

/// One protocol record, produced once per line and consumed immediately
///
/// Mirrors the wire shape `{"type": "reasoning" | "content", "value": "..."}`.
/// `value` is free-form text; escaped newlines inside it belong to the
/// value, only the raw line terminator separates records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Intermediate explanatory trace emitted before the answer
    Reasoning { value: String },
    /// User-facing answer text
    Content { value: String },
}
