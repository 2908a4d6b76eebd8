//! Response orchestrator
//!
//! Drives the transport reader and record parser and turns the record
//! sequence into exactly three external effects with a strict ordering
//! contract: reasoning deltas are forwarded immediately in arrival order,
//! answer content is held back until the reasoning trace is finalized at
//! end-of-stream, and completion fires exactly once. On transport failure
//! a fixed fallback reply is synthesized so the caller always observes a
//! well-formed completion.

use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::{reader, RecordParser, StreamEvent};

/// Reply synthesized when the transport fails mid-turn
pub const FALLBACK_ERROR_REPLY: &str =
    "I'm sorry, there was an error processing your request. Please try again later.";

/// Receiver of the orchestrator's three effects
///
/// Calls arrive in causal order: every reasoning delta before the content
/// flush, the content flush before completion, completion exactly once.
pub trait ResponseSink {
    fn on_reasoning_delta(&mut self, text: &str);
    fn on_content_delta(&mut self, text: &str);
    fn on_complete(&mut self);
}

/// State machine applying the hold-content-until-finalized policy
#[derive(Debug, Default)]
pub struct ResponseOrchestrator {
    parser: RecordParser,
    buffered_content: String,
    reasoning_finalized: bool,
    completed: bool,
    /// At least one record arrived; an end-of-stream without any is
    /// treated as an empty-body transport failure
    saw_record: bool,
}

impl ResponseOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one decoded text fragment, dispatching its events in order
    pub fn process_fragment(&mut self, fragment: &str, sink: &mut impl ResponseSink) {
        for event in self.parser.parse_fragment(fragment) {
            self.dispatch(event, sink);
        }
    }

    fn dispatch(&mut self, event: StreamEvent, sink: &mut impl ResponseSink) {
        self.saw_record = true;
        match event {
            StreamEvent::Reasoning { value } => sink.on_reasoning_delta(&value),
            StreamEvent::Content { value } => {
                if self.reasoning_finalized {
                    // Finalization is monotonic: late content goes straight
                    // through.
                    sink.on_content_delta(&value);
                } else {
                    self.buffered_content.push_str(&value);
                }
            }
        }
    }

    /// End-of-stream: finalize reasoning, flush the buffered answer as one
    /// delta, complete exactly once
    pub fn finish(&mut self, sink: &mut impl ResponseSink) {
        if self.completed {
            return;
        }
        self.parser.finish();
        if !self.saw_record {
            // An empty reply body is a transport failure, not an answer.
            warn!("reply stream ended without a single record");
            self.fail(sink);
            return;
        }
        self.reasoning_finalized = true;
        if !self.buffered_content.is_empty() {
            let content = std::mem::take(&mut self.buffered_content);
            sink.on_content_delta(&content);
        }
        self.completed = true;
        sink.on_complete();
    }

    /// Transport failure: synthesize the fallback reply and complete
    ///
    /// Any partially buffered answer is abandoned; the caller still sees a
    /// single content delta followed by a single completion.
    pub fn fail(&mut self, sink: &mut impl ResponseSink) {
        if self.completed {
            return;
        }
        self.reasoning_finalized = true;
        self.buffered_content.clear();
        self.completed = true;
        sink.on_content_delta(FALLBACK_ERROR_REPLY);
        sink.on_complete();
    }

    /// Drive a byte stream to completion
    ///
    /// Suspends only while awaiting the next chunk; between suspensions
    /// parsing and dispatch run synchronously, so events are observed in
    /// arrival order. A read error or a chunk gap exceeding `idle_timeout`
    /// resolves the turn through [`Self::fail`].
    pub async fn run(
        mut self,
        byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
        idle_timeout: Duration,
        sink: &mut impl ResponseSink,
    ) {
        let mut fragments = Box::pin(reader::text_fragments(byte_stream));

        loop {
            match tokio::time::timeout(idle_timeout, fragments.next()).await {
                Ok(Some(Ok(fragment))) => self.process_fragment(&fragment, sink),
                Ok(Some(Err(err))) => {
                    warn!(%err, "reply stream failed mid-turn");
                    self.fail(sink);
                    return;
                }
                Ok(None) => {
                    debug!("reply stream reached end-of-stream");
                    self.finish(sink);
                    return;
                }
                Err(_) => {
                    warn!(timeout = ?idle_timeout, "reply stream stalled");
                    self.fail(sink);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Sink recording effects as readable trace entries
    #[derive(Debug, Default)]
    struct RecordingSink {
        trace: Vec<String>,
    }

    impl ResponseSink for RecordingSink {
        fn on_reasoning_delta(&mut self, text: &str) {
            self.trace.push(format!("reasoning:{text}"));
        }

        fn on_content_delta(&mut self, text: &str) {
            self.trace.push(format!("content:{text}"));
        }

        fn on_complete(&mut self) {
            self.trace.push("complete".to_string());
        }
    }

    fn wire(records: &[(&str, &str)]) -> String {
        records
            .iter()
            .map(|(kind, value)| {
                format!("{}\n", serde_json::json!({ "type": kind, "value": value }))
            })
            .collect()
    }

    #[test]
    fn test_content_buffered_until_end_of_stream() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        let fragment = wire(&[
            ("reasoning", "a"),
            ("reasoning", "b"),
            ("content", "X"),
            ("content", "Y"),
        ]);
        orchestrator.process_fragment(&fragment, &mut sink);
        // No content leaks before the stream ends.
        assert_eq!(sink.trace, vec!["reasoning:a", "reasoning:b"]);

        orchestrator.finish(&mut sink);
        assert_eq!(
            sink.trace,
            vec!["reasoning:a", "reasoning:b", "content:XY", "complete"]
        );
    }

    #[test]
    fn test_content_only_stream_still_flushes() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.process_fragment(&wire(&[("content", "hi")]), &mut sink);
        orchestrator.finish(&mut sink);
        assert_eq!(sink.trace, vec!["content:hi", "complete"]);
    }

    #[test]
    fn test_empty_stream_is_a_transport_failure() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.finish(&mut sink);
        assert_eq!(
            sink.trace,
            vec![
                format!("content:{FALLBACK_ERROR_REPLY}"),
                "complete".to_string(),
            ]
        );
    }

    #[test]
    fn test_reasoning_only_stream_completes_normally() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.process_fragment(&wire(&[("reasoning", "just thinking")]), &mut sink);
        orchestrator.finish(&mut sink);
        assert_eq!(sink.trace, vec!["reasoning:just thinking", "complete"]);
    }

    #[test]
    fn test_content_after_finalization_forwards_immediately() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.process_fragment(&wire(&[("content", "early")]), &mut sink);
        orchestrator.finish(&mut sink);
        // Finalization never reverts: post-completion content is direct.
        orchestrator.process_fragment(&wire(&[("content", "late")]), &mut sink);
        assert_eq!(
            sink.trace,
            vec!["content:early", "complete", "content:late"]
        );
    }

    #[test]
    fn test_malformed_line_does_not_disturb_ordering() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        let mut fragment = wire(&[("reasoning", "ok")]);
        fragment.push_str("garbage line\n");
        fragment.push_str(&wire(&[("content", "answer")]));
        orchestrator.process_fragment(&fragment, &mut sink);
        orchestrator.finish(&mut sink);
        assert_eq!(sink.trace, vec!["reasoning:ok", "content:answer", "complete"]);
    }

    #[test]
    fn test_fail_synthesizes_single_error_completion() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.process_fragment(
            &wire(&[("reasoning", "partial"), ("content", "half an ans")]),
            &mut sink,
        );
        orchestrator.fail(&mut sink);
        // A second terminal signal must not duplicate effects.
        orchestrator.fail(&mut sink);
        orchestrator.finish(&mut sink);

        assert_eq!(
            sink.trace,
            vec![
                "reasoning:partial".to_string(),
                format!("content:{FALLBACK_ERROR_REPLY}"),
                "complete".to_string(),
            ]
        );
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut orchestrator = ResponseOrchestrator::new();
        let mut sink = RecordingSink::default();

        orchestrator.process_fragment(&wire(&[("content", "once")]), &mut sink);
        orchestrator.finish(&mut sink);
        orchestrator.finish(&mut sink);
        assert_eq!(sink.trace, vec!["content:once", "complete"]);
    }

    #[tokio::test]
    async fn test_run_happy_path_splits_mid_record() {
        let full = wire(&[("reasoning", "think"), ("content", "answer")]);
        let (a, b) = full.split_at(17);
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from(a.to_string())),
            Ok(Bytes::from(b.to_string())),
        ];

        let mut sink = RecordingSink::default();
        ResponseOrchestrator::new()
            .run(stream::iter(chunks), Duration::from_secs(5), &mut sink)
            .await;
        assert_eq!(
            sink.trace,
            vec!["reasoning:think", "content:answer", "complete"]
        );
    }

    #[tokio::test]
    async fn test_run_stalled_stream_times_out() {
        let head: Vec<reqwest::Result<Bytes>> =
            vec![Ok(Bytes::from(wire(&[("reasoning", "hmm")])))];
        let chunks = stream::iter(head).chain(stream::pending());

        let mut sink = RecordingSink::default();
        ResponseOrchestrator::new()
            .run(chunks, Duration::from_millis(20), &mut sink)
            .await;
        assert_eq!(
            sink.trace,
            vec![
                "reasoning:hmm".to_string(),
                format!("content:{FALLBACK_ERROR_REPLY}"),
                "complete".to_string(),
            ]
        );
    }
}
