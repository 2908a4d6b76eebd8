//! Chat session
//!
//! Explicitly constructed owner of one conversation: holds the current
//! snapshot, dispatches reducer actions, and manages the in-flight stream.
//! Each spawned stream is tagged with a generation id; effects carrying a
//! stale generation are discarded, so rapid repeated submissions are
//! latest-wins and an abandoned stream's late callbacks are no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::conversation::{ChatAction, Conversation};
use crate::messages::Message;
use crate::services::streaming::ResponseSink;
use crate::services::{stream_reply, ChatBackend};

/// Effect emitted by an in-flight stream, tagged with its generation
#[derive(Debug)]
pub struct SessionEvent {
    pub generation: u64,
    pub effect: StreamEffect,
}

/// The orchestrator's three effects, as session messages
#[derive(Debug)]
pub enum StreamEffect {
    ReasoningDelta(String),
    ContentDelta(String),
    Complete,
}

/// Sink forwarding orchestrator effects into the session channel
struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
    generation: u64,
}

impl ChannelSink {
    fn send(&self, effect: StreamEffect) {
        // The session may have moved on; a closed channel is fine.
        let _ = self.tx.send(SessionEvent {
            generation: self.generation,
            effect,
        });
    }
}

impl ResponseSink for ChannelSink {
    fn on_reasoning_delta(&mut self, text: &str) {
        self.send(StreamEffect::ReasoningDelta(text.to_string()));
    }

    fn on_content_delta(&mut self, text: &str) {
        self.send(StreamEffect::ContentDelta(text.to_string()));
    }

    fn on_complete(&mut self) {
        self.send(StreamEffect::Complete);
    }
}

/// One conversation and its in-flight reply stream
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    conversation: Conversation,
    idle_timeout: Duration,

    /// Generation of the stream whose effects are currently accepted
    generation: u64,
    current_stream: Option<tokio::task::JoinHandle<()>>,

    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,

    /// Accumulated reasoning for the current turn
    reasoning_buffer: String,
    /// Accumulated answer for the current turn
    content_buffer: String,
}

impl ChatSession {
    /// Create a session over the given backend
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>, idle_timeout: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            backend,
            conversation: Conversation::new(),
            idle_timeout,
            generation: 0,
            current_stream: None,
            event_tx,
            event_rx,
            reasoning_buffer: String::new(),
            content_buffer: String::new(),
        }
    }

    /// Current conversation snapshot
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Submit one user turn
    ///
    /// Appends the user message and the pending assistant placeholder
    /// synchronously, then spawns the reply stream. A previous in-flight
    /// stream is superseded: its task is aborted and its remaining effects
    /// are discarded by generation.
    pub fn submit(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.abandon_current_stream();
        if self.conversation.is_typing() {
            // Resolve the superseded placeholder with whatever arrived, so
            // only the new reply is ever pending.
            self.dispatch(ChatAction::UpdateAssistantReasoning {
                text: self.reasoning_buffer.clone(),
                finalized: true,
            });
            self.dispatch(ChatAction::UpdateAssistantContent(
                self.content_buffer.clone(),
            ));
        }
        self.reasoning_buffer.clear();
        self.content_buffer.clear();

        self.dispatch(ChatAction::AppendMessage(Message::user(text)));
        self.dispatch(ChatAction::SetTyping(true));
        self.dispatch(ChatAction::AppendMessage(Message::pending_assistant()));

        self.generation += 1;
        debug!(generation = self.generation, "starting reply stream");

        let mut sink = ChannelSink {
            tx: self.event_tx.clone(),
            generation: self.generation,
        };
        let backend = Arc::clone(&self.backend);
        let idle_timeout = self.idle_timeout;
        let message = text.to_string();

        self.current_stream = Some(tokio::spawn(async move {
            stream_reply(backend.as_ref(), &message, idle_timeout, &mut sink).await;
        }));
    }

    /// Await the next stream effect
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Apply one stream effect to the conversation
    ///
    /// Effects from superseded generations are dropped.
    pub fn apply_event(&mut self, event: SessionEvent) {
        if event.generation != self.generation {
            debug!(
                stale = event.generation,
                current = self.generation,
                "discarding effect from superseded stream"
            );
            return;
        }

        match event.effect {
            StreamEffect::ReasoningDelta(text) => {
                self.reasoning_buffer.push_str(&text);
                self.dispatch(ChatAction::UpdateAssistantReasoning {
                    text: self.reasoning_buffer.clone(),
                    finalized: false,
                });
            }
            StreamEffect::ContentDelta(text) => {
                self.content_buffer.push_str(&text);
                self.dispatch(ChatAction::UpdateAssistantContent(
                    self.content_buffer.clone(),
                ));
            }
            StreamEffect::Complete => {
                self.dispatch(ChatAction::UpdateAssistantReasoning {
                    text: self.reasoning_buffer.clone(),
                    finalized: true,
                });
                self.dispatch(ChatAction::UpdateAssistantContent(
                    self.content_buffer.clone(),
                ));
                self.dispatch(ChatAction::SetTyping(false));
                self.current_stream = None;
            }
        }
    }

    /// Flip reasoning visibility on the latest assistant message
    pub fn toggle_reasoning_visible(&mut self) {
        self.dispatch(ChatAction::ToggleReasoningVisible);
    }

    /// Tear the conversation down to its initial state
    ///
    /// Also abandons any in-flight stream; its late effects are discarded.
    pub fn clear(&mut self) {
        self.abandon_current_stream();
        self.generation += 1;
        self.reasoning_buffer.clear();
        self.content_buffer.clear();
        self.dispatch(ChatAction::ClearConversation);
    }

    fn dispatch(&mut self, action: ChatAction) {
        self.conversation = self.conversation.apply(action);
    }

    fn abandon_current_stream(&mut self) {
        if let Some(handle) = self.current_stream.take() {
            handle.abort();
        }
    }
}
