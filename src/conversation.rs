//! Conversation state machine
//!
//! An append-only, reducer-style store of messages. Streaming effects arrive
//! as discrete [`ChatAction`]s, each mutating exactly one target message, in
//! the order they were dispatched. Every update produces a structurally new
//! snapshot: unchanged messages are shared behind their existing `Arc`s, the
//! updated message gets a fresh one, so consumers relying on
//! pointer-identity change detection observe every update.

use std::sync::Arc;

use crate::messages::{Message, Role};

/// Ordered conversation snapshot plus the in-flight indicator
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Arc<Message>>,
    is_typing: bool,
}

/// Actions understood by the reducer
#[derive(Debug, Clone)]
pub enum ChatAction {
    /// Append a message; no validation beyond its unique id
    AppendMessage(Message),
    /// Set the conversation-wide typing flag
    SetTyping(bool),
    /// Replace the content of the most recent assistant message
    UpdateAssistantContent(String),
    /// Replace reasoning and its finalized flag on the most recent
    /// assistant message
    UpdateAssistantReasoning { text: String, finalized: bool },
    /// Flip reasoning visibility on the most recent assistant message
    ToggleReasoningVisible,
    /// Reset to the empty initial state
    ClearConversation,
}

impl Conversation {
    /// The empty initial state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered messages, insertion order = display order
    #[must_use]
    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    /// Whether a reply is in flight
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Reduce one action into a new snapshot
    ///
    /// Actions targeting the most recent assistant message are no-ops when
    /// no assistant message exists.
    #[must_use]
    pub fn apply(&self, action: ChatAction) -> Self {
        match action {
            ChatAction::AppendMessage(msg) => {
                let mut messages = self.messages.clone();
                messages.push(Arc::new(msg));
                Self {
                    messages,
                    is_typing: self.is_typing,
                }
            }
            ChatAction::SetTyping(is_typing) => Self {
                messages: self.messages.clone(),
                is_typing,
            },
            ChatAction::UpdateAssistantContent(text) => {
                self.update_last_assistant(|msg| {
                    if msg.has_reasoning() && !msg.reasoning_finalized {
                        // Answer text must stay hidden until the reasoning
                        // trace is complete; hold it aside instead.
                        msg.buffered_content = text;
                    } else {
                        msg.content = text;
                        msg.is_pending = false;
                        msg.buffered_content.clear();
                    }
                })
            }
            ChatAction::UpdateAssistantReasoning { text, finalized } => {
                self.update_last_assistant(|msg| {
                    msg.reasoning = text;
                    msg.reasoning_finalized = finalized;
                    if finalized && !msg.buffered_content.is_empty() {
                        msg.content = std::mem::take(&mut msg.buffered_content);
                        msg.is_pending = false;
                    }
                })
            }
            ChatAction::ToggleReasoningVisible => self.update_last_assistant(|msg| {
                msg.reasoning_visible = !msg.reasoning_visible;
            }),
            ChatAction::ClearConversation => Self::new(),
        }
    }

    /// Replace the most recent assistant message with an edited copy
    ///
    /// Scans from the end of the sequence; returns the state unchanged when
    /// no assistant message exists.
    fn update_last_assistant(&self, edit: impl FnOnce(&mut Message)) -> Self {
        let Some(index) = self
            .messages
            .iter()
            .rposition(|msg| msg.role == Role::Assistant)
        else {
            return self.clone();
        };

        let mut updated = (*self.messages[index]).clone();
        edit(&mut updated);

        let mut messages = self.messages.clone();
        messages[index] = Arc::new(updated);
        Self {
            messages,
            is_typing: self.is_typing,
        }
    }
}
