//! Message types for chat conversations
//!
//! Defines the message data model shared by the conversation state machine,
//! the streaming session, and the TUI renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation
///
/// The assistant reply for a turn is created as a pending placeholder and
/// filled in by the streaming pipeline. `content` is only populated once
/// `reasoning_finalized` is true (or the message never carried reasoning);
/// until then any answer text that has already arrived sits in
/// `buffered_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// True while this message is the in-flight assistant reply
    pub is_pending: bool,
    /// Intermediate reasoning trace emitted before the answer
    pub reasoning: String,
    /// All reasoning for this turn has been received
    pub reasoning_finalized: bool,
    /// Whether the renderer should show the reasoning trace
    pub reasoning_visible: bool,
    /// Answer text held back until reasoning is finalized
    pub buffered_content: String,
}

impl Message {
    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            is_pending: false,
            reasoning: String::new(),
            reasoning_finalized: false,
            reasoning_visible: false,
            buffered_content: String::new(),
        }
    }

    /// Create the pending assistant placeholder for a new turn
    #[must_use]
    pub fn pending_assistant() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: Utc::now(),
            is_pending: true,
            reasoning: String::new(),
            reasoning_finalized: false,
            reasoning_visible: false,
            buffered_content: String::new(),
        }
    }

    /// True if this message ever carried a reasoning trace
    #[must_use]
    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }
}
