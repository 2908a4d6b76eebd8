//! Application state for the TUI
//!
//! Thin shell over [`ChatSession`]: owns the input buffer and scroll
//! position, translates key presses into session calls, and feeds stream
//! effects back into the session.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::conversation::Conversation;
use crate::session::{ChatSession, SessionEvent};

/// Main application state
pub struct App {
    session: ChatSession,

    /// Current input buffer
    input_buffer: String,

    /// Scroll offset for the message view
    scroll_offset: usize,

    /// Should quit flag
    should_quit: bool,
}

impl App {
    /// Create a new app around a session
    #[must_use]
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            input_buffer: String::new(),
            scroll_offset: 0,
            should_quit: false,
        }
    }

    /// Check if should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current conversation snapshot
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        self.session.conversation()
    }

    /// Get input buffer
    #[must_use]
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Get scroll offset
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Await the next stream effect
    pub async fn next_session_event(&mut self) -> Option<SessionEvent> {
        self.session.next_event().await
    }

    /// Apply a stream effect to the conversation
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        self.session.apply_event(event);
    }

    /// Handle terminal event
    pub fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key_event) = event {
            self.handle_key_event(key_event);
        }
    }

    /// Handle key event
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                // Toggle the reasoning trace on the latest reply
                KeyCode::Char('r') => self.session.toggle_reasoning_visible(),
                // Clear the conversation
                KeyCode::Char('l') => {
                    self.session.clear();
                    self.scroll_offset = 0;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => {
                self.submit_prompt();
            }
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                self.scroll_offset += 1;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Submit the current prompt
    fn submit_prompt(&mut self) {
        if self.input_buffer.trim().is_empty() {
            return;
        }

        let text = std::mem::take(&mut self.input_buffer);
        self.session.submit(&text);
    }
}
