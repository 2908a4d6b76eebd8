//! Event handling for the TUI
//!
//! Provides an async stream of terminal events (keyboard, resize).

use crossterm::event::{self, Event};
use tokio::sync::mpsc;

/// Stream of terminal events
pub struct TerminalEvents {
    rx: mpsc::UnboundedReceiver<Event>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TerminalEvents {
    /// Create a new event stream
    ///
    /// Spawns a blocking reader task that forwards terminal events through
    /// a channel.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        // Receiver dropped, exit
                        break;
                    }
                }
                Err(_) => {
                    // Error reading event, exit
                    break;
                }
            }
        });

        Self {
            rx,
            _handle: handle,
        }
    }

    /// Get the next event from the stream
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for TerminalEvents {
    fn default() -> Self {
        Self::new()
    }
}
