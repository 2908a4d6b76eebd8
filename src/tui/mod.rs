//! TUI module for rillchat
//!
//! Provides a terminal user interface using ratatui + crossterm.

mod app;
mod event;
mod terminal;
mod ui;

pub use self::app::App;
pub use self::terminal::{restore_terminal, setup_terminal};

use std::sync::Arc;
use std::time::Duration;

use crate::{error::Result, services::ChatBackend, session::ChatSession};

/// Run the TUI application
pub async fn run(backend: Arc<dyn ChatBackend>, idle_timeout: Duration) -> Result<()> {
    // Set up terminal
    let mut terminal = setup_terminal()?;

    // Create app state
    let mut app = App::new(ChatSession::new(backend, idle_timeout));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    restore_terminal(terminal)?;

    result
}

async fn run_app(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut events = event::TerminalEvents::new();

    loop {
        // Render UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Wait for next event
        tokio::select! {
            // Terminal events (keyboard, resize)
            Some(event) = events.next() => {
                app.handle_terminal_event(event);
            }

            // Stream effects from the in-flight reply
            Some(event) = app.next_session_event() => {
                app.handle_session_event(event);
            }
        }

        // Check for quit
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
