//! Terminal setup and cleanup
//!
//! Handles raw mode and the alternate screen for the TUI.

use crate::error::{Result, RillError};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Terminal type alias for convenience
pub type RillTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Set up the terminal for TUI mode
///
/// Enables raw mode and enters the alternate screen.
///
/// # Errors
/// Returns an error if terminal setup fails
pub fn setup_terminal() -> Result<RillTerminal> {
    enable_raw_mode().map_err(|e| RillError::Other(format!("Failed to enable raw mode: {e}")))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| RillError::Other(format!("Failed to enter alternate screen: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)
        .map_err(|e| RillError::Other(format!("Failed to create terminal: {e}")))?;

    Ok(terminal)
}

/// Restore the terminal to its original state
///
/// Disables raw mode, leaves the alternate screen, and shows the cursor.
///
/// # Errors
/// Returns an error if terminal restoration fails
pub fn restore_terminal(mut terminal: RillTerminal) -> Result<()> {
    disable_raw_mode().map_err(|e| RillError::Other(format!("Failed to disable raw mode: {e}")))?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| RillError::Other(format!("Failed to leave alternate screen: {e}")))?;

    terminal
        .show_cursor()
        .map_err(|e| RillError::Other(format!("Failed to show cursor: {e}")))?;

    Ok(())
}
