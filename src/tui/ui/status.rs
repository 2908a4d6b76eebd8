//! Status bar rendering

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Typing indicator
    if app.conversation().is_typing() {
        spans.push(Span::styled(" ● ", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::raw("   "));
    }

    let help = [
        ("Enter", " send  "),
        ("Ctrl+R", " reasoning  "),
        ("Ctrl+L", " clear  "),
        ("Esc", " quit"),
    ];
    for (key, action) in help {
        spans.push(Span::styled(key, Style::default().fg(Color::White)));
        spans.push(Span::styled(action, Style::default().fg(Color::DarkGray)));
    }

    if app.conversation().is_typing() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "replying…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans));
    f.render_widget(status, area);
}
