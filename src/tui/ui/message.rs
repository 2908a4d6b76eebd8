//! Message rendering
//!
//! Message fields are the source of truth for visibility: `content` only
//! carries revealable text, the reasoning trace is shown when
//! `reasoning_visible` is set, and a pending reply without text renders as
//! the typing indicator.

use crate::{
    messages::{Message, Role},
    tui::app::App,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render messages area
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    for msg in app.conversation().messages() {
        match msg.role {
            Role::User => render_user(&mut lines, msg),
            Role::Assistant => render_assistant(&mut lines, msg),
        }
        lines.push(Line::from("")); // Empty line for spacing
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chat "))
        .scroll((app.scroll_offset() as u16, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn render_user(lines: &mut Vec<Line<'_>>, msg: &Message) {
    lines.push(Line::from(vec![
        Span::styled(
            "You: ",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(msg.content.clone()),
    ]));
}

fn render_assistant(lines: &mut Vec<Line<'_>>, msg: &Message) {
    lines.push(Line::from(Span::styled(
        "Assistant:",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));

    if msg.has_reasoning() {
        if msg.reasoning_visible {
            let label = if msg.reasoning_finalized {
                "[reasoning] "
            } else {
                "[reasoning…] "
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )));
            for line in msg.reasoning.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "[reasoning hidden, Ctrl+R to show]",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if msg.content.is_empty() {
        if msg.is_pending {
            lines.push(Line::from(Span::styled(
                "…",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    } else {
        for line in msg.content.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
}
