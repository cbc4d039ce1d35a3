//! Screens shown before a session exists.

use super::theme::Theme;
use super::util::centered_rect;
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw_loading(frame: &mut Frame) {
    let theme = Theme::intake();
    let area = centered_rect(50, 20, frame.area());
    let text = Paragraph::new(Line::from(Span::styled(
        "Checking your session...",
        Style::default().fg(theme.muted),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)));
    frame.render_widget(Clear, area);
    frame.render_widget(text, area);
}

/// The sign-in surface. Authentication itself happens in the browser.
pub fn draw_entry(frame: &mut Frame, auth_url: &str) {
    let theme = Theme::intake();
    let area = centered_rect(70, 60, frame.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "LLM-Powered Cognitive Interview Assistant",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Practice interviews with AI-generated questions and live feedback",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Continue with Google",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            auth_url.to_string(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Sign in with the link above, then restart with --session-cookie",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(theme.warning)),
            Span::raw(" Quit"),
        ]),
    ];

    let entry = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Sign in "),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(entry, area);
}
