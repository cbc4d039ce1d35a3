//! The live monitor panel.

use super::theme::Theme;
use super::util::format_bytes;
use crate::monitor::{LiveMonitor, MonitorView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_monitor(frame: &mut Frame, monitor: &LiveMonitor, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Live Monitor ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let state = monitor.state();
    let lines = match monitor.view() {
        MonitorView::Placeholder => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Initializing camera...",
                Style::default().fg(theme.muted),
            )),
        ],
        MonitorView::Live if state.frames == 0 => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for video...",
                Style::default().fg(theme.muted),
            )),
        ],
        MonitorView::Live => vec![
            Line::from(""),
            Line::from(Span::styled(
                "● LIVE",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} frames", state.frames)),
            Line::from(Span::styled(
                format!("last frame {}", format_bytes(state.last_frame_bytes)),
                Style::default().fg(theme.muted),
            )),
        ],
        MonitorView::Error => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Camera not available",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Please check camera permissions",
                Style::default().fg(theme.muted),
            )),
        ],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let footer_color = match monitor.view() {
        MonitorView::Error => theme.error,
        _ => theme.accent,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(state.footer(), Style::default().fg(footer_color)))
            .alignment(Alignment::Center),
        chunks[1],
    );
}
