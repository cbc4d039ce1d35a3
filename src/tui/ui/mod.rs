mod gate;
mod monitor;
mod stages;
pub mod theme;
pub mod util;

use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use theme::Theme;

/// Width of the monitor column beside the stage screen.
const MONITOR_WIDTH: u16 = 34;

const BUILD_SHA: &str = env!("INTERVIEW_COACH_GIT_SHA");

pub fn draw(frame: &mut Frame, app: &App) {
    let gate = app.gate();
    if gate.is_loading() {
        gate::draw_loading(frame);
        return;
    }
    let (Some(identity), Some(workspace)) = (gate.identity(), app.workspace()) else {
        gate::draw_entry(frame, app.auth_url());
        return;
    };

    let snapshot = workspace.snapshot();
    let theme = Theme::for_stage(snapshot.stage);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, &identity.username, snapshot.stage.title(), &theme, chunks[0]);

    let body = match workspace.monitor() {
        Some(live) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(MONITOR_WIDTH)])
                .split(chunks[1]);
            monitor::draw_monitor(frame, live, &theme, columns[1]);
            columns[0]
        }
        None => chunks[1],
    };

    stages::draw_screen(frame, workspace.screen(), &theme, body);

    let mut hints = stages::hints(workspace.screen());
    hints.extend([("Ctrl+L", "Logout"), ("Ctrl+Q", "Quit")]);
    frame.render_widget(Paragraph::new(util::key_hints(&hints)), chunks[2]);
}

fn draw_header(frame: &mut Frame, username: &str, title: &str, theme: &Theme, area: Rect) {
    let welcome = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("Welcome, {}!", username),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(welcome).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.muted))
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center)
            .title_style(Style::default().fg(theme.text).bg(theme.header_bg))
            .title_top(
                Line::from(Span::styled(
                    format!(" build {} ", BUILD_SHA),
                    Style::default().fg(theme.muted),
                ))
                .right_aligned(),
            ),
    );
    frame.render_widget(header, area);
}
