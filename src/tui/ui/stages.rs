//! One renderer per stage screen.

use super::theme::Theme;
use super::util::{bullet_lines, heading};
use crate::api::Difficulty;
use crate::tui::screens::{
    FeedbackScreen, IntakePhase, ModeSelectionScreen, ResumeUploadScreen, RoleSelectionScreen,
    Screen, SessionPhase, SessionScreen, SetupScreen, TextInput, MODE_OPTIONS,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_screen(frame: &mut Frame, screen: &Screen, theme: &Theme, area: Rect) {
    let lines = match screen {
        Screen::ModeSelection(s) => mode_selection(s, theme),
        Screen::ResumeUpload(s) => resume_upload(s, theme),
        Screen::RoleSelection(s) => role_selection(s, theme),
        Screen::InterviewSetup(s) => setup(s, theme),
        Screen::InterviewSession(s) => session(s, theme),
        Screen::Feedback(s) => feedback(s, theme),
        Screen::Unavailable => vec![
            Line::from(""),
            Line::from(Span::styled(
                "This step is not available right now.",
                Style::default().fg(theme.muted),
            )),
        ],
    };

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused)),
    );
    frame.render_widget(panel, area);
}

/// Footer hints for the active screen.
pub fn hints(screen: &Screen) -> Vec<(&'static str, &'static str)> {
    match screen {
        Screen::ModeSelection(_) => vec![("↑/↓", "Select"), ("Enter", "Choose")],
        Screen::ResumeUpload(s) if s.analysis.is_some() => vec![
            ("Enter", "Generate questions"),
            ("Tab", "Difficulty"),
            ("Esc", "Back"),
        ],
        Screen::ResumeUpload(_) => vec![("Enter", "Upload"), ("Tab", "Difficulty"), ("Esc", "Back")],
        Screen::RoleSelection(_) => vec![
            ("Enter", "Generate questions"),
            ("Tab", "Difficulty"),
            ("Esc", "Back"),
        ],
        Screen::InterviewSetup(_) => vec![("Enter", "Start interview")],
        Screen::InterviewSession(_) => vec![("Enter", "Submit answer"), ("Ctrl+E", "Finish")],
        Screen::Feedback(_) => vec![("r", "New interview")],
        Screen::Unavailable => Vec::new(),
    }
}

fn mode_selection(screen: &ModeSelectionScreen, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        heading("How would you like to practice?", theme.text),
        Line::from(""),
    ];
    for (i, (title, hint)) in MODE_OPTIONS.iter().enumerate() {
        let selected = i == screen.selected;
        let marker = if selected { "▶ " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{}. {}", marker, i + 1, title), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", hint),
            Style::default().fg(theme.muted),
        )));
        lines.push(Line::from(""));
    }
    lines
}

fn resume_upload(screen: &ResumeUploadScreen, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        input_line("Resume (PDF)", &screen.path, screen.phase == IntakePhase::Editing, theme),
        difficulty_line(screen.difficulty, theme),
        Line::from(""),
    ];

    match screen.phase {
        IntakePhase::Uploading => lines.push(busy_line("Analyzing resume...", theme)),
        IntakePhase::Generating => lines.push(busy_line("Generating questions...", theme)),
        IntakePhase::Editing => {}
    }

    if let Some(analysis) = &screen.analysis {
        lines.push(heading(&format!("Analyzed {}", analysis.filename), theme.success));
        if analysis.keywords.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No keywords found",
                Style::default().fg(theme.muted),
            )));
        } else {
            lines.push(Line::from(format!("  Keywords: {}", analysis.keywords.join(", "))));
        }
    }

    push_error(&mut lines, screen.error.as_deref(), theme);
    lines
}

fn role_selection(screen: &RoleSelectionScreen, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        input_line("Job role", &screen.role, !screen.generating, theme),
        difficulty_line(screen.difficulty, theme),
        Line::from(""),
    ];
    if screen.generating {
        lines.push(busy_line("Generating questions...", theme));
    }
    push_error(&mut lines, screen.error.as_deref(), theme);
    lines
}

fn setup(screen: &SetupScreen, theme: &Theme) -> Vec<Line<'static>> {
    let plan = &screen.plan;
    let role = if plan.role.is_empty() {
        "Resume-based"
    } else {
        plan.role.as_str()
    };

    let mut lines = vec![
        Line::from(""),
        heading("Your interview is ready", theme.accent),
        Line::from(""),
        Line::from(format!("  Role: {}", role)),
        Line::from(format!("  Difficulty: {}", plan.difficulty)),
        Line::from(format!("  Questions: {}", plan.questions.len())),
        Line::from(""),
    ];

    let mut last_category = "";
    for question in &plan.questions {
        if question.category != last_category {
            lines.push(Line::from(Span::styled(
                format!("  {}", question.category),
                Style::default().fg(theme.muted),
            )));
            last_category = &question.category;
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter when you are ready to begin.",
        Style::default().fg(theme.text),
    )));
    lines
}

fn session(screen: &SessionScreen, theme: &Theme) -> Vec<Line<'static>> {
    let total = screen.plan.questions.len();
    let mut lines = vec![Line::from("")];

    match screen.current_question() {
        Some(question) => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("Question {} of {}", screen.current + 1, total),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", question.category),
                    Style::default().fg(theme.muted),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(question.text.clone()));
            lines.push(Line::from(""));
            lines.push(input_line(
                "Answer",
                &screen.answer,
                screen.phase == SessionPhase::Answering,
                theme,
            ));
        }
        None => lines.push(heading("All questions answered", theme.success)),
    }

    lines.push(Line::from(""));
    match screen.phase {
        SessionPhase::Submitting => lines.push(busy_line("Submitting answer...", theme)),
        SessionPhase::Completing => lines.push(busy_line("Scoring your interview...", theme)),
        SessionPhase::Answering => {}
    }
    push_error(&mut lines, screen.error.as_deref(), theme);
    lines
}

fn feedback(screen: &FeedbackScreen, theme: &Theme) -> Vec<Line<'static>> {
    let report = &screen.report;
    let mut lines = vec![Line::from("")];

    let overall = report
        .overall_score
        .map(|score| format!("{:.1} / 10", score))
        .unwrap_or_else(|| "not scored".to_string());
    lines.push(Line::from(vec![
        Span::styled(
            "Overall score: ",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(overall, Style::default().fg(theme.accent)),
    ]));
    lines.push(Line::from(""));

    let scores = report.scores();
    if !scores.is_empty() {
        lines.push(heading("Category scores", theme.text));
        for (label, score) in scores {
            lines.push(Line::from(format!("  {}: {:.1}", label, score)));
        }
        lines.push(Line::from(""));
    }

    if !report.strengths.is_empty() {
        lines.push(heading("Strengths", theme.success));
        lines.extend(bullet_lines(&report.strengths, theme.success));
        lines.push(Line::from(""));
    }
    if !report.improvements.is_empty() {
        lines.push(heading("Areas to improve", theme.warning));
        lines.extend(bullet_lines(&report.improvements, theme.warning));
        lines.push(Line::from(""));
    }
    if !report.detailed_feedback.is_empty() {
        lines.push(heading("Detailed feedback", theme.text));
        lines.extend(report.detailed_feedback.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}

fn input_line(label: &str, input: &TextInput, active: bool, theme: &Theme) -> Line<'static> {
    let cursor = if active { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(theme.muted)),
        Span::styled(
            format!("{}{}", input.value(), cursor),
            Style::default().fg(theme.text),
        ),
    ])
}

fn difficulty_line(difficulty: Difficulty, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("Difficulty: ", Style::default().fg(theme.muted)),
        Span::styled(
            difficulty.label(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn busy_line(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(theme.warning)))
}

fn push_error(lines: &mut Vec<Line<'static>>, error: Option<&str>, theme: &Theme) {
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }
}
