//! Terminal setup and the interactive event loop.

use crate::config::ClientConfig;
use crate::structured_logger::StructuredLogger;
use crate::tui::{title_for, ui, App, Backends, EventHandler, TerminalTitleManager};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// How long exit waits for an in-flight logout request.
const LOGOUT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

type CrosstermTerminal = ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

pub async fn run_tui(
    config: ClientConfig,
    backends: Backends,
    logger: Arc<StructuredLogger>,
) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste
    )?;

    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableBracketedPaste,
            crossterm::cursor::Show
        );
        original_hook(panic_info);
    }));

    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut title_manager = TerminalTitleManager::new();
    title_manager.save_title();

    let mut events = EventHandler::new(config.tick_rate());
    let mut app = App::new(config.monitor.clone(), backends, logger, events.sender());
    app.start();

    let result = event_loop(&mut terminal, &mut events, &mut app, &mut title_manager).await;

    title_manager.restore_title();
    restore_terminal(&mut terminal)?;

    if let Some(pending) = app.take_pending_logout() {
        match tokio::time::timeout(LOGOUT_FLUSH_TIMEOUT, pending.outcome()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("[interview] Warning: logout request failed: {}", e),
            Err(_) => eprintln!("[interview] Warning: logout request still pending at exit"),
        }
    }

    result
}

async fn event_loop(
    terminal: &mut CrosstermTerminal,
    events: &mut EventHandler,
    app: &mut App,
    title_manager: &mut TerminalTitleManager,
) -> Result<()> {
    terminal.draw(|frame| ui::draw(frame, app))?;

    while !app.should_quit {
        let event = events.next().await?;
        if app.handle_event(event) {
            let stage = app.workspace().map(|workspace| workspace.snapshot().stage);
            title_manager.set_title(title_for(stage));
            terminal.draw(|frame| ui::draw(frame, app))?;
        }
    }
    Ok(())
}

pub fn restore_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
