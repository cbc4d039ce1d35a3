use crate::orchestrator::WorkflowStage;
use crossterm::{execute, terminal::SetTitle};
use std::io::{self, IsTerminal, Write};

const APP_TITLE: &str = "Interview Coach";

/// Window title for the active stage, or the bare app name before sign-in.
pub fn title_for(stage: Option<WorkflowStage>) -> String {
    match stage {
        Some(stage) => format!("{} - {}", APP_TITLE, stage.title()),
        None => APP_TITLE.to_string(),
    }
}

/// Sets the terminal window title, saving and restoring the user's own.
pub struct TerminalTitleManager {
    is_supported: bool,
    current: Option<String>,
}

impl TerminalTitleManager {
    pub fn new() -> Self {
        let is_supported = std::io::stdout().is_terminal()
            && std::env::var("CI").is_err()
            && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true);

        Self {
            is_supported,
            current: None,
        }
    }

    pub fn save_title(&self) {
        if self.is_supported {
            let _ = io::stdout().write_all(b"\x1b[22;0t");
            let _ = io::stdout().flush();
        }
    }

    pub fn restore_title(&self) {
        if self.is_supported {
            let _ = io::stdout().write_all(b"\x1b[23;0t");
            let _ = io::stdout().flush();
        }
    }

    /// Writes the title only when it differs from the last one set.
    pub fn set_title(&mut self, title: String) {
        if !self.is_supported || self.current.as_deref() == Some(title.as_str()) {
            return;
        }
        let _ = execute!(io::stdout(), SetTitle(&title));
        self.current = Some(title);
    }
}

impl Default for TerminalTitleManager {
    fn default() -> Self {
        Self::new()
    }
}
