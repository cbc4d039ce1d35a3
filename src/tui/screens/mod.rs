//! Stage screens. Each one owns its local input state, asks the backend for
//! work through [`ApiCall`], and hands the orchestrator typed
//! [`StageRequest`]s. None of them touch the orchestrator directly.

mod intake;
mod interview;

pub use intake::{
    IntakePhase, ModeSelectionScreen, ResumeUploadScreen, RoleSelectionScreen, MODE_OPTIONS,
};
pub use interview::{FeedbackScreen, SessionPhase, SessionScreen, SetupScreen};

use crate::api::{FeedbackReport, InterviewPlan, QuestionRequest};
use crate::orchestrator::{OrchestratorState, StageRequest, WorkflowStage};
use crate::tui::event::ApiOutcome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Backend work a screen wants done.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    UploadResume(PathBuf),
    GenerateQuestions(QuestionRequest),
    SubmitAnswer {
        session_id: i64,
        index: usize,
        answer: String,
    },
    CompleteInterview {
        session_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    None,
    Request(StageRequest),
    Call(ApiCall),
}

pub enum Screen {
    ModeSelection(ModeSelectionScreen),
    ResumeUpload(ResumeUploadScreen),
    RoleSelection(RoleSelectionScreen),
    InterviewSetup(SetupScreen),
    InterviewSession(SessionScreen),
    Feedback(FeedbackScreen),
    /// Neutral fallback when the stage's payload is missing.
    Unavailable,
}

impl Screen {
    /// Builds the screen for the active stage. Fails when the stage needs a
    /// payload the state does not carry.
    pub fn for_state(state: &OrchestratorState) -> Result<Screen, &'static str> {
        let screen = match state.stage {
            WorkflowStage::ModeSelection => Screen::ModeSelection(ModeSelectionScreen::default()),
            WorkflowStage::ResumeUpload => Screen::ResumeUpload(ResumeUploadScreen::default()),
            WorkflowStage::RoleSelection => Screen::RoleSelection(RoleSelectionScreen::default()),
            WorkflowStage::InterviewSetup => {
                Screen::InterviewSetup(SetupScreen::new(plan_for(state)?))
            }
            WorkflowStage::InterviewSession => {
                Screen::InterviewSession(SessionScreen::new(plan_for(state)?))
            }
            WorkflowStage::Feedback => {
                let feedback = state.feedback.as_ref().ok_or("no feedback result")?;
                Screen::Feedback(FeedbackScreen::new(FeedbackReport::from_result(feedback)))
            }
        };
        Ok(screen)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        match self {
            Screen::ModeSelection(s) => s.on_key(key),
            Screen::ResumeUpload(s) => s.on_key(key),
            Screen::RoleSelection(s) => s.on_key(key),
            Screen::InterviewSetup(s) => s.on_key(key),
            Screen::InterviewSession(s) => s.on_key(key),
            Screen::Feedback(s) => s.on_key(key),
            Screen::Unavailable => ScreenAction::None,
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        match self {
            Screen::ResumeUpload(s) => s.on_paste(text),
            Screen::RoleSelection(s) => s.on_paste(text),
            Screen::InterviewSession(s) => s.on_paste(text),
            _ => {}
        }
    }

    pub fn on_api(&mut self, outcome: ApiOutcome) -> ScreenAction {
        match self {
            Screen::ResumeUpload(s) => s.on_api(outcome),
            Screen::RoleSelection(s) => s.on_api(outcome),
            Screen::InterviewSession(s) => s.on_api(outcome),
            _ => {
                tracing::warn!("dropping backend reply with no screen to receive it");
                ScreenAction::None
            }
        }
    }
}

fn plan_for(state: &OrchestratorState) -> Result<InterviewPlan, &'static str> {
    let configuration = state
        .configuration
        .as_ref()
        .ok_or("no interview configuration")?;
    InterviewPlan::from_configuration(configuration).ok_or("configuration has no session id")
}

/// Single-line text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Returns true if the key edited the text.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }

    /// Pastes are flattened to one line.
    pub fn paste(&mut self, text: &str) {
        let flat = text.replace(['\r', '\n'], " ");
        self.value.push_str(flat.trim_end());
    }
}

#[cfg(test)]
mod tests;
