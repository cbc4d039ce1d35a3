//! Mode selection and the two intake screens that produce an interview
//! configuration.

use super::{ApiCall, ScreenAction, TextInput};
use crate::api::{ApiError, Difficulty, InterviewMode, QuestionRequest, ResumeAnalysis};
use crate::orchestrator::{InterviewConfiguration, StageRequest};
use crate::tui::event::ApiOutcome;
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use std::path::PathBuf;

/// `(title, hint)` for each interview mode, in menu order.
pub const MODE_OPTIONS: [(&str, &str); 2] = [
    (
        "Resume-Based Interview",
        "Upload your resume for personalized questions",
    ),
    (
        "Role-Based Interview",
        "Select a specific job role for targeted questions",
    ),
];

#[derive(Debug, Default)]
pub struct ModeSelectionScreen {
    pub selected: usize,
}

impl ModeSelectionScreen {
    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(MODE_OPTIONS.len() - 1);
                ScreenAction::None
            }
            KeyCode::Char('1') => ScreenAction::Request(StageRequest::ChooseResumeMode),
            KeyCode::Char('2') => ScreenAction::Request(StageRequest::ChooseRoleMode),
            KeyCode::Enter if self.selected == 0 => {
                ScreenAction::Request(StageRequest::ChooseResumeMode)
            }
            KeyCode::Enter => ScreenAction::Request(StageRequest::ChooseRoleMode),
            _ => ScreenAction::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntakePhase {
    #[default]
    Editing,
    Uploading,
    Generating,
}

#[derive(Debug, Default)]
pub struct ResumeUploadScreen {
    pub path: TextInput,
    pub difficulty: Difficulty,
    pub phase: IntakePhase,
    pub analysis: Option<ResumeAnalysis>,
    pub error: Option<String>,
}

impl ResumeUploadScreen {
    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Esc {
            return ScreenAction::Request(StageRequest::Back);
        }
        if self.phase != IntakePhase::Editing {
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Tab => {
                self.difficulty = self.difficulty.next();
                ScreenAction::None
            }
            KeyCode::Enter => self.submit(),
            _ => {
                if self.path.handle_key(key) {
                    // A different file needs a fresh analysis
                    self.analysis = None;
                    self.error = None;
                }
                ScreenAction::None
            }
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        if self.phase == IntakePhase::Editing {
            self.path.paste(text);
            self.analysis = None;
        }
    }

    fn submit(&mut self) -> ScreenAction {
        if let Some(analysis) = &self.analysis {
            self.phase = IntakePhase::Generating;
            self.error = None;
            return ScreenAction::Call(ApiCall::GenerateQuestions(QuestionRequest {
                mode: InterviewMode::Resume,
                difficulty: self.difficulty,
                role: String::new(),
                keywords: analysis.keywords.clone(),
            }));
        }

        let path = self.path.value().trim();
        if path.is_empty() {
            self.error = Some("Enter the path to your resume (PDF)".to_string());
            return ScreenAction::None;
        }
        self.phase = IntakePhase::Uploading;
        self.error = None;
        ScreenAction::Call(ApiCall::UploadResume(expand_home(path)))
    }

    pub fn on_api(&mut self, outcome: ApiOutcome) -> ScreenAction {
        match outcome {
            ApiOutcome::ResumeAnalyzed(result) => {
                self.phase = IntakePhase::Editing;
                match result {
                    Ok(analysis) => self.analysis = Some(analysis),
                    Err(e) => self.error = Some(e.to_string()),
                }
                ScreenAction::None
            }
            ApiOutcome::QuestionsGenerated { request, result } => {
                self.phase = IntakePhase::Editing;
                configuration_ready(request, result, &mut self.error)
            }
            _ => ScreenAction::None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RoleSelectionScreen {
    pub role: TextInput,
    pub difficulty: Difficulty,
    pub generating: bool,
    pub error: Option<String>,
}

impl RoleSelectionScreen {
    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Esc {
            return ScreenAction::Request(StageRequest::Back);
        }
        if self.generating {
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Tab => self.difficulty = self.difficulty.next(),
            KeyCode::Enter => {
                let role = self.role.value().trim();
                if role.is_empty() {
                    self.error = Some("Enter a job role".to_string());
                    return ScreenAction::None;
                }
                self.generating = true;
                self.error = None;
                return ScreenAction::Call(ApiCall::GenerateQuestions(QuestionRequest {
                    mode: InterviewMode::Role,
                    difficulty: self.difficulty,
                    role: role.to_string(),
                    keywords: Vec::new(),
                }));
            }
            _ => {
                self.role.handle_key(key);
            }
        }
        ScreenAction::None
    }

    pub fn on_paste(&mut self, text: &str) {
        if !self.generating {
            self.role.paste(text);
        }
    }

    pub fn on_api(&mut self, outcome: ApiOutcome) -> ScreenAction {
        match outcome {
            ApiOutcome::QuestionsGenerated { request, result } => {
                self.generating = false;
                configuration_ready(request, result, &mut self.error)
            }
            _ => ScreenAction::None,
        }
    }
}

/// Turns a question-generation reply into the orchestrator request, or an
/// inline error on the screen.
fn configuration_ready(
    request: QuestionRequest,
    result: Result<Value, ApiError>,
    error: &mut Option<String>,
) -> ScreenAction {
    let generated = match result {
        Ok(generated) => generated,
        Err(e) => {
            *error = Some(e.to_string());
            return ScreenAction::None;
        }
    };

    let configuration: InterviewConfiguration = request.into_configuration(generated);
    if configuration.as_json().get("session_id").and_then(Value::as_i64).is_none() {
        *error = Some(ApiError::decode("no session id in generated questions").to_string());
        return ScreenAction::None;
    }
    ScreenAction::Request(StageRequest::ConfigurationReady(configuration))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
