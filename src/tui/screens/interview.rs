//! Setup, live session and feedback screens.

use super::{ApiCall, ScreenAction, TextInput};
use crate::api::{FeedbackReport, InterviewPlan, PlannedQuestion};
use crate::orchestrator::{FeedbackResult, StageRequest};
use crate::tui::event::ApiOutcome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug)]
pub struct SetupScreen {
    pub plan: InterviewPlan,
}

impl SetupScreen {
    pub fn new(plan: InterviewPlan) -> Self {
        Self { plan }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter => ScreenAction::Request(StageRequest::BeginSession),
            _ => ScreenAction::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Answering,
    Submitting,
    Completing,
}

#[derive(Debug)]
pub struct SessionScreen {
    pub plan: InterviewPlan,
    pub current: usize,
    pub answer: TextInput,
    pub phase: SessionPhase,
    pub error: Option<String>,
}

impl SessionScreen {
    pub fn new(plan: InterviewPlan) -> Self {
        Self {
            plan,
            current: 0,
            answer: TextInput::default(),
            phase: SessionPhase::Answering,
            error: None,
        }
    }

    pub fn current_question(&self) -> Option<&PlannedQuestion> {
        self.plan.questions.get(self.current)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        if self.phase != SessionPhase::Answering {
            return ScreenAction::None;
        }

        if key.code == KeyCode::Char('e') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.complete();
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            _ => {
                if self.answer.handle_key(key) {
                    self.error = None;
                }
                ScreenAction::None
            }
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        if self.phase == SessionPhase::Answering {
            self.answer.paste(text);
        }
    }

    fn submit(&mut self) -> ScreenAction {
        if self.current_question().is_none() {
            return self.complete();
        }
        let answer = self.answer.value().trim();
        if answer.is_empty() {
            self.error = Some("Type an answer before submitting".to_string());
            return ScreenAction::None;
        }

        self.phase = SessionPhase::Submitting;
        self.error = None;
        ScreenAction::Call(ApiCall::SubmitAnswer {
            session_id: self.plan.session_id,
            index: self.current,
            answer: answer.to_string(),
        })
    }

    fn complete(&mut self) -> ScreenAction {
        self.phase = SessionPhase::Completing;
        self.error = None;
        ScreenAction::Call(ApiCall::CompleteInterview {
            session_id: self.plan.session_id,
        })
    }

    pub fn on_api(&mut self, outcome: ApiOutcome) -> ScreenAction {
        match outcome {
            ApiOutcome::AnswerSubmitted { index, result } => {
                self.phase = SessionPhase::Answering;
                match result {
                    Ok(()) if index == self.current => {
                        self.current += 1;
                        self.answer.clear();
                        if self.current >= self.plan.questions.len() {
                            return self.complete();
                        }
                    }
                    Ok(()) => {}
                    Err(e) => self.error = Some(e.to_string()),
                }
                ScreenAction::None
            }
            ApiOutcome::InterviewCompleted(result) => match result {
                Ok(feedback) => {
                    ScreenAction::Request(StageRequest::SessionComplete(FeedbackResult::new(feedback)))
                }
                Err(e) => {
                    self.phase = SessionPhase::Answering;
                    self.error = Some(e.to_string());
                    ScreenAction::None
                }
            },
            _ => ScreenAction::None,
        }
    }
}

#[derive(Debug)]
pub struct FeedbackScreen {
    pub report: FeedbackReport,
}

impl FeedbackScreen {
    pub fn new(report: FeedbackReport) -> Self {
        Self { report }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => ScreenAction::Request(StageRequest::Restart),
            _ => ScreenAction::None,
        }
    }
}
