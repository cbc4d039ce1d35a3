//! Transition requests emitted by stage screens.
//!
//! Screens never touch the orchestrator's state; they hand one of these to
//! `ViewOrchestrator::apply()` and the orchestrator decides.

use super::stage::{FeedbackResult, InterviewConfiguration};

/// A typed transition request from the active stage's screen.
#[derive(Debug, Clone, PartialEq)]
pub enum StageRequest {
    /// Mode selection: start the resume-based flow
    ChooseResumeMode,
    /// Mode selection: start the role-based flow
    ChooseRoleMode,
    /// Resume or role intake finished and produced a configuration
    ConfigurationReady(InterviewConfiguration),
    /// Setup acknowledged, start answering questions
    BeginSession,
    /// Session runner finished and produced feedback
    SessionComplete(FeedbackResult),
    /// Feedback reviewed, start over
    Restart,
    /// Leave an intake screen without producing a configuration
    Back,
}

impl StageRequest {
    /// Short name for logs and rejection messages. Never includes payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            StageRequest::ChooseResumeMode => "choose-resume-mode",
            StageRequest::ChooseRoleMode => "choose-role-mode",
            StageRequest::ConfigurationReady(_) => "configuration-ready",
            StageRequest::BeginSession => "begin-session",
            StageRequest::SessionComplete(_) => "session-complete",
            StageRequest::Restart => "restart",
            StageRequest::Back => "back",
        }
    }
}
