//! Backend handles the TUI needs, split by concern so tests can swap any of
//! them for fakes.

use crate::api::{ApiClient, ApiError, QuestionRequest, ResumeAnalysis};
use crate::gatekeeper::SessionApi;
use crate::monitor::StreamSource;
use crate::tui::event::ApiOutcome;
use crate::tui::screens::ApiCall;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// The calls stage screens make. All of them block.
pub trait StageApi: Send + Sync {
    fn upload_resume(&self, path: &Path) -> Result<ResumeAnalysis, ApiError>;
    fn generate_questions(&self, request: &QuestionRequest) -> Result<Value, ApiError>;
    fn submit_answer(&self, session_id: i64, index: usize, answer: &str) -> Result<(), ApiError>;
    fn complete_interview(&self, session_id: i64) -> Result<Value, ApiError>;
}

impl StageApi for ApiClient {
    fn upload_resume(&self, path: &Path) -> Result<ResumeAnalysis, ApiError> {
        ApiClient::upload_resume(self, path)
    }

    fn generate_questions(&self, request: &QuestionRequest) -> Result<Value, ApiError> {
        ApiClient::generate_questions(self, request)
    }

    fn submit_answer(&self, session_id: i64, index: usize, answer: &str) -> Result<(), ApiError> {
        ApiClient::submit_answer(self, session_id, index, answer)
    }

    fn complete_interview(&self, session_id: i64) -> Result<Value, ApiError> {
        ApiClient::complete_interview(self, session_id)
    }
}

#[derive(Clone)]
pub struct Backends {
    pub session: Arc<dyn SessionApi>,
    pub stream: Arc<dyn StreamSource>,
    pub stage: Arc<dyn StageApi>,
    /// Where the entry screen sends the user to sign in.
    pub auth_url: String,
}

impl Backends {
    pub fn from_client(client: Arc<ApiClient>) -> Self {
        Self {
            auth_url: client.auth_url(),
            session: client.clone(),
            stream: client.clone(),
            stage: client,
        }
    }
}

/// Runs one screen call to completion. Blocking.
pub fn run_call(api: &dyn StageApi, call: ApiCall) -> ApiOutcome {
    match call {
        ApiCall::UploadResume(path) => ApiOutcome::ResumeAnalyzed(api.upload_resume(&path)),
        ApiCall::GenerateQuestions(request) => {
            let result = api.generate_questions(&request);
            ApiOutcome::QuestionsGenerated { request, result }
        }
        ApiCall::SubmitAnswer {
            session_id,
            index,
            answer,
        } => ApiOutcome::AnswerSubmitted {
            index,
            result: api.submit_answer(session_id, index, &answer),
        },
        ApiCall::CompleteInterview { session_id } => {
            ApiOutcome::InterviewCompleted(api.complete_interview(session_id))
        }
    }
}
