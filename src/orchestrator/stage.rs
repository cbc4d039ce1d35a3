//! Workflow stages and the payloads carried between them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The single active step of the interview workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStage {
    #[default]
    ModeSelection,
    ResumeUpload,
    RoleSelection,
    InterviewSetup,
    InterviewSession,
    Feedback,
}

impl WorkflowStage {
    /// Wire name, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::ModeSelection => "mode-selection",
            WorkflowStage::ResumeUpload => "resume-upload",
            WorkflowStage::RoleSelection => "role-selection",
            WorkflowStage::InterviewSetup => "interview-setup",
            WorkflowStage::InterviewSession => "interview-session",
            WorkflowStage::Feedback => "feedback",
        }
    }

    /// Title shown above the stage screen.
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStage::ModeSelection => "Choose Interview Mode",
            WorkflowStage::ResumeUpload => "Resume-Based Interview",
            WorkflowStage::RoleSelection => "Role-Based Interview",
            WorkflowStage::InterviewSetup => "Interview Ready",
            WorkflowStage::InterviewSession => "Interview Session",
            WorkflowStage::Feedback => "Interview Feedback",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interview configuration produced by the resume or role intake screen.
///
/// Opaque to the orchestrator: stored and forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewConfiguration(Value);

impl InterviewConfiguration {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for InterviewConfiguration {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Evaluation produced by the session runner when the interview completes.
///
/// Opaque to the orchestrator: stored and forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackResult(Value);

impl FeedbackResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for FeedbackResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
