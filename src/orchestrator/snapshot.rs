//! Read-only snapshot of orchestrator state for display.
//!
//! The UI never mutates this; it receives new snapshots via watch channel.

use super::stage::WorkflowStage;
use super::OrchestratorState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSnapshot {
    /// Current workflow stage
    pub stage: WorkflowStage,
    /// Whether an interview configuration is stored
    pub has_configuration: bool,
    /// Whether a feedback result is stored
    pub has_feedback: bool,
    /// Number of requests applied, accepted or not
    pub seq: u64,
}

impl OrchestratorSnapshot {
    pub(super) fn capture(state: &OrchestratorState, seq: u64) -> Self {
        Self {
            stage: state.stage,
            has_configuration: state.configuration.is_some(),
            has_feedback: state.feedback.is_some(),
            seq,
        }
    }
}
