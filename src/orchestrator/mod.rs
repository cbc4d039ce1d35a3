//! View orchestration state machine.
//!
//! This module is the ONLY place workflow stage transitions happen.
//! The orchestrator owns the stage and both payload slots, validates
//! requests against the transition table, emits events, and broadcasts
//! snapshots to subscribers via a watch channel.

mod commands;
mod events;
mod snapshot;
mod stage;

pub use commands::StageRequest;
pub use events::{StageEvent, TransitionError};
pub use snapshot::OrchestratorSnapshot;
pub use stage::{FeedbackResult, InterviewConfiguration, WorkflowStage};

use crate::structured_logger::StructuredLogger;
use std::sync::Arc;
use tokio::sync::watch;

/// Stage plus the payloads carried between stages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrchestratorState {
    pub stage: WorkflowStage,
    pub configuration: Option<InterviewConfiguration>,
    pub feedback: Option<FeedbackResult>,
}

/// Pure transition function over the workflow table.
///
/// Returns the next state and the events describing the change, or
/// `TransitionError::NotAllowed` when the request does not apply to the
/// current stage. The input state is never modified.
pub fn transition(
    state: &OrchestratorState,
    request: StageRequest,
) -> Result<(OrchestratorState, Vec<StageEvent>), TransitionError> {
    use StageEvent::*;
    use StageRequest::*;
    use WorkflowStage::*;

    let from = state.stage;
    let move_to = |to: WorkflowStage| StageChanged { from, to };

    match (from, request) {
        (ModeSelection, ChooseResumeMode) => {
            Ok((fresh_workflow(ResumeUpload), vec![move_to(ResumeUpload)]))
        }

        (ModeSelection, ChooseRoleMode) => {
            Ok((fresh_workflow(RoleSelection), vec![move_to(RoleSelection)]))
        }

        (ResumeUpload | RoleSelection, ConfigurationReady(configuration)) => Ok((
            OrchestratorState {
                stage: InterviewSetup,
                configuration: Some(configuration),
                feedback: None,
            },
            vec![ConfigurationStored, move_to(InterviewSetup)],
        )),

        (ResumeUpload | RoleSelection, Back) => Ok((
            OrchestratorState::default(),
            vec![PayloadsCleared, move_to(ModeSelection)],
        )),

        (InterviewSetup, BeginSession) => Ok((
            OrchestratorState {
                stage: InterviewSession,
                ..state.clone()
            },
            vec![move_to(InterviewSession)],
        )),

        (InterviewSetup | InterviewSession, SessionComplete(feedback)) => Ok((
            OrchestratorState {
                stage: Feedback,
                configuration: state.configuration.clone(),
                feedback: Some(feedback),
            },
            vec![FeedbackStored, move_to(Feedback)],
        )),

        (Feedback, Restart) => Ok((
            OrchestratorState::default(),
            vec![PayloadsCleared, move_to(ModeSelection)],
        )),

        (_, request) => Err(TransitionError::NotAllowed {
            from,
            request: request.kind(),
        }),
    }
}

/// A new workflow starts with both payload slots empty.
fn fresh_workflow(stage: WorkflowStage) -> OrchestratorState {
    OrchestratorState {
        stage,
        configuration: None,
        feedback: None,
    }
}

/// Owns the workflow state, applies requests, emits events, broadcasts snapshots.
pub struct ViewOrchestrator {
    state: OrchestratorState,
    snapshot_tx: watch::Sender<OrchestratorSnapshot>,
    logger: Arc<StructuredLogger>,
    seq: u64,
}

impl ViewOrchestrator {
    /// Creates an orchestrator at `mode-selection` with empty payloads.
    ///
    /// Returns the orchestrator and a watch receiver for state snapshots.
    pub fn new(logger: Arc<StructuredLogger>) -> (Self, watch::Receiver<OrchestratorSnapshot>) {
        let state = OrchestratorState::default();
        let (snapshot_tx, snapshot_rx) = watch::channel(OrchestratorSnapshot::capture(&state, 0));

        let orchestrator = Self {
            state,
            snapshot_tx,
            logger,
            seq: 0,
        };

        (orchestrator, snapshot_rx)
    }

    /// All stage changes go through this single method.
    ///
    /// The change is synchronous: when this returns, the new stage is the
    /// only one observable. A rejected request leaves state untouched.
    pub fn apply(&mut self, request: StageRequest) -> Result<Vec<StageEvent>, TransitionError> {
        self.seq += 1;
        self.logger.log_stage_request(self.seq, &request);

        let result = transition(&self.state, request);
        let events = match result {
            Ok((next, events)) => {
                self.state = next;
                events
            }
            Err(err) => {
                let TransitionError::NotAllowed { from, request } = &err;
                self.logger.log_stage_rejected(self.seq, *from, request);
                tracing::warn!("{}", err);
                self.broadcast_snapshot();
                return Err(err);
            }
        };

        for event in &events {
            self.logger.log_stage_event(self.seq, event);
        }
        self.broadcast_snapshot();

        Ok(events)
    }

    pub fn stage(&self) -> WorkflowStage {
        self.state.stage
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    fn broadcast_snapshot(&self) {
        let snapshot = OrchestratorSnapshot::capture(&self.state, self.seq);
        let _ = self.snapshot_tx.send(snapshot);
    }
}
