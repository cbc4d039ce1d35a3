//! Events emitted by the orchestrator after applying a request.
//!
//! These are for logging and for the host to know when to rebuild the
//! active screen. Rendering reads the snapshot, not these events.

use super::stage::WorkflowStage;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum StageEvent {
    /// The active stage changed
    StageChanged {
        from: WorkflowStage,
        to: WorkflowStage,
    },
    /// An interview configuration was stored
    ConfigurationStored,
    /// A feedback result was stored
    FeedbackStored,
    /// Both payload slots were emptied
    PayloadsCleared,
}

/// Errors returned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The request is not valid from the active stage. State is unchanged.
    NotAllowed {
        from: WorkflowStage,
        request: &'static str,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed { from, request } => {
                write!(f, "request '{}' is not allowed from stage '{}'", request, from)
            }
        }
    }
}

impl std::error::Error for TransitionError {}
