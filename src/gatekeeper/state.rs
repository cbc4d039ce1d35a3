//! Pure session-gate state.

use crate::api::{ApiError, Identity};
use std::fmt::{Display, Formatter};

/// Why the session check ended without an identity. Every variant means
/// "not signed in"; the distinction only feeds the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheckFailure {
    Unauthenticated(u16),
    Transport(String),
    MalformedIdentity(String),
}

impl Display for SessionCheckFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated(status) => write!(f, "rejected with status {}", status),
            Self::Transport(message) => write!(f, "transport failure: {}", message),
            Self::MalformedIdentity(message) => write!(f, "malformed identity: {}", message),
        }
    }
}

impl std::error::Error for SessionCheckFailure {}

impl From<ApiError> for SessionCheckFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, .. } => Self::Unauthenticated(status),
            ApiError::Decode { message } => Self::MalformedIdentity(message),
            ApiError::Transport { message } | ApiError::InvalidInput { message } => {
                Self::Transport(message)
            }
        }
    }
}

pub type SessionCheck = Result<Identity, SessionCheckFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    CheckStarted,
    Settled(SessionCheck),
    LoggedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateState {
    pub loading: bool,
    pub identity: Option<Identity>,
}

impl GateState {
    /// A settlement only counts while a check is outstanding; anything
    /// arriving later is dropped.
    pub fn apply(&self, event: &GateEvent) -> GateState {
        match event {
            GateEvent::CheckStarted => GateState {
                loading: true,
                identity: None,
            },
            GateEvent::Settled(_) if !self.loading => self.clone(),
            GateEvent::Settled(check) => GateState {
                loading: false,
                identity: check.as_ref().ok().cloned(),
            },
            GateEvent::LoggedOut => GateState {
                loading: false,
                identity: None,
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
