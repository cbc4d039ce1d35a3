//! Session gate: decides whether the user is signed in before anything else
//! renders.

mod state;

pub use state::{GateEvent, GateState, SessionCheck, SessionCheckFailure};

use crate::api::{ApiClient, ApiError, Identity};
use crate::structured_logger::StructuredLogger;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// The two backend calls the gate needs.
pub trait SessionApi: Send + Sync {
    fn user_info(&self) -> Result<Identity, ApiError>;
    fn logout(&self) -> Result<(), ApiError>;
}

impl SessionApi for ApiClient {
    fn user_info(&self) -> Result<Identity, ApiError> {
        ApiClient::user_info(self)
    }

    fn logout(&self) -> Result<(), ApiError> {
        ApiClient::logout(self)
    }
}

/// A request whose failure is intentionally unobserved. Dropping it detaches
/// the request; awaiting [`BestEffort::outcome`] is optional.
pub struct BestEffort {
    handle: JoinHandle<Result<(), ApiError>>,
}

impl BestEffort {
    pub async fn outcome(self) -> Result<(), ApiError> {
        self.handle
            .await
            .unwrap_or_else(|e| Err(ApiError::transport(e)))
    }
}

pub struct SessionGatekeeper {
    api: Arc<dyn SessionApi>,
    logger: Arc<StructuredLogger>,
    state: GateState,
    pending: Option<oneshot::Receiver<SessionCheck>>,
    activated: bool,
}

impl SessionGatekeeper {
    pub fn new(api: Arc<dyn SessionApi>, logger: Arc<StructuredLogger>) -> Self {
        Self {
            api,
            logger,
            state: GateState::default(),
            pending: None,
            activated: false,
        }
    }

    /// Starts the one-shot session check. Later calls do nothing.
    pub fn activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.state = self.state.apply(&GateEvent::CheckStarted);
        self.logger.log_session_check_started();

        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        tokio::task::spawn_blocking(move || {
            let check = api.user_info().map_err(SessionCheckFailure::from);
            // The receiver is gone if the gate was torn down first
            let _ = tx.send(check);
        });
        self.pending = Some(rx);
    }

    /// Applies the check result if it has arrived. Returns true when the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        let check = match rx.try_recv() {
            Ok(check) => check,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => Err(aborted()),
        };
        self.pending = None;
        self.settle(check)
    }

    /// Waits for the outstanding check, if any.
    pub async fn wait_settled(&mut self) -> &GateState {
        if let Some(rx) = self.pending.take() {
            let check = rx.await.unwrap_or_else(|_| Err(aborted()));
            self.settle(check);
        }
        &self.state
    }

    /// Clears the identity now and tells the server in the background.
    pub fn logout(&mut self) -> BestEffort {
        self.logger.log_logout();
        self.state = self.state.apply(&GateEvent::LoggedOut);

        let api = Arc::clone(&self.api);
        let handle = tokio::task::spawn_blocking(move || {
            let result = api.logout();
            if let Err(e) = &result {
                tracing::warn!("logout request failed: {}", e);
            }
            result
        });
        BestEffort { handle }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.state.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    fn settle(&mut self, check: SessionCheck) -> bool {
        let detail = match &check {
            Ok(identity) => identity.username.clone(),
            Err(failure) => failure.to_string(),
        };
        let next = self.state.apply(&GateEvent::Settled(check));
        if next == self.state {
            return false;
        }
        self.logger
            .log_session_check_settled(next.is_authenticated(), &detail);
        self.state = next;
        true
    }
}

fn aborted() -> SessionCheckFailure {
    SessionCheckFailure::Transport("session check aborted".to_string())
}
