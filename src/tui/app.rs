//! Application state for the interactive client.
//!
//! The session gate decides what renders. Once it settles with an identity,
//! a [`Workspace`] holds the orchestrator, the active stage screen and the
//! live monitor. The monitor is mounted with the workspace and stays up
//! through every stage change. Logging out drops the workspace, which
//! unmounts the monitor and forgets the workflow.

use crate::config::MonitorConfig;
use crate::gatekeeper::{BestEffort, SessionGatekeeper};
use crate::monitor::LiveMonitor;
use crate::orchestrator::{OrchestratorSnapshot, StageRequest, ViewOrchestrator};
use crate::structured_logger::StructuredLogger;
use crate::tui::backend::{run_call, Backends};
use crate::tui::event::Event;
use crate::tui::screens::{ApiCall, Screen, ScreenAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct Workspace {
    orchestrator: ViewOrchestrator,
    snapshot_rx: watch::Receiver<OrchestratorSnapshot>,
    screen: Screen,
    screen_id: u64,
    monitor: Option<LiveMonitor>,
}

impl Workspace {
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn monitor(&self) -> Option<&LiveMonitor> {
        self.monitor.as_ref()
    }
}

pub struct App {
    monitor_config: MonitorConfig,
    backends: Backends,
    logger: Arc<StructuredLogger>,
    gate: SessionGatekeeper,
    workspace: Option<Workspace>,
    pending_logout: Option<BestEffort>,
    events: mpsc::UnboundedSender<Event>,
    next_screen_id: u64,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        monitor_config: MonitorConfig,
        backends: Backends,
        logger: Arc<StructuredLogger>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let gate = SessionGatekeeper::new(Arc::clone(&backends.session), Arc::clone(&logger));
        Self {
            monitor_config,
            backends,
            logger,
            gate,
            workspace: None,
            pending_logout: None,
            events,
            next_screen_id: 0,
            should_quit: false,
        }
    }

    /// Kicks off the session check. Must run inside the tokio runtime.
    pub fn start(&mut self) {
        self.gate.activate();
    }

    pub fn gate(&self) -> &SessionGatekeeper {
        &self.gate
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn auth_url(&self) -> &str {
        &self.backends.auth_url
    }

    /// The logout request still in flight, if any.
    pub fn take_pending_logout(&mut self) -> Option<BestEffort> {
        self.pending_logout.take()
    }

    /// Returns true when the screen needs a redraw.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Tick => self.on_tick(),
            Event::Resize => true,
            Event::Key(key) => {
                self.on_key(key);
                true
            }
            Event::Paste(text) => {
                if let Some(workspace) = self.workspace.as_mut() {
                    workspace.screen.on_paste(&text);
                }
                true
            }
            Event::Api { screen, outcome } => {
                let Some(workspace) = self.workspace.as_mut() else {
                    return false;
                };
                if workspace.screen_id != screen {
                    tracing::debug!(screen, "dropping reply for a screen that is gone");
                    return false;
                }
                let action = workspace.screen.on_api(outcome);
                self.perform(action);
                true
            }
        }
    }

    fn on_tick(&mut self) -> bool {
        let mut changed = self.gate.poll();
        changed |= self.sync_workspace();
        if let Some(monitor) = self
            .workspace
            .as_mut()
            .and_then(|workspace| workspace.monitor.as_mut())
        {
            changed |= monitor.pump();
        }
        changed
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('l') if ctrl => {
                if self.gate.state().is_authenticated() {
                    self.logout();
                }
                return;
            }
            _ => {}
        }

        if self.gate.is_loading() {
            return;
        }
        match self.workspace.as_mut() {
            Some(workspace) => {
                let action = workspace.screen.on_key(key);
                self.perform(action);
            }
            None => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
            }
        }
    }

    fn logout(&mut self) {
        self.pending_logout = Some(self.gate.logout());
        self.workspace = None;
    }

    /// Creates or drops the workspace to match the gate.
    fn sync_workspace(&mut self) -> bool {
        let authenticated = !self.gate.is_loading() && self.gate.state().is_authenticated();
        match (authenticated, self.workspace.is_some()) {
            (true, false) => {
                let (orchestrator, snapshot_rx) = ViewOrchestrator::new(Arc::clone(&self.logger));
                let monitor = self.monitor_config.enabled.then(|| {
                    LiveMonitor::mount(
                        Arc::clone(&self.backends.stream),
                        self.monitor_config.grace(),
                        Arc::clone(&self.logger),
                    )
                });
                self.workspace = Some(Workspace {
                    orchestrator,
                    snapshot_rx,
                    screen: Screen::Unavailable,
                    screen_id: 0,
                    monitor,
                });
                self.rebuild_screen();
                true
            }
            (false, true) => {
                self.workspace = None;
                true
            }
            _ => false,
        }
    }

    fn perform(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Request(request) => self.request_stage(request),
            ScreenAction::Call(call) => self.spawn_call(call),
        }
    }

    fn request_stage(&mut self, request: StageRequest) {
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        // Rejections are logged by the orchestrator and leave the screen as is.
        if workspace.orchestrator.apply(request).is_ok() {
            self.rebuild_screen();
        }
    }

    fn spawn_call(&mut self, call: ApiCall) {
        let Some(workspace) = self.workspace.as_ref() else {
            return;
        };
        let screen = workspace.screen_id;
        let api = Arc::clone(&self.backends.stage);
        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = run_call(api.as_ref(), call);
            let _ = events.send(Event::Api { screen, outcome });
        });
    }

    /// Builds a fresh screen for the current stage.
    fn rebuild_screen(&mut self) {
        self.next_screen_id += 1;
        let screen_id = self.next_screen_id;
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };

        let state = workspace.orchestrator.state();
        workspace.screen = match Screen::for_state(state) {
            Ok(screen) => screen,
            Err(detail) => {
                self.logger.log_consistency_fault(state.stage, detail);
                tracing::error!(stage = %state.stage, "{}", detail);
                Screen::Unavailable
            }
        };
        workspace.screen_id = screen_id;
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
