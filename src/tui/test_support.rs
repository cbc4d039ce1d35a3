//! Fakes and a harness for driving [`App`] without a terminal or a server.

use crate::api::{ApiError, Identity, QuestionRequest, ResumeAnalysis};
use crate::config::MonitorConfig;
use crate::gatekeeper::SessionApi;
use crate::monitor::{FrameStream, StreamRelease, StreamSource};
use crate::structured_logger::StructuredLogger;
use crate::tui::app::App;
use crate::tui::backend::{Backends, StageApi};
use crate::tui::event::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

pub struct FakeSession {
    username: Option<String>,
    pub logout_calls: AtomicUsize,
}

impl SessionApi for FakeSession {
    fn user_info(&self) -> Result<Identity, ApiError> {
        match &self.username {
            Some(username) => Ok(Identity {
                username: username.clone(),
                id: Some(1),
                email: None,
            }),
            None => Err(ApiError::Status {
                status: 401,
                message: "Not logged in".to_string(),
            }),
        }
    }

    fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::transport("connection refused"))
    }
}

/// A camera that is never there. Counts open attempts and releases. When
/// `pending`, opening blocks until the monitor releases the stream.
#[derive(Default)]
pub struct NoCamera {
    pub opens: AtomicUsize,
    pub releases: Arc<AtomicUsize>,
    pub pending: AtomicBool,
}

impl StreamSource for NoCamera {
    fn open(&self, release: &StreamRelease) -> Result<Box<dyn FrameStream>, ApiError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let releases = Arc::clone(&self.releases);
        release.on_release(move || {
            releases.fetch_add(1, Ordering::SeqCst);
        });
        if self.pending.load(Ordering::SeqCst) {
            let (wake, parked) = std::sync::mpsc::channel::<()>();
            release.on_release(move || {
                let _ = wake.send(());
            });
            let _ = parked.recv();
        }
        Err(ApiError::Status {
            status: 503,
            message: "camera unavailable".to_string(),
        })
    }
}

/// Scripted stage backend. Records every call by name.
pub struct FakeStage {
    pub calls: Mutex<Vec<String>>,
}

impl FakeStage {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

impl StageApi for FakeStage {
    fn upload_resume(&self, path: &Path) -> Result<ResumeAnalysis, ApiError> {
        self.record("upload");
        Ok(ResumeAnalysis {
            filename: path.display().to_string(),
            keywords: vec!["rust".to_string()],
        })
    }

    fn generate_questions(&self, _request: &QuestionRequest) -> Result<Value, ApiError> {
        self.record("generate");
        Ok(json!({
            "session_id": 9,
            "questions": {"hr_questions": ["Why do you want this job?"]}
        }))
    }

    fn submit_answer(&self, _session_id: i64, index: usize, _answer: &str) -> Result<(), ApiError> {
        self.record(&format!("submit {}", index));
        Ok(())
    }

    fn complete_interview(&self, _session_id: i64) -> Result<Value, ApiError> {
        self.record("complete");
        Ok(json!({
            "overall_score": 8.0,
            "category_scores": {"communication": 7.5},
            "strengths": ["Clear structure"],
            "improvements": ["More detail"],
            "detailed_feedback": "Solid answers."
        }))
    }
}

pub struct Harness {
    pub app: App,
    pub events: mpsc::UnboundedReceiver<Event>,
    pub session: Arc<FakeSession>,
    pub stage: Arc<FakeStage>,
    pub camera: Arc<NoCamera>,
    pub temp: TempDir,
}

impl Harness {
    pub fn new(username: Option<&str>, monitor_enabled: bool) -> Self {
        let temp = TempDir::new().unwrap();
        let logger = Arc::new(StructuredLogger::new("tui-test", temp.path()).unwrap());
        let session = Arc::new(FakeSession {
            username: username.map(str::to_string),
            logout_calls: AtomicUsize::new(0),
        });
        let stage = Arc::new(FakeStage {
            calls: Mutex::new(Vec::new()),
        });
        let camera = Arc::new(NoCamera::default());
        let backends = Backends {
            session: session.clone(),
            stream: camera.clone(),
            stage: stage.clone(),
            auth_url: "http://localhost:5000/auth/google".to_string(),
        };
        let monitor = MonitorConfig {
            enabled: monitor_enabled,
            grace_ms: 1000,
        };
        let (tx, events) = mpsc::unbounded_channel();
        let app = App::new(monitor, backends, logger, tx);

        Self {
            app,
            events,
            session,
            stage,
            camera,
            temp,
        }
    }

    /// Starts the app and ticks until the session check has settled.
    pub async fn started(username: Option<&str>, monitor_enabled: bool) -> Self {
        let mut harness = Self::new(username, monitor_enabled);
        harness.start().await;
        harness
    }

    pub async fn start(&mut self) {
        self.app.start();
        for _ in 0..200 {
            self.app.handle_event(Event::Tick);
            if !self.app.gate().is_loading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!self.app.gate().is_loading(), "session check never settled");
    }

    pub fn press(&mut self, code: KeyCode) {
        self.app
            .handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    pub fn press_ctrl(&mut self, c: char) {
        self.app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )));
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Waits for the next backend reply and hands it to the app.
    pub async fn deliver_reply(&mut self) {
        let event = tokio::time::timeout(Duration::from_secs(5), self.events.recv())
            .await
            .expect("no backend reply")
            .expect("event channel closed");
        self.app.handle_event(event);
    }

    pub fn stage_calls(&self) -> Vec<String> {
        self.stage.calls.lock().unwrap().clone()
    }
}
