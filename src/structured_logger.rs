//! Structured JSONL logger for debugging and event reconstruction.
//!
//! This module provides machine-parseable logging with:
//! - Monotonic sequence numbers for ordering
//! - ISO 8601 timestamps with microsecond precision
//! - A per-run session ID for correlation
//! - Structured event data in JSON format

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::monitor::StreamConnectionState;
use crate::orchestrator::{StageEvent, StageRequest, WorkflowStage};

/// Structured JSONL logger for debugging and event reconstruction.
pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique across the run)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    /// Client run ID
    pub session_id: String,
    /// Component that emitted the log
    pub component: String,
    /// Structured event data
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a new structured logger.
    ///
    /// Logs are written to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The logs directory cannot be created
    /// - The log file cannot be opened
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event.
    ///
    /// The event is serialized to JSON and written as a single line.
    /// This method is thread-safe.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs a transition request received by the orchestrator.
    ///
    /// Only the request kind is recorded; payload contents stay out of the log.
    pub fn log_stage_request(&self, seq: u64, request: &StageRequest) {
        self.log(
            "Orchestrator",
            serde_json::json!({
                "type": "StageRequest",
                "seq": seq,
                "request": request.kind()
            }),
        );
    }

    /// Logs an event emitted by the orchestrator.
    pub fn log_stage_event(&self, seq: u64, event: &StageEvent) {
        self.log(
            "Orchestrator",
            serde_json::json!({
                "type": "StageEvent",
                "seq": seq,
                "event": event
            }),
        );
    }

    /// Logs a request the orchestrator refused.
    pub fn log_stage_rejected(&self, seq: u64, from: WorkflowStage, request: &str) {
        self.log(
            "Orchestrator",
            serde_json::json!({
                "type": "StageRejected",
                "seq": seq,
                "from": from,
                "request": request
            }),
        );
    }

    /// Logs a screen that could not be built for the active stage.
    pub fn log_consistency_fault(&self, stage: WorkflowStage, detail: &str) {
        self.log(
            "Orchestrator",
            serde_json::json!({
                "type": "ConsistencyFault",
                "stage": stage,
                "detail": detail
            }),
        );
    }

    /// Logs the start of the session check.
    pub fn log_session_check_started(&self) {
        self.log(
            "Gatekeeper",
            serde_json::json!({
                "type": "SessionCheckStarted"
            }),
        );
    }

    /// Logs the settled session check.
    pub fn log_session_check_settled(&self, authenticated: bool, detail: &str) {
        self.log(
            "Gatekeeper",
            serde_json::json!({
                "type": "SessionCheckSettled",
                "authenticated": authenticated,
                "detail": detail
            }),
        );
    }

    /// Logs a logout request.
    pub fn log_logout(&self) {
        self.log(
            "Gatekeeper",
            serde_json::json!({
                "type": "Logout"
            }),
        );
    }

    /// Logs a monitor lifecycle step (mount, unmount).
    pub fn log_monitor_lifecycle(&self, step: &str) {
        self.log(
            "Monitor",
            serde_json::json!({
                "type": "Lifecycle",
                "step": step
            }),
        );
    }

    /// Logs a monitor connection state change.
    pub fn log_monitor_transition(&self, from: StreamConnectionState, to: StreamConnectionState) {
        self.log(
            "Monitor",
            serde_json::json!({
                "type": "StateChanged",
                "from": from,
                "to": to
            }),
        );
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;
