//! Pure connection state for the live monitor.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamConnectionState {
    Connecting,
    Streaming,
    Error,
}

/// Inputs to the monitor state. Produced by the grace timer and the stream
/// pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    GraceElapsed,
    Frame { bytes: usize },
    Failed { reason: String },
    Ended,
}

/// The one surface the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorView {
    Placeholder,
    Live,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    pub connection: StreamConnectionState,
    pub grace_elapsed: bool,
    pub frames: u64,
    pub last_frame_bytes: usize,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            connection: StreamConnectionState::Connecting,
            grace_elapsed: false,
            frames: 0,
            last_frame_bytes: 0,
        }
    }
}

impl MonitorState {
    /// `error` is final. A stream that stops after its first frame leaves
    /// the state at `streaming`.
    pub fn apply(&self, event: &MonitorEvent) -> MonitorState {
        let mut next = self.clone();
        match (self.connection, event) {
            (_, MonitorEvent::GraceElapsed) => next.grace_elapsed = true,
            (StreamConnectionState::Error, _) => {}
            (_, MonitorEvent::Frame { bytes }) => {
                next.connection = StreamConnectionState::Streaming;
                next.frames += 1;
                next.last_frame_bytes = *bytes;
            }
            (StreamConnectionState::Connecting, MonitorEvent::Failed { .. } | MonitorEvent::Ended) => {
                next.connection = StreamConnectionState::Error;
            }
            (StreamConnectionState::Streaming, MonitorEvent::Failed { .. } | MonitorEvent::Ended) => {}
        }
        next
    }

    pub fn view(&self) -> MonitorView {
        match self.connection {
            StreamConnectionState::Error => MonitorView::Error,
            StreamConnectionState::Streaming => MonitorView::Live,
            StreamConnectionState::Connecting if self.grace_elapsed => MonitorView::Live,
            StreamConnectionState::Connecting => MonitorView::Placeholder,
        }
    }

    pub fn footer(&self) -> &'static str {
        match self.connection {
            StreamConnectionState::Error => "Camera unavailable",
            _ => "Live face detection",
        }
    }
}
