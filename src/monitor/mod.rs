//! Live camera monitor overlay.
//!
//! A mounted [`LiveMonitor`] owns two resources: a grace timer that moves
//! the overlay off its placeholder, and a blocking stream pump feeding
//! frames. Both are released on [`LiveMonitor::unmount`] or on drop.
//! Releasing the stream closes its connection even while the pump is
//! blocked waiting for the next frame.

mod source;
mod state;

pub use source::{FrameStream, StreamRelease, StreamSource};
pub use state::{MonitorEvent, MonitorState, MonitorView, StreamConnectionState};

use crate::structured_logger::StructuredLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct StreamHandle {
    source: Arc<dyn StreamSource>,
    release: StreamRelease,
    pump: JoinHandle<()>,
}

pub struct LiveMonitor {
    state: MonitorState,
    events_rx: mpsc::UnboundedReceiver<MonitorEvent>,
    grace_timer: Option<JoinHandle<()>>,
    stream: Option<StreamHandle>,
    logger: Arc<StructuredLogger>,
}

impl LiveMonitor {
    /// Starts the grace timer and the stream pump. Must be called from
    /// within a tokio runtime.
    pub fn mount(
        source: Arc<dyn StreamSource>,
        grace: Duration,
        logger: Arc<StructuredLogger>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        logger.log_monitor_lifecycle("mount");

        let deadline = tokio::time::Instant::now() + grace;
        let timer_tx = events_tx.clone();
        let grace_timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = timer_tx.send(MonitorEvent::GraceElapsed);
        });

        let release = StreamRelease::default();
        let pump_source = Arc::clone(&source);
        let pump_release = release.clone();
        let pump = tokio::task::spawn_blocking(move || {
            run_stream(pump_source, &pump_release, &events_tx);
        });

        Self {
            state: MonitorState::default(),
            events_rx,
            grace_timer: Some(grace_timer),
            stream: Some(StreamHandle {
                source,
                release,
                pump,
            }),
            logger,
        }
    }

    /// Applies every pending event. Returns true if the state changed.
    pub fn pump(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }

        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            if let MonitorEvent::Failed { reason } = &event {
                tracing::warn!("video feed failed: {}", reason);
            }
            if event == MonitorEvent::GraceElapsed {
                self.grace_timer = None;
            }

            let next = self.state.apply(&event);
            if next.connection != self.state.connection {
                self.logger
                    .log_monitor_transition(self.state.connection, next.connection);
                if next.connection == StreamConnectionState::Streaming {
                    self.cancel_grace_timer();
                }
            }
            changed |= next != self.state;
            self.state = next;
        }
        changed
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn view(&self) -> MonitorView {
        self.state.view()
    }

    pub fn is_mounted(&self) -> bool {
        self.stream.is_some()
    }

    /// Cancels the grace timer and detaches the stream. Idempotent.
    pub fn unmount(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        self.cancel_grace_timer();
        // Wakes the pump, which drops the stream and exits; nothing waits on it.
        stream.release.release();
        drop(stream.pump);
        drop(stream.source);
        self.events_rx.close();
        self.logger.log_monitor_lifecycle("unmount");
    }

    fn cancel_grace_timer(&mut self) {
        if let Some(timer) = self.grace_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for LiveMonitor {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Runs on the blocking pool. Holds the source only while opening.
fn run_stream(
    source: Arc<dyn StreamSource>,
    release: &StreamRelease,
    events: &mpsc::UnboundedSender<MonitorEvent>,
) {
    let opened = source.open(release);
    drop(source);
    if release.is_released() {
        return;
    }

    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events.send(MonitorEvent::Failed {
                reason: e.to_string(),
            });
            return;
        }
    };

    loop {
        let event = match stream.next_frame() {
            Ok(Some(frame)) => MonitorEvent::Frame { bytes: frame.len() },
            Ok(None) => MonitorEvent::Ended,
            Err(e) => MonitorEvent::Failed {
                reason: e.to_string(),
            },
        };
        if release.is_released() {
            break;
        }
        let done = !matches!(event, MonitorEvent::Frame { .. });
        if events.send(event).is_err() || done {
            break;
        }
    }
}

#[cfg(test)]
mod tests;
