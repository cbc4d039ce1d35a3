//! Lifecycle tests for the live monitor.

use super::*;
use crate::api::{ApiError, Frame};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Mutex;
use tempfile::TempDir;

enum Feed {
    Frame(usize),
    Reset,
    End,
}

/// Hands out one scripted stream, or refuses to open. Releasing wakes the
/// stream the way a socket shutdown wakes a blocked read.
struct FakeSource {
    fail_open: bool,
    feed: Mutex<Option<std_mpsc::Receiver<Feed>>>,
    wake: Mutex<std_mpsc::Sender<Feed>>,
    stream_dropped: Arc<AtomicBool>,
}

struct FakeStream {
    feed: std_mpsc::Receiver<Feed>,
    dropped: Arc<AtomicBool>,
}

impl StreamSource for FakeSource {
    fn open(&self, release: &StreamRelease) -> Result<Box<dyn FrameStream>, ApiError> {
        let wake = self.wake.lock().unwrap().clone();
        release.on_release(move || {
            let _ = wake.send(Feed::End);
        });
        if self.fail_open {
            return Err(ApiError::Status {
                status: 503,
                message: "no camera".to_string(),
            });
        }
        let feed = self
            .feed
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ApiError::transport("stream already opened"))?;
        Ok(Box::new(FakeStream {
            feed,
            dropped: Arc::clone(&self.stream_dropped),
        }))
    }
}

impl FrameStream for FakeStream {
    fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        match self.feed.recv() {
            Ok(Feed::Frame(size)) => Ok(Some(Frame {
                data: vec![0xff; size],
            })),
            Ok(Feed::Reset) => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            Ok(Feed::End) | Err(_) => Ok(None),
        }
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

struct Harness {
    source: Arc<FakeSource>,
    feed: std_mpsc::Sender<Feed>,
    stream_dropped: Arc<AtomicBool>,
    logger: Arc<StructuredLogger>,
    temp: TempDir,
}

fn harness(fail_open: bool) -> Harness {
    let temp = TempDir::new().unwrap();
    let logger = Arc::new(StructuredLogger::new("monitor-test", temp.path()).unwrap());
    let (feed, feed_rx) = std_mpsc::channel();
    let stream_dropped = Arc::new(AtomicBool::new(false));
    let source = Arc::new(FakeSource {
        fail_open,
        feed: Mutex::new(Some(feed_rx)),
        wake: Mutex::new(feed.clone()),
        stream_dropped: Arc::clone(&stream_dropped),
    });
    Harness {
        source,
        feed,
        stream_dropped,
        logger,
        temp,
    }
}

impl Harness {
    fn mount(&self, grace: Duration) -> LiveMonitor {
        let source: Arc<dyn StreamSource> = self.source.clone();
        LiveMonitor::mount(source, grace, Arc::clone(&self.logger))
    }
}

/// Polls the monitor until `done` holds. The pump runs on real threads, so
/// this waits in wall-clock time regardless of a paused tokio clock.
fn wait_for(monitor: &mut LiveMonitor, done: impl Fn(&LiveMonitor) -> bool) {
    for _ in 0..2000 {
        monitor.pump();
        if done(monitor) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("monitor never reached the expected state: {:?}", monitor.state());
}

fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..2000 {
        if condition() {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("condition not reached in time");
}

/// Lets spawned tasks observe a clock change.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_open_failure_shows_error_before_grace() {
    let h = harness(true);
    let mut monitor = h.mount(Duration::from_secs(60));

    wait_for(&mut monitor, |m| m.view() == MonitorView::Error);
    assert_eq!(monitor.state().connection, StreamConnectionState::Error);
    assert!(!monitor.state().grace_elapsed);
    assert_eq!(monitor.state().footer(), "Camera unavailable");
}

#[tokio::test]
async fn test_first_frame_streams_before_grace() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_secs(60));

    h.feed.send(Feed::Frame(2048)).unwrap();
    wait_for(&mut monitor, |m| {
        m.state().connection == StreamConnectionState::Streaming
    });

    assert_eq!(monitor.view(), MonitorView::Live);
    assert_eq!(monitor.state().frames, 1);
    assert_eq!(monitor.state().last_frame_bytes, 2048);
    assert!(!monitor.state().grace_elapsed);
    assert!(monitor.grace_timer.is_none(), "streaming cancels the grace timer");
}

#[tokio::test]
async fn test_failure_after_streaming_keeps_streaming() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_secs(60));

    h.feed.send(Feed::Frame(10)).unwrap();
    h.feed.send(Feed::Reset).unwrap();
    wait_until(|| h.stream_dropped.load(Ordering::SeqCst));
    monitor.pump();

    assert_eq!(monitor.state().connection, StreamConnectionState::Streaming);
    assert_eq!(monitor.state().frames, 1);
}

#[tokio::test]
async fn test_stream_ending_before_first_frame_is_error() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_secs(60));

    h.feed.send(Feed::End).unwrap();
    wait_for(&mut monitor, |m| m.view() == MonitorView::Error);
}

#[tokio::test(start_paused = true)]
async fn test_grace_elapses_into_live_surface() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_millis(1000));

    settle().await;
    monitor.pump();
    assert_eq!(monitor.view(), MonitorView::Placeholder);

    tokio::time::advance(Duration::from_millis(999)).await;
    settle().await;
    monitor.pump();
    assert_eq!(monitor.view(), MonitorView::Placeholder);

    tokio::time::advance(Duration::from_millis(2)).await;
    settle().await;
    assert!(monitor.pump());
    assert_eq!(monitor.view(), MonitorView::Live);
    assert_eq!(monitor.state().connection, StreamConnectionState::Connecting);

    // Stream outcome after grace still decides streaming vs error
    h.feed.send(Feed::Frame(1)).unwrap();
    wait_for(&mut monitor, |m| {
        m.state().connection == StreamConnectionState::Streaming
    });
}

#[tokio::test(start_paused = true)]
async fn test_failure_after_grace_is_error() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_millis(100));

    tokio::time::advance(Duration::from_millis(150)).await;
    settle().await;
    monitor.pump();
    assert!(monitor.state().grace_elapsed);

    h.feed.send(Feed::Reset).unwrap();
    wait_for(&mut monitor, |m| m.view() == MonitorView::Error);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_timer_and_releases_source() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_millis(500));

    // Test + monitor once the pump has opened the stream and let go
    wait_until(|| Arc::strong_count(&h.source) == 2);

    monitor.unmount();
    assert!(!monitor.is_mounted());
    assert!(monitor.grace_timer.is_none());
    assert_eq!(Arc::strong_count(&h.source), 1);

    // Nothing more is fed; releasing alone wakes the pump, which drops the stream
    wait_until(|| h.stream_dropped.load(Ordering::SeqCst));

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    while let Ok(event) = monitor.events_rx.try_recv() {
        assert_ne!(event, MonitorEvent::GraceElapsed, "timer fired after unmount");
    }
    assert!(!monitor.pump());
    assert_eq!(monitor.view(), MonitorView::Placeholder);

    // Unmounting twice is harmless
    monitor.unmount();
}

#[tokio::test]
async fn test_drop_releases_resources() {
    let h = harness(false);
    let monitor = h.mount(Duration::from_secs(60));
    wait_until(|| Arc::strong_count(&h.source) == 2);

    drop(monitor);
    assert_eq!(Arc::strong_count(&h.source), 1);
    wait_until(|| h.stream_dropped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_unmount_while_streaming_closes_silent_stream() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_secs(60));
    h.feed.send(Feed::Frame(64)).unwrap();
    wait_for(&mut monitor, |m| {
        m.state().connection == StreamConnectionState::Streaming
    });

    // The camera goes quiet; the pump is parked in next_frame
    monitor.unmount();
    wait_until(|| h.stream_dropped.load(Ordering::SeqCst));
    assert!(!monitor.pump());
    assert_eq!(monitor.state().frames, 1);
}

#[test]
fn test_release_runs_each_closer_once() {
    let release = StreamRelease::default();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&runs);
    release.on_release(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(!release.is_released());
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    release.release();
    release.release();
    assert!(release.is_released());
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // Registered after release: runs right away
    let counter = Arc::clone(&runs);
    release.on_release(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_lifecycle_is_logged() {
    let h = harness(false);
    let mut monitor = h.mount(Duration::from_secs(60));
    h.feed.send(Feed::Frame(1)).unwrap();
    wait_for(&mut monitor, |m| m.view() == MonitorView::Live);
    monitor.unmount();

    let content = std::fs::read_to_string(h.temp.path().join("events.jsonl")).unwrap();
    let steps: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap()["event"].clone())
        .collect();

    assert_eq!(steps.first().unwrap()["step"], "mount");
    assert!(steps
        .iter()
        .any(|e| e["type"] == "StateChanged" && e["from"] == "connecting" && e["to"] == "streaming"));
    assert_eq!(steps.last().unwrap()["step"], "unmount");
}
