//! Where monitor frames come from.

use crate::api::{ApiClient, ApiError, FeedShutdown, Frame, MjpegReader};
use std::io::{self, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An open stream. Lives entirely on the blocking thread that opened it.
pub trait FrameStream {
    fn next_frame(&mut self) -> io::Result<Option<Frame>>;
}

impl<R: Read> FrameStream for MjpegReader<R> {
    fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        MjpegReader::next_frame(self)
    }
}

/// Opens frame streams. `open` blocks until the stream is connected.
///
/// Implementations register a closer on `release` that makes a blocked
/// `open` or `next_frame` return, so the connection does not outlive the
/// monitor that asked for it.
pub trait StreamSource: Send + Sync {
    fn open(&self, release: &StreamRelease) -> Result<Box<dyn FrameStream>, ApiError>;
}

impl StreamSource for ApiClient {
    fn open(&self, release: &StreamRelease) -> Result<Box<dyn FrameStream>, ApiError> {
        let shutdown = FeedShutdown::default();
        let closer = shutdown.clone();
        release.on_release(move || closer.close());
        Ok(Box::new(self.open_video_feed(&shutdown)?))
    }
}

type Closer = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct ReleaseState {
    released: bool,
    closers: Vec<Closer>,
}

/// Shared between a mounted monitor and the stream it opened.
///
/// Releasing runs every registered closer once. A closer registered after
/// release runs immediately.
#[derive(Clone, Default)]
pub struct StreamRelease {
    state: Arc<Mutex<ReleaseState>>,
}

impl StreamRelease {
    pub fn on_release(&self, closer: impl FnOnce() + Send + 'static) {
        let mut state = self.lock();
        if state.released {
            drop(state);
            closer();
            return;
        }
        state.closers.push(Box::new(closer));
    }

    /// Idempotent.
    pub fn release(&self) {
        let closers = {
            let mut state = self.lock();
            state.released = true;
            std::mem::take(&mut state.closers)
        };
        for closer in closers {
            closer();
        }
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    fn lock(&self) -> MutexGuard<'_, ReleaseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
