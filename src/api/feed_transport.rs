//! Connection layer for the camera feed.
//!
//! The feed never finishes on its own, and a read blocks for as long as
//! the server sends nothing. [`FeedShutdown`] keeps a clone of every socket
//! its connector opened so another thread can shut them down, which wakes
//! the blocked read and closes the connection.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ureq::config::Config;
use ureq::unversioned::resolver::DefaultResolver;
use ureq::unversioned::transport::{
    Buffers, ConnectionDetails, Connector, LazyBuffers, NextTimeout, RustlsConnector, Transport,
};

#[derive(Debug, Default)]
struct Sockets {
    closed: bool,
    open: Vec<TcpStream>,
}

/// Shuts down the sockets opened for one feed. Cloning shares the handle.
#[derive(Debug, Clone, Default)]
pub struct FeedShutdown {
    sockets: Arc<Mutex<Sockets>>,
}

impl FeedShutdown {
    /// Shuts every registered socket down. Sockets connected afterwards are
    /// refused. Idempotent.
    pub fn close(&self) {
        let open = {
            let mut sockets = self.lock();
            sockets.closed = true;
            std::mem::take(&mut sockets.open)
        };
        for socket in open {
            let _ = socket.shutdown(Shutdown::Both);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn register(&self, stream: &TcpStream) -> io::Result<()> {
        let handle = stream.try_clone()?;
        let mut sockets = self.lock();
        if sockets.closed {
            let _ = handle.shutdown(Shutdown::Both);
            return Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "video feed was released while connecting",
            ));
        }
        sockets.open.push(handle);
        Ok(())
    }

    // A poisoned lock still holds valid sockets; shutting them down matters more.
    fn lock(&self) -> MutexGuard<'_, Sockets> {
        self.sockets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Agent for a single feed connection. TLS wraps the socket for `https`
/// bases, so shutting down the TCP socket also ends an encrypted feed.
pub(crate) fn feed_agent(config: Config, shutdown: &FeedShutdown) -> ureq::Agent {
    let connector = FeedConnector {
        shutdown: shutdown.clone(),
    }
    .chain(RustlsConnector::default());
    ureq::Agent::with_parts(config, connector, DefaultResolver::default())
}

#[derive(Debug)]
struct FeedConnector {
    shutdown: FeedShutdown,
}

impl Connector for FeedConnector {
    type Out = FeedTransport;

    fn connect(
        &self,
        details: &ConnectionDetails,
        _chained: Option<()>,
    ) -> Result<Option<FeedTransport>, ureq::Error> {
        let mut last_err = None;
        for addr in details.addrs.iter() {
            let attempt = match details.timeout.not_zero() {
                Some(limit) => TcpStream::connect_timeout(addr, *limit),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    self.shutdown.register(&stream)?;
                    let _ = stream.set_nodelay(true);
                    let buffers = LazyBuffers::new(
                        details.config.input_buffer_size(),
                        details.config.output_buffer_size(),
                    );
                    return Ok(Some(FeedTransport { stream, buffers }));
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    last_err = Some(ureq::Error::Timeout(details.timeout.reason));
                }
                Err(e) => last_err = Some(ureq::Error::Io(e)),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            ureq::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no address to connect to",
            ))
        }))
    }
}

#[derive(Debug)]
struct FeedTransport {
    stream: TcpStream,
    buffers: LazyBuffers,
}

impl Transport for FeedTransport {
    fn buffers(&mut self) -> &mut dyn Buffers {
        &mut self.buffers
    }

    fn transmit_output(&mut self, amount: usize, timeout: NextTimeout) -> Result<(), ureq::Error> {
        self.stream
            .set_write_timeout(timeout.not_zero().map(|limit| *limit))?;
        let output = &self.buffers.output()[..amount];
        self.stream
            .write_all(output)
            .map_err(|e| io_error(e, timeout))
    }

    fn await_input(&mut self, timeout: NextTimeout) -> Result<bool, ureq::Error> {
        self.stream
            .set_read_timeout(timeout.not_zero().map(|limit| *limit))?;
        let input = self.buffers.input_append_buf();
        let amount = self.stream.read(input).map_err(|e| io_error(e, timeout))?;
        self.buffers.input_appended(amount);
        Ok(amount > 0)
    }

    // Feed connections are never pooled.
    fn is_open(&mut self) -> bool {
        false
    }
}

fn io_error(e: io::Error, timeout: NextTimeout) -> ureq::Error {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ureq::Error::Timeout(timeout.reason),
        _ => ureq::Error::Io(e),
    }
}
