//! Network link abstraction
//!
//! The panel keeps exactly one outbound connection to a fixed peer. The
//! link reports its state; it never reconnects on its own.

use core::fmt;
use core::future::Future;

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Connection attempt was refused or timed out
    ConnectFailed,
    /// Peer closed the connection
    Closed,
    /// Transport failure while reading
    Io,
    /// Operation requires an established connection
    NotConnected,
}

/// Connection state owned by a [`Link`] implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Inputs that move a link between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// An explicit connect attempt succeeded
    ConnectSucceeded,
    /// An explicit connect attempt failed
    ConnectFailed,
    /// A read observed end-of-stream or a transport error
    ReadFailed,
}

impl LinkState {
    /// Process an event and return the next state
    ///
    /// Only connect attempts and read failures change the state.
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (_, ConnectSucceeded) => Connected,
            (_, ConnectFailed) => Disconnected,
            (Connected, ReadFailed) => Disconnected,
            (Disconnected, ReadFailed) => Disconnected,
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, LinkState::Connected)
    }
}

/// IPv4 endpoint of the status feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    pub addr: [u8; 4],
    pub port: u16,
}

impl Endpoint {
    pub const fn new(addr: [u8; 4], port: u16) -> Self {
        Self { addr, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.addr;
        write!(f, "{}.{}.{}.{}:{}", a, b, c, d, self.port)
    }
}

/// Outbound connection to the status feed
///
/// Implementations wrap a board network socket. All methods are single-shot:
/// `connect` makes one attempt, `read_into` performs one bounded read.
pub trait Link {
    /// Attempt a single connection to the configured endpoint
    ///
    /// Never retries internally. Retry pacing belongs to the caller.
    fn connect(&mut self) -> impl Future<Output = Result<(), LinkError>>;

    /// Whether the underlying socket is currently established
    fn is_connected(&self) -> bool;

    /// Number of received bytes waiting to be read
    fn bytes_available(&self) -> usize;

    /// Read at most `buf.len()` bytes
    ///
    /// Returns `Ok(0)` when nothing is available. Must not wait for more
    /// data than is already queued. End-of-stream is reported as
    /// [`LinkError::Closed`] and leaves the link disconnected.
    fn read_into(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, LinkError>>;

    /// Current link state
    fn state(&self) -> LinkState {
        if self.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }
}
