//! TCP link to the status feed over the embassy-net stack

use defmt::debug;
use embassy_net::tcp::{State, TcpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv4Address, Stack};
use embassy_time::Duration;
use iot_screen_hal::{Endpoint, Link, LinkError, LinkEvent, LinkState};

/// Receive and transmit buffer size per direction
pub const SOCKET_BUFFER: usize = 2048;

/// Give up on a connect attempt after this long
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Single reusable socket to a fixed endpoint
pub struct TcpLink<'a> {
    socket: TcpSocket<'a>,
    remote: IpEndpoint,
    state: LinkState,
}

impl<'a> TcpLink<'a> {
    pub fn new(stack: Stack<'a>, rx: &'a mut [u8], tx: &'a mut [u8], endpoint: Endpoint) -> Self {
        let mut socket = TcpSocket::new(stack, rx, tx);
        socket.set_timeout(Some(CONNECT_TIMEOUT));

        let [a, b, c, d] = endpoint.addr;
        Self {
            socket,
            remote: IpEndpoint::new(IpAddress::Ipv4(Ipv4Address::new(a, b, c, d)), endpoint.port),
            state: LinkState::Disconnected,
        }
    }

    fn apply(&mut self, event: LinkEvent) {
        self.state = self.state.transition(event);
    }
}

impl Link for TcpLink<'_> {
    async fn connect(&mut self) -> Result<(), LinkError> {
        // smoltcp only connects from Closed; reset whatever the last session left
        if self.socket.state() != State::Closed {
            self.socket.abort();
            if let Err(e) = self.socket.flush().await {
                debug!("Flush after abort: {}", e);
            }
        }

        match self.socket.connect(self.remote).await {
            Ok(()) => {
                self.apply(LinkEvent::ConnectSucceeded);
                Ok(())
            }
            Err(_) => {
                self.apply(LinkEvent::ConnectFailed);
                Err(LinkError::ConnectFailed)
            }
        }
    }

    /// Up while established, or while a closing peer left bytes unread
    fn is_connected(&self) -> bool {
        self.state.is_connected()
            && (self.socket.state() == State::Established || self.socket.recv_queue() > 0)
    }

    fn bytes_available(&self) -> usize {
        self.socket.recv_queue()
    }

    async fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        if self.socket.recv_queue() == 0 {
            return if self.is_connected() {
                Ok(0)
            } else {
                Err(LinkError::NotConnected)
            };
        }

        match self.socket.read(buf).await {
            Ok(0) => {
                self.socket.abort();
                self.apply(LinkEvent::ReadFailed);
                Err(LinkError::Closed)
            }
            Ok(n) => Ok(n),
            Err(_) => {
                self.socket.abort();
                self.apply(LinkEvent::ReadFailed);
                Err(LinkError::Io)
            }
        }
    }
}
