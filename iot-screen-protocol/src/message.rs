//! Decoded status messages
//!
//! A message is either a keepalive (`app == "PING"`) or something to show
//! on the panel.

use crate::record::{self, DecodeError, EncodeError};

/// App name reserved for keepalive messages
pub const PING_APP: &str = "PING";

/// How the panel should treat a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Keepalive from the feed; nothing to render
    Keepalive,
    /// Render `app` and `payload`
    Display,
    /// `app` contains control characters; drop without rendering
    Unprintable,
}

/// A decoded record
///
/// Borrows its strings from the frame buffer it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message<'a> {
    app: &'a str,
    payload: &'a str,
}

impl<'a> Message<'a> {
    pub const fn new(app: &'a str, payload: &'a str) -> Self {
        Self { app, payload }
    }

    /// Decode a message from a received frame
    pub fn decode(frame: &'a [u8]) -> Result<Self, DecodeError> {
        record::decode(frame)
    }

    /// Encode this message as a record
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        record::encode(self.app, self.payload, buf)
    }

    pub fn app(&self) -> &'a str {
        self.app
    }

    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// Classify the message
    ///
    /// The keepalive check is an exact, case-sensitive match on `app`.
    pub fn kind(&self) -> MessageKind {
        if self.app == PING_APP {
            MessageKind::Keepalive
        } else if self.app.chars().any(char::is_control) {
            MessageKind::Unprintable
        } else {
            MessageKind::Display
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FRAME_CAPACITY;

    #[test]
    fn test_ping_is_keepalive() {
        assert_eq!(Message::new("PING", "").kind(), MessageKind::Keepalive);
        assert_eq!(Message::new("PING", "PONG").kind(), MessageKind::Keepalive);
    }

    #[test]
    fn test_ping_match_is_exact() {
        assert_eq!(Message::new("Ping", "PONG").kind(), MessageKind::Display);
        assert_eq!(Message::new("PING ", "").kind(), MessageKind::Display);
        assert_eq!(Message::new("PINGS", "").kind(), MessageKind::Display);
    }

    #[test]
    fn test_control_characters_are_unprintable() {
        assert_eq!(Message::new("ST\0ATUS", "OK").kind(), MessageKind::Unprintable);
        assert_eq!(Message::new("\x1b[2J", "OK").kind(), MessageKind::Unprintable);
    }

    #[test]
    fn test_payload_does_not_affect_kind() {
        assert_eq!(Message::new("Spotify", "a\nb").kind(), MessageKind::Display);
    }

    #[test]
    fn test_message_encode_decode() {
        let mut buf = [0u8; FRAME_CAPACITY];
        let len = Message::new("Spotify", "Artist - Title").encode(&mut buf).unwrap();

        let message = Message::decode(&buf[..len]).unwrap();
        assert_eq!(message, Message::new("Spotify", "Artist - Title"));
    }
}
