//! Frame reader
//!
//! One bounded read per loop iteration into a fixed buffer. Reads are
//! best effort: a record split across two reads is not reassembled.

use iot_screen_hal::{Link, LinkError};
use iot_screen_protocol::FRAME_CAPACITY;

/// Owns the receive buffer
pub struct FrameReader {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_CAPACITY],
            len: 0,
        }
    }

    /// Perform exactly one read from `link`
    ///
    /// Returns `Ok(None)` when the read produced no bytes. Otherwise the
    /// returned frame borrows the buffer until the next read.
    pub async fn read_frame<L: Link>(&mut self, link: &mut L) -> Result<Option<&[u8]>, LinkError> {
        self.len = 0;
        let n = link.read_into(&mut self.buf).await?;
        self.len = n.min(FRAME_CAPACITY);

        if self.len == 0 {
            Ok(None)
        } else {
            Ok(Some(&self.buf[..self.len]))
        }
    }

    /// Bytes received by the most recent read
    pub fn last_frame(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub const fn capacity(&self) -> usize {
        FRAME_CAPACITY
    }
}
