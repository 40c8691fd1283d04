//! Message dispatch
//!
//! Keepalives are consumed silently; everything else replaces the whole
//! screen with two lines, `app` above `payload`.

use iot_screen_display::{DisplayError, RenderTarget};
use iot_screen_protocol::{DecodeError, Message, MessageKind};

/// Why a frame was not rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Frame failed validation
    Malformed(DecodeError),
    /// `app` contains control characters
    Unprintable,
}

/// What the dispatcher did with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// `PING` keepalive, nothing rendered
    Keepalive,
    /// Message shown on the panel
    Rendered,
    /// Message discarded without touching the display
    Dropped(DropReason),
}

/// Routes decoded messages to the renderer
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    rendered: u32,
    keepalives: u32,
    dropped: u32,
}

impl Dispatcher {
    pub const fn new() -> Self {
        Self {
            rendered: 0,
            keepalives: 0,
            dropped: 0,
        }
    }

    /// Decode `frame` and dispatch the message it holds
    pub fn dispatch_frame<R: RenderTarget>(
        &mut self,
        frame: &[u8],
        render: &mut R,
    ) -> Result<DispatchOutcome, DisplayError> {
        match Message::decode(frame) {
            Ok(message) => self.dispatch(&message, render),
            Err(error) => {
                self.dropped = self.dropped.wrapping_add(1);
                Ok(DispatchOutcome::Dropped(DropReason::Malformed(error)))
            }
        }
    }

    /// Dispatch one decoded message
    ///
    /// A displayable message results in exactly one `clear` followed by
    /// exactly one `show_text`. If the display fails, the message is lost.
    pub fn dispatch<R: RenderTarget>(
        &mut self,
        message: &Message<'_>,
        render: &mut R,
    ) -> Result<DispatchOutcome, DisplayError> {
        match message.kind() {
            MessageKind::Keepalive => {
                self.keepalives = self.keepalives.wrapping_add(1);
                Ok(DispatchOutcome::Keepalive)
            }
            MessageKind::Unprintable => {
                self.dropped = self.dropped.wrapping_add(1);
                Ok(DispatchOutcome::Dropped(DropReason::Unprintable))
            }
            MessageKind::Display => {
                render.clear()?;
                render.show_text(&[message.app(), message.payload()])?;
                self.rendered = self.rendered.wrapping_add(1);
                Ok(DispatchOutcome::Rendered)
            }
        }
    }

    pub fn rendered(&self) -> u32 {
        self.rendered
    }

    pub fn keepalives(&self) -> u32 {
        self.keepalives
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
