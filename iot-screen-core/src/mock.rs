//! Recording test doubles for the pipeline collaborators
//!
//! Every double appends to one shared [`Trace`] so tests can assert the
//! order of calls across the link, renderer and delay.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal_async::delay::DelayNs;
use iot_screen_display::{Capabilities, ColorMode, DisplayError, RenderTarget, Rotation, Tile};
use iot_screen_hal::{Link, LinkError, LinkEvent, LinkState};

/// One observed collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect(bool),
    Read(usize),
    Clear,
    Text(Vec<String>),
    Tile(Rectangle),
    Rotate(Rotation),
    Marker,
    Delay(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Call>>>);

impl Trace {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn connects(&self) -> usize {
        self.count(|c| matches!(c, Call::Connect(_)))
    }

    pub fn render_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Clear | Call::Text(_) | Call::Tile(_)))
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| f(c)).count()
    }
}

/// Scripted link
///
/// `connects` holds the outcome of each future connect attempt; once it
/// runs dry every attempt fails. `reads` holds what each read returns.
pub struct MockLink {
    trace: Trace,
    state: LinkState,
    pub connects: VecDeque<bool>,
    pub reads: VecDeque<Result<Vec<u8>, LinkError>>,
}

impl MockLink {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            state: LinkState::Disconnected,
            connects: VecDeque::new(),
            reads: VecDeque::new(),
        }
    }

    pub fn connected(trace: &Trace) -> Self {
        let mut link = Self::new(trace);
        link.state = LinkState::Connected;
        link
    }

    /// Peer went away without a read noticing
    pub fn drop_peer(&mut self) {
        self.state = LinkState::Disconnected;
    }

    pub fn with_connects(mut self, outcomes: &[bool]) -> Self {
        self.connects.extend(outcomes.iter().copied());
        self
    }

    pub fn with_frame(mut self, bytes: &[u8]) -> Self {
        self.reads.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn with_read_error(mut self, error: LinkError) -> Self {
        self.reads.push_back(Err(error));
        self
    }
}

impl Link for MockLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        let ok = self.connects.pop_front().unwrap_or(false);
        self.trace.push(Call::Connect(ok));
        if ok {
            self.state = self.state.transition(LinkEvent::ConnectSucceeded);
            Ok(())
        } else {
            self.state = self.state.transition(LinkEvent::ConnectFailed);
            Err(LinkError::ConnectFailed)
        }
    }

    fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    fn bytes_available(&self) -> usize {
        match self.reads.front() {
            Some(Ok(bytes)) => bytes.len(),
            // Errors surface on the read itself
            Some(Err(_)) => 1,
            None => 0,
        }
    }

    async fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        match self.reads.pop_front() {
            Some(Ok(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                self.trace.push(Call::Read(n));
                Ok(n)
            }
            Some(Err(error)) => {
                self.state = self.state.transition(LinkEvent::ReadFailed);
                Err(error)
            }
            None => {
                self.trace.push(Call::Read(0));
                Ok(0)
            }
        }
    }
}

/// Recording render target
pub struct MockRender {
    trace: Trace,
    pub caps: Capabilities,
    pub fail_text: bool,
}

impl MockRender {
    pub fn oled(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            caps: Capabilities {
                width: 128,
                height: 64,
                color: ColorMode::Monochrome,
                image: false,
                rotation: false,
            },
            fail_text: false,
        }
    }

    pub fn tft(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            caps: Capabilities {
                width: 320,
                height: 240,
                color: ColorMode::Rgb565,
                image: true,
                rotation: true,
            },
            fail_text: false,
        }
    }
}

impl RenderTarget for MockRender {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.trace.push(Call::Clear);
        Ok(())
    }

    fn show_text(&mut self, lines: &[&str]) -> Result<(), DisplayError> {
        if self.fail_text {
            return Err(DisplayError::Communication);
        }
        self.trace
            .push(Call::Text(lines.iter().map(|l| l.to_string()).collect()));
        Ok(())
    }

    fn blit_tile(&mut self, tile: &Tile<'_>) -> Result<(), DisplayError> {
        if !self.caps.image {
            return Err(DisplayError::Unsupported);
        }
        let bounds = Rectangle::new(Point::zero(), self.caps.size());
        if let Some(visible) = tile.clip(&bounds) {
            self.trace.push(Call::Tile(visible));
        }
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        if !self.caps.rotation {
            return Err(DisplayError::Unsupported);
        }
        self.trace.push(Call::Rotate(rotation));
        Ok(())
    }

    fn draw_idle_marker(&mut self) -> Result<(), DisplayError> {
        self.trace.push(Call::Marker);
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

/// Delay that returns immediately and records the requested duration
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.trace.push(Call::Delay(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.trace.push(Call::Delay(ms));
    }
}

/// Build a bottom-up 24-bit BMP filled with one color
pub fn solid_bmp(width: u32, height: u32) -> Vec<u8> {
    let row_len = ((width * 3 + 3) & !3) as usize;
    let image_len = row_len * height as usize;
    let mut data = Vec::with_capacity(54 + image_len);

    data.extend_from_slice(b"BM");
    data.extend_from_slice(&(54 + image_len as u32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&54u32.to_le_bytes());

    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&(width as i32).to_le_bytes());
    data.extend_from_slice(&(height as i32).to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&24u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(image_len as u32).to_le_bytes());
    data.extend_from_slice(&2835u32.to_le_bytes());
    data.extend_from_slice(&2835u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    data.resize(54 + image_len, 0x80);
    data
}
