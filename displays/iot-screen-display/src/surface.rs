//! Driver-facing surface trait and panel styling

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::backend::{ColorMode, DisplayError, Rotation};

/// A display driver the [`Panel`](crate::Panel) can draw on
///
/// Drivers implement `DrawTarget` for their native color and ignore pixels
/// outside their bounds.
pub trait Surface: DrawTarget<Error = DisplayError> {
    /// Pixel format of the surface
    const COLOR_MODE: ColorMode;

    /// Push buffered content to the display
    ///
    /// For directly-written displays this is a no-op.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Whether [`Surface::set_orientation`] is implemented
    fn supports_rotation(&self) -> bool {
        false
    }

    /// Change the scan orientation; the bounding box follows
    fn set_orientation(&mut self, _rotation: Rotation) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported)
    }

    /// Whether [`Surface::blit`] is implemented
    fn supports_image(&self) -> bool {
        false
    }

    /// Write `area.size` RGB565 pixels row by row into `area`
    ///
    /// `area` is already clipped to the bounding box.
    fn blit<I>(&mut self, _area: &Rectangle, _pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        Err(DisplayError::Unsupported)
    }
}

/// Cosmetic marker drawn once per loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleMarker<C> {
    pub center: Point,
    pub radius: u32,
    pub color: C,
}

/// Fixed text style of a backend
#[derive(Clone, Copy)]
pub struct PanelStyle<C> {
    pub font: &'static MonoFont<'static>,
    pub foreground: C,
    pub background: C,
    pub idle_marker: Option<IdleMarker<C>>,
}

impl<C> PanelStyle<C> {
    pub const fn new(font: &'static MonoFont<'static>, foreground: C, background: C) -> Self {
        Self {
            font,
            foreground,
            background,
            idle_marker: None,
        }
    }

    pub fn with_idle_marker(mut self, marker: IdleMarker<C>) -> Self {
        self.idle_marker = Some(marker);
        self
    }

    /// Height of one text line in pixels
    pub fn line_height(&self) -> u32 {
        self.font.character_size.height
    }
}
