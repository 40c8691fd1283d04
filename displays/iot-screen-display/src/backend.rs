//! Render target trait
//!
//! Defines the interface the message pipeline and boot sequence render through.

use embedded_graphics::geometry::Size;

use crate::image::Tile;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
    /// Display did not answer its identification query
    NotDetected,
    /// Operation not supported by this backend
    Unsupported,
}

/// Pixel format of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    Monochrome,
    Rgb565,
}

/// Display orientation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All orientations in sweep order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Quarter turns from the native orientation
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Whether width and height are swapped relative to the native orientation
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// What a backend can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// Visible size in the current orientation, in pixels
    pub width: u32,
    pub height: u32,
    pub color: ColorMode,
    /// Supports [`RenderTarget::blit_tile`]
    pub image: bool,
    /// Supports [`RenderTarget::set_rotation`]
    pub rotation: bool,
}

impl Capabilities {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Render target trait
///
/// Provides a hardware-agnostic interface for everything the panel shows.
/// Implementations own the cursor position, text style and rotation.
pub trait RenderTarget {
    /// Fill the surface with the background color and move the cursor home
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write each entry of `lines` on its own line, starting at the cursor
    ///
    /// Text past the edge of the surface is clipped, not wrapped.
    fn show_text(&mut self, lines: &[&str]) -> Result<(), DisplayError>;

    /// Draw one decoded image tile, clipped to the surface
    fn blit_tile(&mut self, _tile: &Tile<'_>) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported)
    }

    /// Change the display orientation
    fn set_rotation(&mut self, _rotation: Rotation) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported)
    }

    /// Draw the idle marker, if the backend has one
    fn draw_idle_marker(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Get the backend capabilities
    fn capabilities(&self) -> Capabilities;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_order() {
        let turns: Vec<u8> = Rotation::ALL.iter().map(|r| r.quarter_turns()).collect();
        assert_eq!(turns, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_transposed_orientations() {
        assert!(!Rotation::Deg0.is_transposed());
        assert!(Rotation::Deg90.is_transposed());
        assert!(!Rotation::Deg180.is_transposed());
        assert!(Rotation::Deg270.is_transposed());
    }
}
