//! Shared renderer over any driver surface

use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{Capabilities, DisplayError, RenderTarget, Rotation};
use crate::image::Tile;
use crate::surface::{PanelStyle, Surface};

/// Text and image renderer for a [`Surface`]
///
/// Keeps the text cursor and current orientation. Every operation that
/// changes pixels ends with a flush.
pub struct Panel<S: Surface> {
    surface: S,
    style: PanelStyle<S::Color>,
    cursor: Point,
    rotation: Rotation,
}

impl<S: Surface> Panel<S> {
    pub fn new(surface: S, style: PanelStyle<S::Color>) -> Self {
        Self {
            surface,
            style,
            cursor: Point::zero(),
            rotation: Rotation::default(),
        }
    }

    /// Current text cursor (top-left of the next line)
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn text_style(&self) -> MonoTextStyle<'static, S::Color> {
        MonoTextStyleBuilder::new()
            .font(self.style.font)
            .text_color(self.style.foreground)
            .background_color(self.style.background)
            .build()
    }
}

impl<S: Surface> RenderTarget for Panel<S> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        DrawTarget::clear(&mut self.surface, self.style.background)?;
        self.cursor = Point::zero();
        self.surface.flush()
    }

    fn show_text(&mut self, lines: &[&str]) -> Result<(), DisplayError> {
        let style = self.text_style();
        let advance = self.style.line_height() as i32;

        for line in lines {
            Text::with_baseline(line, self.cursor, style, Baseline::Top).draw(&mut self.surface)?;
            self.cursor = Point::new(0, self.cursor.y + advance);
        }

        self.surface.flush()
    }

    fn blit_tile(&mut self, tile: &Tile<'_>) -> Result<(), DisplayError> {
        if !self.surface.supports_image() {
            return Err(DisplayError::Unsupported);
        }

        let Some(visible) = tile.clip(&self.surface.bounding_box()) else {
            return Ok(());
        };

        self.surface.blit(&visible, tile.pixels_in(&visible))?;
        self.surface.flush()
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        if !self.surface.supports_rotation() {
            return Err(DisplayError::Unsupported);
        }
        self.surface.set_orientation(rotation)?;
        self.rotation = rotation;
        Ok(())
    }

    fn draw_idle_marker(&mut self) -> Result<(), DisplayError> {
        let Some(marker) = self.style.idle_marker else {
            return Ok(());
        };

        Circle::with_center(marker.center, marker.radius * 2)
            .into_styled(PrimitiveStyle::with_stroke(marker.color, 1))
            .draw(&mut self.surface)?;
        self.surface.flush()
    }

    fn capabilities(&self) -> Capabilities {
        let size = self.surface.bounding_box().size;
        Capabilities {
            width: size.width,
            height: size.height,
            color: S::COLOR_MODE,
            image: self.surface.supports_image(),
            rotation: self.surface.supports_rotation(),
        }
    }
}
