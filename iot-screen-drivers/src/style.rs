//! Fixed text styles of the supported backends

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::*;
use iot_screen_display::{IdleMarker, Panel, PanelStyle};

use crate::ili9341::Ili9341;
use crate::sh1106::Sh1106;

/// SH1106 behind the shared renderer
pub type OledPanel<I2C> = Panel<Sh1106<I2C>>;

/// ILI9341 behind the shared renderer
pub type TftPanel<SPI, DC> = Panel<Ili9341<SPI, DC>>;

/// Lit text on a dark OLED, 21 columns by 6 rows
pub fn oled_style() -> PanelStyle<BinaryColor> {
    PanelStyle::new(&FONT_6X10, BinaryColor::On, BinaryColor::Off)
}

/// White on black at twice the classic 5x8 cell, with a green idle ring
pub fn tft_style() -> PanelStyle<Rgb565> {
    PanelStyle::new(&FONT_10X20, Rgb565::WHITE, Rgb565::BLACK).with_idle_marker(IdleMarker {
        center: Point::new(64, 32),
        radius: 32,
        color: Rgb565::GREEN,
    })
}
