//! Display driver implementations
//!
//! This crate provides concrete [`Surface`](iot_screen_display::Surface)
//! implementations for the panels the firmware supports:
//!
//! - SH1106 128x64 monochrome OLED over I2C
//! - ILI9341 320x240 RGB565 TFT over SPI
//!
//! plus the fixed text style each backend renders with.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod ili9341;
pub mod sh1106;
pub mod style;

pub use ili9341::Ili9341;
pub use sh1106::Sh1106;
pub use style::{oled_style, tft_style, OledPanel, TftPanel};
