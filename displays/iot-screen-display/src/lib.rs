//! Render target abstraction and shared components for IoT Screen
//!
//! This crate provides:
//! - `RenderTarget` trait the message pipeline renders through
//! - `Surface` trait implemented by display drivers (OLED, TFT, etc.)
//! - `Panel`, the shared text/image renderer over any `Surface`
//! - Image tiles and the tile-by-tile splash decoder
//!
//! # Architecture
//!
//! Drivers only know how to draw pixels and push them to the glass. `Panel`
//! owns the cursor, text style and rotation, and turns pipeline requests
//! ("show these two lines") into draw calls. The pipeline never sees the
//! driver type, so one pipeline serves every backend.
//!
//! ## Supported Display Types
//!
//! - **Monochrome OLED** (SH1106, 128x64): text only.
//! - **Color TFT** (ILI9341, 320x240): text, image tiles, four orientations.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod image;
pub mod panel;
pub mod surface;

// Re-export key types
pub use backend::{Capabilities, ColorMode, DisplayError, RenderTarget, Rotation};
pub use image::{BmpTileDecoder, ImageError, Tile, TileDecoder, TILE_SIZE};
pub use panel::Panel;
pub use surface::{IdleMarker, PanelStyle, Surface};
