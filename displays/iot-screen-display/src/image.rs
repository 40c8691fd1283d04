//! Image tiles and tile-by-tile decoding
//!
//! Images are never held in full: a decoder produces one small tile at a
//! time into its own buffer, the tile is clipped to the surface and blitted,
//! then the buffer is reused for the next tile.

use embedded_graphics::image::GetPixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tinybmp::Bmp;

/// Edge length of a decoded tile in pixels
pub const TILE_SIZE: u32 = 16;

const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Image decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    /// Asset is not a supported image
    Malformed,
    /// Pixel slice does not cover the tile area
    TileSize,
}

/// A rectangular block of decoded pixels in surface coordinates
///
/// Pixels are stored row by row with a stride of `area.size.width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile<'a> {
    area: Rectangle,
    pixels: &'a [Rgb565],
}

impl<'a> Tile<'a> {
    pub fn new(area: Rectangle, pixels: &'a [Rgb565]) -> Result<Self, ImageError> {
        let needed = area.size.width as usize * area.size.height as usize;
        if pixels.len() < needed {
            return Err(ImageError::TileSize);
        }
        Ok(Self { area, pixels })
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    /// Part of the tile that lies inside `bounds`, if any
    pub fn clip(&self, bounds: &Rectangle) -> Option<Rectangle> {
        let visible = self.area.intersection(bounds);
        if visible.size.width == 0 || visible.size.height == 0 {
            None
        } else {
            Some(visible)
        }
    }

    /// Pixels of the sub-area `visible` (as returned by [`Tile::clip`]), row by row
    pub fn pixels_in(&self, visible: &Rectangle) -> impl Iterator<Item = Rgb565> + 'a {
        let pixels = self.pixels;
        let stride = self.area.size.width as usize;
        let offset = visible.top_left - self.area.top_left;
        let (dx, dy) = (offset.x.max(0) as usize, offset.y.max(0) as usize);
        let width = visible.size.width as usize;
        let height = visible.size.height as usize;

        (0..height).flat_map(move |row| {
            let start = (dy + row) * stride + dx;
            pixels[start..start + width].iter().copied()
        })
    }
}

/// Source of image tiles in decode order
pub trait TileDecoder {
    /// Decode the next tile, or `None` once the image is exhausted
    ///
    /// The returned tile borrows the decoder's buffer and must be consumed
    /// before the next call.
    fn next_tile(&mut self) -> Option<Tile<'_>>;
}

/// Tile decoder for BMP images stored in flash
///
/// Walks the image in [`TILE_SIZE`] blocks, left to right, top to bottom.
/// Edge tiles are cut to the image size.
pub struct BmpTileDecoder<'a> {
    bmp: Bmp<'a, Rgb565>,
    origin: Point,
    next: Point,
    buffer: [Rgb565; TILE_PIXELS],
}

impl<'a> BmpTileDecoder<'a> {
    /// Parse `data` as a BMP to be drawn with its top-left corner at `origin`
    pub fn new(data: &'a [u8], origin: Point) -> Result<Self, ImageError> {
        let bmp = Bmp::from_slice(data).map_err(|_| ImageError::Malformed)?;
        Ok(Self {
            bmp,
            origin,
            next: Point::zero(),
            buffer: [Rgb565::BLACK; TILE_PIXELS],
        })
    }
}

impl TileDecoder for BmpTileDecoder<'_> {
    fn next_tile(&mut self) -> Option<Tile<'_>> {
        let size = self.bmp.size();
        if self.next.y >= size.height as i32 {
            return None;
        }

        let width = (size.width as i32 - self.next.x).min(TILE_SIZE as i32) as u32;
        let height = (size.height as i32 - self.next.y).min(TILE_SIZE as i32) as u32;

        for row in 0..height {
            for col in 0..width {
                let p = self.next + Point::new(col as i32, row as i32);
                self.buffer[(row * width + col) as usize] =
                    self.bmp.pixel(p).unwrap_or(Rgb565::BLACK);
            }
        }

        let area = Rectangle::new(self.origin + self.next, Size::new(width, height));

        self.next.x += TILE_SIZE as i32;
        if self.next.x >= size.width as i32 {
            self.next.x = 0;
            self.next.y += TILE_SIZE as i32;
        }

        let pixels = &self.buffer[..(width * height) as usize];
        Some(Tile { area, pixels })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a bottom-up 24-bit BMP
    pub(crate) fn bmp_24(width: u32, height: u32, color: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
        let row_len = ((width * 3 + 3) & !3) as usize;
        let image_len = row_len * height as usize;
        let mut data = Vec::with_capacity(54 + image_len);

        // File header
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&(54 + image_len as u32).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&54u32.to_le_bytes());

        // BITMAPINFOHEADER
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

        for y in (0..height).rev() {
            let start = data.len();
            for x in 0..width {
                let [r, g, b] = color(x, y);
                data.extend_from_slice(&[b, g, r]);
            }
            data.resize(start + row_len, 0);
        }

        data
    }

    #[test]
    fn test_tile_rejects_short_pixel_slice() {
        let pixels = [Rgb565::RED; 3];
        let area = Rectangle::new(Point::zero(), Size::new(2, 2));
        assert_eq!(Tile::new(area, &pixels), Err(ImageError::TileSize));
    }

    #[test]
    fn test_clip_inside_bounds() {
        let pixels = [Rgb565::RED; 4];
        let tile = Tile::new(Rectangle::new(Point::new(2, 2), Size::new(2, 2)), &pixels).unwrap();
        let bounds = Rectangle::new(Point::zero(), Size::new(10, 10));
        assert_eq!(tile.clip(&bounds), Some(tile.area()));
    }

    #[test]
    fn test_clip_at_right_and_bottom_edges() {
        let pixels: Vec<Rgb565> = (0..16u16).map(|v| Rgb565::new(v as u8, 0, 0)).collect();
        let tile = Tile::new(Rectangle::new(Point::new(8, 8), Size::new(4, 4)), &pixels).unwrap();
        let bounds = Rectangle::new(Point::zero(), Size::new(10, 10));

        let visible = tile.clip(&bounds).unwrap();
        assert_eq!(visible, Rectangle::new(Point::new(8, 8), Size::new(2, 2)));

        let red: Vec<u8> = tile.pixels_in(&visible).map(|c| c.r()).collect();
        assert_eq!(red, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_clip_at_left_and_top_edges() {
        let pixels: Vec<Rgb565> = (0..16u16).map(|v| Rgb565::new(v as u8, 0, 0)).collect();
        let tile = Tile::new(Rectangle::new(Point::new(-2, -3), Size::new(4, 4)), &pixels).unwrap();
        let bounds = Rectangle::new(Point::zero(), Size::new(10, 10));

        let visible = tile.clip(&bounds).unwrap();
        assert_eq!(visible, Rectangle::new(Point::zero(), Size::new(2, 1)));

        let red: Vec<u8> = tile.pixels_in(&visible).map(|c| c.r()).collect();
        assert_eq!(red, vec![14, 15]);
    }

    #[test]
    fn test_tile_outside_bounds_is_dropped() {
        let pixels = [Rgb565::RED; 4];
        let tile = Tile::new(Rectangle::new(Point::new(20, 0), Size::new(2, 2)), &pixels).unwrap();
        let bounds = Rectangle::new(Point::zero(), Size::new(10, 10));
        assert_eq!(tile.clip(&bounds), None);
    }

    #[test]
    fn test_bmp_decoder_walks_tiles_in_order() {
        let data = bmp_24(20, 18, |_, _| [0, 0, 0]);
        let mut decoder = BmpTileDecoder::new(&data, Point::zero()).unwrap();

        let mut areas = Vec::new();
        while let Some(tile) = decoder.next_tile() {
            areas.push(tile.area());
        }

        assert_eq!(
            areas,
            vec![
                Rectangle::new(Point::new(0, 0), Size::new(16, 16)),
                Rectangle::new(Point::new(16, 0), Size::new(4, 16)),
                Rectangle::new(Point::new(0, 16), Size::new(16, 2)),
                Rectangle::new(Point::new(16, 16), Size::new(4, 2)),
            ]
        );
    }

    #[test]
    fn test_bmp_decoder_offsets_by_origin_and_keeps_colors() {
        let data = bmp_24(2, 2, |x, y| if x == 1 && y == 0 { [255, 0, 0] } else { [0, 0, 255] });
        let mut decoder = BmpTileDecoder::new(&data, Point::new(5, 7)).unwrap();

        let tile = decoder.next_tile().unwrap();
        assert_eq!(tile.area(), Rectangle::new(Point::new(5, 7), Size::new(2, 2)));

        let pixels: Vec<Rgb565> = tile.pixels_in(&tile.area()).collect();
        assert_eq!(
            pixels,
            vec![Rgb565::BLUE, Rgb565::RED, Rgb565::BLUE, Rgb565::BLUE]
        );
        assert!(decoder.next_tile().is_none());
    }

    #[test]
    fn test_bmp_decoder_rejects_garbage() {
        let data = [0x42u8, 0x00, 0x13, 0x37];
        assert!(matches!(
            BmpTileDecoder::new(&data, Point::zero()),
            Err(ImageError::Malformed)
        ));
    }

    #[test]
    fn test_firmware_splash_decodes_in_full() {
        let data = include_bytes!("../../../iot-screen-firmware/assets/logo.bmp");
        let mut decoder = BmpTileDecoder::new(data, Point::zero()).unwrap();

        let mut tiles = 0;
        let mut covered = 0;
        while let Some(tile) = decoder.next_tile() {
            let area = tile.area();
            covered += area.size.width * area.size.height;
            assert_eq!(tile.pixels_in(&area).count() as u32, area.size.width * area.size.height);
            tiles += 1;
        }

        assert_eq!(tiles, 36);
        assert_eq!(covered, 96 * 96);
    }
}
