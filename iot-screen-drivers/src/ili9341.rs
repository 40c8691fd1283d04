//! ILI9341 TFT Display Driver
//!
//! Driver for 240x320 ILI9341-based RGB565 displays via SPI with a separate
//! data/command pin. Pixels are written straight to display RAM through an
//! address window, so there is no frame buffer and flushing is a no-op.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use iot_screen_display::{ColorMode, DisplayError, Rotation, Surface};

/// Native (portrait) dimensions
pub const NATIVE_WIDTH: u32 = 240;
pub const NATIVE_HEIGHT: u32 = 320;

/// Pixels per SPI write when streaming
const CHUNK_PIXELS: usize = 32;

// ILI9341 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const PASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MY: u8 = 0x80; // Row address order
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange
const MADCTL_BGR: u8 = 0x08; // Panel is wired BGR

/// MADCTL value for an orientation
pub fn madctl(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Deg0 => MADCTL_MX | MADCTL_BGR,
        Rotation::Deg90 => MADCTL_MV | MADCTL_BGR,
        Rotation::Deg180 => MADCTL_MY | MADCTL_BGR,
        Rotation::Deg270 => MADCTL_MX | MADCTL_MY | MADCTL_MV | MADCTL_BGR,
    }
}

/// ILI9341 TFT driver
pub struct Ili9341<SPI, DC> {
    spi: SPI,
    dc: DC,
    rotation: Rotation,
}

impl<SPI, DC> Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create a new ILI9341 driver (call init() after)
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            rotation: Rotation::Deg0,
        }
    }

    /// Initialize the display in the given orientation
    pub fn init<D: DelayNs>(&mut self, delay: &mut D, rotation: Rotation) -> Result<(), DisplayError> {
        self.write_command(SWRESET, &[])?;
        delay.delay_ms(120);

        self.write_command(SLPOUT, &[])?;
        delay.delay_ms(120);

        // 16 bits per pixel
        self.write_command(COLMOD, &[0x55])?;
        self.set_rotation(rotation)?;

        self.write_command(DISPON, &[])?;
        delay.delay_ms(20);

        Ok(())
    }

    /// Send a command byte (DC low) followed by its parameters (DC high)
    fn write_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&[cmd]).map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.write_data(params)?;
        }
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        self.spi.write(data).map_err(|_| DisplayError::Communication)
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.write_command(MADCTL, &[madctl(rotation)])?;
        self.rotation = rotation;
        Ok(())
    }

    /// Set the drawing window and start a RAM write
    ///
    /// `area` must be non-empty and inside the bounding box.
    fn open_window(&mut self, area: &Rectangle) -> Result<(), DisplayError> {
        let x0 = area.top_left.x as u16;
        let y0 = area.top_left.y as u16;
        let x1 = x0 + area.size.width as u16 - 1;
        let y1 = y0 + area.size.height as u16 - 1;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.write_command(CASET, &[x0h, x0l, x1h, x1l])?;

        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.write_command(PASET, &[y0h, y0l, y1h, y1l])?;

        self.write_command(RAMWR, &[])
    }

    /// Stream colors into an open window
    fn write_pixels<I>(&mut self, colors: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut n = 0;

        for color in colors {
            let [hi, lo] = RawU16::from(color).into_inner().to_be_bytes();
            chunk[n * 2] = hi;
            chunk[n * 2 + 1] = lo;
            n += 1;
            if n == CHUNK_PIXELS {
                self.write_data(&chunk)?;
                n = 0;
            }
        }

        if n > 0 {
            self.write_data(&chunk[..n * 2])?;
        }
        Ok(())
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

impl<SPI, DC> OriginDimensions for Ili9341<SPI, DC> {
    fn size(&self) -> Size {
        if self.rotation.is_transposed() {
            Size::new(NATIVE_HEIGHT, NATIVE_WIDTH)
        } else {
            Size::new(NATIVE_WIDTH, NATIVE_HEIGHT)
        }
    }
}

impl<SPI, DC> DrawTarget for Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.open_window(&Rectangle::new(point, Size::new(1, 1)))?;
                self.write_pixels(core::iter::once(color))?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let visible = area.intersection(&self.bounding_box());
        if visible.size == Size::zero() {
            return Ok(());
        }

        if visible == *area {
            self.open_window(area)?;
            return self.write_pixels(colors.into_iter().take(area.size.width as usize * area.size.height as usize));
        }

        // Partially visible: keep only the colors that land on the glass
        let pixels = area
            .points()
            .zip(colors)
            .filter(|(point, _)| visible.contains(*point))
            .map(|(_, color)| color);
        self.open_window(&visible)?;
        self.write_pixels(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        if visible.size == Size::zero() {
            return Ok(());
        }

        let count = visible.size.width as usize * visible.size.height as usize;
        self.open_window(&visible)?;
        self.write_pixels(core::iter::repeat(color).take(count))
    }
}

impl<SPI, DC> Surface for Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    const COLOR_MODE: ColorMode = ColorMode::Rgb565;

    fn supports_rotation(&self) -> bool {
        true
    }

    fn set_orientation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.set_rotation(rotation)
    }

    fn supports_image(&self) -> bool {
        true
    }

    fn blit<I>(&mut self, area: &Rectangle, pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        self.fill_contiguous(area, pixels)
    }
}
