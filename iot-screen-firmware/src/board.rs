//! Display wiring
//!
//! | Signal | OLED (SH1106) | TFT (ILI9341) |
//! |--------|---------------|---------------|
//! | SCL    | GPIO5 (I2C0)  |               |
//! | SDA    | GPIO4 (I2C0)  |               |
//! | SCK    |               | GPIO10 (SPI1) |
//! | MOSI   |               | GPIO11 (SPI1) |
//! | CS     |               | GPIO9         |
//! | DC     |               | GPIO8         |
//!
//! The TFT reset line is tied to 3V3; the driver resets it in software.
//! The W5500 sits on SPI0 (GPIO16-21), see `main.rs`.

#[cfg(all(feature = "oled", feature = "tft"))]
compile_error!("Enable only one display backend: `oled` or `tft`");

#[cfg(not(any(feature = "oled", feature = "tft")))]
compile_error!("Enable a display backend: `oled` or `tft`");

#[cfg(feature = "oled")]
pub use oled::*;

#[cfg(feature = "tft")]
pub use tft::*;

#[cfg(feature = "oled")]
mod oled {
    use embassy_rp::i2c::{self, Blocking, I2c};
    use embassy_rp::peripherals::{I2C0, PIN_4, PIN_5};
    use embassy_rp::Peri;
    use iot_screen_display::{DisplayError, Panel};
    use iot_screen_drivers::{oled_style, OledPanel, Sh1106};

    pub type Backend = OledPanel<I2c<'static, I2C0, Blocking>>;

    /// Bring up the SH1106 on I2C0 at 400 kHz
    pub fn init_display(
        i2c: Peri<'static, I2C0>,
        scl: Peri<'static, PIN_5>,
        sda: Peri<'static, PIN_4>,
    ) -> Result<Backend, DisplayError> {
        let mut config = i2c::Config::default();
        config.frequency = 400_000;

        let mut oled = Sh1106::new(I2c::new_blocking(i2c, scl, sda, config));
        oled.init()?;

        Ok(Panel::new(oled, oled_style()))
    }
}

#[cfg(feature = "tft")]
mod tft {
    use embassy_rp::gpio::{Level, Output};
    use embassy_rp::peripherals::{PIN_10, PIN_11, PIN_8, PIN_9, SPI1};
    use embassy_rp::spi::{self, Blocking, Spi};
    use embassy_rp::Peri;
    use embassy_time::Delay;
    use embedded_hal_bus::spi::ExclusiveDevice;
    use iot_screen_display::{DisplayError, Panel, Rotation};
    use iot_screen_drivers::{tft_style, Ili9341, TftPanel};

    pub type Backend = TftPanel<
        ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>,
        Output<'static>,
    >;

    /// Bring up the ILI9341 on SPI1 at 40 MHz
    pub fn init_display(
        spi: Peri<'static, SPI1>,
        sck: Peri<'static, PIN_10>,
        mosi: Peri<'static, PIN_11>,
        cs: Peri<'static, PIN_9>,
        dc: Peri<'static, PIN_8>,
    ) -> Result<Backend, DisplayError> {
        let mut config = spi::Config::default();
        config.frequency = 40_000_000;

        let bus = Spi::new_blocking_txonly(spi, sck, mosi, config);
        let cs = Output::new(cs, Level::High);
        let dc = Output::new(dc, Level::Low);
        let device =
            ExclusiveDevice::new(bus, cs, Delay).map_err(|_| DisplayError::Communication)?;

        let mut tft = Ili9341::new(device, dc);
        tft.init(&mut Delay, Rotation::Deg0)?;

        Ok(Panel::new(tft, tft_style()))
    }
}
