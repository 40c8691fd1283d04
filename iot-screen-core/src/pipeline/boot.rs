//! Boot sequence
//!
//! Runs once before the main loop:
//!
//! ```text
//! clear ─► pause ─► splash? ─► pause ─► clear ─► pause ─► banner ─► pause ─► clear
//! ```
//!
//! The splash is decoded and blitted one tile at a time. A missing or bad
//! splash is reported and skipped.

use embedded_graphics::prelude::Point;
use embedded_hal_async::delay::DelayNs;
use iot_screen_display::{BmpTileDecoder, DisplayError, RenderTarget, Rotation, TileDecoder};
use iot_screen_hal::{AssetError, AssetStore};

use crate::config::BootConfig;

/// Welcome banner, one entry per line
pub const BANNER: [&str; 2] = ["Welcome to the", "IoT Screen"];

/// Orientation set at boot on rotation-capable displays
///
/// Matches the last step of the rotation sweep so the first sweep starts
/// from where boot left off.
pub const BOOT_ROTATION: Rotation = Rotation::Deg270;

/// What happened to the splash image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SplashOutcome {
    /// Splash drawn
    Shown {
        /// Tiles decoded and blitted
        tiles: u32,
    },
    /// Display cannot show images
    Unsupported,
    /// No asset at the configured path
    Missing,
    /// Asset could not be read or decoded
    Corrupt,
    /// Display failed partway through the splash
    Failed(DisplayError),
}

/// Summary of a completed boot sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub splash: SplashOutcome,
    /// Rotation applied at boot, if the display supports it
    pub rotation: Option<Rotation>,
}

/// Runs the boot sequence
pub struct BootSequencer<'c> {
    config: &'c BootConfig,
}

impl<'c> BootSequencer<'c> {
    pub fn new(config: &'c BootConfig) -> Self {
        Self { config }
    }

    /// Run the full sequence
    ///
    /// Splash problems never abort the sequence. A failing `clear` or
    /// banner does, since nothing after it would be visible.
    pub async fn run<R, D, A>(
        &self,
        render: &mut R,
        delay: &mut D,
        assets: &A,
    ) -> Result<BootReport, DisplayError>
    where
        R: RenderTarget,
        D: DelayNs,
        A: AssetStore,
    {
        let rotation = if render.capabilities().rotation {
            render.set_rotation(BOOT_ROTATION)?;
            Some(BOOT_ROTATION)
        } else {
            None
        };

        render.clear()?;
        delay.delay_ms(self.config.blank_ms).await;

        let splash = self.show_splash(render, assets);
        delay.delay_ms(self.config.splash_ms).await;

        render.clear()?;
        delay.delay_ms(self.config.pre_banner_ms).await;

        render.show_text(&BANNER)?;
        delay.delay_ms(self.config.banner_ms).await;

        render.clear()?;

        Ok(BootReport { splash, rotation })
    }

    fn show_splash<R, A>(&self, render: &mut R, assets: &A) -> SplashOutcome
    where
        R: RenderTarget,
        A: AssetStore,
    {
        if !render.capabilities().image {
            return SplashOutcome::Unsupported;
        }

        let data = match assets.load(&self.config.splash_path) {
            Ok(data) => data,
            Err(AssetError::NotFound) => return SplashOutcome::Missing,
            Err(AssetError::Unreadable) => return SplashOutcome::Corrupt,
        };

        let Ok(mut decoder) = BmpTileDecoder::new(data, Point::zero()) else {
            return SplashOutcome::Corrupt;
        };

        let mut tiles = 0;
        while let Some(tile) = decoder.next_tile() {
            if let Err(error) = render.blit_tile(&tile) {
                return SplashOutcome::Failed(error);
            }
            tiles += 1;
        }

        SplashOutcome::Shown { tiles }
    }
}
