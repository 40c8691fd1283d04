//! Rotation sweep
//!
//! Rotation-capable displays step through every orientation once per loop
//! iteration, pausing after each step. Purely cosmetic.

use embedded_hal_async::delay::DelayNs;
use iot_screen_display::{DisplayError, RenderTarget, Rotation};

/// Cycles a display through all four orientations
#[derive(Debug, Clone)]
pub struct RotationSweep {
    step_ms: u32,
    sweeps: u32,
}

impl RotationSweep {
    pub const fn new(step_ms: u32) -> Self {
        Self { step_ms, sweeps: 0 }
    }

    /// Run one full sweep
    ///
    /// Returns the final orientation, or `None` when the display cannot
    /// rotate and nothing was done.
    pub async fn run<R, D>(&mut self, render: &mut R, delay: &mut D) -> Result<Option<Rotation>, DisplayError>
    where
        R: RenderTarget,
        D: DelayNs,
    {
        if !render.capabilities().rotation {
            return Ok(None);
        }

        for rotation in Rotation::ALL {
            render.set_rotation(rotation)?;
            delay.delay_ms(self.step_ms).await;
        }

        self.sweeps = self.sweeps.wrapping_add(1);
        Ok(Rotation::ALL.last().copied())
    }

    /// Completed sweeps since power-on
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }
}
