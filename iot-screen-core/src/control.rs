//! Control loop
//!
//! Owns every piece of pipeline state and runs one iteration at a time:
//!
//! ```text
//! sweep ─► supervise ─► idle marker ─► read ─► dispatch ─► idle delay
//! ```
//!
//! The firmware calls [`ControlLoop::startup`] once and then
//! [`ControlLoop::cycle`] forever, logging each report.

use embedded_hal_async::delay::DelayNs;
use iot_screen_display::{DisplayError, RenderTarget, Rotation};
use iot_screen_hal::{AssetStore, Link, LinkError, LinkState};

use crate::animation::RotationSweep;
use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::pipeline::{BootReport, BootSequencer, DispatchOutcome, Dispatcher, DropReason, FrameReader};
use crate::state::{LinkSupervisor, SupervisorOutcome};

/// What happened to the receive side in one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Link down or nothing queued; no read made
    Idle,
    /// A read was made and returned no bytes
    Empty,
    /// Message shown on the panel
    Rendered { len: usize },
    /// `PING` received
    Keepalive { len: usize },
    /// Frame discarded
    Dropped { len: usize, reason: DropReason },
    /// Read failed; the link is down until the supervisor reconnects it
    ReadFailed(LinkError),
    /// Display failed while showing the message; the message is lost
    RenderFailed { len: usize, error: DisplayError },
}

/// Summary of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Orientation after the sweep, if the display rotates
    pub rotation: Option<Rotation>,
    pub link: SupervisorOutcome,
    pub frame: FrameOutcome,
    /// Link state at the end of the iteration, as reported by the link
    pub link_state: LinkState,
    /// Sweep or idle marker failure; never stops the loop
    pub cosmetic_error: Option<DisplayError>,
}

/// Summary of the startup phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartupReport {
    pub boot: BootReport,
    /// Outcome of the single startup connect attempt
    pub connect: Result<(), LinkError>,
}

/// The panel's single control loop
pub struct ControlLoop<L, R, D> {
    link: L,
    render: R,
    delay: D,
    config: PanelConfig,
    reader: FrameReader,
    dispatcher: Dispatcher,
    supervisor: LinkSupervisor,
    sweep: RotationSweep,
}

impl<L, R, D> ControlLoop<L, R, D>
where
    L: Link,
    R: RenderTarget,
    D: DelayNs,
{
    pub fn new(link: L, render: R, delay: D, config: PanelConfig) -> Self {
        let supervisor = LinkSupervisor::new(config.timing.reconnect_backoff_ms);
        let sweep = RotationSweep::new(config.timing.rotation_step_ms);
        Self {
            link,
            render,
            delay,
            config,
            reader: FrameReader::new(),
            dispatcher: Dispatcher::new(),
            supervisor,
            sweep,
        }
    }

    /// Boot sequence, one connect attempt, then the settle delay
    ///
    /// Fails only if the display cannot show the boot sequence.
    pub async fn startup<A: AssetStore>(&mut self, assets: &A) -> Result<StartupReport, PanelError> {
        let boot = BootSequencer::new(&self.config.boot)
            .run(&mut self.render, &mut self.delay, assets)
            .await?;

        let connect = self.supervisor.connect_once(&mut self.link).await;
        self.delay.delay_ms(self.config.timing.settle_ms).await;

        Ok(StartupReport { boot, connect })
    }

    /// Run one loop iteration
    pub async fn cycle(&mut self) -> CycleReport {
        let mut cosmetic_error = None;

        let rotation = match self.sweep.run(&mut self.render, &mut self.delay).await {
            Ok(rotation) => rotation,
            Err(error) => {
                cosmetic_error = Some(error);
                None
            }
        };

        let link = self.supervisor.poll(&mut self.link, &mut self.delay).await;

        if let Err(error) = self.render.draw_idle_marker() {
            cosmetic_error = cosmetic_error.or(Some(error));
        }

        let frame = if link.is_connected() && self.link.bytes_available() > 0 {
            self.process_frame().await
        } else {
            FrameOutcome::Idle
        };

        self.delay.delay_ms(self.config.timing.idle_ms).await;

        CycleReport {
            rotation,
            link,
            frame,
            link_state: self.link.state(),
            cosmetic_error,
        }
    }

    async fn process_frame(&mut self) -> FrameOutcome {
        let frame = match self.reader.read_frame(&mut self.link).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return FrameOutcome::Empty,
            Err(error) => return FrameOutcome::ReadFailed(error),
        };

        let len = frame.len();
        match self.dispatcher.dispatch_frame(frame, &mut self.render) {
            Ok(DispatchOutcome::Rendered) => FrameOutcome::Rendered { len },
            Ok(DispatchOutcome::Keepalive) => FrameOutcome::Keepalive { len },
            Ok(DispatchOutcome::Dropped(reason)) => FrameOutcome::Dropped { len, reason },
            Err(error) => FrameOutcome::RenderFailed { len, error },
        }
    }

    /// Bytes of the most recent frame, for hex dumps
    pub fn last_frame(&self) -> &[u8] {
        self.reader.last_frame()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn supervisor(&self) -> &LinkSupervisor {
        &self.supervisor
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn sweep(&self) -> &RotationSweep {
        &self.sweep
    }
}
