//! IoT Screen - Network Status Panel Firmware
//!
//! Main firmware binary for RP2040 boards with a W5500 Ethernet controller.
//! Keeps one TCP connection to the status feed and paints every record it
//! receives on the attached OLED or TFT.

#![no_std]
#![no_main]

mod assets;
mod board;
mod config;
mod net;

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner, State};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Async, Spi};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use iot_screen_core::{ControlLoop, CycleReport, FrameOutcome, PanelError, SupervisorOutcome};
use iot_screen_display::RenderTarget;
use iot_screen_hal::{AssetStore, Link};

use crate::assets::ASSETS;
use crate::net::{TcpLink, SOCKET_BUFFER};

type EthernetSpi = ExclusiveDevice<Spi<'static, SPI0, Async>, Output<'static>, Delay>;
type EthernetRunner = Runner<'static, W5500, EthernetSpi, Input<'static>, Output<'static>>;

// Static cells for the network stack (must live forever for the runner tasks)
static WIZNET_STATE: StaticCell<State<8, 8>> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<2>> = StaticCell::new();
static RX_BUF: StaticCell<[u8; SOCKET_BUFFER]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; SOCKET_BUFFER]> = StaticCell::new();

/// Interval between fault reports while halted
const FAULT_REPORT_MS: u64 = 5000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("IoT Screen firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::panel_config();
    if let Err(e) = config.validate() {
        halt(e).await;
    }

    // Display first, so a dead panel is reported before the network comes up
    Timer::after_millis(100).await;

    #[cfg(feature = "oled")]
    let display = board::init_display(p.I2C0, p.PIN_5, p.PIN_4);
    #[cfg(feature = "tft")]
    let display = board::init_display(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_9, p.PIN_8);

    let display = match display {
        Ok(display) => display,
        Err(e) => halt(PanelError::DisplayInit(e)).await,
    };
    info!("Display initialized");

    for entry in ASSETS.entries() {
        info!("Asset {} ({} bytes)", entry.path, entry.size);
    }

    // W5500 on SPI0 (SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16, CS=GPIO17, RST=GPIO20, INT=GPIO21)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 50_000_000;

    let spi = Spi::new(
        p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, p.DMA_CH0, p.DMA_CH1, spi_config,
    );
    let cs = Output::new(p.PIN_17, Level::High);
    let int = Input::new(p.PIN_21, Pull::Up);
    let reset = Output::new(p.PIN_20, Level::High);

    let (device, runner) = embassy_net_wiznet::new(
        config::MAC,
        WIZNET_STATE.init(State::new()),
        unwrap!(ExclusiveDevice::new(spi, cs, Delay)),
        int,
        reset,
    )
    .await
    .unwrap();
    spawner.spawn(ethernet_task(runner)).unwrap();

    // Stack seed only needs to differ between boots of different boards
    let seed = u64::from_le_bytes([
        config::MAC[0],
        config::MAC[1],
        config::MAC[2],
        config::MAC[3],
        config::MAC[4],
        config::MAC[5],
        0,
        0,
    ]) ^ Instant::now().as_ticks();

    let (stack, net_runner) = embassy_net::new(
        device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(net_task(net_runner)).unwrap();

    info!("Waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(v4) = stack.config_v4() {
        info!("IP address: {}", v4.address);
    }

    let endpoint = config.link.endpoint();
    info!("Status feed at {}", endpoint);

    let link = TcpLink::new(
        stack,
        RX_BUF.init([0; SOCKET_BUFFER]),
        TX_BUF.init([0; SOCKET_BUFFER]),
        endpoint,
    );

    let mut panel = ControlLoop::new(link, display, Delay, config);

    match panel.startup(&ASSETS).await {
        Ok(report) => {
            info!("Boot: splash {}, rotation {}", report.boot.splash, report.boot.rotation);
            match report.connect {
                Ok(()) => info!("Connected"),
                Err(e) => warn!("Initial connect failed: {}", e),
            }
        }
        Err(e) if e.is_fatal() => halt(e).await,
        Err(e) => error!("Boot sequence failed: {}", e),
    }

    info!("Entering control loop");

    let mut link_state = panel.link().state();
    loop {
        let report = panel.cycle().await;
        if report.link_state != link_state {
            info!("Link {} -> {}", link_state, report.link_state);
            link_state = report.link_state;
        }
        log_cycle(&report, &panel);
    }
}

/// Log the interesting parts of one loop iteration
fn log_cycle<L, R, D>(report: &CycleReport, panel: &ControlLoop<L, R, D>)
where
    L: Link,
    R: RenderTarget,
    D: DelayNs,
{
    let frame = panel.last_frame();

    if let Some(rotation) = report.rotation {
        trace!("Sweep {} ended at {}", panel.sweep().sweeps(), rotation);
    }

    match report.link {
        SupervisorOutcome::Healthy => {}
        SupervisorOutcome::Reconnected { attempts } => {
            info!(
                "Reconnected after {} attempt(s), {} since boot",
                attempts,
                panel.supervisor().total_attempts()
            );
        }
        SupervisorOutcome::RetryScheduled {
            failures,
            error,
            backoff_ms,
        } => {
            warn!(
                "Reconnection failed ({}), attempt {}, retry in {} ms",
                error, failures, backoff_ms
            );
        }
    }

    match report.frame {
        FrameOutcome::Idle | FrameOutcome::Empty => {}
        FrameOutcome::Rendered { len } => {
            info!(
                "Rendered {} bytes (#{}): {=[u8]:x}",
                len,
                panel.dispatcher().rendered(),
                frame
            );
        }
        FrameOutcome::Keepalive { len } => {
            trace!("PING ({} bytes)", len);
        }
        FrameOutcome::Dropped { len, reason } => {
            warn!("Dropped {} bytes ({}): {=[u8]:x}", len, reason, frame);
        }
        FrameOutcome::ReadFailed(e) => {
            warn!("Read failed: {}", e);
        }
        FrameOutcome::RenderFailed { len, error } => {
            error!("Render of {} bytes failed: {}", len, error);
        }
    }

    if let Some(e) = report.cosmetic_error {
        debug!("Cosmetic draw failed: {}", e);
    }
}

/// Report a fatal fault forever
async fn halt(fault: impl Format) -> ! {
    loop {
        error!("Fatal: {}", fault);
        Timer::after_millis(FAULT_REPORT_MS).await;
    }
}

#[embassy_executor::task]
async fn ethernet_task(runner: EthernetRunner) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, Device<'static>>) -> ! {
    runner.run().await
}
