//! Board-agnostic message pipeline for the IoT Screen panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration type definitions and validation
//! - Reconnect supervision with fixed backoff
//! - Frame reading, record dispatch and the boot sequence
//! - The rotation sweep shown by rotation-capable displays
//! - The control loop tying it all together
//!
//! Nothing here logs. Every step returns a report the firmware can log.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod config;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use animation::RotationSweep;
pub use config::{BootConfig, ConfigError, LinkTarget, PanelConfig, Timing};
pub use control::{ControlLoop, CycleReport, FrameOutcome, StartupReport};
pub use error::PanelError;
pub use pipeline::{
    BootReport, BootSequencer, DispatchOutcome, Dispatcher, DropReason, FrameReader, SplashOutcome,
};
pub use state::{LinkSupervisor, SupervisorOutcome};
