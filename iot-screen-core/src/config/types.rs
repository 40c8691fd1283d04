//! Configuration type definitions
//!
//! These types represent the panel configuration. Defaults match the
//! shipped device; the firmware overrides them from `panel.toml`.

use heapless::String;
use iot_screen_hal::Endpoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum asset path length
pub const MAX_PATH_LEN: usize = 32;

/// Delay after a failed connect attempt
pub const DEFAULT_BACKOFF_MS: u32 = 1000;
/// Delay at the end of every loop iteration
pub const DEFAULT_IDLE_MS: u32 = 500;
/// Delay after each step of the rotation sweep
pub const DEFAULT_ROTATION_STEP_MS: u32 = 1000;
/// Delay after the startup connect attempt
pub const DEFAULT_SETTLE_MS: u32 = 2000;
/// Splash asset path
pub const DEFAULT_SPLASH_PATH: &str = "/logo.bmp";

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Host address is 0.0.0.0
    UnspecifiedHost,
    /// Port is 0
    ZeroPort,
    /// Reconnect backoff is 0, which would spin on a dead peer
    ZeroBackoff,
    /// Splash path does not start with `/`
    RelativeSplashPath,
}

/// Where the status feed lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkTarget {
    /// IPv4 address of the feed
    pub host: [u8; 4],
    /// TCP port of the feed
    pub port: u16,
}

impl LinkTarget {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host, self.port)
    }
}

impl Default for LinkTarget {
    fn default() -> Self {
        Self {
            host: [192, 168, 0, 165],
            port: 2699,
        }
    }
}

/// Loop pacing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Wait after a failed connect attempt
    pub reconnect_backoff_ms: u32,
    /// Wait at the end of every loop iteration
    pub idle_ms: u32,
    /// Wait after each orientation of the rotation sweep
    pub rotation_step_ms: u32,
    /// Wait after the startup connect attempt
    pub settle_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: DEFAULT_BACKOFF_MS,
            idle_ms: DEFAULT_IDLE_MS,
            rotation_step_ms: DEFAULT_ROTATION_STEP_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

/// Boot sequence configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootConfig {
    /// Asset path of the splash image
    pub splash_path: String<MAX_PATH_LEN>,
    /// Pause on the blank screen before the splash
    pub blank_ms: u32,
    /// How long the splash stays up
    pub splash_ms: u32,
    /// Pause on the blank screen before the banner
    pub pre_banner_ms: u32,
    /// How long the banner stays up
    pub banner_ms: u32,
}

impl Default for BootConfig {
    fn default() -> Self {
        let mut splash_path = String::new();
        // Fits: the default path is shorter than MAX_PATH_LEN
        let _ = splash_path.push_str(DEFAULT_SPLASH_PATH);
        Self {
            splash_path,
            blank_ms: 1000,
            splash_ms: 1000,
            pre_banner_ms: 500,
            banner_ms: 1000,
        }
    }
}

/// Full panel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub link: LinkTarget,
    pub timing: Timing,
    pub boot: BootConfig,
}

impl PanelConfig {
    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.host == [0, 0, 0, 0] {
            return Err(ConfigError::UnspecifiedHost);
        }
        if self.link.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.timing.reconnect_backoff_ms == 0 {
            return Err(ConfigError::ZeroBackoff);
        }
        if !self.boot.splash_path.starts_with('/') {
            return Err(ConfigError::RelativeSplashPath);
        }
        Ok(())
    }
}
