//! Top-level panel errors

use iot_screen_display::DisplayError;
use iot_screen_hal::{AssetError, LinkError};
use iot_screen_protocol::DecodeError;

/// Anything that can go wrong on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Network link failure; the supervisor retries
    Link(LinkError),
    /// Received frame failed validation; the frame is dropped
    Decode(DecodeError),
    /// Asset lookup failed; the asset is skipped
    Asset(AssetError),
    /// Display could not be brought up
    DisplayInit(DisplayError),
    /// Display failed while rendering; the current message is skipped
    Display(DisplayError),
}

impl PanelError {
    /// Whether the firmware must stop
    ///
    /// Only a display that never came up is fatal. Everything else is
    /// recovered by the loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PanelError::DisplayInit(_))
    }
}

impl From<LinkError> for PanelError {
    fn from(e: LinkError) -> Self {
        PanelError::Link(e)
    }
}

impl From<DecodeError> for PanelError {
    fn from(e: DecodeError) -> Self {
        PanelError::Decode(e)
    }
}

impl From<AssetError> for PanelError {
    fn from(e: AssetError) -> Self {
        PanelError::Asset(e)
    }
}

impl From<DisplayError> for PanelError {
    fn from(e: DisplayError) -> Self {
        PanelError::Display(e)
    }
}
