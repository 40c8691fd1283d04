//! Assets compiled into the firmware image

use iot_screen_hal::StaticAssets;

const TABLE: &[(&str, &[u8])] = &[("/logo.bmp", include_bytes!("../assets/logo.bmp"))];

/// Flash-resident asset store
pub const ASSETS: StaticAssets<'static> = StaticAssets::new(TABLE);
