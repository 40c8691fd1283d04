//! Panel configuration compiled in from `panel.toml`

use heapless::String;
use iot_screen_core::config::{BootConfig, LinkTarget, PanelConfig, Timing};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));
}

pub use generated::MAC;

/// Build the runtime configuration from the generated constants
pub fn panel_config() -> PanelConfig {
    let mut splash_path = String::new();
    // build.rs rejects paths longer than MAX_PATH_LEN
    let _ = splash_path.push_str(generated::SPLASH_PATH);

    PanelConfig {
        link: LinkTarget {
            host: generated::HOST,
            port: generated::PORT,
        },
        timing: Timing {
            reconnect_backoff_ms: generated::RECONNECT_BACKOFF_MS,
            idle_ms: generated::IDLE_MS,
            rotation_step_ms: generated::ROTATION_STEP_MS,
            settle_ms: generated::SETTLE_MS,
        },
        boot: BootConfig {
            splash_path,
            blank_ms: generated::BLANK_MS,
            splash_ms: generated::SPLASH_MS,
            pre_banner_ms: generated::PRE_BANNER_MS,
            banner_ms: generated::BANNER_MS,
        },
    }
}
