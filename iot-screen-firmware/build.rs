//! Build script for iot-screen-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time
//! - Generates the panel configuration constants into OUT_DIR

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Must match `iot_screen_core::config::MAX_PATH_LEN`
const MAX_PATH_LEN: usize = 32;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelToml {
    link: LinkToml,
    network: NetworkToml,
    #[serde(default)]
    timing: TimingToml,
    #[serde(default)]
    boot: BootToml,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkToml {
    host: String,
    port: u16,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkToml {
    mac: String,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimingToml {
    reconnect_backoff_ms: u32,
    idle_ms: u32,
    rotation_step_ms: u32,
    settle_ms: u32,
}

impl Default for TimingToml {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: 1000,
            idle_ms: 500,
            rotation_step_ms: 1000,
            settle_ms: 2000,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BootToml {
    splash_path: String,
    blank_ms: u32,
    splash_ms: u32,
    pre_banner_ms: u32,
    banner_ms: u32,
}

impl Default for BootToml {
    fn default() -> Self {
        Self {
            splash_path: "/logo.bmp".to_string(),
            blank_ms: 1000,
            splash_ms: 1000,
            pre_banner_ms: 500,
            banner_ms: 1000,
        }
    }
}

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml and write `panel_config.rs` into OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml configuration file.          ║\n\
            ║  Please create one in the iot-screen-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: PanelToml = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid panel.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let (host, mac) = validate(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("panel_config.rs")).unwrap();
    write!(
        f,
        "// Generated by build.rs from panel.toml\n\
         pub const HOST: [u8; 4] = {host:?};\n\
         pub const PORT: u16 = {port};\n\
         pub const MAC: [u8; 6] = {mac:?};\n\
         pub const RECONNECT_BACKOFF_MS: u32 = {backoff};\n\
         pub const IDLE_MS: u32 = {idle};\n\
         pub const ROTATION_STEP_MS: u32 = {step};\n\
         pub const SETTLE_MS: u32 = {settle};\n\
         pub const SPLASH_PATH: &str = {splash:?};\n\
         pub const BLANK_MS: u32 = {blank};\n\
         pub const SPLASH_MS: u32 = {splash_ms};\n\
         pub const PRE_BANNER_MS: u32 = {pre_banner};\n\
         pub const BANNER_MS: u32 = {banner};\n",
        host = host,
        port = config.link.port,
        mac = mac,
        backoff = config.timing.reconnect_backoff_ms,
        idle = config.timing.idle_ms,
        step = config.timing.rotation_step_ms,
        settle = config.timing.settle_ms,
        splash = config.boot.splash_path,
        blank = config.boot.blank_ms,
        splash_ms = config.boot.splash_ms,
        pre_banner = config.boot.pre_banner_ms,
        banner = config.boot.banner_ms,
    )
    .unwrap();

    println!("cargo:warning=panel.toml validated successfully");
}

/// Check values and parse the address fields
fn validate(config: &PanelToml) -> ([u8; 4], [u8; 6]) {
    let mut errors = Vec::new();

    let host = match config.link.host.parse::<Ipv4Addr>() {
        Ok(addr) if addr.is_unspecified() => {
            errors.push("[link] host cannot be 0.0.0.0".to_string());
            [0; 4]
        }
        Ok(addr) => addr.octets(),
        Err(_) => {
            errors.push(format!("[link] host '{}' is not an IPv4 address", config.link.host));
            [0; 4]
        }
    };

    if config.link.port == 0 {
        errors.push("[link] port must be 1-65535".to_string());
    }

    let mac = match parse_mac(&config.network.mac) {
        Some(mac) => mac,
        None => {
            errors.push(format!(
                "[network] mac '{}' must be six hex octets",
                config.network.mac
            ));
            [0; 6]
        }
    };

    if config.timing.reconnect_backoff_ms == 0 {
        errors.push("[timing] reconnect_backoff_ms must be non-zero".to_string());
    }

    let splash = &config.boot.splash_path;
    if !splash.starts_with('/') {
        errors.push("[boot] splash_path must start with '/'".to_string());
    }
    if splash.len() > MAX_PATH_LEN {
        errors.push(format!(
            "[boot] splash_path is longer than {} bytes",
            MAX_PATH_LEN
        ));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    (host, mac)
}

fn parse_mac(text: &str) -> Option<[u8; 6]> {
    let mut mac = [0u8; 6];
    let mut parts = text.split(':');
    for byte in mac.iter_mut() {
        *byte = u8::from_str_radix(parts.next()?, 16).ok()?;
    }
    parts.next().is_none().then_some(mac)
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
