//! Build-time factory defaults
//!
//! Default values can be provided at build time via environment variables
//! (exported by `build.rs`, empty when unset):
//! - `WIFI_SSID` - access point name (truncated to 16 bytes)
//! - `WIFI_PASSWORD` - access point password (truncated to 16 bytes)
//! - `WIFI_CHANNEL` - WiFi channel
//! - `WIFI_UDP_HPORT` - UDP host port
//! - `WIFI_UDP_CPORT` - UDP client port
//! - `UART_BAUDRATE` - UART baud rate
//!
//! Unset or unparsable values keep the stock defaults. The firmware version
//! always comes from the crate version.

use core::str::FromStr;
use wifi_bridge_core::parameters::{pack_version, FactoryDefaults};

/// Running firmware version, packed for `SW_VER`
pub fn firmware_version() -> u32 {
    pack_version(
        overlay(env!("CARGO_PKG_VERSION_MAJOR"), 0),
        overlay(env!("CARGO_PKG_VERSION_MINOR"), 0),
        overlay(env!("CARGO_PKG_VERSION_PATCH"), 0),
    )
}

/// Factory defaults with build-time overrides applied
pub fn build_defaults() -> FactoryDefaults {
    let stock = FactoryDefaults::STANDARD;
    let mut defaults = stock.with_version(firmware_version());

    let ssid = env!("WIFI_SSID");
    if !ssid.is_empty() {
        defaults = defaults.with_ssid(ssid);
    }

    let password = env!("WIFI_PASSWORD");
    if !password.is_empty() {
        defaults = defaults.with_password(password);
    }

    defaults.wifi_channel = overlay(env!("WIFI_CHANNEL"), stock.wifi_channel);
    defaults.udp_host_port = overlay(env!("WIFI_UDP_HPORT"), stock.udp_host_port);
    defaults.udp_client_port = overlay(env!("WIFI_UDP_CPORT"), stock.udp_client_port);
    defaults.uart_baud_rate = overlay(env!("UART_BAUDRATE"), stock.uart_baud_rate);
    defaults
}

/// Parse a build-time value, keeping `default` when empty or invalid
fn overlay<T: FromStr>(value: &str, default: T) -> T {
    let value = value.trim();
    if value.is_empty() {
        return default;
    }
    value.parse().unwrap_or(default)
}
