//! Default policy
//!
//! Factory values used on first boot, after corruption, for an explicit
//! factory reset, and for parameters flagged `RESET_ON_BOOT` on every load.

use super::bridge::{ParamId, TEXT_FIELD_LEN};
use super::registry::Descriptor;

/// Source of default values, one 32-bit word per descriptor
///
/// The store narrows each word to the descriptor's width.
pub trait DefaultPolicy {
    /// Default value for `descriptor`, widened to 32 bits
    fn default_value(&self, descriptor: &Descriptor) -> u32;
}

impl<T: DefaultPolicy + ?Sized> DefaultPolicy for &T {
    fn default_value(&self, descriptor: &Descriptor) -> u32 {
        (**self).default_value(descriptor)
    }
}

/// Defaults indexed by descriptor id; ids past the end default to zero
impl DefaultPolicy for [u32] {
    fn default_value(&self, descriptor: &Descriptor) -> u32 {
        self.get(descriptor.id).copied().unwrap_or(0)
    }
}

impl<const N: usize> DefaultPolicy for [u32; N] {
    fn default_value(&self, descriptor: &Descriptor) -> u32 {
        self.as_slice().default_value(descriptor)
    }
}

/// Pack a firmware version into the bridge's `SW_VER` layout
///
/// `major` in bits 24..32, `minor` in bits 16..24, `build` in bits 0..16.
pub const fn pack_version(major: u8, minor: u8, build: u16) -> u32 {
    ((major as u32) << 24) | ((minor as u32) << 16) | build as u32
}

/// Copy a string into a zero-filled fixed-width text field (truncating)
pub const fn text_field(text: &str) -> [u8; TEXT_FIELD_LEN] {
    let bytes = text.as_bytes();
    let mut field = [0u8; TEXT_FIELD_LEN];
    let mut i = 0;
    while i < bytes.len() && i < TEXT_FIELD_LEN {
        field[i] = bytes[i];
        i += 1;
    }
    field
}

/// Bridge factory defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryDefaults {
    /// Running firmware version (always wins over the stored value)
    pub version: u32,
    /// Debug output enabled
    pub debug_enabled: i8,
    /// WiFi access point channel
    pub wifi_channel: u32,
    /// UDP port the bridge listens on (host)
    pub udp_host_port: u16,
    /// UDP port the bridge sends to (client)
    pub udp_client_port: u16,
    /// UART baud rate towards the autopilot
    pub uart_baud_rate: u32,
    /// Access point SSID
    pub ssid: [u8; TEXT_FIELD_LEN],
    /// Access point password
    pub password: [u8; TEXT_FIELD_LEN],
}

impl FactoryDefaults {
    /// Stock factory configuration
    pub const STANDARD: Self = Self {
        version: pack_version(1, 2, 2),
        debug_enabled: 0,
        wifi_channel: 11,
        udp_host_port: 14550,
        udp_client_port: 14555,
        uart_baud_rate: 921_600,
        ssid: text_field("PixRacer"),
        password: text_field("pixracer"),
    };

    /// Replace the SSID (truncated to 16 bytes)
    pub const fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = text_field(ssid);
        self
    }

    /// Replace the password (truncated to 16 bytes)
    pub const fn with_password(mut self, password: &str) -> Self {
        self.password = text_field(password);
        self
    }

    /// Replace the firmware version
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

impl Default for FactoryDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Little-endian word `index` of a text field
fn text_word(field: &[u8; TEXT_FIELD_LEN], index: usize) -> u32 {
    let start = index * 4;
    u32::from_le_bytes([
        field[start],
        field[start + 1],
        field[start + 2],
        field[start + 3],
    ])
}

impl DefaultPolicy for FactoryDefaults {
    fn default_value(&self, descriptor: &Descriptor) -> u32 {
        let Some(id) = ParamId::from_id(descriptor.id) else {
            return 0;
        };

        match id {
            ParamId::SwVersion => self.version,
            ParamId::DebugEnabled => self.debug_enabled as i32 as u32,
            ParamId::WifiChannel => self.wifi_channel,
            ParamId::WifiUdpHport => self.udp_host_port as u32,
            ParamId::WifiUdpCport => self.udp_client_port as u32,
            ParamId::WifiSsid1 => text_word(&self.ssid, 0),
            ParamId::WifiSsid2 => text_word(&self.ssid, 1),
            ParamId::WifiSsid3 => text_word(&self.ssid, 2),
            ParamId::WifiSsid4 => text_word(&self.ssid, 3),
            ParamId::WifiPassword1 => text_word(&self.password, 0),
            ParamId::WifiPassword2 => text_word(&self.password, 1),
            ParamId::WifiPassword3 => text_word(&self.password, 2),
            ParamId::WifiPassword4 => text_word(&self.password, 3),
            ParamId::UartBaudrate => self.uart_baud_rate,
        }
    }
}
