//! Bridge parameter schema and typed accessors
//!
//! Defines the fixed parameter set of the WiFi/UART MAVLink bridge and wraps a
//! [`ParameterStore`] with typed getters and setters for it.
//!
//! # Parameters
//!
//! | Id | Name             | Type   | Notes                               |
//! |----|------------------|--------|-------------------------------------|
//! | 0  | `SW_VER`         | UINT32 | Reset to running version every boot |
//! | 1  | `DEBUG_ENABLED`  | INT8   |                                     |
//! | 2  | `WIFI_CHANNEL`   | UINT32 |                                     |
//! | 3  | `WIFI_UDP_HPORT` | UINT16 |                                     |
//! | 4  | `WIFI_UDP_CPORT` | UINT16 |                                     |
//! | 5-8  | `WIFI_SSID1..4`     | UINT32 | 16-byte SSID, 4 bytes each   |
//! | 9-12 | `WIFI_PASSWORD1..4` | UINT32 | 16-byte password, 4 bytes each |
//! | 13 | `UART_BAUDRATE`  | UINT32 |                                     |
//!
//! The parameter protocol has no string type, so the SSID and password are
//! carried as four consecutive 32-bit parameters over one 16-byte buffer.
//!
//! # Example
//!
//! ```
//! use wifi_bridge_core::parameters::{BridgeParameters, FactoryDefaults};
//! use wifi_bridge_core::traits::{MockMedium, NullObserver};
//!
//! let medium = MockMedium::new();
//! let mut params =
//!     BridgeParameters::initialize(medium, FactoryDefaults::STANDARD, NullObserver).unwrap();
//!
//! // Blank medium: factory defaults were applied and saved
//! assert_eq!(params.wifi_channel(), 11);
//! assert_eq!(params.wifi_ssid_str(), "PixRacer");
//!
//! params.set_wifi_channel(6);
//! params.save_all().unwrap();
//! ```

use super::defaults::FactoryDefaults;
use super::error::{RegistryError, StoreError};
use super::registry::{Lookup, ParamFlags, ParamSpec, ParamType, Registry, StoreLayout};
use super::store::{ParameterStore, Result};
use super::values::field_str;
use crate::traits::medium::PersistentMedium;
use crate::traits::observer::{NullObserver, StoreObserver};
use core::ops::Range;

/// Width of the SSID and password fields
pub const TEXT_FIELD_LEN: usize = 16;

/// Reserved persistent space (32 words). Changing it resets every device to defaults.
pub const EEPROM_SPACE: usize = 32 * 4;

/// CRC trailer offset (two words before the end of the reserved space)
pub const EEPROM_CRC_OFFSET: usize = EEPROM_SPACE - 2 * 4;

/// Bridge persistent layout
pub const BRIDGE_LAYOUT: StoreLayout = StoreLayout::new(EEPROM_SPACE, EEPROM_CRC_OFFSET);

/// Number of bridge parameters
pub const PARAM_COUNT: usize = 14;

/// Bridge parameter ids (declaration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ParamId {
    SwVersion = 0,
    DebugEnabled,
    WifiChannel,
    WifiUdpHport,
    WifiUdpCport,
    WifiSsid1,
    WifiSsid2,
    WifiSsid3,
    WifiSsid4,
    WifiPassword1,
    WifiPassword2,
    WifiPassword3,
    WifiPassword4,
    UartBaudrate,
}

impl ParamId {
    /// All ids in declaration order
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::SwVersion,
        ParamId::DebugEnabled,
        ParamId::WifiChannel,
        ParamId::WifiUdpHport,
        ParamId::WifiUdpCport,
        ParamId::WifiSsid1,
        ParamId::WifiSsid2,
        ParamId::WifiSsid3,
        ParamId::WifiSsid4,
        ParamId::WifiPassword1,
        ParamId::WifiPassword2,
        ParamId::WifiPassword3,
        ParamId::WifiPassword4,
        ParamId::UartBaudrate,
    ];

    /// Numeric id
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Id from its numeric value
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}

/// Bridge schema table, in declaration (and persisted) order
pub const BRIDGE_PARAMS: [ParamSpec; PARAM_COUNT] = [
    ParamSpec::new("SW_VER", ParamType::Uint32)
        .with_flags(ParamFlags::RESET_ON_BOOT.union(ParamFlags::READ_ONLY)),
    ParamSpec::new("DEBUG_ENABLED", ParamType::Int8),
    ParamSpec::new("WIFI_CHANNEL", ParamType::Uint32),
    ParamSpec::new("WIFI_UDP_HPORT", ParamType::Uint16),
    ParamSpec::new("WIFI_UDP_CPORT", ParamType::Uint16),
    ParamSpec::new("WIFI_SSID1", ParamType::Uint32),
    ParamSpec::new("WIFI_SSID2", ParamType::Uint32),
    ParamSpec::new("WIFI_SSID3", ParamType::Uint32),
    ParamSpec::new("WIFI_SSID4", ParamType::Uint32),
    ParamSpec::new("WIFI_PASSWORD1", ParamType::Uint32),
    ParamSpec::new("WIFI_PASSWORD2", ParamType::Uint32),
    ParamSpec::new("WIFI_PASSWORD3", ParamType::Uint32),
    ParamSpec::new("WIFI_PASSWORD4", ParamType::Uint32),
    ParamSpec::new("UART_BAUDRATE", ParamType::Uint32),
];

/// Build the bridge registry
pub fn bridge_registry() -> core::result::Result<Registry, RegistryError> {
    Registry::new(&BRIDGE_PARAMS, BRIDGE_LAYOUT)
}

/// Bridge configuration: the parameter store with typed accessors.
///
/// A single owned object; hand `&mut BridgeParameters` to whichever handler
/// (network, console) needs to read or change settings. Setters only touch
/// live values; call [`save_all`](Self::save_all) to persist.
pub struct BridgeParameters<M: PersistentMedium, O: StoreObserver = NullObserver> {
    store: ParameterStore<M, FactoryDefaults, O>,
}

impl<M: PersistentMedium, O: StoreObserver> BridgeParameters<M, O> {
    /// Open the medium and run boot recovery
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Medium` if the medium cannot be opened or accessed.
    pub fn initialize(medium: M, defaults: FactoryDefaults, observer: O) -> Result<Self> {
        let registry = bridge_registry()?;
        let store = ParameterStore::initialize(registry, medium, defaults, observer)?;
        Ok(Self { store })
    }

    fn word(&self, id: ParamId) -> u32 {
        self.store.value(id.id()).unwrap_or_default()
    }

    fn set_word(&mut self, id: ParamId, value: u32) {
        let (registry, values) = self.store.parts_mut();
        if let Some(descriptor) = registry.get(id.id()) {
            values.set(descriptor, value);
        }
    }

    /// Byte range of a 16-byte text field starting at `first`
    fn text_range(&self, first: ParamId) -> Range<usize> {
        let offset = self
            .store
            .registry()
            .get(first.id())
            .map_or(0, |d| d.offset);
        offset..offset + TEXT_FIELD_LEN
    }

    fn text(&self, first: ParamId) -> &[u8] {
        self.store.values().span(self.text_range(first))
    }

    fn set_text(&mut self, first: ParamId, text: &str) {
        let range = self.text_range(first);
        self.store.parts_mut().1.write_text(range, text.as_bytes());
    }

    /// Running firmware version
    pub fn sw_version(&self) -> u32 {
        self.word(ParamId::SwVersion)
    }

    /// Debug output flag
    pub fn debug_enabled(&self) -> i8 {
        self.word(ParamId::DebugEnabled) as i8
    }

    /// WiFi channel
    pub fn wifi_channel(&self) -> u32 {
        self.word(ParamId::WifiChannel)
    }

    /// UDP host port
    pub fn wifi_udp_hport(&self) -> u16 {
        self.word(ParamId::WifiUdpHport) as u16
    }

    /// UDP client port
    pub fn wifi_udp_cport(&self) -> u16 {
        self.word(ParamId::WifiUdpCport) as u16
    }

    /// SSID field (16 bytes, zero-padded, not necessarily NUL-terminated)
    pub fn wifi_ssid(&self) -> &[u8] {
        self.text(ParamId::WifiSsid1)
    }

    /// SSID as text (up to the first NUL)
    pub fn wifi_ssid_str(&self) -> &str {
        field_str(self.wifi_ssid())
    }

    /// Password field (16 bytes, zero-padded, not necessarily NUL-terminated)
    pub fn wifi_password(&self) -> &[u8] {
        self.text(ParamId::WifiPassword1)
    }

    /// Password as text (up to the first NUL)
    pub fn wifi_password_str(&self) -> &str {
        field_str(self.wifi_password())
    }

    /// UART baud rate
    pub fn uart_baud_rate(&self) -> u32 {
        self.word(ParamId::UartBaudrate)
    }

    /// Free firmware space recorded at the last load/reset (not persisted)
    pub fn flash_left(&self) -> u32 {
        self.store.flash_left()
    }

    /// Set the debug output flag
    pub fn set_debug_enabled(&mut self, enabled: i8) {
        self.set_word(ParamId::DebugEnabled, enabled as i32 as u32);
    }

    /// Set the WiFi channel
    pub fn set_wifi_channel(&mut self, channel: u32) {
        self.set_word(ParamId::WifiChannel, channel);
    }

    /// Set the UDP host port
    pub fn set_wifi_udp_hport(&mut self, port: u16) {
        self.set_word(ParamId::WifiUdpHport, port as u32);
    }

    /// Set the UDP client port
    pub fn set_wifi_udp_cport(&mut self, port: u16) {
        self.set_word(ParamId::WifiUdpCport, port as u32);
    }

    /// Set the SSID; longer than 16 bytes is truncated
    pub fn set_wifi_ssid(&mut self, ssid: &str) {
        self.set_text(ParamId::WifiSsid1, ssid);
    }

    /// Set the password; longer than 16 bytes is truncated
    pub fn set_wifi_password(&mut self, password: &str) {
        self.set_text(ParamId::WifiPassword1, password);
    }

    /// Set the UART baud rate
    pub fn set_uart_baud_rate(&mut self, baud: u32) {
        self.set_word(ParamId::UartBaudrate, baud);
    }

    /// Look up a descriptor by numeric id (sentinel when out of range)
    pub fn descriptor_at(&self, id: usize) -> Lookup<'_> {
        self.store.descriptor_at(id)
    }

    /// Persist all live values and the CRC
    pub fn save_all(&mut self) -> core::result::Result<(), StoreError> {
        self.store.save_all()
    }

    /// Restore factory defaults in memory (call `save_all` to persist)
    pub fn reset_to_defaults(&mut self) {
        self.store.reset_to_defaults();
    }

    /// Parameter set fingerprint over names and current values
    pub fn identity_hash(&self) -> u32 {
        self.store.identity_hash()
    }

    /// Underlying generic store
    pub fn store(&self) -> &ParameterStore<M, FactoryDefaults, O> {
        &self.store
    }

    /// Underlying generic store (mutable)
    pub fn store_mut(&mut self) -> &mut ParameterStore<M, FactoryDefaults, O> {
        &mut self.store
    }

    /// Give back the medium (e.g. to simulate a reboot)
    pub fn into_medium(self) -> M {
        self.store.into_medium()
    }
}
