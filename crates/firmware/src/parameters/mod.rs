//! Parameter Storage System
//!
//! Binds the bridge parameter store from `wifi_bridge_core` to the device:
//! Flash-emulated EEPROM as the medium, build-time factory defaults, log
//! reporting, and a transport-agnostic request handler.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     Parameter protocol (transport)     │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │        ParamHandler                    │
//! │  - list / read / set / hash            │
//! │  - save / factory reset                │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │        BridgeParameters (core)         │
//! │  - typed accessors, CRC recovery       │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │        FlashEeprom                     │
//! │  (one 4 KB sector, RAM cached)         │
//! └────────────────────────────────────────┘
//! ```

pub mod defaults;
pub mod handler;
pub mod observer;

pub use defaults::{build_defaults, firmware_version};
pub use handler::{ParamHandler, ParamHandlerError, ParamRead, ParamReport};
pub use observer::LogObserver;

use crate::platform::{FlashEeprom, FlashInterface};
use wifi_bridge_core::parameters::{BridgeParameters, StoreError};

/// Bridge parameters on Flash-emulated EEPROM, reporting to the log
pub type BridgeStore<F> = BridgeParameters<FlashEeprom<F>, LogObserver>;

/// Open the bridge parameters on the EEPROM sector at `sector`
///
/// Runs boot recovery: a blank or corrupted sector is rewritten with the
/// build-time factory defaults.
///
/// # Errors
///
/// Returns `StoreError::Medium` if the sector cannot be read or rewritten.
pub fn open_bridge_store<F: FlashInterface>(
    flash: F,
    sector: u32,
    firmware_end: u32,
) -> Result<BridgeStore<F>, StoreError> {
    let eeprom = FlashEeprom::new(flash, sector, firmware_end);
    match BridgeParameters::initialize(eeprom, build_defaults(), LogObserver) {
        Ok(params) => {
            crate::log_info!(
                "Bridge parameters ready: SSID {}, channel {}, UART {}",
                params.wifi_ssid_str(),
                params.wifi_channel(),
                params.uart_baud_rate()
            );
            Ok(params)
        }
        Err(e) => {
            crate::log_error!("Parameter storage unavailable: {}", e.as_str());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockFlash, MOCK_EEPROM_SECTOR, MOCK_FIRMWARE_SIZE};
    use wifi_bridge_core::traits::MediumError;

    #[test]
    fn test_open_bridge_store_on_blank_flash() {
        let params = open_bridge_store(MockFlash::new(), MOCK_EEPROM_SECTOR, MOCK_FIRMWARE_SIZE)
            .unwrap();
        assert_eq!(params.sw_version(), firmware_version());
    }

    #[test]
    fn test_open_bridge_store_reports_misaligned_sector() {
        let err = open_bridge_store(MockFlash::new(), MOCK_EEPROM_SECTOR + 1, MOCK_FIRMWARE_SIZE)
            .err();
        assert_eq!(err, Some(StoreError::Medium(MediumError::Unavailable)));
        assert_eq!(err.map(|e| e.as_str()), Some("Unavailable"));
    }
}
