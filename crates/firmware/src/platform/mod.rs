//! Platform abstraction layer
//!
//! Flash access for the bridge module and the EEPROM emulation built on it.
//! Mock implementations are always available for host testing.

pub mod eeprom;
pub mod error;
pub mod mock;
pub mod traits;

// Re-export commonly used types
pub use eeprom::{FlashEeprom, EEPROM_MAX_SIZE};
pub use error::{FlashError, PlatformError, Result};
pub use traits::FlashInterface;
