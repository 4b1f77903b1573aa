//! Mock platform implementation for testing
//!
//! Mock implementations of platform traits that can be used for unit and
//! integration testing without hardware. Always compiled; they allocate nothing.

mod flash;

pub use flash::{
    MockFlash, MOCK_BLOCK_SIZE, MOCK_EEPROM_SECTOR, MOCK_FIRMWARE_SIZE, MOCK_FLASH_CAPACITY,
};
