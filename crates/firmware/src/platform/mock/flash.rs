//! Mock Flash implementation for testing
//!
//! Provides in-memory Flash simulation for unit and integration tests.

use crate::platform::{error::FlashError, traits::FlashInterface, Result};

/// Flash block size (4 KB)
pub const MOCK_BLOCK_SIZE: u32 = 4096;

/// Flash capacity (four blocks)
pub const MOCK_FLASH_CAPACITY: u32 = 4 * MOCK_BLOCK_SIZE;

/// Protected firmware region (first two blocks)
pub const MOCK_FIRMWARE_SIZE: u32 = 2 * MOCK_BLOCK_SIZE;

/// Last block, used as the EEPROM sector
pub const MOCK_EEPROM_SECTOR: u32 = MOCK_FLASH_CAPACITY - MOCK_BLOCK_SIZE;

const BLOCK_COUNT: usize = (MOCK_FLASH_CAPACITY / MOCK_BLOCK_SIZE) as usize;

/// Mock Flash implementation
///
/// Simulates Flash storage in memory for testing. Supports:
/// - Read/write/erase operations with 1→0 programming semantics
/// - Corruption injection for testing error handling
/// - Erase count tracking
/// - Power-loss simulation for reliability testing
///
/// # Example
///
/// ```
/// use wifi_bridge_firmware::platform::mock::{MockFlash, MOCK_EEPROM_SECTOR};
/// use wifi_bridge_firmware::platform::traits::FlashInterface;
///
/// let mut flash = MockFlash::new();
///
/// flash.erase(MOCK_EEPROM_SECTOR, 4096).unwrap();
/// flash.write(MOCK_EEPROM_SECTOR, &[0x50, 0x69, 0x78]).unwrap();
///
/// let mut buf = [0u8; 3];
/// flash.read(MOCK_EEPROM_SECTOR, &mut buf).unwrap();
/// assert_eq!(&buf, b"Pix");
/// assert_eq!(flash.get_erase_count(MOCK_EEPROM_SECTOR), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFlash {
    /// Flash storage (initialized to 0xFF - erased state)
    storage: [u8; MOCK_FLASH_CAPACITY as usize],
    /// Erase count per block
    erase_counts: [u32; BLOCK_COUNT],
    /// Next write only half completes
    power_loss: bool,
    /// Next erase fails
    fail_erase: bool,
}

impl MockFlash {
    /// Create a new, fully erased mock Flash
    pub fn new() -> Self {
        Self {
            storage: [0xFF; MOCK_FLASH_CAPACITY as usize],
            erase_counts: [0; BLOCK_COUNT],
            power_loss: false,
            fail_erase: false,
        }
    }

    /// Get Flash contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> &[u8] {
        &self.storage[address as usize..address as usize + len]
    }

    /// Inject corruption at address (for testing error recovery)
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA;
        }
    }

    /// Number of times the block containing `address` was erased
    pub fn get_erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / MOCK_BLOCK_SIZE) as usize]
    }

    /// Total erase count across all blocks
    pub fn get_total_erase_count(&self) -> u32 {
        self.erase_counts.iter().sum()
    }

    /// Simulate power loss during the next write
    ///
    /// Only the first half of the data reaches the Flash.
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Make the next erase fail with `FlashError::EraseFailed`
    pub fn fail_next_erase(&mut self) {
        self.fail_erase = true;
    }

    fn is_writable(&self, address: u32) -> bool {
        (MOCK_FIRMWARE_SIZE..MOCK_FLASH_CAPACITY).contains(&address)
    }

    fn in_bounds(address: u32, len: usize) -> bool {
        (address as usize)
            .checked_add(len)
            .is_some_and(|end| end <= MOCK_FLASH_CAPACITY as usize)
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if !Self::in_bounds(address, buf.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let start = address as usize;
        buf.copy_from_slice(&self.storage[start..start + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.is_writable(address) || !Self::in_bounds(address, data.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let write_len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };

        // Programming can only clear bits
        let start = address as usize;
        for (cell, byte) in self.storage[start..start + write_len].iter_mut().zip(data) {
            *cell &= *byte;
        }
        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if !self.is_writable(address)
            || address % MOCK_BLOCK_SIZE != 0
            || size % MOCK_BLOCK_SIZE != 0
            || !Self::in_bounds(address, size as usize)
        {
            return Err(FlashError::InvalidAddress.into());
        }
        if self.fail_erase {
            self.fail_erase = false;
            return Err(FlashError::EraseFailed.into());
        }

        let start = address as usize;
        self.storage[start..start + size as usize].fill(0xFF);

        let first_block = (address / MOCK_BLOCK_SIZE) as usize;
        let blocks = (size / MOCK_BLOCK_SIZE) as usize;
        for count in &mut self.erase_counts[first_block..first_block + blocks] {
            *count += 1;
        }
        Ok(())
    }

    fn block_size(&self) -> u32 {
        MOCK_BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        MOCK_FLASH_CAPACITY
    }
}
