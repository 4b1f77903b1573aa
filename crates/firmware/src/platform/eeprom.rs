//! Flash-emulated EEPROM
//!
//! The bridge keeps its parameters in a byte-addressable region backed by one
//! Flash sector. `begin` copies the sector into a RAM cache, reads and writes
//! only touch the cache, and `commit` erases the sector and programs the cache
//! back when something changed.
//!
//! # Sector Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Region bytes (size passed to `begin`)         │  sector + 0
//! ├───────────────────────────────────────────────┤
//! │ Erased (0xFF)                                 │  sector + size
//! └───────────────────────────────────────────────┘  sector + block_size
//! ```

use crate::platform::error::PlatformError;
use crate::platform::traits::FlashInterface;
use wifi_bridge_core::traits::{MediumError, PersistentMedium};

/// Largest region the cache can hold (one 4 KB sector)
pub const EEPROM_MAX_SIZE: usize = 4096;

/// Persistent medium over one Flash sector with a RAM cache
pub struct FlashEeprom<F: FlashInterface> {
    flash: F,
    /// Sector start address (block-aligned)
    sector: u32,
    /// First address past the firmware image
    firmware_end: u32,
    cache: [u8; EEPROM_MAX_SIZE],
    /// Opened region size (None until `begin`)
    size: Option<usize>,
    dirty: bool,
}

impl<F: FlashInterface> FlashEeprom<F> {
    /// Create an EEPROM over the sector at `sector`
    ///
    /// `firmware_end` is the first address past the firmware image; the space
    /// between it and the sector is reported as free.
    pub fn new(flash: F, sector: u32, firmware_end: u32) -> Self {
        Self {
            flash,
            sector,
            firmware_end,
            cache: [0xFF; EEPROM_MAX_SIZE],
            size: None,
            dirty: false,
        }
    }

    /// Whether the cache holds writes that were not committed yet
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Backing Flash
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Backing Flash (mutable)
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Give back the Flash; uncommitted writes are dropped
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn region(&self, offset: usize, len: usize) -> Result<core::ops::Range<usize>, MediumError> {
        let size = self.size.ok_or(MediumError::Unavailable)?;
        match offset.checked_add(len) {
            Some(end) if end <= size => Ok(offset..end),
            _ => Err(MediumError::OutOfBounds),
        }
    }
}

impl<F: FlashInterface> PersistentMedium for FlashEeprom<F> {
    fn begin(&mut self, size: usize) -> Result<(), MediumError> {
        let block_size = self.flash.block_size() as usize;
        if size > EEPROM_MAX_SIZE || size > block_size {
            return Err(MediumError::OutOfBounds);
        }
        if self.sector % self.flash.block_size() != 0
            || self.sector as usize + block_size > self.flash.capacity() as usize
        {
            return Err(PlatformError::InvalidConfig.into());
        }

        self.flash.read(self.sector, &mut self.cache[..size])?;
        self.size = Some(size);
        self.dirty = false;
        Ok(())
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError> {
        let range = self.region(offset, buf.len())?;
        buf.copy_from_slice(&self.cache[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        let range = self.region(offset, data.len())?;
        let cached = &mut self.cache[range];
        if cached != data {
            cached.copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), MediumError> {
        let size = self.size.ok_or(MediumError::Unavailable)?;
        if !self.dirty {
            return Ok(());
        }

        self.flash.erase(self.sector, self.flash.block_size())?;
        self.flash.write(self.sector, &self.cache[..size])?;
        self.dirty = false;
        Ok(())
    }

    fn free_space(&self) -> u32 {
        self.sector.saturating_sub(self.firmware_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockFlash, MOCK_BLOCK_SIZE, MOCK_EEPROM_SECTOR};

    fn eeprom() -> FlashEeprom<MockFlash> {
        FlashEeprom::new(MockFlash::new(), MOCK_EEPROM_SECTOR, 0x1800)
    }

    #[test]
    fn test_begin_loads_sector_into_cache() {
        let mut flash = MockFlash::new();
        flash.write(MOCK_EEPROM_SECTOR, &[1, 2, 3, 4]).unwrap();
        let mut eeprom = FlashEeprom::new(flash, MOCK_EEPROM_SECTOR, 0);

        eeprom.begin(8).unwrap();
        let mut buf = [0u8; 8];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_writes_reach_flash_only_on_commit() {
        let mut eeprom = eeprom();
        eeprom.begin(16).unwrap();
        eeprom.write(0, &[0xAB; 4]).unwrap();

        assert!(eeprom.is_dirty());
        assert_eq!(eeprom.flash().get_contents(MOCK_EEPROM_SECTOR, 4), &[0xFF; 4]);

        eeprom.commit().unwrap();
        assert!(!eeprom.is_dirty());
        assert_eq!(eeprom.flash().get_contents(MOCK_EEPROM_SECTOR, 4), &[0xAB; 4]);
    }

    #[test]
    fn test_commit_can_set_bits_again() {
        let mut eeprom = eeprom();
        eeprom.begin(4).unwrap();
        eeprom.write(0, &[0x00; 4]).unwrap();
        eeprom.commit().unwrap();

        eeprom.write(0, &[0x5A; 4]).unwrap();
        eeprom.commit().unwrap();

        assert_eq!(eeprom.flash().get_contents(MOCK_EEPROM_SECTOR, 4), &[0x5A; 4]);
        assert_eq!(eeprom.flash().get_erase_count(MOCK_EEPROM_SECTOR), 2);
    }

    #[test]
    fn test_clean_commit_skips_erase() {
        let mut eeprom = eeprom();
        eeprom.begin(4).unwrap();
        // Same bytes as the erased sector
        eeprom.write(0, &[0xFF; 4]).unwrap();

        eeprom.commit().unwrap();
        assert_eq!(eeprom.flash().get_total_erase_count(), 0);
    }

    #[test]
    fn test_access_requires_begin_and_bounds() {
        let mut eeprom = eeprom();
        let mut buf = [0u8; 4];
        assert_eq!(eeprom.read(0, &mut buf), Err(MediumError::Unavailable));
        assert_eq!(eeprom.commit(), Err(MediumError::Unavailable));

        eeprom.begin(8).unwrap();
        assert_eq!(eeprom.read(6, &mut buf), Err(MediumError::OutOfBounds));
        assert_eq!(eeprom.write(usize::MAX, &buf), Err(MediumError::OutOfBounds));
    }

    #[test]
    fn test_begin_rejects_oversized_region() {
        let mut eeprom = eeprom();
        assert_eq!(
            eeprom.begin(MOCK_BLOCK_SIZE as usize + 1),
            Err(MediumError::OutOfBounds)
        );
    }

    #[test]
    fn test_begin_rejects_misplaced_sector() {
        let mut eeprom = FlashEeprom::new(MockFlash::new(), MOCK_EEPROM_SECTOR + 1, 0);
        assert_eq!(eeprom.begin(8), Err(MediumError::Unavailable));
    }

    #[test]
    fn test_erase_failure_is_commit_failure() {
        let mut eeprom = eeprom();
        eeprom.begin(4).unwrap();
        eeprom.write(0, &[0; 4]).unwrap();
        eeprom.flash_mut().fail_next_erase();

        assert_eq!(eeprom.commit(), Err(MediumError::CommitFailed));
        assert!(eeprom.is_dirty());
    }

    #[test]
    fn test_free_space_between_firmware_and_sector() {
        let eeprom = eeprom();
        assert_eq!(eeprom.free_space(), MOCK_EEPROM_SECTOR - 0x1800);

        let crowded = FlashEeprom::new(MockFlash::new(), MOCK_EEPROM_SECTOR, u32::MAX);
        assert_eq!(crowded.free_space(), 0);
    }
}
