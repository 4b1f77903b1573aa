//! Flash interface trait
//!
//! This module defines the Flash storage interface that platform implementations must provide.
//! The bridge uses one Flash sector to emulate the byte-addressable EEPROM that
//! holds its parameters.

use crate::platform::Result;

/// Flash interface trait
///
/// Platform implementations must provide this interface for Flash read/write/erase operations.
///
/// # Flash Characteristics
///
/// - Flash is organized in blocks (4 KB sectors on the bridge module)
/// - Erase operations set all bytes to 0xFF
/// - Write operations can only change bits from 1→0 (must erase first to reset to 1)
/// - Erase + program of a sector blocks for tens of milliseconds
///
/// # Safety Invariants
///
/// - Flash peripheral must be initialized before use
/// - Only one owner per Flash instance (no concurrent access)
/// - Must not erase/write firmware region (implementations must validate addresses)
///
/// # Memory Layout
///
/// ```text
/// [Firmware image]     0x000000 - firmware end       DO NOT WRITE
/// [Free space]         firmware end - EEPROM sector   (reported as flash headroom)
/// [EEPROM sector]      last 4 KB sector              parameter region
/// ```
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if address is out of bounds.
    /// Returns `PlatformError::Flash(FlashError::ReadFailed)` if the read operation fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Program `data` starting at `address`
    ///
    /// The target must have been erased; programming only clears bits.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if address is in firmware region.
    /// Returns `PlatformError::Flash(FlashError::WriteFailed)` if the write operation fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `size` bytes starting at `address` (sets them to 0xFF)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if:
    /// - Address is in firmware region
    /// - Address is not block-aligned
    /// - Size is not a multiple of block size
    ///
    /// Returns `PlatformError::Flash(FlashError::EraseFailed)` if the erase operation fails.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit size
    fn block_size(&self) -> u32;

    /// Total Flash capacity in bytes
    fn capacity(&self) -> u32;
}
