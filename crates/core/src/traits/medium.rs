//! Persistent medium abstraction for parameter storage.
//!
//! This module provides the `PersistentMedium` trait that abstracts over the
//! byte-addressable, non-volatile region the parameter store lives in
//! (flash-emulated EEPROM on the device, in-memory mock on host).

use core::fmt;
use heapless::Vec;

/// Errors reported by a persistent medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumError {
    /// Medium could not be opened/mapped, or was used before `begin`
    Unavailable,
    /// Access outside the opened region
    OutOfBounds,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Durable commit failed
    CommitFailed,
}

impl MediumError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            MediumError::Unavailable => "Unavailable",
            MediumError::OutOfBounds => "OutOfBounds",
            MediumError::ReadFailed => "ReadFailed",
            MediumError::WriteFailed => "WriteFailed",
            MediumError::CommitFailed => "CommitFailed",
        }
    }
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumError::Unavailable => write!(f, "persistent medium unavailable"),
            MediumError::OutOfBounds => write!(f, "access outside persistent region"),
            MediumError::ReadFailed => write!(f, "persistent medium read failed"),
            MediumError::WriteFailed => write!(f, "persistent medium write failed"),
            MediumError::CommitFailed => write!(f, "persistent medium commit failed"),
        }
    }
}

/// Byte-addressable non-volatile region with an explicit durable commit.
///
/// Offsets are relative to the start of the region opened by [`begin`].
/// Writes are only guaranteed durable after [`commit`] returns `Ok`.
///
/// # Safety Invariants
///
/// - `begin` must succeed before any read/write/commit
/// - Only one owner per medium instance (no concurrent access)
/// - `commit` may block for a bounded but non-negligible time (flash erase +
///   program); do not call it from a latency-critical interrupt handler
///
/// [`begin`]: PersistentMedium::begin
/// [`commit`]: PersistentMedium::commit
pub trait PersistentMedium {
    /// Open (map) a region of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns `MediumError::Unavailable` if the medium cannot be opened at all,
    /// `MediumError::OutOfBounds` if `size` exceeds what the medium can back.
    fn begin(&mut self, size: usize) -> Result<(), MediumError>;

    /// Read `buf.len()` bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError>;

    /// Write `data` starting at `offset` (not durable until `commit`).
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError>;

    /// Make all previous writes durable.
    fn commit(&mut self) -> Result<(), MediumError>;

    /// Free space left on the backing storage outside the region, in bytes.
    ///
    /// Informational only; reported as the bridge's flash headroom.
    fn free_space(&self) -> u32 {
        0
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Maximum region size supported by [`MockMedium`]
pub const MOCK_MEDIUM_SIZE: usize = 1024;

/// Mock persistent medium for testing.
///
/// Keeps two images of the region: the working image that reads and writes
/// touch, and the durable image that `commit` copies the working image into.
/// [`power_cycle`](MockMedium::power_cycle) drops uncommitted writes the way a
/// reset would. Fresh mocks start erased (0xFF), like blank flash.
///
/// # Example
///
/// ```
/// use wifi_bridge_core::traits::{MockMedium, PersistentMedium};
///
/// let mut medium = MockMedium::new();
/// medium.begin(16).unwrap();
/// medium.write(0, &[1, 2, 3]).unwrap();
/// medium.commit().unwrap();
///
/// let mut buf = [0u8; 3];
/// medium.read(0, &mut buf).unwrap();
/// assert_eq!(buf, [1, 2, 3]);
/// assert_eq!(medium.commit_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockMedium {
    /// Working image (reads/writes)
    working: Vec<u8, MOCK_MEDIUM_SIZE>,
    /// Durable image (survives power cycles)
    durable: Vec<u8, MOCK_MEDIUM_SIZE>,
    /// Size of the opened region (None until `begin`)
    opened: Option<usize>,
    /// Refuse to open
    unavailable: bool,
    /// Fail the next commit
    fail_commit: bool,
    /// Number of successful commits
    commits: u32,
    /// Reported free space
    free_space: u32,
}

impl MockMedium {
    /// Create a new erased mock medium
    pub fn new() -> Self {
        Self::filled(0xFF)
    }

    /// Create a mock medium with every byte set to `byte`
    pub fn filled(byte: u8) -> Self {
        let mut durable = Vec::new();
        // MOCK_MEDIUM_SIZE is the Vec capacity, resize cannot fail
        let _ = durable.resize(MOCK_MEDIUM_SIZE, byte);
        Self {
            working: durable.clone(),
            durable,
            opened: None,
            unavailable: false,
            fail_commit: false,
            commits: 0,
            free_space: 0,
        }
    }

    /// Create a mock medium whose durable image starts with `contents`
    ///
    /// Bytes past `contents` are erased (0xFF).
    pub fn with_contents(contents: &[u8]) -> Self {
        let mut medium = Self::new();
        let len = contents.len().min(MOCK_MEDIUM_SIZE);
        medium.durable[..len].copy_from_slice(&contents[..len]);
        medium.working = medium.durable.clone();
        medium
    }

    /// Durable contents (for test verification)
    pub fn contents(&self, offset: usize, len: usize) -> &[u8] {
        &self.durable[offset..offset + len]
    }

    /// Flip bits of a durable byte (for testing corruption recovery)
    pub fn corrupt(&mut self, offset: usize, mask: u8) {
        self.durable[offset] ^= mask;
        self.working[offset] = self.durable[offset];
    }

    /// Simulate a reset: uncommitted writes are lost and the region is closed
    pub fn power_cycle(&mut self) {
        self.working = self.durable.clone();
        self.opened = None;
    }

    /// Make `begin` fail with `MediumError::Unavailable`
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Make the next `commit` fail with `MediumError::CommitFailed`
    pub fn fail_next_commit(&mut self) {
        self.fail_commit = true;
    }

    /// Set the free space reported to the store
    pub fn set_free_space(&mut self, bytes: u32) {
        self.free_space = bytes;
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> u32 {
        self.commits
    }

    /// Validate an access against the opened region
    fn check(&self, offset: usize, len: usize) -> Result<(), MediumError> {
        let size = self.opened.ok_or(MediumError::Unavailable)?;
        match offset.checked_add(len) {
            Some(end) if end <= size => Ok(()),
            _ => Err(MediumError::OutOfBounds),
        }
    }
}

impl Default for MockMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentMedium for MockMedium {
    fn begin(&mut self, size: usize) -> Result<(), MediumError> {
        if self.unavailable {
            return Err(MediumError::Unavailable);
        }
        if size > MOCK_MEDIUM_SIZE {
            return Err(MediumError::OutOfBounds);
        }
        self.opened = Some(size);
        Ok(())
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError> {
        self.check(offset, buf.len())?;
        buf.copy_from_slice(&self.working[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        self.check(offset, data.len())?;
        self.working[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), MediumError> {
        if self.opened.is_none() {
            return Err(MediumError::Unavailable);
        }
        if self.fail_commit {
            self.fail_commit = false;
            return Err(MediumError::CommitFailed);
        }
        self.durable = self.working.clone();
        self.commits += 1;
        Ok(())
    }

    fn free_space(&self) -> u32 {
        self.free_space
    }
}
