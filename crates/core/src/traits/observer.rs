//! Store observer abstraction.
//!
//! The parameter store reports its lifecycle through a `StoreObserver`
//! instead of logging directly, so the core contains no logging backend and no
//! build-conditional branches. The firmware crate provides a defmt-backed
//! implementation.

use crate::parameters::registry::Registry;
use crate::parameters::values::ParameterValues;

/// Receives parameter store lifecycle events.
///
/// All methods default to no-ops; implement only what you need.
pub trait StoreObserver {
    /// Called after the live values were loaded from the medium
    fn loaded(&mut self, _registry: &Registry, _values: &ParameterValues) {}

    /// Called after the live values were written and committed with `crc`
    fn saved(&mut self, _registry: &Registry, _values: &ParameterValues, _crc: u32) {}

    /// Called after the live values were replaced by factory defaults
    fn reset(&mut self, _registry: &Registry, _values: &ParameterValues) {}

    /// Called at boot when the stored CRC did not match the medium contents
    fn recovered(&mut self, _saved_crc: u32, _current_crc: u32) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl StoreObserver for NullObserver {}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Observer that counts events, for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    /// Number of `loaded` events
    pub loads: u32,
    /// Number of `saved` events
    pub saves: u32,
    /// Number of `reset` events
    pub resets: u32,
    /// Number of `recovered` events
    pub recoveries: u32,
    /// CRC reported by the most recent `saved` event
    pub last_saved_crc: Option<u32>,
    /// (saved, current) CRCs reported by the most recent `recovered` event
    pub last_recovery: Option<(u32, u32)>,
}

impl RecordingObserver {
    /// Create an observer with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreObserver for RecordingObserver {
    fn loaded(&mut self, _registry: &Registry, _values: &ParameterValues) {
        self.loads += 1;
    }

    fn saved(&mut self, _registry: &Registry, _values: &ParameterValues, crc: u32) {
        self.saves += 1;
        self.last_saved_crc = Some(crc);
    }

    fn reset(&mut self, _registry: &Registry, _values: &ParameterValues) {
        self.resets += 1;
    }

    fn recovered(&mut self, saved_crc: u32, current_crc: u32) {
        self.recoveries += 1;
        self.last_recovery = Some((saved_crc, current_crc));
    }
}
