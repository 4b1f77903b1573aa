//! Parameter store
//!
//! Owns the registry, the live value buffer and the persistent medium, and
//! keeps the two in step: load on boot, explicit save, factory reset.
//!
//! # Boot Recovery
//!
//! 1. Load the payload from the medium into live storage
//! 2. Read the CRC trailer and recompute the CRC of the payload on the medium
//! 3. Match: keep the loaded values
//! 4. Mismatch: apply defaults, save, commit
//!
//! A blank medium, a corrupted payload, a corrupted trailer and a payload
//! written by a different schema are all handled the same way. Entries flagged
//! `RESET_ON_BOOT` (the firmware version) are replaced by their default on every
//! load and never trusted from the medium.
//!
//! # Usage
//!
//! ```
//! use wifi_bridge_core::parameters::registry::{ParamSpec, ParamType, Registry, StoreLayout};
//! use wifi_bridge_core::parameters::store::ParameterStore;
//! use wifi_bridge_core::traits::{MockMedium, NullObserver};
//!
//! let specs = [
//!     ParamSpec::new("RATE", ParamType::Uint32),
//!     ParamSpec::new("PORT", ParamType::Uint16),
//! ];
//! let registry = Registry::new(&specs, StoreLayout::new(16, 12)).unwrap();
//! let mut store =
//!     ParameterStore::initialize(registry, MockMedium::new(), [57_600u32, 14550], NullObserver)
//!         .unwrap();
//!
//! assert_eq!(store.value(1), Some(14550));
//! store.set_value(1, 14560).unwrap();
//! store.save_all().unwrap();
//! ```

use super::crc::PARAM_CRC;
use super::defaults::DefaultPolicy;
use super::error::{ParameterError, StoreError};
use super::identity;
use super::registry::{Lookup, Registry, CRC_SIZE};
use super::values::ParameterValues;
use crate::traits::medium::PersistentMedium;
use crate::traits::observer::{NullObserver, StoreObserver};

/// Result type for store operations
pub type Result<T> = core::result::Result<T, StoreError>;

/// Chunk size for zero fill and payload read-back
const CHUNK_SIZE: usize = 32;

/// How the live values were established at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// Stored CRC matched; values were loaded from the medium
    Trusted,
    /// Stored CRC did not match; defaults were applied and saved
    Restored {
        /// CRC found in the trailer
        saved_crc: u32,
        /// CRC computed over the payload on the medium
        current_crc: u32,
    },
}

/// Persistent, CRC-checked parameter store
pub struct ParameterStore<M, D, O = NullObserver>
where
    M: PersistentMedium,
    D: DefaultPolicy,
    O: StoreObserver,
{
    registry: Registry,
    values: ParameterValues,
    medium: M,
    defaults: D,
    observer: O,
    flash_left: u32,
    boot: BootOutcome,
}

impl<M, D, O> ParameterStore<M, D, O>
where
    M: PersistentMedium,
    D: DefaultPolicy,
    O: StoreObserver,
{
    /// Open the medium and run boot recovery
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Medium` if the medium cannot be opened, or if a
    /// read, write or commit fails during recovery.
    pub fn initialize(registry: Registry, medium: M, defaults: D, observer: O) -> Result<Self> {
        let values = ParameterValues::zeroed(registry.total_byte_length());
        let mut store = Self {
            registry,
            values,
            medium,
            defaults,
            observer,
            flash_left: 0,
            boot: BootOutcome::Trusted,
        };

        store.medium.begin(store.registry.layout().capacity)?;
        store.recover()?;
        Ok(store)
    }

    fn recover(&mut self) -> Result<()> {
        self.load_all()?;

        let saved_crc = self.stored_crc()?;
        let current_crc = self.compute_store_crc()?;
        if saved_crc == current_crc {
            self.boot = BootOutcome::Trusted;
            return Ok(());
        }

        self.observer.recovered(saved_crc, current_crc);
        self.reset_to_defaults();
        self.save_all()?;
        self.boot = BootOutcome::Restored {
            saved_crc,
            current_crc,
        };
        Ok(())
    }

    /// Read every slot from the medium, then re-apply `RESET_ON_BOOT` defaults
    pub fn load_all(&mut self) -> Result<()> {
        for descriptor in self.registry.iter() {
            self.medium
                .read(descriptor.offset, self.values.slot_mut(descriptor))?;
        }

        for descriptor in self.registry.iter().filter(|d| d.resets_on_boot()) {
            self.values
                .set(descriptor, self.defaults.default_value(descriptor));
        }

        self.flash_left = self.medium.free_space();
        self.observer.loaded(&self.registry, &self.values);
        Ok(())
    }

    /// Write all live values and the CRC trailer, then commit
    ///
    /// The whole reserved region is zeroed first, so the gap between payload
    /// and trailer is always zero on the medium.
    pub fn save_all(&mut self) -> Result<()> {
        let layout = self.registry.layout();
        let zeros = [0u8; CHUNK_SIZE];
        let mut offset = 0;
        while offset < layout.capacity {
            let len = (layout.capacity - offset).min(CHUNK_SIZE);
            self.medium.write(offset, &zeros[..len])?;
            offset += len;
        }

        for descriptor in self.registry.iter() {
            self.medium
                .write(descriptor.offset, self.values.slot(descriptor))?;
        }

        let crc = self.compute_store_crc()?;
        self.medium
            .write(layout.trailer_offset, &crc.to_le_bytes())?;
        self.medium.commit()?;

        self.observer.saved(&self.registry, &self.values, crc);
        Ok(())
    }

    /// Replace every live value with its default (not persisted)
    pub fn reset_to_defaults(&mut self) {
        for descriptor in self.registry.iter() {
            self.values
                .set(descriptor, self.defaults.default_value(descriptor));
        }
        self.flash_left = self.medium.free_space();
        self.observer.reset(&self.registry, &self.values);
    }

    /// CRC of the payload as currently stored on the medium
    pub fn compute_store_crc(&mut self) -> Result<u32> {
        let total = self.registry.total_byte_length();
        let mut digest = PARAM_CRC.digest();
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut offset = 0;
        while offset < total {
            let len = (total - offset).min(CHUNK_SIZE);
            self.medium.read(offset, &mut chunk[..len])?;
            digest.update(&chunk[..len]);
            offset += len;
        }
        Ok(digest.finalize())
    }

    /// CRC found in the trailer
    pub fn stored_crc(&mut self) -> Result<u32> {
        let mut trailer = [0u8; CRC_SIZE];
        self.medium
            .read(self.registry.layout().trailer_offset, &mut trailer)?;
        Ok(u32::from_le_bytes(trailer))
    }

    /// Fingerprint of names and current values
    pub fn identity_hash(&self) -> u32 {
        identity::identity_hash(&self.registry, &self.values)
    }

    /// Current value of a live parameter, widened to 32 bits
    pub fn value(&self, id: usize) -> Option<u32> {
        self.registry.get(id).map(|d| self.values.get(d))
    }

    /// Set a live parameter by id, truncating to its width (not persisted)
    ///
    /// # Errors
    ///
    /// `ParameterError::NotFound` for an id past the last descriptor,
    /// `ParameterError::ReadOnly` for a read-only entry.
    pub fn set_value(&mut self, id: usize, value: u32) -> core::result::Result<(), ParameterError> {
        let descriptor = match self.registry.descriptor_at(id) {
            Lookup::Found(d) => d,
            Lookup::NotFound(_) => return Err(ParameterError::NotFound),
        };
        if descriptor.is_read_only() {
            return Err(ParameterError::ReadOnly);
        }
        self.values.set(descriptor, value);
        Ok(())
    }

    /// Look up a descriptor by id (sentinel when out of range)
    pub fn descriptor_at(&self, id: usize) -> Lookup<'_> {
        self.registry.descriptor_at(id)
    }

    /// Schema
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Live values
    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    /// Schema and mutable live values, borrowed together
    pub fn parts_mut(&mut self) -> (&Registry, &mut ParameterValues) {
        (&self.registry, &mut self.values)
    }

    /// Free firmware space recorded at the last load or reset
    pub fn flash_left(&self) -> u32 {
        self.flash_left
    }

    /// How the live values were established at boot
    pub fn boot_outcome(&self) -> BootOutcome {
        self.boot
    }

    /// Backing medium
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Backing medium (mutable)
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Event observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Give back the medium
    pub fn into_medium(self) -> M {
        self.medium
    }
}
