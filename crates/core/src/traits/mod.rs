//! Core traits for platform-agnostic parameter storage.
//!
//! This module provides trait abstractions that decouple the parameter store
//! from the device's storage hardware and logging backend.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (flash-emulated EEPROM, defmt logging) live in the
//!   firmware crate

pub mod medium;
pub mod observer;

pub use medium::{MediumError, MockMedium, PersistentMedium, MOCK_MEDIUM_SIZE};
pub use observer::{NullObserver, RecordingObserver, StoreObserver};
