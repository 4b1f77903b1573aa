//! Parameter management types and utilities
//!
//! This module provides the persistent parameter store: schema registry, live
//! value buffer, CRC-checked persistence with boot recovery, identity hash,
//! and the bridge schema built on top of them. Platform media (flash-emulated
//! EEPROM) are in the firmware crate.

pub mod bridge;
pub mod crc;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod registry;
pub mod store;
pub mod values;

pub use bridge::{
    bridge_registry, BridgeParameters, ParamId, BRIDGE_LAYOUT, BRIDGE_PARAMS, EEPROM_CRC_OFFSET,
    EEPROM_SPACE, PARAM_COUNT, TEXT_FIELD_LEN,
};
pub use crc::{calculate_crc32, crc32_update};
pub use defaults::{pack_version, text_field, DefaultPolicy, FactoryDefaults};
pub use error::{ParameterError, RegistryError, StoreError};
pub use identity::identity_hash;
pub use registry::{
    Descriptor, Lookup, ParamFlags, ParamSpec, ParamType, Registry, StoreLayout, CRC_SIZE,
    MAX_PARAMS, MAX_PAYLOAD, PARAM_NAME_LEN, SENTINEL_NAME,
};
pub use store::{BootOutcome, ParameterStore};
pub use values::{field_str, ParameterValues};
