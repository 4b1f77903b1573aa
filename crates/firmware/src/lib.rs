#![cfg_attr(not(test), no_std)]

//! wifi_bridge_firmware - Device bindings for the WiFi/UART MAVLink bridge
//!
//! This crate binds the platform-agnostic parameter store from
//! `wifi_bridge_core` to the bridge hardware.
//!
//! # Design Principles
//!
//! - **Platform implementations**: Flash access and EEPROM emulation
//! - **defmt logging**: `log_*` macros routed to defmt on the device
//! - **Build-time configuration**: Factory defaults overridable from the environment
//! - **Mocks always available**: Host tests run against `MockFlash`
//!
//! # Building
//!
//! ```bash
//! cargo test --workspace
//! cargo check -p wifi_bridge_firmware --features defmt
//! ```

// Platform abstraction layer (Flash, EEPROM emulation)
pub mod platform;

// Logging macros
pub mod core;

// Parameter storage bindings and request handling
pub mod parameters;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!)
// are exported at crate root via #[macro_export] in core::logging
