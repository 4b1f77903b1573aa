//! wifi_bridge_core - Pure no_std parameter store for the WiFi/UART MAVLink bridge
//!
//! This crate contains the platform-agnostic configuration store that keeps the
//! bridge's settings across power loss. It can be tested on host without any
//! feature flags or hardware.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Persistent medium and logging injected via traits
//!
//! # Modules
//!
//! - [`parameters`]: Registry, CRC engine, persistence engine, identity hash and
//!   the bridge parameter schema
//! - [`traits`]: Persistent medium and store observer abstractions (with mocks)

#![no_std]

pub mod parameters;
pub mod traits;
