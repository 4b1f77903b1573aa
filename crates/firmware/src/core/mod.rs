//! Core firmware infrastructure
//!
//! Logging macros shared by the platform and parameter modules. The
//! parameter store itself lives in `wifi_bridge_core`.

pub mod logging;
