//! Log-backed store observer
//!
//! Reports parameter store lifecycle events through the `log_*` macros:
//! per-entry values at debug level, saves and resets at info, CRC recovery at
//! warn.

use wifi_bridge_core::parameters::{ParameterValues, Registry};
use wifi_bridge_core::traits::StoreObserver;

/// Store observer that writes to the firmware log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LogObserver {
    fn dump(registry: &Registry, values: &ParameterValues) {
        for descriptor in registry.iter() {
            crate::log_debug!("  {} = {}", descriptor.name, values.get(descriptor));
        }
    }
}

impl StoreObserver for LogObserver {
    fn loaded(&mut self, registry: &Registry, values: &ParameterValues) {
        crate::log_info!("Loaded {} parameters", registry.count());
        Self::dump(registry, values);
    }

    fn saved(&mut self, registry: &Registry, values: &ParameterValues, crc: u32) {
        crate::log_info!("Saved {} parameters, CRC {:#x}", registry.count(), crc);
        Self::dump(registry, values);
    }

    fn reset(&mut self, _registry: &Registry, _values: &ParameterValues) {
        crate::log_info!("Parameters reset to factory defaults");
    }

    fn recovered(&mut self, saved_crc: u32, current_crc: u32) {
        crate::log_warn!(
            "Parameter CRC mismatch (saved {:#x}, computed {:#x}), restoring defaults",
            saved_crc,
            current_crc
        );
    }
}
