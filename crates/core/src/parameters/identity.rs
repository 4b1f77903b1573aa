//! Parameter set identity hash
//!
//! Ground stations cache the parameter list and compare this fingerprint to
//! decide whether the cached copy is still valid. Any change to a name, to
//! the declaration order, or to a current value changes the hash.

use super::crc::PARAM_CRC;
use super::registry::Registry;
use super::values::ParameterValues;

/// Fingerprint of names and current values
///
/// For each descriptor in declaration order, folds the name bytes and then the
/// value widened to 4 little-endian bytes (INT8 sign-extended) into one running
/// CRC32 starting at 0.
pub fn identity_hash(registry: &Registry, values: &ParameterValues) -> u32 {
    let mut digest = PARAM_CRC.digest();
    for descriptor in registry.iter() {
        digest.update(descriptor.name.as_bytes());
        digest.update(&values.get(descriptor).to_le_bytes());
    }
    digest.finalize()
}
