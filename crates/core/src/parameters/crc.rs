//! CRC32 calculation for parameter storage
//!
//! The store checksum and the parameter identity hash both use the reflected
//! CRC-32 polynomial with a zero initial value and no final XOR. This differs
//! from CRC-32/ISO-HDLC (Ethernet, ZIP), which starts at 0xFFFFFFFF and inverts
//! the result; the zero-seeded variant is what ground stations expect for the
//! parameter hash, and it lets a running value be fed straight back in.

use crc::{Algorithm, Crc};

/// Reflected CRC-32, init 0, no final XOR
pub const CRC_32_PARAM: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x04c1_1db7,
    init: 0x0000_0000,
    refin: true,
    refout: true,
    xorout: 0x0000_0000,
    check: 0x2dfd_2d88,
    residue: 0x0000_0000,
};

/// Shared CRC engine (256-entry lookup table)
pub static PARAM_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_PARAM);

/// Calculate the CRC32 of `data` from a fresh (zero) state
///
/// # Example
///
/// ```
/// use wifi_bridge_core::parameters::crc::calculate_crc32;
///
/// assert_eq!(calculate_crc32(b""), 0);
/// assert_eq!(calculate_crc32(b"123456789"), 0x2DFD2D88);
/// ```
pub fn calculate_crc32(data: &[u8]) -> u32 {
    PARAM_CRC.checksum(data)
}

/// Fold `data` into a running CRC32
///
/// Folding sub-ranges one after another gives the same result as a single
/// call over the whole sequence; start from 0.
///
/// # Example
///
/// ```
/// use wifi_bridge_core::parameters::crc::{calculate_crc32, crc32_update};
///
/// let crc = crc32_update(b"12345", 0);
/// let crc = crc32_update(b"6789", crc);
/// assert_eq!(crc, calculate_crc32(b"123456789"));
/// ```
pub fn crc32_update(data: &[u8], crc: u32) -> u32 {
    // The digest seed is taken in unreflected form and reflected internally.
    let mut digest = PARAM_CRC.digest_with_initial(crc.reverse_bits());
    digest.update(data);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-at-a-time reference fold
    fn reference(data: &[u8], mut crc: u32) -> u32 {
        for &byte in data {
            crc ^= byte as u32;
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        crc
    }

    #[test]
    fn test_crc32_known_values() {
        let test_cases = [
            (b"" as &[u8], 0x0000_0000u32),
            (b"a", 0x3AB5_51CE),
            (b"abc", 0xCA65_98D0),
            (b"123456789", 0x2DFD_2D88),
            (&[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x03], 0x3CFA_8E60),
        ];

        for (data, expected) in test_cases {
            assert_eq!(calculate_crc32(data), expected);
            assert_eq!(reference(data, 0), expected);
        }
    }

    #[test]
    fn test_crc32_all_zero_input_is_zero() {
        assert_eq!(calculate_crc32(&[0u8; 49]), 0);
    }

    #[test]
    fn test_crc32_incremental_matches_bulk() {
        let data = b"WIFI_CHANNEL\x0b\x00\x00\x00UART_BAUDRATE";
        let whole = calculate_crc32(data);

        for split in 0..=data.len() {
            let (head, tail) = data.split_at(split);
            let folded = crc32_update(tail, crc32_update(head, 0));
            assert_eq!(folded, whole, "split at {}", split);
        }
    }

    #[test]
    fn test_crc32_update_matches_reference_from_nonzero_seed() {
        let seed = 0xDEAD_BEEF;
        assert_eq!(crc32_update(b"PixRacer", seed), reference(b"PixRacer", seed));
    }

    #[test]
    fn test_crc32_detects_single_bit_flip() {
        let mut data = *b"Original data";
        let crc = calculate_crc32(&data);
        data[0] ^= 0x01;
        assert_ne!(calculate_crc32(&data), crc);
    }
}
