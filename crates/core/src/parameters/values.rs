//! Live parameter values
//!
//! All live values sit in one contiguous byte buffer laid out exactly like the
//! persisted payload. Descriptors address it by byte range, so multi-word
//! fields (the 16-byte SSID and password) are one buffer span that several
//! 4-byte descriptors cover in order.

use super::registry::{Descriptor, MAX_PAYLOAD};
use core::ops::Range;
use heapless::Vec;

/// Contiguous live value storage owned by the parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValues {
    bytes: Vec<u8, MAX_PAYLOAD>,
}

impl ParameterValues {
    /// Create a zero-filled buffer of `len` bytes (clamped to `MAX_PAYLOAD`)
    pub fn zeroed(len: usize) -> Self {
        let mut bytes = Vec::new();
        // Clamped to capacity, resize cannot fail
        let _ = bytes.resize(len.min(MAX_PAYLOAD), 0);
        Self { bytes }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whole payload, in persisted order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw bytes of a descriptor's slot
    ///
    /// A descriptor that does not fit this buffer (e.g. the sentinel) yields an
    /// empty slice.
    pub fn slot(&self, descriptor: &Descriptor) -> &[u8] {
        self.bytes.get(descriptor.range()).unwrap_or(&[])
    }

    /// Mutable raw bytes of a descriptor's slot (empty if it does not fit)
    pub fn slot_mut(&mut self, descriptor: &Descriptor) -> &mut [u8] {
        self.bytes.get_mut(descriptor.range()).unwrap_or(&mut [])
    }

    /// Current value widened to 32 bits
    pub fn get(&self, descriptor: &Descriptor) -> u32 {
        descriptor.param_type.widen(self.slot(descriptor))
    }

    /// Overwrite a slot, truncating `value` to the slot width
    pub fn set(&mut self, descriptor: &Descriptor, value: u32) {
        let param_type = descriptor.param_type;
        param_type.narrow(value, self.slot_mut(descriptor));
    }

    /// Bytes of an arbitrary span (empty if out of range)
    pub fn span(&self, range: Range<usize>) -> &[u8] {
        self.bytes.get(range).unwrap_or(&[])
    }

    /// Copy `text` into a fixed-width span, truncating and zero-filling
    ///
    /// At most `range.len()` bytes are copied; the rest of the span is zeroed.
    /// Nothing outside the span is touched.
    pub fn write_text(&mut self, range: Range<usize>, text: &[u8]) {
        if let Some(span) = self.bytes.get_mut(range) {
            let len = text.len().min(span.len());
            span[..len].copy_from_slice(&text[..len]);
            span[len..].fill(0);
        }
    }
}

/// Text content of a fixed-width field: bytes up to the first NUL
///
/// Stops at the first invalid UTF-8 sequence, so a character cut off by the
/// field width is dropped instead of the whole text.
pub fn field_str(field: &[u8]) -> &str {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    match core::str::from_utf8(&field[..end]) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&field[..e.valid_up_to()]).unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::registry::{ParamSpec, ParamType, Registry, StoreLayout};

    fn registry() -> Registry {
        let specs = [
            ParamSpec::new("DEBUG", ParamType::Int8),
            ParamSpec::new("PORT", ParamType::Uint16),
            ParamSpec::new("TEXT1", ParamType::Uint32),
            ParamSpec::new("TEXT2", ParamType::Uint32),
            ParamSpec::new("BAUD", ParamType::Uint32),
        ];
        Registry::new(&specs, StoreLayout::new(32, 24)).unwrap()
    }

    #[test]
    fn test_get_set_truncates_to_slot_width() {
        let registry = registry();
        let mut values = ParameterValues::zeroed(registry.total_byte_length());
        let port = registry.get(1).unwrap();

        values.set(port, 0x0001_3880);
        assert_eq!(values.get(port), 0x3880);
        assert_eq!(values.slot(port), &[0x80, 0x38]);
    }

    #[test]
    fn test_int8_is_sign_extended() {
        let registry = registry();
        let mut values = ParameterValues::zeroed(registry.total_byte_length());
        let debug = registry.get(0).unwrap();

        values.set(debug, -1i32 as u32);
        assert_eq!(values.get(debug), 0xFFFF_FFFF);
        assert_eq!(values.slot(debug), &[0xFF]);
    }

    #[test]
    fn test_write_text_truncates_without_touching_neighbours() {
        let registry = registry();
        let mut values = ParameterValues::zeroed(registry.total_byte_length());
        let baud = registry.get(4).unwrap();
        values.set(baud, 921_600);

        let text = registry.get(2).unwrap().offset..registry.get(3).unwrap().range().end;
        values.write_text(text.clone(), b"ABCDEFGHIJKL");

        assert_eq!(values.span(text.clone()), b"ABCDEFGH");
        assert_eq!(values.get(baud), 921_600);

        values.write_text(text.clone(), b"xy");
        assert_eq!(values.span(text.clone()), b"xy\0\0\0\0\0\0");
        assert_eq!(field_str(values.span(text)), "xy");
    }

    #[test]
    fn test_text_spans_individual_words() {
        let registry = registry();
        let mut values = ParameterValues::zeroed(registry.total_byte_length());
        let text1 = registry.get(2).unwrap();
        let text2 = registry.get(3).unwrap();

        values.write_text(text1.offset..text2.range().end, b"PixRacer");
        assert_eq!(values.get(text1), u32::from_le_bytes(*b"PixR"));
        assert_eq!(values.get(text2), u32::from_le_bytes(*b"acer"));
    }

    #[test]
    fn test_foreign_descriptor_is_inert() {
        let registry = registry();
        let mut values = ParameterValues::zeroed(registry.total_byte_length());
        let sentinel = *registry.sentinel();

        values.set(&sentinel, 0xFFFF_FFFF);
        assert_eq!(values.get(&sentinel), 0);
        assert!(values.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_field_str() {
        assert_eq!(field_str(b"PixRacer\0\0\0\0\0\0\0\0"), "PixRacer");
        assert_eq!(field_str(b"0123456789ABCDEF"), "0123456789ABCDEF");
        assert_eq!(field_str(&[0xFF, 0xFE]), "");
    }

    #[test]
    fn test_field_str_drops_split_character() {
        // 'é' (0xC3 0xA9) cut after its first byte by the field width
        assert_eq!(field_str(b"Cafe-network-ab\xC3"), "Cafe-network-ab");
        assert_eq!(field_str(b"Pix\xFFRacer\0\0\0\0\0\0"), "Pix");
    }
}
