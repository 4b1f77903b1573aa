//! Parameter registry
//!
//! The registry is the immutable schema of the store: an ordered list of
//! parameter descriptors plus the layout of the persistent region. It is built
//! once at startup from a table of [`ParamSpec`]s; each descriptor's storage
//! slot is the prefix sum of the lengths declared before it, so the live value
//! buffer and the persisted payload share one layout.
//!
//! # Persistent Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Parameter values, declaration order           │  Offset: 0
//! │   (1, 2 or 4 bytes each, little-endian)       │
//! ├───────────────────────────────────────────────┤
//! │ Zero fill (room for schema growth)            │  Offset: total_byte_length
//! ├───────────────────────────────────────────────┤
//! │ CRC32: u32 (little-endian)                    │  Offset: trailer_offset
//! ├───────────────────────────────────────────────┤
//! │ Zero fill                                     │  Offset: trailer_offset + 4
//! └───────────────────────────────────────────────┘  capacity
//! ```

use super::error::RegistryError;
use bitflags::bitflags;
use core::ops::Range;
use heapless::Vec;

/// Maximum parameter name length (MAVLink param_id)
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters in one registry
pub const MAX_PARAMS: usize = 32;

/// Maximum payload size (sum of all parameter lengths)
pub const MAX_PAYLOAD: usize = 256;

/// Size of the CRC32 trailer
pub const CRC_SIZE: usize = core::mem::size_of::<u32>();

/// Name of the sentinel descriptor returned for invalid ids
pub const SENTINEL_NAME: &str = "ERROR";

/// Encoded parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
}

impl ParamType {
    /// Byte width of the stored value
    pub const fn size(self) -> usize {
        match self {
            ParamType::Int8 => 1,
            ParamType::Uint16 => 2,
            ParamType::Uint32 => 4,
        }
    }

    /// MAVLink `MAV_PARAM_TYPE` code
    pub const fn mav_param_type(self) -> u8 {
        match self {
            ParamType::Int8 => 2,
            ParamType::Uint16 => 3,
            ParamType::Uint32 => 5,
        }
    }

    /// Widen little-endian slot bytes to 32 bits
    ///
    /// `Int8` is sign-extended, `Uint16` zero-extended. Missing bytes read as zero.
    pub fn widen(self, bytes: &[u8]) -> u32 {
        let mut word = [0u8; 4];
        let len = bytes.len().min(self.size());
        word[..len].copy_from_slice(&bytes[..len]);

        match self {
            ParamType::Int8 => word[0] as i8 as i32 as u32,
            ParamType::Uint16 => u16::from_le_bytes([word[0], word[1]]) as u32,
            ParamType::Uint32 => u32::from_le_bytes(word),
        }
    }

    /// Narrow a 32-bit value into little-endian slot bytes (truncating)
    pub fn narrow(self, value: u32, out: &mut [u8]) {
        let len = out.len().min(self.size());
        out[..len].copy_from_slice(&value.to_le_bytes()[..len]);
    }
}

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Always reset to the compiled-in default on load, never trusted from storage
        const RESET_ON_BOOT = 0b0000_0001;
        /// Cannot be modified by id (external protocol)
        const READ_ONLY = 0b0000_0010;
    }
}

/// Schema table entry (input to [`Registry::new`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Protocol-visible name
    pub name: &'static str,
    /// Encoded type (determines length)
    pub param_type: ParamType,
    /// Flags
    pub flags: ParamFlags,
}

impl ParamSpec {
    /// Create a spec with no flags
    pub const fn new(name: &'static str, param_type: ParamType) -> Self {
        Self {
            name,
            param_type,
            flags: ParamFlags::empty(),
        }
    }

    /// Set flags
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Parameter descriptor: schema metadata for one live parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Protocol-visible name
    pub name: &'static str,
    /// Position in declaration order
    pub id: usize,
    /// Byte offset of the slot (live buffer and persistent payload)
    pub offset: usize,
    /// Byte width (1, 2 or 4)
    pub length: usize,
    /// Encoded type
    pub param_type: ParamType,
    /// Flags
    pub flags: ParamFlags,
}

impl Descriptor {
    /// Byte range of the slot
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    /// Whether the value is reset to its default on every load
    pub fn resets_on_boot(&self) -> bool {
        self.flags.contains(ParamFlags::RESET_ON_BOOT)
    }

    /// Whether the value is read-only by id
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(ParamFlags::READ_ONLY)
    }
}

/// Result of an indexed lookup
///
/// Out-of-range ids never fail loudly: they yield the sentinel descriptor
/// (named `"ERROR"`, id equal to the registry size), wrapped so callers cannot
/// mistake it for a live slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Live descriptor
    Found(&'a Descriptor),
    /// Invalid id; carries the sentinel
    NotFound(&'a Descriptor),
}

impl<'a> Lookup<'a> {
    /// Descriptor regardless of outcome (the sentinel when not found)
    pub fn descriptor(&self) -> &'a Descriptor {
        match *self {
            Lookup::Found(d) | Lookup::NotFound(d) => d,
        }
    }

    /// Live descriptor, if found
    pub fn found(self) -> Option<&'a Descriptor> {
        match self {
            Lookup::Found(d) => Some(d),
            Lookup::NotFound(_) => None,
        }
    }

    /// Whether the lookup hit a live descriptor
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Reserved persistent region layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLayout {
    /// Total reserved bytes (zeroed on every save)
    pub capacity: usize,
    /// Offset of the 4-byte CRC trailer
    pub trailer_offset: usize,
}

impl StoreLayout {
    /// Create a layout with an explicit trailer offset
    pub const fn new(capacity: usize, trailer_offset: usize) -> Self {
        Self {
            capacity,
            trailer_offset,
        }
    }

    /// Byte range of the CRC trailer
    pub fn trailer(&self) -> Range<usize> {
        self.trailer_offset..self.trailer_offset + CRC_SIZE
    }
}

/// Immutable ordered set of parameter descriptors
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<Descriptor, MAX_PARAMS>,
    sentinel: Descriptor,
    layout: StoreLayout,
    total_length: usize,
}

impl Registry {
    /// Build a registry from a schema table
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] naming the first violated invariant: too many
    /// entries, an empty/over-long or duplicate name, a payload that does not
    /// fit before the trailer, or a trailer outside the capacity.
    pub fn new(specs: &[ParamSpec], layout: StoreLayout) -> Result<Self, RegistryError> {
        if specs.len() > MAX_PARAMS {
            return Err(RegistryError::TooManyParams);
        }

        let mut descriptors = Vec::<Descriptor, MAX_PARAMS>::new();
        let mut offset = 0;

        for (id, spec) in specs.iter().enumerate() {
            if spec.name.is_empty() || spec.name.len() > PARAM_NAME_LEN {
                return Err(RegistryError::InvalidName);
            }
            if descriptors.iter().any(|d| d.name == spec.name) {
                return Err(RegistryError::DuplicateName);
            }

            let length = spec.param_type.size();
            descriptors
                .push(Descriptor {
                    name: spec.name,
                    id,
                    offset,
                    length,
                    param_type: spec.param_type,
                    flags: spec.flags,
                })
                .map_err(|_| RegistryError::TooManyParams)?;
            offset += length;
        }

        if offset > MAX_PAYLOAD {
            return Err(RegistryError::PayloadTooLarge);
        }
        if offset > layout.trailer_offset {
            return Err(RegistryError::PayloadOverlapsTrailer);
        }
        if layout.trailer_offset.saturating_add(CRC_SIZE) > layout.capacity {
            return Err(RegistryError::TrailerOutOfRange);
        }

        let count = descriptors.len();
        Ok(Self {
            descriptors,
            sentinel: Descriptor {
                name: SENTINEL_NAME,
                id: count,
                offset,
                length: CRC_SIZE,
                param_type: ParamType::Uint32,
                flags: ParamFlags::RESET_ON_BOOT | ParamFlags::READ_ONLY,
            },
            layout,
            total_length: offset,
        })
    }

    /// Number of live descriptors
    pub fn count(&self) -> usize {
        self.descriptors.len()
    }

    /// Look up a descriptor by id
    ///
    /// Any `id >= count()` yields [`Lookup::NotFound`] carrying the sentinel.
    pub fn descriptor_at(&self, id: usize) -> Lookup<'_> {
        match self.descriptors.get(id) {
            Some(d) => Lookup::Found(d),
            None => Lookup::NotFound(&self.sentinel),
        }
    }

    /// Live descriptor by id
    pub fn get(&self, id: usize) -> Option<&Descriptor> {
        self.descriptors.get(id)
    }

    /// Live descriptor by name
    pub fn find(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    /// Sentinel descriptor returned for invalid ids
    pub fn sentinel(&self) -> &Descriptor {
        &self.sentinel
    }

    /// Sum of all descriptor lengths (payload size)
    pub fn total_byte_length(&self) -> usize {
        self.total_length
    }

    /// Reserved region layout
    pub fn layout(&self) -> StoreLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: [ParamSpec; 3] = [
        ParamSpec::new("A", ParamType::Uint32),
        ParamSpec::new("B", ParamType::Uint16),
        ParamSpec::new("C", ParamType::Int8),
    ];

    fn abc() -> Registry {
        Registry::new(&ABC, StoreLayout::new(20, 16)).unwrap()
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let registry = abc();

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.total_byte_length(), 7);

        let offsets: [(usize, usize, usize); 3] = [(0, 0, 4), (1, 4, 2), (2, 6, 1)];
        for (id, offset, length) in offsets {
            let d = registry.get(id).unwrap();
            assert_eq!(d.id, id);
            assert_eq!(d.offset, offset);
            assert_eq!(d.length, length);
        }
    }

    #[test]
    fn test_sentinel_lookup() {
        let registry = abc();

        for id in [3, 4, 100, usize::MAX] {
            match registry.descriptor_at(id) {
                Lookup::NotFound(d) => {
                    assert_eq!(d.id, 3);
                    assert_eq!(d.name, SENTINEL_NAME);
                    assert!(d.is_read_only());
                }
                Lookup::Found(_) => panic!("id {} should not resolve", id),
            }
        }

        assert_eq!(
            registry.descriptor_at(3).descriptor(),
            registry.descriptor_at(99).descriptor()
        );
        assert!(registry.descriptor_at(2).is_found());
        assert_eq!(registry.descriptor_at(2).found().map(|d| d.name), Some("C"));
    }

    #[test]
    fn test_find_by_name() {
        let registry = abc();
        assert_eq!(registry.find("B").map(|d| d.id), Some(1));
        assert!(registry.find("ERROR").is_none());
        assert!(registry.find("D").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let specs = [
            ParamSpec::new("A", ParamType::Uint32),
            ParamSpec::new("A", ParamType::Uint16),
        ];
        assert_eq!(
            Registry::new(&specs, StoreLayout::new(20, 16)).unwrap_err(),
            RegistryError::DuplicateName
        );
    }

    #[test]
    fn test_registry_rejects_bad_names() {
        let empty = [ParamSpec::new("", ParamType::Uint32)];
        let long = [ParamSpec::new("NAME_LONGER_THAN_16", ParamType::Uint32)];
        let layout = StoreLayout::new(20, 16);

        assert_eq!(
            Registry::new(&empty, layout).unwrap_err(),
            RegistryError::InvalidName
        );
        assert_eq!(
            Registry::new(&long, layout).unwrap_err(),
            RegistryError::InvalidName
        );
    }

    #[test]
    fn test_registry_layout_checks() {
        assert_eq!(
            Registry::new(&ABC, StoreLayout::new(20, 6)).unwrap_err(),
            RegistryError::PayloadOverlapsTrailer
        );
        assert_eq!(
            Registry::new(&ABC, StoreLayout::new(19, 16)).unwrap_err(),
            RegistryError::TrailerOutOfRange
        );
        // Trailer immediately after the payload is allowed
        assert!(Registry::new(&ABC, StoreLayout::new(11, 7)).is_ok());
    }

    #[test]
    fn test_param_type_widen_and_narrow() {
        assert_eq!(ParamType::Int8.widen(&[0xFF]), 0xFFFF_FFFF);
        assert_eq!(ParamType::Int8.widen(&[0x7F]), 0x7F);
        assert_eq!(ParamType::Uint16.widen(&[0x34, 0x12]), 0x1234);
        assert_eq!(ParamType::Uint32.widen(&[0x78, 0x56, 0x34, 0x12]), 0x1234_5678);

        let mut slot = [0u8; 2];
        ParamType::Uint16.narrow(0xABCD_1234, &mut slot);
        assert_eq!(slot, [0x34, 0x12]);
    }
}
