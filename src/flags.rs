//! Item header word.
//!
//! Bit-Layout (32 Bit):
//! - Bits 0-7: Typcode
//! - Bit 8: is-object
//! - Bit 9: has-attributes
//! - Bit 10: has-tag
//! - Bits 12..: levels (reserviert, z.B. String-Encoding-Metadaten)
//!
//! Bei REFSXP enthaelt das Wort zusaetzlich den gepackten Referenzindex
//! `(index << 8) | 255`.

const TYPE_MASK: i32 = 0xFF;
const IS_OBJECT_BIT_MASK: i32 = 1 << 8;
const HAS_ATTR_BIT_MASK: i32 = 1 << 9;
const HAS_TAG_BIT_MASK: i32 = 1 << 10;
const LEVELS_SHIFT: u32 = 12;
const REF_INDEX_SHIFT: u32 = 8;

/// Decoded flag word of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// Raw 32-bit value as read from the stream.
    pub raw: i32,
    /// Type code (bits 0-7), not yet validated against the enumeration.
    pub type_code: u8,
    pub is_object: bool,
    pub has_attributes: bool,
    pub has_tag: bool,
    /// Levels field (bits 12 and up). Captured, not interpreted by the decoder.
    pub levels: i32,
}

impl Flags {
    /// Decodes a flag word. Every bit pattern is structurally decodable.
    pub fn decode(word: i32) -> Self {
        Self {
            raw: word,
            type_code: (word & TYPE_MASK) as u8,
            is_object: word & IS_OBJECT_BIT_MASK != 0,
            has_attributes: word & HAS_ATTR_BIT_MASK != 0,
            has_tag: word & HAS_TAG_BIT_MASK != 0,
            levels: word >> LEVELS_SHIFT,
        }
    }

    /// Packed reference index of a REFSXP word. `0` means an explicit index follows.
    pub fn packed_ref_index(&self) -> i32 {
        self.raw >> REF_INDEX_SHIFT
    }
}

/// Packs a reference index into a REFSXP flag word.
pub fn pack_ref_index(index: i32) -> i32 {
    (index << REF_INDEX_SHIFT) | TYPE_MASK
}
