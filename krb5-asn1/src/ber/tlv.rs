//! TLV identifier octets and the decoded TLV unit

/// BER tag class, bits 8-7 of the first identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Universal class (00)
    Universal,
    /// Application class (01)
    Application,
    /// Context-specific class (10)
    ContextSpecific,
    /// Private class (11)
    Private,
}

impl TagClass {
    /// Extract the class from a first identifier octet.
    pub fn from_octet(octet: u8) -> Self {
        match (octet >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

/// A decoded BER tag.
///
/// The raw first identifier octet is retained: it is the dispatch key the
/// grammar tables match on. For short-form tags (number <= 30) it uniquely
/// identifies class, constructed flag and number; for long-form tags the
/// number is carried separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    first_octet: u8,
    number: u32,
}

impl Tag {
    /// Build a tag from a single short-form identifier octet.
    pub fn short(octet: u8) -> Self {
        Self {
            first_octet: octet,
            number: u32::from(octet & 0x1F),
        }
    }

    /// Build a long-form tag from its first octet and decoded number.
    pub fn long(first_octet: u8, number: u32) -> Self {
        Self {
            first_octet,
            number,
        }
    }

    /// The raw first identifier octet; the grammar dispatch key.
    pub fn first_octet(&self) -> u8 {
        self.first_octet
    }

    pub fn class(&self) -> TagClass {
        TagClass::from_octet(self.first_octet)
    }

    /// Whether bit 6 (constructed) is set.
    pub fn is_constructed(&self) -> bool {
        self.first_octet & 0x20 != 0
    }

    pub fn number(&self) -> u32 {
        self.number
    }
}

/// One completed TLV as seen by a grammar action.
///
/// The value is a borrowed byte range: when the whole value arrived in a
/// single input chunk it points straight into the caller's buffer, otherwise
/// it points into the session's reassembly buffer. Nothing is copied until
/// an action decides to keep the bytes.
#[derive(Debug)]
pub struct TlvEvent<'a> {
    /// The decoded tag.
    pub tag: Tag,
    /// Declared value length in bytes.
    pub length: usize,
    /// Size of the tag + length octets.
    pub header_size: usize,
    /// Absolute input offset of the first identifier octet.
    pub start: usize,
    /// The value bytes (empty for a `Descend` transition).
    pub value: &'a [u8],
}

impl TlvEvent<'_> {
    /// Absolute offset of the first byte after this TLV.
    pub fn end_offset(&self) -> usize {
        self.start + self.header_size + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_tag_fields() {
        let tag = Tag::short(0x6A);
        assert_eq!(tag.class(), TagClass::Application);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 10);
        assert_eq!(tag.first_octet(), 0x6A);

        let tag = Tag::short(0x02);
        assert_eq!(tag.class(), TagClass::Universal);
        assert!(!tag.is_constructed());
        assert_eq!(tag.number(), 2);
    }

    #[test]
    fn test_context_tag_fields() {
        let tag = Tag::short(0xA3);
        assert_eq!(tag.class(), TagClass::ContextSpecific);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 3);
    }

    #[test]
    fn test_long_tag_keeps_first_octet() {
        let tag = Tag::long(0x5F, 34);
        assert_eq!(tag.class(), TagClass::Application);
        assert!(!tag.is_constructed());
        assert_eq!(tag.number(), 34);
        assert_eq!(tag.first_octet(), 0x5F);
    }

    #[test]
    fn test_end_offset() {
        let ev = TlvEvent {
            tag: Tag::short(0x02),
            length: 3,
            header_size: 2,
            start: 10,
            value: &[1, 2, 3],
        };
        assert_eq!(ev.end_offset(), 15);
    }
}
