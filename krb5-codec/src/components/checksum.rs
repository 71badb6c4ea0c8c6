//! Checksum component
//!
//! ```text
//! Checksum ::= SEQUENCE {
//!     cksumtype  [0] Int32,
//!     checksum   [1] OCTET STRING
//! }
//! ```

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checksum {
    pub checksum_type: i32,
    pub checksum: Vec<u8>,
}

impl Checksum {
    pub fn new(checksum_type: i32, checksum: Vec<u8>) -> Self {
        Self {
            checksum_type,
            checksum,
        }
    }

    /// Decode a complete Checksum TLV.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        decode::<ChecksumGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.checksum_type))) + tlv_len(tlv_len(self.checksum.len()))
    }
}

impl BerEncode for Checksum {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.checksum_type)));
        writer.integer(i64::from(self.checksum_type));
        writer.header(0xA1, tlv_len(self.checksum.len()));
        writer.octet_string(&self.checksum);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChecksumState {
    Start,
    Seq,
    TypeTag,
    Type,
    ValueTag,
    Value,
}

pub struct ChecksumGrammar;

impl Grammar for ChecksumGrammar {
    type State = ChecksumState;
    type Message = Checksum;

    const NAME: &'static str = "Checksum";
    const START: ChecksumState = ChecksumState::Start;

    fn transition(state: ChecksumState, tag: u8) -> Option<Transition<ChecksumState, Checksum>> {
        use ChecksumState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Seq, no_action)),
            (Seq, 0xA0) => Some(Transition::descend(TypeTag, no_action)),
            (TypeTag, 0x02) => Some(Transition::capture(Type, store_type)),
            (Type, 0xA1) => Some(Transition::descend(ValueTag, no_action)),
            (ValueTag, 0x04) => Some(Transition::capture(Value, store_value).terminal()),
            _ => None,
        }
    }
}

fn store_type(checksum: &mut Checksum, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    checksum.checksum_type = event.read_i32()?;
    Ok(())
}

fn store_value(checksum: &mut Checksum, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    checksum.checksum = event.read_octet_string()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CKSUM: [u8; 0x0F] = [
        0x30, 0x0D, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x06, 0x04, 0x04, b'a', b'b', b'c', b'd',
    ];

    #[test]
    fn test_round_trip() {
        let cksum = Checksum::decode(&CKSUM).unwrap();
        assert_eq!(cksum.checksum_type, 1);
        assert_eq!(cksum.checksum, b"abcd".to_vec());
        assert_eq!(&cksum.encode().unwrap()[..], &CKSUM[..]);
    }

    #[test]
    fn test_missing_value_rejected() {
        // Sequence ends after cksumtype.
        let input = [0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x01];
        assert!(Checksum::decode(&input).is_err());
    }
}
