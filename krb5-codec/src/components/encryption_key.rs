//! EncryptionKey component
//!
//! ```text
//! EncryptionKey ::= SEQUENCE {
//!     keytype   [0] Int32,
//!     keyvalue  [1] OCTET STRING
//! }
//! ```

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptionKey {
    pub key_type: i32,
    pub key_value: Vec<u8>,
}

impl EncryptionKey {
    pub fn new(key_type: i32, key_value: Vec<u8>) -> Self {
        Self {
            key_type,
            key_value,
        }
    }

    /// Decode a complete EncryptionKey TLV.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        decode::<EncryptionKeyGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.key_type))) + tlv_len(tlv_len(self.key_value.len()))
    }
}

impl BerEncode for EncryptionKey {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.key_type)));
        writer.integer(i64::from(self.key_type));
        writer.header(0xA1, tlv_len(self.key_value.len()));
        writer.octet_string(&self.key_value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncryptionKeyState {
    Start,
    Seq,
    TypeTag,
    Type,
    ValueTag,
    Value,
}

pub struct EncryptionKeyGrammar;

impl Grammar for EncryptionKeyGrammar {
    type State = EncryptionKeyState;
    type Message = EncryptionKey;

    const NAME: &'static str = "EncryptionKey";
    const START: EncryptionKeyState = EncryptionKeyState::Start;

    fn transition(
        state: EncryptionKeyState,
        tag: u8,
    ) -> Option<Transition<EncryptionKeyState, EncryptionKey>> {
        use EncryptionKeyState::*;
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

fn store_type(key: &mut EncryptionKey, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    key.key_type = event.read_i32()?;
    Ok(())
}

fn store_value(key: &mut EncryptionKey, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    key.key_value = event.read_octet_string()?;
    Ok(())
}
