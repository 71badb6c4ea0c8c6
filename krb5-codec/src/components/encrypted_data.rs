//! EncryptedData component
//!
//! ```text
//! EncryptedData ::= SEQUENCE {
//!     etype   [0] Int32,
//!     kvno    [1] UInt32 OPTIONAL,
//!     cipher  [2] OCTET STRING
//! }
//! ```
//!
//! The ciphertext is carried opaquely; nothing here interprets it.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedData {
    pub etype: i32,
    pub kvno: Option<i32>,
    pub cipher: Vec<u8>,
}

impl EncryptedData {
    pub fn new(etype: i32, cipher: Vec<u8>) -> Self {
        Self {
            etype,
            kvno: None,
            cipher,
        }
    }

    /// Decode a complete EncryptedData TLV.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        decode::<EncryptedDataGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        let mut len = tlv_len(int_tlv_len(i64::from(self.etype)));
        if let Some(kvno) = self.kvno {
            len += tlv_len(int_tlv_len(i64::from(kvno)));
        }
        len + tlv_len(tlv_len(self.cipher.len()))
    }
}

impl BerEncode for EncryptedData {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.etype)));
        writer.integer(i64::from(self.etype));
        if let Some(kvno) = self.kvno {
            writer.header(0xA1, int_tlv_len(i64::from(kvno)));
            writer.integer(i64::from(kvno));
        }
        writer.header(0xA2, tlv_len(self.cipher.len()));
        writer.octet_string(&self.cipher);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncryptedDataState {
    Start,
    Seq,
    ETypeTag,
    EType,
    KvnoTag,
    Kvno,
    CipherTag,
    Cipher,
}

pub struct EncryptedDataGrammar;

impl Grammar for EncryptedDataGrammar {
    type State = EncryptedDataState;
    type Message = EncryptedData;

    const NAME: &'static str = "EncryptedData";
    const START: EncryptedDataState = EncryptedDataState::Start;

    fn transition(
        state: EncryptedDataState,
        tag: u8,
    ) -> Option<Transition<EncryptedDataState, EncryptedData>> {
        use EncryptedDataState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Seq, no_action)),
            (Seq, 0xA0) => Some(Transition::descend(ETypeTag, no_action)),
            (ETypeTag, 0x02) => Some(Transition::capture(EType, store_etype)),
            (EType, 0xA1) => Some(Transition::descend(KvnoTag, no_action)),
            (KvnoTag, 0x02) => Some(Transition::capture(Kvno, store_kvno)),
            (EType, 0xA2) | (Kvno, 0xA2) => Some(Transition::descend(CipherTag, no_action)),
            (CipherTag, 0x04) => Some(Transition::capture(Cipher, store_cipher).terminal()),
            _ => None,
        }
    }
}

fn store_etype(data: &mut EncryptedData, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    data.etype = event.read_i32()?;
    Ok(())
}

fn store_kvno(data: &mut EncryptedData, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    data.kvno = Some(event.read_i32()?);
    Ok(())
}

fn store_cipher(data: &mut EncryptedData, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    data.cipher = event.read_octet_string()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_KVNO: [u8; 0x11] = [
        0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x11, 0xA2, 0x08, 0x04, 0x06, b'a', b'b', b'c', b'd',
        b'e', b'f',
    ];

    #[test]
    fn test_round_trip_without_kvno() {
        let data = EncryptedData::decode(&NO_KVNO).unwrap();
        assert_eq!(data.etype, 17);
        assert_eq!(data.kvno, None);
        assert_eq!(data.cipher, b"abcdef".to_vec());
        assert_eq!(&data.encode().unwrap()[..], &NO_KVNO[..]);
    }

    #[test]
    fn test_round_trip_with_kvno() {
        let input = [
            0x30, 0x14, 0xA0, 0x03, 0x02, 0x01, 0x11, 0xA1, 0x03, 0x02, 0x01, 0x05, 0xA2, 0x08,
            0x04, 0x06, b'a', b'b', b'c', b'd', b'e', b'f',
        ];
        let data = EncryptedData::decode(&input).unwrap();
        assert_eq!(data.kvno, Some(5));
        assert_eq!(&data.encode().unwrap()[..], &input[..]);
    }

    #[test]
    fn test_cipher_required() {
        let input = [0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x11];
        assert!(EncryptedData::decode(&input).is_err());
    }
}
