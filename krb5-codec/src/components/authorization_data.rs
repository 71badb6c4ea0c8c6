//! AuthorizationData component
//!
//! ```text
//! AuthorizationData ::= SEQUENCE OF SEQUENCE {
//!     ad-type  [0] Int32,
//!     ad-data  [1] OCTET STRING
//! }
//! ```

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use super::last_entry;
use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationDataEntry {
    pub ad_type: i32,
    pub ad_data: Vec<u8>,
}

impl AuthorizationDataEntry {
    pub fn new(ad_type: i32, ad_data: Vec<u8>) -> Self {
        Self { ad_type, ad_data }
    }

    /// Decode a complete AuthorizationData TLV.
    pub fn decode_list(bytes: &[u8]) -> ProtocolResult<Vec<Self>> {
        decode::<AuthorizationDataGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.ad_type))) + tlv_len(tlv_len(self.ad_data.len()))
    }
}

impl BerEncode for AuthorizationDataEntry {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.ad_type)));
        writer.integer(i64::from(self.ad_type));
        writer.header(0xA1, tlv_len(self.ad_data.len()));
        writer.octet_string(&self.ad_data);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthorizationDataState {
    Start,
    Entries,
    Entry,
    TypeTag,
    Type,
    DataTag,
    Data,
}

pub struct AuthorizationDataGrammar;

impl Grammar for AuthorizationDataGrammar {
    type State = AuthorizationDataState;
    type Message = Vec<AuthorizationDataEntry>;

    const NAME: &'static str = "AuthorizationData";
    const START: AuthorizationDataState = AuthorizationDataState::Start;

    fn transition(
        state: AuthorizationDataState,
        tag: u8,
    ) -> Option<Transition<AuthorizationDataState, Vec<AuthorizationDataEntry>>> {
        use AuthorizationDataState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Entries, no_action)),
            (Entries, 0x30) | (Data, 0x30) => Some(Transition::descend(Entry, open_entry)),
            (Entry, 0xA0) => Some(Transition::descend(TypeTag, no_action)),
            (TypeTag, 0x02) => Some(Transition::capture(Type, store_type)),
            (Type, 0xA1) => Some(Transition::descend(DataTag, no_action)),
            (DataTag, 0x04) => Some(Transition::capture(Data, store_data).terminal()),
            _ => None,
        }
    }
}

fn open_entry(list: &mut Vec<AuthorizationDataEntry>, _event: &TlvEvent<'_>) -> ProtocolResult<()> {
    list.push(AuthorizationDataEntry::default());
    Ok(())
}

fn store_type(list: &mut Vec<AuthorizationDataEntry>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.ad_type = event.read_i32()?;
    Ok(())
}

fn store_data(list: &mut Vec<AuthorizationDataEntry>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.ad_data = event.read_octet_string()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list() {
        let mut input = vec![0x30, 0x22];
        for data in [&b"abcdef"[..], &b"ghijkl"[..]] {
            input.extend_from_slice(&[0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x02, 0xA1, 0x08, 0x04, 0x06]);
            input.extend_from_slice(data);
        }
        let list = AuthorizationDataEntry::decode_list(&input).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ad_type, 2);
        assert_eq!(list[1].ad_data, b"ghijkl".to_vec());
    }

    #[test]
    fn test_entry_round_trip() {
        let entry = AuthorizationDataEntry::new(2, b"abcdef".to_vec());
        let bytes = entry.encode().unwrap();
        assert_eq!(bytes.len(), 0x11);
        let list = {
            let mut wrapped = vec![0x30, 0x11];
            wrapped.extend_from_slice(&bytes);
            AuthorizationDataEntry::decode_list(&wrapped).unwrap()
        };
        assert_eq!(list, vec![entry]);
    }
}
