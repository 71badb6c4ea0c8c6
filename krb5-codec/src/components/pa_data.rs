//! Pre-authentication data component
//!
//! ```text
//! PA-DATA ::= SEQUENCE {
//!     padata-type   [1] Int32,
//!     padata-value  [2] OCTET STRING
//! }
//! ```
//!
//! PA-DATA only ever appears as `SEQUENCE OF PA-DATA`, so the grammar here
//! decodes the whole captured list.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use super::last_entry;
use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaData {
    pub pa_type: i32,
    pub pa_value: Vec<u8>,
}

impl PaData {
    pub fn new(pa_type: i32, pa_value: Vec<u8>) -> Self {
        Self { pa_type, pa_value }
    }

    /// Decode a complete `SEQUENCE OF PA-DATA` TLV.
    pub fn decode_list(bytes: &[u8]) -> ProtocolResult<Vec<Self>> {
        decode::<PaDataListGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.pa_type))) + tlv_len(tlv_len(self.pa_value.len()))
    }
}

impl BerEncode for PaData {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA1, int_tlv_len(i64::from(self.pa_type)));
        writer.integer(i64::from(self.pa_type));
        writer.header(0xA2, tlv_len(self.pa_value.len()));
        writer.octet_string(&self.pa_value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaDataListState {
    Start,
    Entries,
    Entry,
    TypeTag,
    Type,
    ValueTag,
    Value,
}

pub struct PaDataListGrammar;

impl Grammar for PaDataListGrammar {
    type State = PaDataListState;
    type Message = Vec<PaData>;

    const NAME: &'static str = "PA-DATA-LIST";
    const START: PaDataListState = PaDataListState::Start;

    fn transition(
        state: PaDataListState,
        tag: u8,
    ) -> Option<Transition<PaDataListState, Vec<PaData>>> {
        use PaDataListState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Entries, no_action)),
            (Entries, 0x30) | (Value, 0x30) => Some(Transition::descend(Entry, open_entry)),
            (Entry, 0xA1) => Some(Transition::descend(TypeTag, no_action)),
            (TypeTag, 0x02) => Some(Transition::capture(Type, store_type)),
            (Type, 0xA2) => Some(Transition::descend(ValueTag, no_action)),
            (ValueTag, 0x04) => Some(Transition::capture(Value, store_value).terminal()),
            _ => None,
        }
    }
}

fn open_entry(list: &mut Vec<PaData>, _event: &TlvEvent<'_>) -> ProtocolResult<()> {
    list.push(PaData::default());
    Ok(())
}

fn store_type(list: &mut Vec<PaData>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.pa_type = event.read_i32()?;
    Ok(())
}

fn store_value(list: &mut Vec<PaData>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.pa_value = event.read_octet_string()?;
    Ok(())
}
