//! HostAddress component
//!
//! ```text
//! HostAddress ::= SEQUENCE {
//!     addr-type  [0] Int32,
//!     address    [1] OCTET STRING
//! }
//! ```

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::ProtocolResult;

use super::last_entry;
use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAddress {
    pub addr_type: i32,
    pub address: Vec<u8>,
}

impl HostAddress {
    pub fn new(addr_type: i32, address: Vec<u8>) -> Self {
        Self { addr_type, address }
    }

    /// Decode a complete `SEQUENCE OF HostAddress` TLV.
    pub fn decode_list(bytes: &[u8]) -> ProtocolResult<Vec<Self>> {
        decode::<HostAddressListGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.addr_type))) + tlv_len(tlv_len(self.address.len()))
    }
}

impl BerEncode for HostAddress {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.addr_type)));
        writer.integer(i64::from(self.addr_type));
        writer.header(0xA1, tlv_len(self.address.len()));
        writer.octet_string(&self.address);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostAddressListState {
    Start,
    Entries,
    Entry,
    TypeTag,
    Type,
    AddressTag,
    Address,
}

pub struct HostAddressListGrammar;

impl Grammar for HostAddressListGrammar {
    type State = HostAddressListState;
    type Message = Vec<HostAddress>;

    const NAME: &'static str = "HostAddresses";
    const START: HostAddressListState = HostAddressListState::Start;

    fn transition(
        state: HostAddressListState,
        tag: u8,
    ) -> Option<Transition<HostAddressListState, Vec<HostAddress>>> {
        use HostAddressListState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Entries, no_action)),
            (Entries, 0x30) | (Address, 0x30) => Some(Transition::descend(Entry, open_entry)),
            (Entry, 0xA0) => Some(Transition::descend(TypeTag, no_action)),
            (TypeTag, 0x02) => Some(Transition::capture(Type, store_type)),
            (Type, 0xA1) => Some(Transition::descend(AddressTag, no_action)),
            (AddressTag, 0x04) => Some(Transition::capture(Address, store_address).terminal()),
            _ => None,
        }
    }
}

fn open_entry(list: &mut Vec<HostAddress>, _event: &TlvEvent<'_>) -> ProtocolResult<()> {
    list.push(HostAddress::default());
    Ok(())
}

fn store_type(list: &mut Vec<HostAddress>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.addr_type = event.read_i32()?;
    Ok(())
}

fn store_address(list: &mut Vec<HostAddress>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.address = event.read_octet_string()?;
    Ok(())
}
