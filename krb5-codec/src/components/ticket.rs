//! Ticket component
//!
//! ```text
//! Ticket ::= [APPLICATION 1] SEQUENCE {
//!     tkt-vno   [0] INTEGER (5),
//!     realm     [1] Realm,
//!     sname     [2] PrincipalName,
//!     enc-part  [3] EncryptedData
//! }
//! ```
//!
//! Tickets only appear here inside `SEQUENCE OF Ticket` (the
//! additional-tickets field of a KDC-REQ-BODY). The nested PrincipalName
//! and EncryptedData are captured whole and decoded with their own
//! grammars.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::datatypes::kerberos_string::is_kerberos_string;
use krb5_core::{ProtocolError, ProtocolResult};

use super::encrypted_data::EncryptedData;
use super::last_entry;
use super::principal_name::PrincipalName;
use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticket {
    pub tkt_vno: i32,
    pub realm: String,
    pub sname: PrincipalName,
    pub enc_part: EncryptedData,
}

impl Ticket {
    pub fn new(realm: impl Into<String>, sname: PrincipalName, enc_part: EncryptedData) -> Self {
        Self {
            tkt_vno: 5,
            realm: realm.into(),
            sname,
            enc_part,
        }
    }

    /// Decode a complete `SEQUENCE OF Ticket` TLV.
    pub fn decode_list(bytes: &[u8]) -> ProtocolResult<Vec<Self>> {
        decode::<TicketListGrammar>(bytes)
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.tkt_vno)))
            + tlv_len(tlv_len(self.realm.len()))
            + tlv_len(self.sname.compute_length())
            + tlv_len(self.enc_part.compute_length())
    }
}

impl BerEncode for Ticket {
    fn compute_length(&self) -> usize {
        tlv_len(tlv_len(self.seq_content_len()))
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        if self.realm.is_empty() || !is_kerberos_string(self.realm.as_bytes()) {
            return Err(ProtocolError::ValueOutOfRange {
                reason: format!("realm {:?} is not a valid KerberosString", self.realm),
            });
        }

        let content = self.seq_content_len();
        writer.header(0x61, tlv_len(content));
        writer.header(0x30, content);
        writer.header(0xA0, int_tlv_len(i64::from(self.tkt_vno)));
        writer.integer(i64::from(self.tkt_vno));
        writer.header(0xA1, tlv_len(self.realm.len()));
        writer.general_string(&self.realm);
        writer.header(0xA2, self.sname.compute_length());
        self.sname.encode_into(writer)?;
        writer.header(0xA3, self.enc_part.compute_length());
        self.enc_part.encode_into(writer)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TicketListState {
    Start,
    Tickets,
    Ticket,
    TicketSeq,
    VnoTag,
    Vno,
    RealmTag,
    Realm,
    SName,
    EncPart,
}

pub struct TicketListGrammar;

impl Grammar for TicketListGrammar {
    type State = TicketListState;
    type Message = Vec<Ticket>;

    const NAME: &'static str = "Tickets";
    const START: TicketListState = TicketListState::Start;

    fn transition(
        state: TicketListState,
        tag: u8,
    ) -> Option<Transition<TicketListState, Vec<Ticket>>> {
        use TicketListState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Tickets, no_action)),
            (Tickets, 0x61) | (EncPart, 0x61) => Some(Transition::descend(Ticket, open_ticket)),
            (Ticket, 0x30) => Some(Transition::descend(TicketSeq, no_action)),
            (TicketSeq, 0xA0) => Some(Transition::descend(VnoTag, no_action)),
            (VnoTag, 0x02) => Some(Transition::capture(Vno, store_vno)),
            (Vno, 0xA1) => Some(Transition::descend(RealmTag, no_action)),
            (RealmTag, 0x1B) => Some(Transition::capture(Realm, store_realm)),
            (Realm, 0xA2) => Some(Transition::capture(SName, store_sname)),
            (SName, 0xA3) => Some(Transition::capture(EncPart, store_enc_part).terminal()),
            _ => None,
        }
    }
}

fn open_ticket(list: &mut Vec<Ticket>, _event: &TlvEvent<'_>) -> ProtocolResult<()> {
    list.push(Ticket::default());
    Ok(())
}

fn store_vno(list: &mut Vec<Ticket>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.tkt_vno = event.read_i32()?;
    Ok(())
}

fn store_realm(list: &mut Vec<Ticket>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.realm = event.read_kerberos_string()?;
    Ok(())
}

fn store_sname(list: &mut Vec<Ticket>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.sname = PrincipalName::decode(event.value)?;
    Ok(())
}

fn store_enc_part(list: &mut Vec<Ticket>, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    last_entry(list, event)?.enc_part = EncryptedData::decode(event.value)?;
    Ok(())
}
