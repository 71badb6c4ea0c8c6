//! KDC-REQ-BODY component
//!
//! ```text
//! KDC-REQ-BODY ::= SEQUENCE {
//!     kdc-options               [0] KDCOptions,
//!     cname                     [1] PrincipalName OPTIONAL,
//!     realm                     [2] Realm,
//!     sname                     [3] PrincipalName OPTIONAL,
//!     from                      [4] KerberosTime OPTIONAL,
//!     till                      [5] KerberosTime,
//!     rtime                     [6] KerberosTime OPTIONAL,
//!     nonce                     [7] UInt32,
//!     etype                     [8] SEQUENCE OF Int32,
//!     addresses                 [9] HostAddresses OPTIONAL,
//!     enc-authorization-data    [10] EncryptedData OPTIONAL,
//!     additional-tickets        [11] SEQUENCE OF Ticket OPTIONAL
//! }
//! ```
//!
//! Component-typed fields (cname, sname, addresses, enc-authorization-data,
//! additional-tickets) are captured at their context wrapper and decoded
//! with the component's own grammar; scalar fields descend the wrapper and
//! capture the universal TLV inside it.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::datatypes::kerberos_string::is_kerberos_string;
use krb5_core::datatypes::kerberos_time::KERBEROS_TIME_LENGTH;
use krb5_core::{KerberosFlags, KerberosTime, ProtocolError, ProtocolResult};

use super::encrypted_data::EncryptedData;
use super::host_address::HostAddress;
use super::principal_name::PrincipalName;
use super::ticket::Ticket;
use crate::encode::BerEncode;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KdcReqBody {
    pub kdc_options: KerberosFlags,
    pub cname: Option<PrincipalName>,
    pub realm: String,
    pub sname: Option<PrincipalName>,
    pub from: Option<KerberosTime>,
    pub till: KerberosTime,
    pub rtime: Option<KerberosTime>,
    pub nonce: i32,
    pub etypes: Vec<i32>,
    pub addresses: Vec<HostAddress>,
    pub enc_authorization_data: Option<EncryptedData>,
    pub additional_tickets: Vec<Ticket>,
}

impl KdcReqBody {
    /// Decode a complete KDC-REQ-BODY TLV.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        decode::<KdcReqBodyGrammar>(bytes)
    }

    fn etypes_content_len(&self) -> usize {
        self.etypes.iter().map(|&e| int_tlv_len(i64::from(e))).sum()
    }

    fn addresses_content_len(&self) -> usize {
        self.addresses.iter().map(|a| a.compute_length()).sum()
    }

    fn tickets_content_len(&self) -> usize {
        self.additional_tickets
            .iter()
            .map(|t| t.compute_length())
            .sum()
    }

    fn seq_content_len(&self) -> usize {
        let mut len = tlv_len(tlv_len(self.kdc_options.payload_len()));
        if let Some(cname) = &self.cname {
            len += tlv_len(cname.compute_length());
        }
        len += tlv_len(tlv_len(self.realm.len()));
        if let Some(sname) = &self.sname {
            len += tlv_len(sname.compute_length());
        }
        if self.from.is_some() {
            len += tlv_len(tlv_len(KERBEROS_TIME_LENGTH));
        }
        len += tlv_len(tlv_len(KERBEROS_TIME_LENGTH));
        if self.rtime.is_some() {
            len += tlv_len(tlv_len(KERBEROS_TIME_LENGTH));
        }
        len += tlv_len(int_tlv_len(i64::from(self.nonce)));
        len += tlv_len(tlv_len(self.etypes_content_len()));
        if !self.addresses.is_empty() {
            len += tlv_len(tlv_len(self.addresses_content_len()));
        }
        if let Some(enc) = &self.enc_authorization_data {
            len += tlv_len(enc.compute_length());
        }
        if !self.additional_tickets.is_empty() {
            len += tlv_len(tlv_len(self.tickets_content_len()));
        }
        len
    }
}

impl BerEncode for KdcReqBody {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        if self.realm.is_empty() || !is_kerberos_string(self.realm.as_bytes()) {
            return Err(ProtocolError::ValueOutOfRange {
                reason: format!("realm {:?} is not a valid KerberosString", self.realm),
            });
        }

        writer.header(0x30, self.seq_content_len());

        writer.header(0xA0, tlv_len(self.kdc_options.payload_len()));
        writer.bit_string(&self.kdc_options);

        if let Some(cname) = &self.cname {
            writer.header(0xA1, cname.compute_length());
            cname.encode_into(writer)?;
        }

        writer.header(0xA2, tlv_len(self.realm.len()));
        writer.general_string(&self.realm);

        if let Some(sname) = &self.sname {
            writer.header(0xA3, sname.compute_length());
            sname.encode_into(writer)?;
        }

        if let Some(from) = &self.from {
            writer.header(0xA4, tlv_len(KERBEROS_TIME_LENGTH));
            writer.generalized_time(from);
        }

        writer.header(0xA5, tlv_len(KERBEROS_TIME_LENGTH));
        writer.generalized_time(&self.till);

        if let Some(rtime) = &self.rtime {
            writer.header(0xA6, tlv_len(KERBEROS_TIME_LENGTH));
            writer.generalized_time(rtime);
        }

        writer.header(0xA7, int_tlv_len(i64::from(self.nonce)));
        writer.integer(i64::from(self.nonce));

        let etypes_content = self.etypes_content_len();
        writer.header(0xA8, tlv_len(etypes_content));
        writer.header(0x30, etypes_content);
        for &etype in &self.etypes {
            writer.integer(i64::from(etype));
        }

        if !self.addresses.is_empty() {
            let content = self.addresses_content_len();
            writer.header(0xA9, tlv_len(content));
            writer.header(0x30, content);
            for address in &self.addresses {
                address.encode_into(writer)?;
            }
        }

        if let Some(enc) = &self.enc_authorization_data {
            writer.header(0xAA, enc.compute_length());
            enc.encode_into(writer)?;
        }

        if !self.additional_tickets.is_empty() {
            let content = self.tickets_content_len();
            writer.header(0xAB, tlv_len(content));
            writer.header(0x30, content);
            for ticket in &self.additional_tickets {
                ticket.encode_into(writer)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KdcReqBodyState {
    Start,
    Seq,
    KdcOptionsTag,
    KdcOptions,
    CName,
    RealmTag,
    Realm,
    SName,
    FromTag,
    From,
    TillTag,
    Till,
    RTimeTag,
    RTime,
    NonceTag,
    Nonce,
    ETypeTag,
    ETypeSeq,
    EType,
    Addresses,
    EncAuthData,
    AdditionalTickets,
}

pub struct KdcReqBodyGrammar;

impl Grammar for KdcReqBodyGrammar {
    type State = KdcReqBodyState;
    type Message = KdcReqBody;

    const NAME: &'static str = "KDC-REQ-BODY";
    const START: KdcReqBodyState = KdcReqBodyState::Start;

    fn transition(
        state: KdcReqBodyState,
        tag: u8,
    ) -> Option<Transition<KdcReqBodyState, KdcReqBody>> {
        use KdcReqBodyState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Seq, no_action)),
            (Seq, 0xA0) => Some(Transition::descend(KdcOptionsTag, no_action)),
            (KdcOptionsTag, 0x03) => Some(Transition::capture(KdcOptions, store_kdc_options)),
            (KdcOptions, 0xA1) => Some(Transition::capture(CName, store_cname)),
            (KdcOptions, 0xA2) | (CName, 0xA2) => Some(Transition::descend(RealmTag, no_action)),
            (RealmTag, 0x1B) => Some(Transition::capture(Realm, store_realm)),
            (Realm, 0xA3) => Some(Transition::capture(SName, store_sname)),
            (Realm, 0xA4) | (SName, 0xA4) => Some(Transition::descend(FromTag, no_action)),
            (FromTag, 0x18) => Some(Transition::capture(From, store_from)),
            (Realm, 0xA5) | (SName, 0xA5) | (From, 0xA5) => {
                Some(Transition::descend(TillTag, no_action))
            }
            (TillTag, 0x18) => Some(Transition::capture(Till, store_till)),
            (Till, 0xA6) => Some(Transition::descend(RTimeTag, no_action)),
            (RTimeTag, 0x18) => Some(Transition::capture(RTime, store_rtime)),
            (Till, 0xA7) | (RTime, 0xA7) => Some(Transition::descend(NonceTag, no_action)),
            (NonceTag, 0x02) => Some(Transition::capture(Nonce, store_nonce)),
            (Nonce, 0xA8) => Some(Transition::descend(ETypeTag, no_action)),
            (ETypeTag, 0x30) => Some(Transition::descend(ETypeSeq, no_action)),
            (ETypeSeq, 0x02) | (EType, 0x02) => {
                Some(Transition::capture(EType, append_etype).terminal())
            }
            (EType, 0xA9) => Some(Transition::capture(Addresses, store_addresses).terminal()),
            (EType, 0xAA) | (Addresses, 0xAA) => {
                Some(Transition::capture(EncAuthData, store_enc_auth_data).terminal())
            }
            (EType, 0xAB) | (Addresses, 0xAB) | (EncAuthData, 0xAB) => {
                Some(Transition::capture(AdditionalTickets, store_additional_tickets).terminal())
            }
            _ => None,
        }
    }
}

fn store_kdc_options(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.kdc_options = event.read_kerberos_flags()?;
    Ok(())
}

fn store_cname(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.cname = Some(PrincipalName::decode(event.value)?);
    Ok(())
}

fn store_realm(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.realm = event.read_kerberos_string()?;
    Ok(())
}

fn store_sname(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.sname = Some(PrincipalName::decode(event.value)?);
    Ok(())
}

fn store_from(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.from = Some(event.read_generalized_time()?);
    Ok(())
}

fn store_till(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.till = event.read_generalized_time()?;
    Ok(())
}

fn store_rtime(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.rtime = Some(event.read_generalized_time()?);
    Ok(())
}

fn store_nonce(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.nonce = event.read_i32()?;
    Ok(())
}

fn append_etype(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.etypes.push(event.read_i32()?);
    Ok(())
}

fn store_addresses(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.addresses = HostAddress::decode_list(event.value)?;
    Ok(())
}

fn store_enc_auth_data(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.enc_authorization_data = Some(EncryptedData::decode(event.value)?);
    Ok(())
}

fn store_additional_tickets(body: &mut KdcReqBody, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    body.additional_tickets = Ticket::decode_list(event.value)?;
    Ok(())
}
