//! Authenticator message
//!
//! ```text
//! Authenticator ::= [APPLICATION 2] SEQUENCE {
//!     authenticator-vno   [0] INTEGER (5),
//!     crealm              [1] Realm,
//!     cname               [2] PrincipalName,
//!     cksum               [3] Checksum OPTIONAL,
//!     cusec               [4] Microseconds,
//!     ctime               [5] KerberosTime,
//!     subkey              [6] EncryptionKey OPTIONAL,
//!     seq-number          [7] UInt32 OPTIONAL,
//!     authorization-data  [8] AuthorizationData OPTIONAL
//! }
//! ```

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::datatypes::kerberos_string::is_kerberos_string;
use krb5_core::datatypes::kerberos_time::KERBEROS_TIME_LENGTH;
use krb5_core::{KerberosTime, ProtocolError, ProtocolResult};

use crate::components::authorization_data::AuthorizationDataEntry;
use crate::components::checksum::Checksum;
use crate::components::encryption_key::EncryptionKey;
use crate::components::principal_name::PrincipalName;
use crate::encode::BerEncode;

use super::as_req::KRB5_PVNO;

/// The ticket authenticator a client sends inside an AP-REQ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Authenticator {
    pub vno: i32,
    pub crealm: String,
    pub cname: PrincipalName,
    pub cksum: Option<Checksum>,
    pub cusec: i32,
    pub ctime: KerberosTime,
    pub subkey: Option<EncryptionKey>,
    pub seq_number: Option<i32>,
    pub authorization_data: Vec<AuthorizationDataEntry>,
}

impl Authenticator {
    /// Build an authenticator with the fixed version number.
    pub fn new(crealm: impl Into<String>, cname: PrincipalName, ctime: KerberosTime) -> Self {
        Self {
            vno: KRB5_PVNO,
            crealm: crealm.into(),
            cname,
            ctime,
            ..Self::default()
        }
    }

    /// Decode a complete Authenticator PDU.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let msg = decode::<AuthenticatorGrammar>(bytes)?;
        log::debug!(
            "decoded Authenticator: crealm {:?}, {} byte(s)",
            msg.crealm,
            bytes.len()
        );
        Ok(msg)
    }

    fn authz_content_len(&self) -> usize {
        self.authorization_data
            .iter()
            .map(|e| e.compute_length())
            .sum()
    }

    fn seq_content_len(&self) -> usize {
        let mut len = tlv_len(int_tlv_len(i64::from(self.vno)));
        len += tlv_len(tlv_len(self.crealm.len()));
        len += tlv_len(self.cname.compute_length());
        if let Some(cksum) = &self.cksum {
            len += tlv_len(cksum.compute_length());
        }
        len += tlv_len(int_tlv_len(i64::from(self.cusec)));
        len += tlv_len(tlv_len(KERBEROS_TIME_LENGTH));
        if let Some(subkey) = &self.subkey {
            len += tlv_len(subkey.compute_length());
        }
        if let Some(seq_number) = self.seq_number {
            len += tlv_len(int_tlv_len(i64::from(seq_number)));
        }
        if !self.authorization_data.is_empty() {
            len += tlv_len(tlv_len(self.authz_content_len()));
        }
        len
    }
}

impl BerEncode for Authenticator {
    fn compute_length(&self) -> usize {
        tlv_len(tlv_len(self.seq_content_len()))
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        if self.crealm.is_empty() || !is_kerberos_string(self.crealm.as_bytes()) {
            return Err(ProtocolError::ValueOutOfRange {
                reason: format!("crealm {:?} is not a valid KerberosString", self.crealm),
            });
        }

        let content = self.seq_content_len();
        writer.header(0x62, tlv_len(content));
        writer.header(0x30, content);

        writer.header(0xA0, int_tlv_len(i64::from(self.vno)));
        writer.integer(i64::from(self.vno));

        writer.header(0xA1, tlv_len(self.crealm.len()));
        writer.general_string(&self.crealm);

        writer.header(0xA2, self.cname.compute_length());
        self.cname.encode_into(writer)?;

        if let Some(cksum) = &self.cksum {
            writer.header(0xA3, cksum.compute_length());
            cksum.encode_into(writer)?;
        }

        writer.header(0xA4, int_tlv_len(i64::from(self.cusec)));
        writer.integer(i64::from(self.cusec));

        writer.header(0xA5, tlv_len(KERBEROS_TIME_LENGTH));
        writer.generalized_time(&self.ctime);

        if let Some(subkey) = &self.subkey {
            writer.header(0xA6, subkey.compute_length());
            subkey.encode_into(writer)?;
        }

        if let Some(seq_number) = self.seq_number {
            writer.header(0xA7, int_tlv_len(i64::from(seq_number)));
            writer.integer(i64::from(seq_number));
        }

        if !self.authorization_data.is_empty() {
            let authz_content = self.authz_content_len();
            writer.header(0xA8, tlv_len(authz_content));
            writer.header(0x30, authz_content);
            for entry in &self.authorization_data {
                entry.encode_into(writer)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthenticatorState {
    Start,
    AuthenticatorSeq,
    Seq,
    VnoTag,
    Vno,
    CRealmTag,
    CRealm,
    CName,
    Cksum,
    CusecTag,
    Cusec,
    CTimeTag,
    CTime,
    Subkey,
    SeqNumberTag,
    SeqNumber,
    AuthzData,
}

pub struct AuthenticatorGrammar;

impl Grammar for AuthenticatorGrammar {
    type State = AuthenticatorState;
    type Message = Authenticator;

    const NAME: &'static str = "Authenticator";
    const START: AuthenticatorState = AuthenticatorState::Start;

    fn transition(
        state: AuthenticatorState,
        tag: u8,
    ) -> Option<Transition<AuthenticatorState, Authenticator>> {
        use AuthenticatorState::*;
        match (state, tag) {
            (Start, 0x62) => Some(Transition::descend(AuthenticatorSeq, no_action)),
            (AuthenticatorSeq, 0x30) => Some(Transition::descend(Seq, no_action)),
            (Seq, 0xA0) => Some(Transition::descend(VnoTag, no_action)),
            (VnoTag, 0x02) => Some(Transition::capture(Vno, store_vno)),
            (Vno, 0xA1) => Some(Transition::descend(CRealmTag, no_action)),
            (CRealmTag, 0x1B) => Some(Transition::capture(CRealm, store_crealm)),
            (CRealm, 0xA2) => Some(Transition::capture(CName, store_cname)),
            (CName, 0xA3) => Some(Transition::capture(Cksum, store_cksum)),
            (CName, 0xA4) | (Cksum, 0xA4) => Some(Transition::descend(CusecTag, no_action)),
            (CusecTag, 0x02) => Some(Transition::capture(Cusec, store_cusec)),
            (Cusec, 0xA5) => Some(Transition::descend(CTimeTag, no_action)),
            (CTimeTag, 0x18) => Some(Transition::capture(CTime, store_ctime).terminal()),
            (CTime, 0xA6) => Some(Transition::capture(Subkey, store_subkey).terminal()),
            (CTime, 0xA7) | (Subkey, 0xA7) => Some(Transition::descend(SeqNumberTag, no_action)),
            (SeqNumberTag, 0x02) => {
                Some(Transition::capture(SeqNumber, store_seq_number).terminal())
            }
            (CTime, 0xA8) | (Subkey, 0xA8) | (SeqNumber, 0xA8) => {
                Some(Transition::capture(AuthzData, store_authorization_data).terminal())
            }
            _ => None,
        }
    }
}

fn store_vno(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.vno = event.read_i32()?;
    if msg.vno != KRB5_PVNO {
        return Err(ProtocolError::InvalidFieldEncoding {
            offset: event.start,
            reason: format!("authenticator-vno {} is not {}", msg.vno, KRB5_PVNO),
        });
    }
    Ok(())
}

fn store_crealm(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.crealm = event.read_kerberos_string()?;
    Ok(())
}

fn store_cname(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.cname = PrincipalName::decode(event.value)?;
    Ok(())
}

fn store_cksum(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.cksum = Some(Checksum::decode(event.value)?);
    Ok(())
}

fn store_cusec(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.cusec = event.read_i32()?;
    Ok(())
}

fn store_ctime(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.ctime = event.read_generalized_time()?;
    Ok(())
}

fn store_subkey(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.subkey = Some(EncryptionKey::decode(event.value)?);
    Ok(())
}

fn store_seq_number(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.seq_number = Some(event.read_i32()?);
    Ok(())
}

fn store_authorization_data(msg: &mut Authenticator, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.authorization_data = AuthorizationDataEntry::decode_list(event.value)?;
    Ok(())
}
