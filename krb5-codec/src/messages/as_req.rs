//! AS-REQ message
//!
//! ```text
//! AS-REQ ::= [APPLICATION 10] KDC-REQ
//!
//! KDC-REQ ::= SEQUENCE {
//!     pvno      [1] INTEGER (5),
//!     msg-type  [2] INTEGER (10 -- AS-REQ --),
//!     padata    [3] SEQUENCE OF PA-DATA OPTIONAL,
//!     req-body  [4] KDC-REQ-BODY
//! }
//! ```
//!
//! pvno and msg-type are validated during decode; a KDC-REQ that carries
//! any other values is rejected at the offending integer rather than after
//! the whole PDU has been consumed.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::{ProtocolError, ProtocolResult};

use crate::components::kdc_req_body::KdcReqBody;
use crate::components::pa_data::PaData;
use crate::encode::BerEncode;

/// Protocol version carried by every KDC-REQ.
pub const KRB5_PVNO: i32 = 5;
/// msg-type value identifying an AS-REQ.
pub const AS_REQ_MSG_TYPE: i32 = 10;

/// An initial-authentication request to the KDC.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsReq {
    pub pvno: i32,
    pub msg_type: i32,
    pub pa_data: Vec<PaData>,
    pub req_body: KdcReqBody,
}

impl AsReq {
    /// Build an AS-REQ around `req_body` with the fixed pvno and msg-type.
    pub fn new(req_body: KdcReqBody) -> Self {
        Self {
            pvno: KRB5_PVNO,
            msg_type: AS_REQ_MSG_TYPE,
            pa_data: Vec::new(),
            req_body,
        }
    }

    /// Decode a complete AS-REQ PDU.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let msg = decode::<AsReqGrammar>(bytes)?;
        log::debug!(
            "decoded AS-REQ: realm {:?}, {} pa-data entr(ies), {} byte(s)",
            msg.req_body.realm,
            msg.pa_data.len(),
            bytes.len()
        );
        Ok(msg)
    }

    fn pa_data_content_len(&self) -> usize {
        self.pa_data.iter().map(|p| p.compute_length()).sum()
    }

    fn kdc_req_content_len(&self) -> usize {
        let mut len = tlv_len(int_tlv_len(i64::from(self.pvno)))
            + tlv_len(int_tlv_len(i64::from(self.msg_type)));
        if !self.pa_data.is_empty() {
            len += tlv_len(tlv_len(self.pa_data_content_len()));
        }
        len + tlv_len(self.req_body.compute_length())
    }
}

impl BerEncode for AsReq {
    fn compute_length(&self) -> usize {
        tlv_len(tlv_len(self.kdc_req_content_len()))
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        let content = self.kdc_req_content_len();
        writer.header(0x6A, tlv_len(content));
        writer.header(0x30, content);

        writer.header(0xA1, int_tlv_len(i64::from(self.pvno)));
        writer.integer(i64::from(self.pvno));
        writer.header(0xA2, int_tlv_len(i64::from(self.msg_type)));
        writer.integer(i64::from(self.msg_type));

        if !self.pa_data.is_empty() {
            let pa_content = self.pa_data_content_len();
            writer.header(0xA3, tlv_len(pa_content));
            writer.header(0x30, pa_content);
            for entry in &self.pa_data {
                entry.encode_into(writer)?;
            }
        }

        writer.header(0xA4, self.req_body.compute_length());
        self.req_body.encode_into(writer)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AsReqState {
    Start,
    KdcReqApp,
    KdcReq,
    PvnoTag,
    Pvno,
    MsgTypeTag,
    MsgType,
    PaData,
    ReqBody,
}

pub struct AsReqGrammar;

impl Grammar for AsReqGrammar {
    type State = AsReqState;
    type Message = AsReq;

    const NAME: &'static str = "AS-REQ";
    const START: AsReqState = AsReqState::Start;

    fn transition(state: AsReqState, tag: u8) -> Option<Transition<AsReqState, AsReq>> {
        use AsReqState::*;
        match (state, tag) {
            (Start, 0x6A) => Some(Transition::descend(KdcReqApp, no_action)),
            (KdcReqApp, 0x30) => Some(Transition::descend(KdcReq, no_action)),
            (KdcReq, 0xA1) => Some(Transition::descend(PvnoTag, no_action)),
            (PvnoTag, 0x02) => Some(Transition::capture(Pvno, store_pvno)),
            (Pvno, 0xA2) => Some(Transition::descend(MsgTypeTag, no_action)),
            (MsgTypeTag, 0x02) => Some(Transition::capture(MsgType, store_msg_type)),
            (MsgType, 0xA3) => Some(Transition::capture(PaData, store_pa_data)),
            (MsgType, 0xA4) | (PaData, 0xA4) => {
                Some(Transition::capture(ReqBody, store_req_body).terminal())
            }
            _ => None,
        }
    }
}

fn store_pvno(msg: &mut AsReq, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.pvno = event.read_i32()?;
    if msg.pvno != KRB5_PVNO {
        return Err(ProtocolError::InvalidFieldEncoding {
            offset: event.start,
            reason: format!("pvno {} is not {}", msg.pvno, KRB5_PVNO),
        });
    }
    Ok(())
}

fn store_msg_type(msg: &mut AsReq, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.msg_type = event.read_i32()?;
    if msg.msg_type != AS_REQ_MSG_TYPE {
        return Err(ProtocolError::InvalidFieldEncoding {
            offset: event.start,
            reason: format!("msg-type {} is not AS-REQ ({})", msg.msg_type, AS_REQ_MSG_TYPE),
        });
    }
    Ok(())
}

fn store_pa_data(msg: &mut AsReq, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.pa_data = PaData::decode_list(event.value)?;
    Ok(())
}

fn store_req_body(msg: &mut AsReq, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    msg.req_body = KdcReqBody::decode(event.value)?;
    Ok(())
}
