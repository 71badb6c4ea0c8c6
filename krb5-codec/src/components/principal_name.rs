//! PrincipalName component
//!
//! ```text
//! PrincipalName ::= SEQUENCE {
//!     name-type    [0] Int32,
//!     name-string  [1] SEQUENCE OF KerberosString
//! }
//! ```
//!
//! Name components are restricted to the printable-ASCII KerberosString
//! repertoire and must be non-empty; both rules are enforced on decode and
//! again on encode.

use krb5_asn1::{
    decode, int_tlv_len, no_action, tlv_len, BerWriter, Grammar, TlvEvent, Transition,
};
use krb5_core::datatypes::kerberos_string::is_kerberos_string;
use krb5_core::{ProtocolError, ProtocolResult};

use crate::encode::BerEncode;

/// Common name-type values.
pub const NT_PRINCIPAL: i32 = 1;
pub const NT_SRV_INST: i32 = 2;
pub const NT_UNKNOWN: i32 = 0;

/// A Kerberos principal identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalName {
    pub name_type: i32,
    pub components: Vec<String>,
}

impl PrincipalName {
    /// Build a single-component principal.
    pub fn new(name_type: i32, component: impl Into<String>) -> Self {
        Self {
            name_type,
            components: vec![component.into()],
        }
    }

    /// Append a further name component.
    pub fn push_component(&mut self, component: impl Into<String>) {
        self.components.push(component.into());
    }

    /// Decode a complete PrincipalName TLV.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        decode::<PrincipalNameGrammar>(bytes)
    }

    fn strings_content_len(&self) -> usize {
        self.components.iter().map(|c| tlv_len(c.len())).sum()
    }

    fn seq_content_len(&self) -> usize {
        tlv_len(int_tlv_len(i64::from(self.name_type)))
            + tlv_len(tlv_len(self.strings_content_len()))
    }
}

impl BerEncode for PrincipalName {
    fn compute_length(&self) -> usize {
        tlv_len(self.seq_content_len())
    }

    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()> {
        for component in &self.components {
            if component.is_empty() {
                return Err(ProtocolError::ValueOutOfRange {
                    reason: "empty principal name component".to_string(),
                });
            }
            if !is_kerberos_string(component.as_bytes()) {
                return Err(ProtocolError::ValueOutOfRange {
                    reason: format!("name component {component:?} outside the KerberosString repertoire"),
                });
            }
        }

        let strings_content = self.strings_content_len();
        writer.header(0x30, self.seq_content_len());
        writer.header(0xA0, int_tlv_len(i64::from(self.name_type)));
        writer.integer(i64::from(self.name_type));
        writer.header(0xA1, tlv_len(strings_content));
        writer.header(0x30, strings_content);
        for component in &self.components {
            writer.general_string(component);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrincipalNameState {
    Start,
    Seq,
    TypeTag,
    Type,
    StringsTag,
    Strings,
    Component,
}

pub struct PrincipalNameGrammar;

impl Grammar for PrincipalNameGrammar {
    type State = PrincipalNameState;
    type Message = PrincipalName;

    const NAME: &'static str = "PrincipalName";
    const START: PrincipalNameState = PrincipalNameState::Start;

    fn transition(
        state: PrincipalNameState,
        tag: u8,
    ) -> Option<Transition<PrincipalNameState, PrincipalName>> {
        use PrincipalNameState::*;
        match (state, tag) {
            (Start, 0x30) => Some(Transition::descend(Seq, no_action)),
            (Seq, 0xA0) => Some(Transition::descend(TypeTag, no_action)),
            (TypeTag, 0x02) => Some(Transition::capture(Type, store_name_type)),
            (Type, 0xA1) => Some(Transition::descend(StringsTag, no_action)),
            (StringsTag, 0x30) => Some(Transition::descend(Strings, no_action)),
            (Strings, 0x1B) | (Component, 0x1B) => {
                Some(Transition::capture(Component, store_component).terminal())
            }
            _ => None,
        }
    }
}

fn store_name_type(name: &mut PrincipalName, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    name.name_type = event.read_i32()?;
    Ok(())
}

fn store_component(name: &mut PrincipalName, event: &TlvEvent<'_>) -> ProtocolResult<()> {
    name.components.push(event.read_kerberos_string()?);
    Ok(())
}
