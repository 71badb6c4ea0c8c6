//! Component types shared by the Kerberos messages
//!
//! Each component owns its grammar and its encode shape. Components that
//! appear as fields of a larger structure are captured whole by the
//! enclosing grammar and decoded with their own grammar, so nesting depth
//! never complicates any single state table.

pub mod authorization_data;
pub mod checksum;
pub mod encrypted_data;
pub mod encryption_key;
pub mod host_address;
pub mod kdc_req_body;
pub mod pa_data;
pub mod principal_name;
pub mod ticket;

use krb5_asn1::TlvEvent;
use krb5_core::{ProtocolError, ProtocolResult};

/// Fetch the entry a SEQUENCE-OF grammar is currently filling.
///
/// Entries are pushed when their opening tag descends, so a field action
/// firing with no entry open means the table itself is wrong; the error is
/// kept instead of panicking.
pub(crate) fn last_entry<'a, T>(
    entries: &'a mut Vec<T>,
    event: &TlvEvent<'_>,
) -> ProtocolResult<&'a mut T> {
    entries
        .last_mut()
        .ok_or_else(|| ProtocolError::InvalidFieldEncoding {
            offset: event.start,
            reason: "field encountered outside any sequence entry".to_string(),
        })
}
