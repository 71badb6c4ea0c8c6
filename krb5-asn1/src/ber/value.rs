//! Typed readers for captured TLV values
//!
//! Grammar actions call these methods on the [`TlvEvent`] they receive to
//! turn raw value bytes into domain values. Every reader maps its failure
//! into a [`ProtocolError`] carrying the offset of the value's first octet,
//! so an action body is normally a single `?` expression.

use krb5_core::datatypes::kerberos_string::is_kerberos_char;
use krb5_core::{KerberosFlags, KerberosTime, ProtocolError, ProtocolResult};

use super::tlv::TlvEvent;

/// Widest integer the readers accept, in value octets.
const MAX_INTEGER_OCTETS: usize = 8;

impl TlvEvent<'_> {
    /// Offset of the first value octet, used in error reports.
    fn value_offset(&self) -> usize {
        self.start + self.header_size
    }

    /// Read the value as a BER two's-complement signed integer.
    ///
    /// Non-minimal encodings (redundant leading 0x00 or 0xFF octets) are
    /// accepted on input; the writer always produces the minimal form.
    pub fn read_integer(&self) -> ProtocolResult<i64> {
        if self.value.is_empty() {
            return Err(ProtocolError::ZeroLengthNotAllowed {
                offset: self.start,
                tag: self.tag.first_octet(),
            });
        }
        if self.value.len() > MAX_INTEGER_OCTETS {
            return Err(ProtocolError::InvalidFieldEncoding {
                offset: self.value_offset(),
                reason: format!("integer of {} octets exceeds 8", self.value.len()),
            });
        }

        let mut value: i64 = if self.value[0] & 0x80 != 0 { -1 } else { 0 };
        for &b in self.value {
            value = (value << 8) | i64::from(b);
        }
        Ok(value)
    }

    /// Read the value as a signed integer that must fit in 32 bits.
    pub fn read_i32(&self) -> ProtocolResult<i32> {
        let wide = self.read_integer()?;
        i32::try_from(wide).map_err(|_| ProtocolError::InvalidFieldEncoding {
            offset: self.value_offset(),
            reason: format!("integer {} does not fit in 32 bits", wide),
        })
    }

    /// Read the value as a KerberosString (GeneralString restricted to
    /// printable ASCII). Empty strings are rejected: no Kerberos field
    /// carries one.
    pub fn read_kerberos_string(&self) -> ProtocolResult<String> {
        if self.value.is_empty() {
            return Err(ProtocolError::ZeroLengthNotAllowed {
                offset: self.start,
                tag: self.tag.first_octet(),
            });
        }
        if let Some(pos) = self.value.iter().position(|&b| !is_kerberos_char(b)) {
            return Err(ProtocolError::InvalidFieldEncoding {
                offset: self.value_offset() + pos,
                reason: format!(
                    "octet 0x{:02X} outside the KerberosString repertoire",
                    self.value[pos]
                ),
            });
        }
        String::from_utf8(self.value.to_vec()).map_err(|e| ProtocolError::InvalidFieldEncoding {
            offset: self.value_offset(),
            reason: e.to_string(),
        })
    }

    /// Read the value as a GeneralizedTime in the `YYYYMMDDHHMMSSZ` form.
    pub fn read_generalized_time(&self) -> ProtocolResult<KerberosTime> {
        KerberosTime::parse(self.value).map_err(|e| ProtocolError::InvalidFieldEncoding {
            offset: self.value_offset(),
            reason: e.to_string(),
        })
    }

    /// Read the value as a BIT STRING payload (unused-bit octet + bit bytes).
    pub fn read_kerberos_flags(&self) -> ProtocolResult<KerberosFlags> {
        KerberosFlags::parse(self.value).map_err(|e| ProtocolError::InvalidFieldEncoding {
            offset: self.value_offset(),
            reason: e.to_string(),
        })
    }

    /// Read the value as a non-empty OCTET STRING.
    pub fn read_octet_string(&self) -> ProtocolResult<Vec<u8>> {
        if self.value.is_empty() {
            return Err(ProtocolError::ZeroLengthNotAllowed {
                offset: self.start,
                tag: self.tag.first_octet(),
            });
        }
        Ok(self.value.to_vec())
    }
}
