//! BER serialization
//!
//! Encoding is two-pass: message types first compute the exact length of
//! every nested value bottom-up with the free functions in this module, then
//! serialize into a writer sized for the whole PDU. All produced forms are
//! canonical minimal: shortest definite length octets and shortest
//! two's-complement integers.

use bytes::{BufMut, Bytes, BytesMut};
use krb5_core::datatypes::kerberos_time::KERBEROS_TIME_LENGTH;
use krb5_core::{KerberosFlags, KerberosTime};

/// Number of octets the definite length form for `value_len` occupies.
pub fn length_octets_len(value_len: usize) -> usize {
    if value_len < 0x80 {
        1
    } else {
        1 + be_octets(value_len)
    }
}

/// Total size of a TLV with a one-octet tag and `value_len` value octets.
pub fn tlv_len(value_len: usize) -> usize {
    1 + length_octets_len(value_len) + value_len
}

/// Number of octets the minimal two's-complement form of `value` occupies.
pub fn int_value_len(mut value: i64) -> usize {
    let mut len = 1;
    while value > 127 || value < -128 {
        len += 1;
        value >>= 8;
    }
    len
}

/// Total size of an INTEGER TLV holding `value`.
pub fn int_tlv_len(value: i64) -> usize {
    tlv_len(int_value_len(value))
}

fn be_octets(value: usize) -> usize {
    let mut len = 1;
    let mut value = value >> 8;
    while value != 0 {
        len += 1;
        value >>= 8;
    }
    len
}

/// An append-only BER output buffer.
///
/// The writer performs no length back-patching: callers supply each value
/// length up front, computed in the first encode pass.
pub struct BerWriter {
    buf: BytesMut,
}

impl BerWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Write a one-octet tag and the minimal definite length form.
    pub fn header(&mut self, tag: u8, value_len: usize) {
        self.buf.put_u8(tag);
        if value_len < 0x80 {
            self.buf.put_u8(value_len as u8);
        } else {
            let count = be_octets(value_len);
            self.buf.put_u8(0x80 | count as u8);
            for i in (0..count).rev() {
                self.buf.put_u8((value_len >> (8 * i)) as u8);
            }
        }
    }

    /// Write a complete INTEGER TLV in minimal two's-complement form.
    pub fn integer(&mut self, value: i64) {
        let len = int_value_len(value);
        self.header(0x02, len);
        for i in (0..len).rev() {
            self.buf.put_u8((value >> (8 * i)) as u8);
        }
    }

    /// Write a complete OCTET STRING TLV.
    pub fn octet_string(&mut self, bytes: &[u8]) {
        self.header(0x04, bytes.len());
        self.buf.put_slice(bytes);
    }

    /// Write a complete GeneralString TLV.
    pub fn general_string(&mut self, value: &str) {
        self.header(0x1B, value.len());
        self.buf.put_slice(value.as_bytes());
    }

    /// Write a complete GeneralizedTime TLV in the `YYYYMMDDHHMMSSZ` form.
    pub fn generalized_time(&mut self, time: &KerberosTime) {
        self.header(0x18, KERBEROS_TIME_LENGTH);
        self.buf.put_slice(time.to_wire().as_bytes());
    }

    /// Write a complete BIT STRING TLV (unused-bit octet + bit bytes).
    pub fn bit_string(&mut self, flags: &KerberosFlags) {
        self.header(0x03, flags.payload_len());
        self.buf.put_u8(flags.unused_bits());
        self.buf.put_slice(flags.as_bytes());
    }

    /// Append pre-encoded bytes unchanged.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finalize into an immutable buffer.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}
