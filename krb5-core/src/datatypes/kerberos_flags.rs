//! Kerberos flags (ASN.1 BIT STRING payload)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a BIT STRING payload is malformed.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid bit string: {0}")]
pub struct InvalidKerberosFlags(String);

/// A Kerberos flag set, kept in its BER BIT STRING payload form.
///
/// The wire payload is one octet giving the number of unused bits in the
/// last byte (0-7) followed by the bit bytes, MSB first. The raw form is
/// preserved so that re-encoding a decoded flag set reproduces the input
/// byte-for-byte, including flag bits this implementation does not know
/// about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KerberosFlags {
    unused_bits: u8,
    bytes: Vec<u8>,
}

impl KerberosFlags {
    /// Construct a flag set from its payload parts.
    pub fn new(unused_bits: u8, bytes: Vec<u8>) -> Result<Self, InvalidKerberosFlags> {
        if unused_bits > 7 {
            return Err(InvalidKerberosFlags(format!(
                "unused bit count {} out of range 0-7",
                unused_bits
            )));
        }
        if bytes.is_empty() && unused_bits != 0 {
            return Err(InvalidKerberosFlags(
                "empty bit string cannot have unused bits".to_string(),
            ));
        }
        Ok(Self { unused_bits, bytes })
    }

    /// Parse a complete BIT STRING payload (unused-bit octet + bit bytes).
    pub fn parse(payload: &[u8]) -> Result<Self, InvalidKerberosFlags> {
        let (&unused, bits) = payload
            .split_first()
            .ok_or_else(|| InvalidKerberosFlags("empty payload".to_string()))?;
        Self::new(unused, bits.to_vec())
    }

    /// Number of unused bits in the last byte.
    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    /// The bit bytes, MSB first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total number of addressable bits.
    pub fn num_bits(&self) -> usize {
        self.bytes.len() * 8 - usize::from(self.unused_bits)
    }

    /// Length of the BIT STRING payload on the wire.
    pub fn payload_len(&self) -> usize {
        1 + self.bytes.len()
    }

    /// Check whether flag bit `index` is set (bit 0 is the MSB of the first
    /// byte, matching the ASN.1 BIT STRING numbering Kerberos uses).
    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.num_bits() {
            return false;
        }
        let byte = self.bytes[index / 8];
        (byte >> (7 - (index % 8))) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        // kdc-options payload from a reference AS-REQ: no unused bits,
        // flag bytes 01 04 00 32
        let flags = KerberosFlags::parse(&[0x00, 0x01, 0x04, 0x00, 0x32]).unwrap();
        assert_eq!(flags.unused_bits(), 0);
        assert_eq!(flags.as_bytes(), &[0x01, 0x04, 0x00, 0x32]);
        assert_eq!(flags.num_bits(), 32);
        assert_eq!(flags.payload_len(), 5);
    }

    #[test]
    fn test_bit_addressing_is_msb_first() {
        let flags = KerberosFlags::new(0, vec![0b1000_0001, 0b0100_0000]).unwrap();
        assert!(flags.is_set(0));
        assert!(flags.is_set(7));
        assert!(flags.is_set(9));
        assert!(!flags.is_set(1));
        assert!(!flags.is_set(8));
        assert!(!flags.is_set(100));
    }

    #[test]
    fn test_invalid_payloads_rejected() {
        assert!(KerberosFlags::parse(&[]).is_err());
        assert!(KerberosFlags::parse(&[0x08, 0xFF]).is_err());
        assert!(KerberosFlags::new(3, Vec::new()).is_err());
    }
}
