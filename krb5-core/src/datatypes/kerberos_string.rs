//! Kerberos string repertoire validation
//!
//! Realm names, principal name components and similar fields are restricted
//! to 7-bit content without control characters. The check is applied when a
//! string is read off the wire and again before one is serialized.

/// Check whether a single octet belongs to the permitted repertoire.
///
/// Accepted octets are `0x20..=0x7E`: printable ASCII, no control characters,
/// nothing with the top bit set.
pub fn is_kerberos_char(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Check whether every octet of `bytes` belongs to the permitted repertoire.
///
/// An empty slice is accepted here; callers that require a non-empty value
/// (e.g. principal name components) enforce that separately.
pub fn is_kerberos_string(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_kerberos_char(b))
}
