//! Shared encode entry point
//!
//! Every component and message encodes in two passes: `compute_length`
//! sizes the outermost TLV bottom-up, then `encode_into` serializes into a
//! pre-sized writer. The default `encode` checks the two passes against
//! each other before releasing the buffer.

use bytes::Bytes;
use krb5_asn1::BerWriter;
use krb5_core::{ProtocolError, ProtocolResult};

pub trait BerEncode {
    /// Total on-wire size of this item's outermost TLV, headers included.
    fn compute_length(&self) -> usize;

    /// Serialize this item's complete TLV into `writer`.
    fn encode_into(&self, writer: &mut BerWriter) -> ProtocolResult<()>;

    /// Encode into a fresh buffer of exactly the computed size.
    fn encode(&self) -> ProtocolResult<Bytes> {
        let computed = self.compute_length();
        let mut writer = BerWriter::with_capacity(computed);
        self.encode_into(&mut writer)?;
        let out = writer.freeze();
        if out.len() != computed {
            return Err(ProtocolError::LengthInconsistent {
                computed,
                actual: out.len(),
            });
        }
        Ok(out)
    }
}
