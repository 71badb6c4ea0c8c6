use thiserror::Error;

/// Error type shared by the BER engine and the message codecs.
///
/// Decode-side variants carry the offset of the offending TLV so a caller
/// can point at the exact position in the input stream. Every variant aborts
/// the current decode or encode immediately; nothing is retried internally.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Input ran out in the middle of a tag or length octet sequence.
    #[error("truncated header at offset {offset}")]
    TruncatedHeader { offset: usize },

    /// Input ran out before the announced value length was received.
    #[error("truncated value at offset {offset}: {missing} more byte(s) required")]
    TruncatedValue { offset: usize, missing: usize },

    /// Indefinite length (0x80) or a length-of-length this profile rejects.
    #[error("unsupported length form 0x{form:02X} at offset {offset}")]
    UnsupportedLength { offset: usize, form: u8 },

    /// A nested TLV does not fit the remaining length of its enclosing value.
    #[error("length mismatch at offset {offset}: tag 0x{tag:02X} does not fit its enclosing value")]
    LengthMismatch { offset: usize, tag: u8 },

    /// No grammar transition exists for the tag in the current state.
    #[error("unexpected tag 0x{tag:02X} in state {state} at offset {offset}")]
    UnexpectedTag {
        offset: usize,
        tag: u8,
        state: String,
    },

    /// The top-level TLV closed while the grammar was in a non-terminal state.
    #[error("input exhausted at offset {offset} before the grammar reached a terminal state")]
    PrematureEnd { offset: usize },

    /// A value failed domain validation (bad string repertoire, malformed
    /// generalized time, wrong message type, ...).
    #[error("invalid field encoding at offset {offset}: {reason}")]
    InvalidFieldEncoding { offset: usize, reason: String },

    /// A field whose semantics require a non-empty value got a zero-length TLV.
    #[error("zero length not allowed for tag 0x{tag:02X} at offset {offset}")]
    ZeroLengthNotAllowed { offset: usize, tag: u8 },

    /// Encode side: a field value cannot be represented in its BER form.
    #[error("value cannot be represented in the target encoding: {reason}")]
    ValueOutOfRange { reason: String },

    /// Encode side: the serialization pass produced a different number of
    /// bytes than the length-computation pass announced.
    #[error("computed length {computed} does not match serialized length {actual}")]
    LengthInconsistent { computed: usize, actual: usize },
}

/// Result type alias used throughout the codec.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
