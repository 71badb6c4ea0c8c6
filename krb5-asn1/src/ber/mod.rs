//! BER (Basic Encoding Rules) decoding and encoding
//!
//! Each ASN.1 value on the wire is a TLV (Tag-Length-Value) triplet as
//! specified in ITU-T X.690:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag octets
//!
//! The first identifier octet carries the class (bits 8-7), the
//! constructed/primitive flag (bit 6) and the tag number (bits 5-1). A tag
//! number of 31 in the first octet announces the long form, where the
//! number continues in base-128 octets with bit 8 as the continuation flag.
//!
//! ## Length octets
//!
//! - Short form (1 octet): bit 8 clear, bits 7-1 hold lengths 0-127.
//! - Long form: bit 8 set, bits 7-1 give the count of following big-endian
//!   length octets.
//! - The octet 0x80 announces the indefinite form, which this profile does
//!   not accept.
//!
//! ## Decoding model
//!
//! Decoding is grammar-driven: a per-message-type table maps the current
//! grammar state and the observed tag to a transition. Constructed TLVs
//! either open a nesting frame (`Descend`) or have their complete value
//! buffered and handed to the action (`Capture`). The frame stack counts
//! the bytes remaining at every nesting level, which is how length
//! mismatches are detected without any parent-pointer object graph.

pub mod container;
pub mod decoder;
pub mod grammar;
pub mod tlv;
pub mod value;
pub mod writer;
