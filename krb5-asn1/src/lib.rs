//! Incremental ASN.1 BER engine
//!
//! This crate provides the generic machinery the Kerberos message codecs are
//! built on:
//!
//! - TLV (Tag-Length-Value) header parsing, including long-form tag numbers
//!   and long-form definite lengths
//! - typed value readers (integers, Kerberos strings, generalized time,
//!   bit strings)
//! - a grammar framework mapping `(state, tag)` to `(next state, action,
//!   terminal flag)` as a static, build-time-checkable table
//! - an incremental decode session that accepts input in arbitrary-sized
//!   chunks and suspends cleanly at any header or value boundary
//! - a two-pass BER writer (compute lengths bottom-up, then serialize)
//!
//! Only definite-length BER is supported; the indefinite form is rejected.

pub mod ber;

pub use ber::container::{DecodeSession, TransitionEvent};
pub use ber::decoder::{decode, DecodeStep};
pub use ber::grammar::{no_action, Action, Flow, Grammar, Transition};
pub use ber::tlv::{Tag, TagClass, TlvEvent};
pub use ber::writer::{int_tlv_len, int_value_len, length_octets_len, tlv_len, BerWriter};
