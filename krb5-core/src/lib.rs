//! Core types and utilities for the Kerberos BER codec
//!
//! This crate provides the shared error taxonomy and the leaf datatypes
//! (Kerberos time, Kerberos flags, Kerberos string validation) used by the
//! generic BER engine and the message codecs built on top of it.

pub mod error;
pub mod datatypes;

pub use error::{ProtocolError, ProtocolResult};
pub use datatypes::{KerberosFlags, KerberosTime};
