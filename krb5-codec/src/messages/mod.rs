//! Top-level Kerberos PDUs

pub mod as_req;
pub mod authenticator;
