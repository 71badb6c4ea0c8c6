//! Kerberos message codecs
//!
//! Grammar-driven decoders and two-pass encoders for the Kerberos PDUs this
//! crate supports (AS-REQ and Authenticator) together with the component
//! types they are assembled from. Decoding is incremental: every message
//! grammar can be driven through a
//! [`DecodeSession`](krb5_asn1::DecodeSession) fed arbitrary-sized chunks,
//! or in one shot via the inherent `decode` constructors. Encoding always
//! produces canonical minimal BER, so a decode of canonical input
//! re-encodes byte-identically.

pub mod components;
pub mod encode;
pub mod messages;

pub use components::authorization_data::AuthorizationDataEntry;
pub use components::checksum::Checksum;
pub use components::encrypted_data::EncryptedData;
pub use components::encryption_key::EncryptionKey;
pub use components::host_address::HostAddress;
pub use components::kdc_req_body::KdcReqBody;
pub use components::pa_data::PaData;
pub use components::principal_name::{PrincipalName, PrincipalNameGrammar};
pub use components::ticket::Ticket;
pub use encode::BerEncode;
pub use messages::as_req::{AsReq, AsReqGrammar};
pub use messages::authenticator::{Authenticator, AuthenticatorGrammar};
