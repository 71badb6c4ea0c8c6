//! Leaf datatypes used by the Kerberos message codecs

pub mod kerberos_flags;
pub mod kerberos_string;
pub mod kerberos_time;

pub use kerberos_flags::KerberosFlags;
pub use kerberos_time::KerberosTime;
