//! Kerberos timestamp type
//!
//! Kerberos encodes timestamps as ASN.1 GeneralizedTime restricted to the
//! fixed form `YYYYMMDDHHMMSSZ` (no fractional seconds, no UTC offset).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the wire representation, including the trailing `Z`.
pub const KERBEROS_TIME_LENGTH: usize = 15;

/// Error raised when a byte sequence is not a valid Kerberos timestamp.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid Kerberos time: {0}")]
pub struct InvalidKerberosTime(String);

/// A Kerberos timestamp with second precision, always UTC.
///
/// Parsing is strict: exactly 15 octets, all-digit fields, a literal `Z`
/// terminator, and in-range field values. Formatting reproduces the exact
/// 15-octet string the value was parsed from, which is what makes timestamp
/// fields round-trip byte-identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KerberosTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl KerberosTime {
    /// Construct a timestamp from its component fields.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, InvalidKerberosTime> {
        verify(u32::from(year), "year", 0, 9999)?;
        verify(u32::from(month), "month", 1, 12)?;
        verify(u32::from(day), "day", 1, 31)?;
        verify(u32::from(hour), "hour", 0, 23)?;
        verify(u32::from(minute), "minute", 0, 59)?;
        verify(u32::from(second), "second", 0, 59)?;

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Parse the wire form `YYYYMMDDHHMMSSZ`.
    pub fn parse(bytes: &[u8]) -> Result<Self, InvalidKerberosTime> {
        if bytes.len() != KERBEROS_TIME_LENGTH {
            return Err(InvalidKerberosTime(format!(
                "expected {} octets, got {}",
                KERBEROS_TIME_LENGTH,
                bytes.len()
            )));
        }

        if bytes[14] != b'Z' {
            return Err(InvalidKerberosTime(
                "timestamp must end with 'Z'".to_string(),
            ));
        }

        let year = digits(&bytes[0..4])?;
        let month = digits(&bytes[4..6])?;
        let day = digits(&bytes[6..8])?;
        let hour = digits(&bytes[8..10])?;
        let minute = digits(&bytes[10..12])?;
        let second = digits(&bytes[12..14])?;

        Self::new(
            year as u16,
            month as u8,
            day as u8,
            hour as u8,
            minute as u8,
            second as u8,
        )
    }

    /// Format back to the 15-octet wire form.
    pub fn to_wire(&self) -> String {
        format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

/// Midnight, 1970-01-01. An all-zero timestamp has month and day outside
/// their ranges and would not survive its own wire form, so the default is
/// pinned to the earliest value that does.
impl Default for KerberosTime {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl fmt::Display for KerberosTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

fn verify(value: u32, field: &str, min: u32, max: u32) -> Result<(), InvalidKerberosTime> {
    if value < min || value > max {
        return Err(InvalidKerberosTime(format!(
            "{} {} out of range [{}, {}]",
            field, value, min, max
        )));
    }
    Ok(())
}

fn digits(bytes: &[u8]) -> Result<u32, InvalidKerberosTime> {
    let mut value = 0u32;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return Err(InvalidKerberosTime(format!(
                "non-digit octet 0x{:02X} in timestamp",
                b
            )));
        }
        value = value * 10 + u32::from(b - b'0');
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        let time = KerberosTime::parse(b"20101110154525Z").unwrap();
        assert_eq!(time.year(), 2010);
        assert_eq!(time.month(), 11);
        assert_eq!(time.day(), 10);
        assert_eq!(time.hour(), 15);
        assert_eq!(time.minute(), 45);
        assert_eq!(time.second(), 25);
        assert_eq!(time.to_wire(), "20101110154525Z");
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(KerberosTime::parse(b"20101110154525").is_err());
        assert!(KerberosTime::parse(b"201011101545250Z").is_err());
        assert!(KerberosTime::parse(b"").is_err());
    }

    #[test]
    fn test_missing_zulu_rejected() {
        assert!(KerberosTime::parse(b"20101110154525X").is_err());
    }

    #[test]
    fn test_non_digit_rejected() {
        assert!(KerberosTime::parse(b"2010111015452 Z").is_err());
        assert!(KerberosTime::parse(b"2O101110154525Z").is_err());
    }

    #[test]
    fn test_default_survives_its_own_wire_form() {
        let time = KerberosTime::default();
        assert_eq!(time.to_wire(), "19700101000000Z");
        assert_eq!(KerberosTime::parse(time.to_wire().as_bytes()), Ok(time));
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        assert!(KerberosTime::parse(b"20101310154525Z").is_err()); // month 13
        assert!(KerberosTime::parse(b"20101100154525Z").is_err()); // day 0
        assert!(KerberosTime::parse(b"20101110244525Z").is_err()); // hour 24
        assert!(KerberosTime::parse(b"20101110156025Z").is_err()); // minute 60
        assert!(KerberosTime::parse(b"20101110154560Z").is_err()); // second 60
    }
}
