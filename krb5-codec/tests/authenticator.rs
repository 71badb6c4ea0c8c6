//! Authenticator decode/encode against a full reference PDU

use krb5_asn1::{DecodeSession, DecodeStep};
use krb5_codec::{
    Authenticator, AuthenticatorGrammar, AuthorizationDataEntry, BerEncode, Checksum,
    EncryptionKey, PrincipalName,
};
use krb5_core::{KerberosTime, ProtocolError};

fn authenticator_bytes() -> Vec<u8> {
    let mut v = vec![0x62, 0x81, 0x92, 0x30, 0x81, 0x8F];
    // authenticator-vno
    v.extend_from_slice(&[0xA0, 0x03, 0x02, 0x01, 0x05]);
    // crealm
    v.extend_from_slice(&[0xA1, 0x0D, 0x1B, 0x0B]);
    v.extend_from_slice(b"EXAMPLE.COM");
    // cname
    v.extend_from_slice(&[
        0xA2, 0x13, 0x30, 0x11, 0xA0, 0x03, 0x02, 0x01, 0x0A, 0xA1, 0x0A, 0x30, 0x08, 0x1B, 0x06,
    ]);
    v.extend_from_slice(b"client");
    // cksum
    v.extend_from_slice(&[
        0xA3, 0x0F, 0x30, 0x0D, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x06, 0x04, 0x04,
    ]);
    v.extend_from_slice(b"abcd");
    // cusec
    v.extend_from_slice(&[0xA4, 0x03, 0x02, 0x01, 0x7F]);
    // ctime
    v.extend_from_slice(&[0xA5, 0x11, 0x18, 0x0F]);
    v.extend_from_slice(b"20101110154525Z");
    // subkey
    v.extend_from_slice(&[
        0xA6, 0x0F, 0x30, 0x0D, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x06, 0x04, 0x04,
    ]);
    v.extend_from_slice(b"ABCD");
    // seq-number
    v.extend_from_slice(&[0xA7, 0x04, 0x02, 0x02, 0x30, 0x39]);
    // authorization-data
    v.extend_from_slice(&[0xA8, 0x24, 0x30, 0x22]);
    for data in [b"abcdef", b"ghijkl"] {
        v.extend_from_slice(&[
            0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x02, 0xA1, 0x08, 0x04, 0x06,
        ]);
        v.extend_from_slice(data);
    }
    v
}

fn expected_authenticator() -> Authenticator {
    let mut msg = Authenticator::new(
        "EXAMPLE.COM",
        PrincipalName::new(10, "client"),
        KerberosTime::parse(b"20101110154525Z").unwrap(),
    );
    msg.cksum = Some(Checksum::new(1, b"abcd".to_vec()));
    msg.cusec = 127;
    msg.subkey = Some(EncryptionKey::new(1, b"ABCD".to_vec()));
    msg.seq_number = Some(12345);
    msg.authorization_data = vec![
        AuthorizationDataEntry::new(2, b"abcdef".to_vec()),
        AuthorizationDataEntry::new(2, b"ghijkl".to_vec()),
    ];
    msg
}

#[test]
fn test_decode_full_authenticator() {
    let input = authenticator_bytes();
    assert_eq!(input.len(), 0x95);
    assert_eq!(Authenticator::decode(&input).unwrap(), expected_authenticator());
}

#[test]
fn test_round_trip_is_byte_identical() {
    let input = authenticator_bytes();
    let msg = Authenticator::decode(&input).unwrap();
    assert_eq!(msg.compute_length(), input.len());
    assert_eq!(&msg.encode().unwrap()[..], &input[..]);
}

#[test]
fn test_minimal_authenticator_round_trip() {
    // Only the required fields.
    let mut msg = expected_authenticator();
    msg.cksum = None;
    msg.subkey = None;
    msg.seq_number = None;
    msg.authorization_data.clear();

    let bytes = msg.encode().unwrap();
    assert_eq!(Authenticator::decode(&bytes).unwrap(), msg);
}

#[test]
fn test_default_ctime_encodes_as_valid_timestamp() {
    let mut msg = expected_authenticator();
    msg.ctime = KerberosTime::default();

    let bytes = msg.encode().unwrap();
    assert_eq!(
        Authenticator::decode(&bytes).unwrap().ctime,
        KerberosTime::default()
    );
}

#[test]
fn test_empty_pdus_are_premature_end() {
    for input in [&[0x62u8, 0x00][..], &[0x62, 0x02, 0x30, 0x00], &[0x62, 0x04, 0x30, 0x02, 0xA0, 0x00]] {
        let err = Authenticator::decode(input).unwrap_err();
        assert!(
            matches!(err, ProtocolError::PrematureEnd { .. }),
            "input {input:02X?}: {err:?}"
        );
    }
}

#[test]
fn test_zero_length_vno_rejected() {
    let err = Authenticator::decode(&[0x62, 0x06, 0x30, 0x04, 0xA0, 0x02, 0x02, 0x00]).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::ZeroLengthNotAllowed { tag: 0x02, .. }
    ));
}

#[test]
fn test_wrong_pdu_type_rejected_immediately() {
    // A KDC-REQ-BODY starts with a plain SEQUENCE, which an Authenticator
    // grammar has no transition for.
    let body = [
        0x30, 0x1D, 0xA0, 0x07, 0x03, 0x05, 0x00, 0x00, 0x00, 0x00, 0x10, 0xA2, 0x0D, 0x1B, 0x0B,
        b'E', b'X', b'A', b'M', b'P', b'L', b'E', b'.', b'C', b'O', b'M', 0xA7, 0x03, 0x02, 0x01,
        0x2A,
    ];
    let err = Authenticator::decode(&body).unwrap_err();
    match err {
        ProtocolError::UnexpectedTag { offset, tag, state } => {
            assert_eq!(offset, 0);
            assert_eq!(tag, 0x30);
            assert_eq!(state, "Authenticator::Start");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_every_truncated_prefix_fails() {
    let input = authenticator_bytes();
    for cut in 0..input.len() {
        let mut session = DecodeSession::<AuthenticatorGrammar>::new();
        assert_eq!(
            session.feed(&input[..cut]).unwrap(),
            DecodeStep::MoreInput,
            "prefix of {cut} bytes"
        );
        assert!(session.finish().is_err(), "prefix of {cut} bytes");
    }
}

#[test]
fn test_one_byte_at_a_time_feed() {
    let input = authenticator_bytes();
    let mut session = DecodeSession::<AuthenticatorGrammar>::new();
    for byte in &input[..input.len() - 1] {
        assert_eq!(
            session.feed(std::slice::from_ref(byte)).unwrap(),
            DecodeStep::MoreInput
        );
    }
    assert_eq!(
        session.feed(&input[input.len() - 1..]).unwrap(),
        DecodeStep::Complete { consumed: 1 }
    );
    assert_eq!(session.finish().unwrap(), expected_authenticator());
}
