//! AS-REQ decode/encode against a full reference PDU

use krb5_asn1::{DecodeSession, DecodeStep};
use krb5_codec::{
    AsReq, AsReqGrammar, BerEncode, EncryptedData, HostAddress, KdcReqBody, PaData, PrincipalName,
    Ticket,
};
use krb5_core::{KerberosFlags, KerberosTime, ProtocolError};

fn principal_name(name_type: u8, name: &[u8; 6]) -> Vec<u8> {
    let mut v = vec![
        0x30, 0x11, 0xA0, 0x03, 0x02, 0x01, name_type, 0xA1, 0x0A, 0x30, 0x08, 0x1B, 0x06,
    ];
    v.extend_from_slice(name);
    v
}

fn kdc_req_body_bytes() -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&[0x30, 0x82, 0x01, 0x57]);
    // kdc-options
    v.extend_from_slice(&[0xA0, 0x07, 0x03, 0x05, 0x00, 0x01, 0x04, 0x00, 0x32]);
    // cname
    v.extend_from_slice(&[0xA1, 0x13]);
    v.extend(principal_name(0x0A, b"client"));
    // realm
    v.extend_from_slice(&[0xA2, 0x0D, 0x1B, 0x0B]);
    v.extend_from_slice(b"EXAMPLE.COM");
    // sname
    v.extend_from_slice(&[0xA3, 0x13]);
    v.extend(principal_name(0x0A, b"server"));
    // from, till, rtime
    for tag in [0xA4, 0xA5, 0xA6] {
        v.extend_from_slice(&[tag, 0x11, 0x18, 0x0F]);
        v.extend_from_slice(b"20101110154525Z");
    }
    // nonce
    v.extend_from_slice(&[0xA7, 0x04, 0x02, 0x02, 0x30, 0x39]);
    // etype
    v.extend_from_slice(&[
        0xA8, 0x0B, 0x30, 0x09, 0x02, 0x01, 0x06, 0x02, 0x01, 0x11, 0x02, 0x01, 0x12,
    ]);
    // addresses
    v.extend_from_slice(&[0xA9, 0x2E, 0x30, 0x2C]);
    for addr in [b"192.168.0.1", b"192.168.0.2"] {
        v.extend_from_slice(&[
            0x30, 0x14, 0xA0, 0x03, 0x02, 0x01, 0x02, 0xA1, 0x0D, 0x04, 0x0B,
        ]);
        v.extend_from_slice(addr);
    }
    // enc-authorization-data
    v.extend_from_slice(&[
        0xAA, 0x11, 0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x11, 0xA2, 0x08, 0x04, 0x06,
    ]);
    v.extend_from_slice(b"abcdef");
    // additional-tickets
    v.extend_from_slice(&[0xAB, 0x81, 0x83, 0x30, 0x81, 0x80]);
    for name in [b"client", b"server"] {
        v.extend_from_slice(&[
            0x61, 0x3E, 0x30, 0x3C, 0xA0, 0x03, 0x02, 0x01, 0x05, 0xA1, 0x0D, 0x1B, 0x0B,
        ]);
        v.extend_from_slice(b"EXAMPLE.COM");
        v.extend_from_slice(&[0xA2, 0x13]);
        v.extend(principal_name(0x01, name));
        v.extend_from_slice(&[
            0xA3, 0x11, 0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x11, 0xA2, 0x08, 0x04, 0x06,
        ]);
        v.extend_from_slice(b"abcdef");
    }
    v
}

fn as_req_bytes(with_pa_data: bool) -> Vec<u8> {
    let mut v = if with_pa_data {
        vec![0x6A, 0x82, 0x01, 0x8F, 0x30, 0x82, 0x01, 0x8B]
    } else {
        vec![0x6A, 0x82, 0x01, 0x6D, 0x30, 0x82, 0x01, 0x69]
    };
    v.extend_from_slice(&[0xA1, 0x03, 0x02, 0x01, 0x05, 0xA2, 0x03, 0x02, 0x01, 0x0A]);
    if with_pa_data {
        v.extend_from_slice(&[0xA3, 0x20, 0x30, 0x1E]);
        for value in [b"abcd", b"efgh"] {
            v.extend_from_slice(&[
                0x30, 0x0D, 0xA1, 0x03, 0x02, 0x01, 0x01, 0xA2, 0x06, 0x04, 0x04,
            ]);
            v.extend_from_slice(value);
        }
    }
    v.extend_from_slice(&[0xA4, 0x82, 0x01, 0x5B]);
    v.extend(kdc_req_body_bytes());
    v
}

fn expected_as_req(with_pa_data: bool) -> AsReq {
    let time = KerberosTime::parse(b"20101110154525Z").unwrap();
    let enc = EncryptedData::new(17, b"abcdef".to_vec());
    let mut msg = AsReq::new(KdcReqBody {
        kdc_options: KerberosFlags::new(0, vec![0x01, 0x04, 0x00, 0x32]).unwrap(),
        cname: Some(PrincipalName::new(10, "client")),
        realm: "EXAMPLE.COM".to_string(),
        sname: Some(PrincipalName::new(10, "server")),
        from: Some(time),
        till: time,
        rtime: Some(time),
        nonce: 12345,
        etypes: vec![6, 17, 18],
        addresses: vec![
            HostAddress::new(2, b"192.168.0.1".to_vec()),
            HostAddress::new(2, b"192.168.0.2".to_vec()),
        ],
        enc_authorization_data: Some(enc.clone()),
        additional_tickets: vec![
            Ticket::new("EXAMPLE.COM", PrincipalName::new(1, "client"), enc.clone()),
            Ticket::new("EXAMPLE.COM", PrincipalName::new(1, "server"), enc),
        ],
    });
    if with_pa_data {
        msg.pa_data = vec![
            PaData::new(1, b"abcd".to_vec()),
            PaData::new(1, b"efgh".to_vec()),
        ];
    }
    msg
}

#[test]
fn test_decode_full_as_req() {
    let input = as_req_bytes(true);
    assert_eq!(input.len(), 0x193);
    assert_eq!(AsReq::decode(&input).unwrap(), expected_as_req(true));
}

#[test]
fn test_decode_as_req_without_pa_data() {
    let input = as_req_bytes(false);
    assert_eq!(input.len(), 0x171);
    assert_eq!(AsReq::decode(&input).unwrap(), expected_as_req(false));
}

#[test]
fn test_round_trip_is_byte_identical() {
    for with_pa_data in [true, false] {
        let input = as_req_bytes(with_pa_data);
        let msg = AsReq::decode(&input).unwrap();
        assert_eq!(msg.compute_length(), input.len());
        assert_eq!(&msg.encode().unwrap()[..], &input[..]);
    }
}

#[test]
fn test_encode_from_constructed_message() {
    let msg = expected_as_req(true);
    assert_eq!(&msg.encode().unwrap()[..], &as_req_bytes(true)[..]);
}

#[test]
fn test_bad_msg_type_rejected() {
    let mut input = as_req_bytes(true);
    // msg-type value octet: 0x0C (TGS-REQ) inside an AS-REQ wrapper.
    assert_eq!(input[17], 0x0A);
    input[17] = 0x0C;
    let err = AsReq::decode(&input).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidFieldEncoding { .. }));
}

#[test]
fn test_bad_pvno_rejected() {
    let mut input = as_req_bytes(true);
    assert_eq!(input[12], 0x05);
    input[12] = 0x04;
    let err = AsReq::decode(&input).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidFieldEncoding { .. }));
}

#[test]
fn test_empty_as_req_is_premature_end() {
    let err = AsReq::decode(&[0x6A, 0x00]).unwrap_err();
    assert!(matches!(err, ProtocolError::PrematureEnd { offset: 2 }));
}

#[test]
fn test_every_truncated_prefix_fails() {
    let input = as_req_bytes(true);
    for cut in 0..input.len() {
        let mut session = DecodeSession::<AsReqGrammar>::new();
        let step = session.feed(&input[..cut]).unwrap();
        assert_eq!(step, DecodeStep::MoreInput, "prefix of {cut} bytes");
        assert!(session.finish().is_err(), "prefix of {cut} bytes");
    }
}

#[test]
fn test_length_perturbation_is_length_mismatch() {
    // pvno wrapper [1] declares 3 bytes; nudge it either way.
    for bad in [0x02u8, 0x04] {
        let mut input = as_req_bytes(true);
        assert_eq!(input[9], 0x03);
        input[9] = bad;
        let err = AsReq::decode(&input).unwrap_err();
        assert!(
            matches!(err, ProtocolError::LengthMismatch { .. }),
            "perturbed length 0x{bad:02X}: {err:?}"
        );
    }
}

#[test]
fn test_one_byte_at_a_time_feed() {
    let input = as_req_bytes(true);
    let mut session = DecodeSession::<AsReqGrammar>::new();
    for (i, byte) in input.iter().enumerate() {
        let step = session.feed(std::slice::from_ref(byte)).unwrap();
        if i + 1 < input.len() {
            assert_eq!(step, DecodeStep::MoreInput, "byte {i}");
        } else {
            assert_eq!(step, DecodeStep::Complete { consumed: 1 });
        }
    }
    assert_eq!(session.finish().unwrap(), expected_as_req(true));
}

#[test]
fn test_split_feed_at_every_boundary() {
    let input = as_req_bytes(true);
    for split in [1, 4, 17, 50, 128, 0x171, input.len() - 1] {
        let mut session = DecodeSession::<AsReqGrammar>::new();
        assert_eq!(
            session.feed(&input[..split]).unwrap(),
            DecodeStep::MoreInput
        );
        assert_eq!(
            session.feed(&input[split..]).unwrap(),
            DecodeStep::Complete {
                consumed: input.len() - split
            }
        );
        assert_eq!(session.finish().unwrap(), expected_as_req(true));
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut input = as_req_bytes(true);
    input.push(0x00);
    let err = AsReq::decode(&input).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::UnexpectedTag { offset: 0x193, .. }
    ));
}
