#![no_main]

//! Fuzz target for handshake and hello extension decoding.
//!
//! Handshake header format:
//! - msg_type: 1 byte
//! - length: 3 bytes
//! - message_seq: 2 bytes
//! - fragment_offset: 3 bytes
//! - fragment_length: 3 bytes
//!
//! Anything that decodes must serialize again.

use libfuzzer_sys::fuzz_target;

use dtls_hello::message::{Handshake, HelloExtensions, HEADER_LEN};
use dtls_hello::Config;

fuzz_target!(|data: &[u8]| {
    let config = Config::default();

    // Test the input as-is (even small inputs exercise error paths)
    if let Ok(handshake) = Handshake::decode(&config, data) {
        let mut out = Vec::new();
        handshake.serialize(&mut out).expect("decoded value serializes");
    }

    if let Ok(extensions) = HelloExtensions::decode(data) {
        let mut out = Vec::new();
        extensions.serialize(&mut out).expect("decoded value serializes");
        assert_eq!(out, data);
    }

    // Wrap the input as a ClientHello and HelloVerifyRequest body
    if data.len() < 0x00FF_FFFF {
        for msg_type in [1u8, 3] {
            let len = (data.len() as u32).to_be_bytes();
            let mut message = Vec::with_capacity(HEADER_LEN + data.len());
            message.push(msg_type);
            message.extend_from_slice(&len[1..]);
            message.extend_from_slice(&[0, 0]); // message_seq
            message.extend_from_slice(&[0, 0, 0]); // fragment_offset
            message.extend_from_slice(&len[1..]); // fragment_length
            message.extend_from_slice(data);

            let _ = Handshake::decode(&config, &message);
        }
    }
});
