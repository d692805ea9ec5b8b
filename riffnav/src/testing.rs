//! Test-only helpers for building fixtures from inline hex strings.

#![allow(dead_code)]

use hex::decode;

/// Decodes a hex string (whitespace and newlines ignored) into bytes,
/// for building synthetic RIFF fixtures inline in tests.
pub(crate) fn hex_to_bytes(data: &str) -> Vec<u8> {
    let data = data.replace([' ', '\n'], "");
    decode(data).expect("while decoding hex data from string")
}
