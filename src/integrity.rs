// src/integrity.rs
//! Keyed integrity digest over plaintext
//!
//! HMAC-SHA256 keyed with the derived file key. The digest covers the
//! original content, so it answers "was the plaintext altered" independently
//! of whether the cipher transform itself succeeded.

use std::io::Read;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::aliases::Digest;
use crate::consts::STREAM_BUFFER_SIZE;
use crate::crypto::{read_chunk, staging_buffer};
use crate::error::{CoreError, Result};

type HmacSha256 = Hmac<Sha256>;

fn new_mac(key: &[u8]) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(key).map_err(|e| CoreError::crypto(format!("HMAC init: {e}")))
}

fn finish(mac: HmacSha256) -> Digest {
    let mut out = Digest::default();
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Digest an in-memory buffer
pub fn digest(data: &[u8], key: &[u8]) -> Result<Digest> {
    let mut mac = new_mac(key)?;
    mac.update(data);
    Ok(finish(mac))
}

/// Digest a stream, consuming it to EOF
pub fn digest_reader<R: Read>(mut reader: R, key: &[u8]) -> Result<Digest> {
    let mut mac = new_mac(key)?;
    let mut buffer = staging_buffer(STREAM_BUFFER_SIZE);
    loop {
        let n = read_chunk(&mut reader, &mut buffer)?;
        if n == 0 {
            break;
        }
        mac.update(&buffer[..n]);
    }
    Ok(finish(mac))
}

/// Constant-time digest comparison; a length mismatch is an immediate `false`
pub fn digests_match(computed: &[u8], expected: &[u8]) -> bool {
    if computed.len() != expected.len() {
        return false;
    }
    computed.ct_eq(expected).into()
}

/// Recompute the digest of `data` and compare it to `expected`.
///
/// Never errors: anything short of an exact match is `false`.
pub fn verify(data: &[u8], key: &[u8], expected: &[u8]) -> bool {
    match digest(data, key) {
        Ok(computed) => digests_match(&computed, expected),
        Err(_) => false,
    }
}

/// Stream form of [`verify`]. Read errors are reported, mismatches are not.
pub fn verify_reader<R: Read>(reader: R, key: &[u8], expected: &[u8]) -> Result<bool> {
    let computed = digest_reader(reader, key)?;
    Ok(digests_match(&computed, expected))
}
