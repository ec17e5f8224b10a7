// src/key_ops.rs
//! Random material generation
//!
//! Salts, IVs and keyfile bytes all come from the thread-local CSPRNG.

use rand::RngCore;

use crate::aliases::{Iv, Salt};

/// Fill a fresh buffer of `length` bytes with cryptographically secure random data
pub fn generate_random_data(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// New random 128-bit initialization vector
#[inline]
pub fn random_iv() -> Iv {
    let mut iv = Iv::default();
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// New random 64-bit KDF salt
#[inline]
pub fn random_salt() -> Salt {
    let mut salt = Salt::default();
    rand::rng().fill_bytes(&mut salt);
    salt
}
