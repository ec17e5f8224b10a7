// src/kdf.rs
//! Passphrase → key stretching
//!
//! PBKDF2-HMAC-SHA256 over the UTF-8 bytes of the passphrase with an 8-byte
//! salt and [`KDF_ITERATIONS`] rounds. The same passphrase and salt always
//! yield the same 32-byte key.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::aliases::{DerivedKey32, Salt};
use crate::consts::{KDF_ITERATIONS, KEY_SIZE, SALT_SIZE};
use crate::error::{CoreError, Result};
use crate::key_ops::random_salt;

/// A freshly derived key together with the salt that produced it
pub struct KeyMaterial {
    pub key: DerivedKey32,
    pub salt: Salt,
}

/// Derive the key for `passphrase` under an existing `salt` (decryption path)
pub fn derive_key_with_salt(passphrase: &str, salt: &Salt) -> Result<DerivedKey32> {
    if passphrase.is_empty() {
        return Err(CoreError::validation("passphrase must not be empty"));
    }

    let mut key = DerivedKey32::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt,
        KDF_ITERATIONS,
        key.expose_secret_mut(),
    );
    Ok(key)
}

/// Same as [`derive_key_with_salt`] but for salts read from untrusted slices
pub fn derive_key_from_slice(passphrase: &str, salt: &[u8]) -> Result<DerivedKey32> {
    let salt: &Salt = salt.try_into().map_err(|_| {
        CoreError::validation(format!(
            "salt must be {SALT_SIZE} bytes, got {}",
            salt.len()
        ))
    })?;
    derive_key_with_salt(passphrase, salt)
}

/// Generate a new random salt and derive a key from it (encryption path)
pub fn derive_key_fresh(passphrase: &str) -> Result<KeyMaterial> {
    let salt = random_salt();
    let key = derive_key_with_salt(passphrase, &salt)?;
    Ok(KeyMaterial { key, salt })
}

/// Check a passphrase against a previously derived key.
///
/// Comparison is constant-time; any failure to derive counts as a mismatch.
pub fn verify_passphrase(passphrase: &str, salt: &Salt, expected_key: &[u8]) -> bool {
    match derive_key_with_salt(passphrase, salt) {
        Ok(key) => key.expose_secret().as_slice().ct_eq(expected_key).into(),
        Err(_) => false,
    }
}
