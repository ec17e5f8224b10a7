// src/lib.rs
//! fortenc — passphrase-based file encryption with tamper detection
//!
//! Features:
//! - AES-256-CBC streaming encryption, constant memory for any file size
//! - PBKDF2-HMAC-SHA256 key stretching with a per-file salt
//! - HMAC-SHA256 digest of the plaintext, checked after decryption
//! - Atomic output: a complete container or no file at all
//! - 512-byte keyfiles with SHA-512 fingerprints
//! - secure-gate key types that zeroize on drop

pub mod aliases;
pub mod config;
pub mod consts;
pub mod container;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod file_ops;
pub mod integrity;
pub mod kdf;
pub mod key_ops;
pub mod keyfile;

// Re-export everything users need at the crate root
pub use aliases::{DerivedKey32, Digest, Iv, Salt};
pub use config::load as load_config;
pub use crypto::{decrypt, decrypt_stream, encrypt, encrypt_stream};
pub use engine::{DecryptOutcome, EncryptionMachine};
pub use error::{CoreError, ErrorKind, Result as CoreResult};
pub use file_ops::is_encrypted_file;
pub use kdf::{derive_key_fresh, derive_key_with_salt, verify_passphrase, KeyMaterial};
pub use key_ops::{generate_random_data, random_iv};
pub use keyfile::Keyfile;
