//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout fortenc.
//! Everything declared here is zeroized on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

use crate::consts::{DATA_INTEGRITY_HASH_SIZE, IV_SIZE, SALT_SIZE};

// Fixed-size secrets
fixed_alias!(DerivedKey32, 32); // AES-256 key, also keys the integrity HMAC

// Dynamic secrets
dynamic_alias!(KeyfileData, Vec<u8>);
dynamic_alias!(Passphrase, String); // as typed at a prompt

// Public, per-file values — stored in the clear inside the container
pub type Iv = [u8; IV_SIZE];
pub type Salt = [u8; SALT_SIZE];
pub type Digest = [u8; DATA_INTEGRITY_HASH_SIZE];
