// src/container.rs
//! On-disk container layout
//!
//! ```text
//!  0..8   marker   04 06 03 09 03 03 05 02
//!  8..24  IV       16 bytes, random per file
//! 24..32  salt      8 bytes, random per file
//! 32..64  digest   HMAC-SHA256 of the plaintext
//! 64..    ciphertext, AES-256-CBC, PKCS#7 padded
//! ```

use std::io::{self, Read, Write};

use crate::aliases::{Digest, Iv, Salt};
use crate::consts::{
    CONTAINER_HEADER_SIZE, DATA_INTEGRITY_HASH_SIZE, IV_SIZE, MAGIC_HEADER, MAGIC_HEADER_SIZE,
    SALT_SIZE,
};
use crate::error::{CoreError, Result};

const IV_OFFSET: usize = MAGIC_HEADER_SIZE;
const SALT_OFFSET: usize = IV_OFFSET + IV_SIZE;
const DIGEST_OFFSET: usize = SALT_OFFSET + SALT_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub marker: [u8; MAGIC_HEADER_SIZE],
    pub iv: Iv,
    pub salt: Salt,
    pub digest: Digest,
}

impl ContainerHeader {
    /// Header for a new container, stamped with the format marker
    pub fn new(iv: Iv, salt: Salt, digest: Digest) -> Self {
        Self {
            marker: *MAGIC_HEADER,
            iv,
            salt,
            digest,
        }
    }

    pub fn has_known_marker(&self) -> bool {
        &self.marker == MAGIC_HEADER
    }

    pub fn to_bytes(&self) -> [u8; CONTAINER_HEADER_SIZE] {
        let mut out = [0u8; CONTAINER_HEADER_SIZE];
        out[..IV_OFFSET].copy_from_slice(&self.marker);
        out[IV_OFFSET..SALT_OFFSET].copy_from_slice(&self.iv);
        out[SALT_OFFSET..DIGEST_OFFSET].copy_from_slice(&self.salt);
        out[DIGEST_OFFSET..].copy_from_slice(&self.digest);
        out
    }

    pub fn from_bytes(bytes: &[u8; CONTAINER_HEADER_SIZE]) -> Self {
        let mut header = Self {
            marker: [0u8; MAGIC_HEADER_SIZE],
            iv: Iv::default(),
            salt: Salt::default(),
            digest: [0u8; DATA_INTEGRITY_HASH_SIZE],
        };
        header.marker.copy_from_slice(&bytes[..IV_OFFSET]);
        header.iv.copy_from_slice(&bytes[IV_OFFSET..SALT_OFFSET]);
        header.salt.copy_from_slice(&bytes[SALT_OFFSET..DIGEST_OFFSET]);
        header.digest.copy_from_slice(&bytes[DIGEST_OFFSET..]);
        header
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read the fixed 64-byte prefix. A short input is a corrupt container,
    /// not an I/O failure.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = [0u8; CONTAINER_HEADER_SIZE];
        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => CoreError::crypto(format!(
                "container is truncated: header needs {CONTAINER_HEADER_SIZE} bytes"
            )),
            _ => CoreError::Io(e),
        })?;
        Ok(Self::from_bytes(&bytes))
    }
}
