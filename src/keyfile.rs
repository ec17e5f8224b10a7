// src/keyfile.rs
//! Keyfiles — random secret blobs usable alongside or instead of a passphrase
//!
//! A keyfile is just raw CSPRNG output. It is only accepted on load when it
//! is exactly [`RECOMMENDED_KEY_FILE_SIZE`] bytes; other sizes are rejected,
//! never truncated or padded.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest as _, Sha512};
use tracing::{debug, warn};

use crate::aliases::KeyfileData;
use crate::consts::RECOMMENDED_KEY_FILE_SIZE;
use crate::error::{CoreError, Result};
use crate::key_ops::generate_random_data;

pub struct Keyfile {
    data: KeyfileData,
    length: usize,
}

impl Keyfile {
    /// New keyfile of `length` random bytes
    pub fn generate(length: usize) -> Self {
        Self::from_bytes(generate_random_data(length))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len();
        Self {
            data: KeyfileData::new(bytes),
            length,
        }
    }

    /// Read a keyfile from disk and reject it unless it has the recommended size.
    /// The size is checked before anything is read, so an oversized file is
    /// never pulled into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(CoreError::KeyfileLoad)?;
        let size = file.metadata().map_err(CoreError::KeyfileLoad)?.len();
        if size != RECOMMENDED_KEY_FILE_SIZE as u64 {
            return Err(reject_size(path, size));
        }

        // the file may have changed since the metadata call
        let mut bytes = Vec::with_capacity(RECOMMENDED_KEY_FILE_SIZE);
        file.take(RECOMMENDED_KEY_FILE_SIZE as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(CoreError::KeyfileLoad)?;
        let keyfile = Self::from_bytes(bytes);
        if !keyfile.is_valid() {
            return Err(reject_size(path, keyfile.len() as u64));
        }

        debug!(path = %path.display(), "keyfile loaded");
        Ok(keyfile)
    }

    /// Write the raw bytes to `path`, replacing any existing file
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.expose_secret())?;
        debug!(path = %path.as_ref().display(), len = self.length, "keyfile written");
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.expose_secret().len() == RECOMMENDED_KEY_FILE_SIZE
    }

    /// Declared length in bytes
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.data.expose_secret()
    }

    /// Lowercase hex SHA-512 of the bytes, for human comparison only
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha512::digest(self.expose_secret()))
    }
}

fn reject_size(path: &Path, size: u64) -> CoreError {
    warn!(path = %path.display(), size, "rejecting keyfile with unexpected size");
    CoreError::validation(format!(
        "Invalid keyfile data: expected {RECOMMENDED_KEY_FILE_SIZE} bytes, found {size}"
    ))
}

impl fmt::Debug for Keyfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyfile")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
