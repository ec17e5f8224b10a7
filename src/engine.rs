// src/engine.rs
//! File-level encryption/decryption
//!
//! `EncryptionMachine` ties key derivation, the integrity digest and the
//! streaming cipher together into whole-file operations.
//!
//! Output is staged in a temporary file next to the destination and only
//! renamed into place once everything succeeded, so callers either get a
//! complete file or nothing. The source file is only removed after that
//! rename; it is never touched on failure.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::consts::{CONTAINER_HEADER_SIZE, ENCRYPTED_FILE_EXTENSION, STREAM_BUFFER_SIZE};
use crate::container::ContainerHeader;
use crate::crypto::{decrypt_stream, encrypt_stream};
use crate::error::{CoreError, Operation, Result, Stage};
use crate::integrity;
use crate::kdf::{derive_key_fresh, derive_key_with_salt, KeyMaterial};
use crate::key_ops::random_iv;

/// Result of a successful [`EncryptionMachine::decrypt_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DecryptOutcome {
    /// The stored digest did not match the decrypted content. The plaintext
    /// was still written; what to do with it is the caller's decision.
    pub tampered: bool,
    pub plaintext_len: u64,
}

impl DecryptOutcome {
    pub fn is_tampered(&self) -> bool {
        self.tampered
    }
}

#[derive(Debug, Clone)]
pub struct EncryptionMachine {
    buffer_size: usize,
}

impl Default for EncryptionMachine {
    fn default() -> Self {
        Self {
            buffer_size: STREAM_BUFFER_SIZE,
        }
    }
}

impl EncryptionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::default().with_buffer_size(config.engine.stream_buffer_size)
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn encrypted_file_extension(&self) -> &'static str {
        ENCRYPTED_FILE_EXTENSION
    }

    /// Encrypt `input_path` into a new container at `output_path`.
    ///
    /// Unless `keep_plain_file` is set, the plaintext file is deleted once the
    /// container is in place. Returns the container size in bytes.
    pub fn encrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        passphrase: &str,
        input_path: P,
        output_path: Q,
        keep_plain_file: bool,
    ) -> Result<u64> {
        let (input, output) = (input_path.as_ref(), output_path.as_ref());
        let mut tracker = StageTracker::new(Operation::Encryption);

        match self.run_encrypt(&mut tracker, passphrase, input, output, keep_plain_file) {
            Ok(size) => {
                info!(input = %input.display(), output = %output.display(), size, "encrypted");
                Ok(size)
            }
            Err(e) => Err(tracker.fail(input, e)),
        }
    }

    /// Decrypt the container at `input_path` into `output_path`.
    ///
    /// A digest mismatch does not fail the call; it is reported through
    /// [`DecryptOutcome::tampered`]. The container is deleted on success.
    pub fn decrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        passphrase: &str,
        input_path: P,
        output_path: Q,
    ) -> Result<DecryptOutcome> {
        let (input, output) = (input_path.as_ref(), output_path.as_ref());
        let mut tracker = StageTracker::new(Operation::Decryption);

        match self.run_decrypt(&mut tracker, passphrase, input, output) {
            Ok(outcome) => {
                info!(
                    input = %input.display(),
                    output = %output.display(),
                    tampered = outcome.tampered,
                    "decrypted"
                );
                Ok(outcome)
            }
            Err(e) => Err(tracker.fail(input, e)),
        }
    }

    fn run_encrypt(
        &self,
        tracker: &mut StageTracker,
        passphrase: &str,
        input: &Path,
        output: &Path,
        keep_plain_file: bool,
    ) -> Result<u64> {
        ensure_distinct(input, output)?;

        tracker.enter(Stage::Keying);
        let KeyMaterial { key, salt } = derive_key_fresh(passphrase)?;
        let iv = random_iv();

        tracker.enter(Stage::Streaming);
        let mut plain = File::open(input)?;
        let mut staged = stage_output(output)?;

        // unbuffered on the plaintext side; the stream functions stage through wiped buffers
        let digest = integrity::digest_reader(&mut plain, key.expose_secret())?;
        plain.seek(SeekFrom::Start(0))?;

        let ciphertext_len = {
            let mut writer = BufWriter::new(staged.as_file_mut());
            ContainerHeader::new(iv, salt, digest).write_to(&mut writer)?;
            let n = encrypt_stream(
                &mut plain,
                &mut writer,
                key.expose_secret(),
                &iv,
                self.buffer_size,
            )?;
            writer.flush()?;
            n
        };
        drop(plain);

        tracker.enter(Stage::Finalizing);
        staged.as_file().sync_all()?;
        staged.persist(output).map_err(|e| CoreError::Io(e.error))?;

        if !keep_plain_file {
            remove_source(input, output)?;
        }

        Ok(CONTAINER_HEADER_SIZE as u64 + ciphertext_len)
    }

    fn run_decrypt(
        &self,
        tracker: &mut StageTracker,
        passphrase: &str,
        input: &Path,
        output: &Path,
    ) -> Result<DecryptOutcome> {
        ensure_distinct(input, output)?;

        tracker.enter(Stage::ReadingHeader);
        let mut sealed = BufReader::new(File::open(input)?);
        let header = ContainerHeader::read_from(&mut sealed)?;
        if !header.has_known_marker() {
            warn!(path = %input.display(), "unrecognised format marker, decrypting anyway");
        }

        tracker.enter(Stage::Keying);
        let key = derive_key_with_salt(passphrase, &header.salt)?;

        tracker.enter(Stage::Streaming);
        let mut staged = stage_output(output)?;
        let plaintext_len = decrypt_stream(
            &mut sealed,
            staged.as_file_mut(),
            key.expose_secret(),
            &header.iv,
            self.buffer_size,
        )?;
        drop(sealed);

        tracker.enter(Stage::Verifying);
        let intact =
            integrity::verify_reader(staged.reopen()?, key.expose_secret(), &header.digest)?;
        if !intact {
            warn!(path = %input.display(), "integrity digest mismatch, data may have been tampered with");
        }

        tracker.enter(Stage::Finalizing);
        staged.as_file().sync_all()?;
        staged.persist(output).map_err(|e| CoreError::Io(e.error))?;
        remove_source(input, output)?;

        Ok(DecryptOutcome {
            tampered: !intact,
            plaintext_len,
        })
    }
}

/// Where a file operation is, so a failure can say where it stopped
struct StageTracker {
    op: Operation,
    stage: Stage,
}

impl StageTracker {
    fn new(op: Operation) -> Self {
        Self {
            op,
            stage: Stage::Idle,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!(op = %self.op, %stage, "entering stage");
        self.stage = stage;
    }

    fn fail(self, input: &Path, source: CoreError) -> CoreError {
        warn!(op = %self.op, stage = %self.stage, path = %input.display(), error = %source, "operation failed");
        CoreError::Operation {
            op: self.op,
            stage: self.stage,
            source: Box::new(source),
        }
    }
}

/// Temporary sibling of `output`; removed on drop unless persisted
fn stage_output(output: &Path) -> Result<NamedTempFile> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".fortenc-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    Ok(staged)
}

fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (std::fs::canonicalize(input), std::fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(CoreError::validation(
            "input and output must be different files",
        ));
    }
    Ok(())
}

/// Delete the source once its replacement is in place. If that fails the
/// replacement is withdrawn so only the original remains.
fn remove_source(input: &Path, output: &Path) -> Result<()> {
    if let Err(e) = std::fs::remove_file(input) {
        if let Err(cleanup) = std::fs::remove_file(output) {
            warn!(path = %output.display(), error = %cleanup, "could not withdraw output");
        }
        return Err(e.into());
    }
    Ok(())
}
