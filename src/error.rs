// src/error.rs
//! Public error type for the entire crate

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cipher or digest failure: truncated container, bad padding, misaligned ciphertext
    #[error("Crypto operation failed: {0}")]
    Crypto(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unable to read the key file from disk: {0}")]
    KeyfileLoad(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Boundary error of `encrypt_file` / `decrypt_file`
    #[error("{op} failed during {stage}: {source}")]
    Operation {
        op: Operation,
        stage: Stage,
        #[source]
        source: Box<CoreError>,
    },
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    CryptoTransform,
    Validation,
    Config,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Io(_) | CoreError::KeyfileLoad(_) => ErrorKind::Io,
            CoreError::Crypto(_) => ErrorKind::CryptoTransform,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Config(_) => ErrorKind::Config,
            CoreError::Operation { source, .. } => source.kind(),
        }
    }

    /// Stage at which a file operation failed, if this came from one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CoreError::Operation { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub(crate) fn crypto(msg: impl Into<String>) -> Self {
        CoreError::Crypto(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encryption,
    Decryption,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Encryption => "Encryption",
            Operation::Decryption => "Decryption",
        })
    }
}

/// Per-call state of a file operation.
///
/// `Idle → ReadingHeader → Keying → Streaming → Verifying → Finalizing`.
/// Encryption skips `ReadingHeader` and `Verifying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ReadingHeader,
    Keying,
    Streaming,
    Verifying,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Idle => "setup",
            Stage::ReadingHeader => "header read",
            Stage::Keying => "key derivation",
            Stage::Streaming => "streaming",
            Stage::Verifying => "integrity check",
            Stage::Finalizing => "finalization",
        })
    }
}
