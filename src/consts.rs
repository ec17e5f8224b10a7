// src/consts.rs
//! Shared constants — container layout and security parameters

/// File extension used for encrypted containers
pub const ENCRYPTED_FILE_EXTENSION: &str = ".fortenc";

/// Format marker at offset 0 of every container
pub const MAGIC_HEADER: &[u8; MAGIC_HEADER_SIZE] = &[4, 6, 3, 9, 3, 3, 5, 2];
pub const MAGIC_HEADER_SIZE: usize = 8; // 64 bits

pub const IV_SIZE: usize = 16; // 128 bits
pub const SALT_SIZE: usize = 8; // 64 bits
pub const KEY_SIZE: usize = 32; // 256 bits
pub const DATA_INTEGRITY_HASH_SIZE: usize = 32; // 256 bits

/// Everything before the ciphertext: marker + IV + salt + digest
pub const CONTAINER_HEADER_SIZE: usize =
    MAGIC_HEADER_SIZE + IV_SIZE + SALT_SIZE + DATA_INTEGRITY_HASH_SIZE;

/// AES block size; ciphertext is always a non-zero multiple of this
pub const CIPHER_BLOCK_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count for passphrase keys
pub const KDF_ITERATIONS: u32 = 10_000;

/// Chunk size for streaming reads
pub const STREAM_BUFFER_SIZE: usize = 4096;

/// Keyfiles of any other size are rejected on load
pub const RECOMMENDED_KEY_FILE_SIZE: usize = 512; // 4096 bits
