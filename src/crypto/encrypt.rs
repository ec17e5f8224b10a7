// src/crypto/encrypt.rs
use std::io::{Cursor, Read, Write};

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use super::{read_chunk, staging_buffer, Aes256CbcEnc};
use crate::consts::{CIPHER_BLOCK_SIZE, STREAM_BUFFER_SIZE};
use crate::error::{CoreError, Result};

fn new_encryptor(key: &[u8], iv: &[u8]) -> Result<Aes256CbcEnc> {
    Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| {
        CoreError::validation(format!(
            "AES-256-CBC needs a 32-byte key and 16-byte IV, got {} and {}",
            key.len(),
            iv.len()
        ))
    })
}

/// Encrypt plaintext in memory → returns padded ciphertext
pub fn encrypt(plain: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(plain.len() + CIPHER_BLOCK_SIZE);
    encrypt_stream(Cursor::new(plain), &mut out, key, iv, STREAM_BUFFER_SIZE)?;
    Ok(out)
}

/// Stream `reader` through the cipher into `writer`.
///
/// Whole blocks are written as soon as they are available; the trailing
/// partial block is held back and padded once the reader hits EOF.
/// Returns the number of ciphertext bytes written.
pub fn encrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &[u8],
    iv: &[u8],
    buffer_size: usize,
) -> Result<u64> {
    let mut cipher = new_encryptor(key, iv)?;
    let mut chunk = staging_buffer(buffer_size.max(CIPHER_BLOCK_SIZE));
    let mut pending = Zeroizing::new(Vec::with_capacity(chunk.len() + CIPHER_BLOCK_SIZE));
    let mut written = 0u64;

    loop {
        let n = read_chunk(&mut reader, &mut chunk)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&chunk[..n]);

        let ready = pending.len() - pending.len() % CIPHER_BLOCK_SIZE;
        for block in pending[..ready].chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        writer.write_all(&pending[..ready])?;
        written += ready as u64;
        pending.drain(..ready);
    }

    let mut last = Zeroizing::new([0u8; CIPHER_BLOCK_SIZE]);
    last[..pending.len()].copy_from_slice(&pending);
    let tail = cipher
        .encrypt_padded_mut::<Pkcs7>(&mut last[..], pending.len())
        .map_err(|_| CoreError::crypto("failed to pad final block"))?;
    writer.write_all(tail)?;
    written += tail.len() as u64;
    writer.flush()?;

    Ok(written)
}
