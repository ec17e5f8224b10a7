// src/crypto/decrypt.rs
use std::io::{Cursor, Read, Write};

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use zeroize::Zeroizing;

use super::{read_chunk, staging_buffer, Aes256CbcDec};
use crate::consts::{CIPHER_BLOCK_SIZE, STREAM_BUFFER_SIZE};
use crate::error::{CoreError, Result};

fn new_decryptor(key: &[u8], iv: &[u8]) -> Result<Aes256CbcDec> {
    Aes256CbcDec::new_from_slices(key, iv).map_err(|_| {
        CoreError::validation(format!(
            "AES-256-CBC needs a 32-byte key and 16-byte IV, got {} and {}",
            key.len(),
            iv.len()
        ))
    })
}

/// Decrypt ciphertext in memory → returns plaintext with padding removed
pub fn decrypt(cipher: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(cipher.len());
    decrypt_stream(Cursor::new(cipher), &mut out, key, iv, STREAM_BUFFER_SIZE)?;
    Ok(out)
}

/// Stream ciphertext from `reader` into plaintext on `writer`.
///
/// The last full block is always held back until EOF so its padding can be
/// stripped. Returns the number of plaintext bytes written.
pub fn decrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &[u8],
    iv: &[u8],
    buffer_size: usize,
) -> Result<u64> {
    let mut cipher = new_decryptor(key, iv)?;
    let mut chunk = staging_buffer(buffer_size.max(CIPHER_BLOCK_SIZE));
    let mut pending = Zeroizing::new(Vec::with_capacity(chunk.len() + CIPHER_BLOCK_SIZE));
    let mut written = 0u64;

    loop {
        let n = read_chunk(&mut reader, &mut chunk)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&chunk[..n]);
        if pending.len() <= CIPHER_BLOCK_SIZE {
            continue;
        }

        // leaves 1..=16 bytes behind
        let ready = ((pending.len() - 1) / CIPHER_BLOCK_SIZE) * CIPHER_BLOCK_SIZE;
        for block in pending[..ready].chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        writer.write_all(&pending[..ready])?;
        written += ready as u64;
        pending.drain(..ready);
    }

    if pending.is_empty() {
        return Err(CoreError::crypto("ciphertext is empty"));
    }
    if pending.len() != CIPHER_BLOCK_SIZE {
        return Err(CoreError::crypto(
            "ciphertext length is not a multiple of the block size",
        ));
    }

    let plain = cipher
        .decrypt_padded_mut::<Pkcs7>(&mut pending[..])
        .map_err(|_| CoreError::crypto("invalid padding (wrong passphrase or corrupted data)"))?;
    writer.write_all(plain)?;
    written += plain.len() as u64;
    writer.flush()?;

    Ok(written)
}
