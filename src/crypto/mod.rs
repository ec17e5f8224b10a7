//! AES-256-CBC with PKCS#7 padding
//!
//! Two shapes of the same transform: single-shot on in-memory buffers, and
//! streaming from any `Read` into any `Write` in fixed-size chunks so that
//! file size never dictates memory use. Padding is only ever applied to (or
//! stripped from) the final block.

use std::io::{self, Read};

use aes::Aes256;
use zeroize::Zeroizing;

mod decrypt;
mod encrypt;

pub use decrypt::{decrypt, decrypt_stream};
pub use encrypt::{encrypt, encrypt_stream};

pub(crate) type Aes256CbcEnc = cbc::Encryptor<Aes256>;
pub(crate) type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Zero-filled scratch buffer, wiped on drop. Stream staging holds plaintext
/// on one side or the other, so every chunk buffer goes through here.
pub(crate) fn staging_buffer(len: usize) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(vec![0u8; len])
}

/// Read until `buf` is full or EOF; retries on `Interrupted`
pub(crate) fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_buffer_is_zeroed_and_sized() {
        let buf = staging_buffer(4096);
        assert_eq!(buf.len(), 4096);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn read_chunk_fills_across_short_reads() {
        // a slice chain yields at most one slice per read call
        let mut reader = (&[1u8, 2, 3][..]).chain(&[4u8, 5][..]);
        let mut buf = staging_buffer(8);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], &[1, 2, 3, 4, 5]);
    }
}
