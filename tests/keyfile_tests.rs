// tests/keyfile_tests.rs
mod common;

use std::fs;

use common::write_fixture;
use fortenc::consts::RECOMMENDED_KEY_FILE_SIZE;
use fortenc::error::{CoreError, ErrorKind};
use fortenc::Keyfile;
use tempfile::tempdir;

#[test]
fn test_generate_keyfile_is_random_and_sized() {
    let a = Keyfile::generate(RECOMMENDED_KEY_FILE_SIZE);
    let b = Keyfile::generate(RECOMMENDED_KEY_FILE_SIZE);

    assert_eq!(a.len(), 512);
    assert!(a.is_valid());
    assert_ne!(a.expose_secret(), b.expose_secret());
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert!(!Keyfile::generate(64).is_valid());
}

#[test]
fn test_persist_then_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.key");
    let keyfile = Keyfile::generate(RECOMMENDED_KEY_FILE_SIZE);

    keyfile.persist(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), keyfile.expose_secret());

    let loaded = Keyfile::load(&path).unwrap();
    assert_eq!(loaded.expose_secret(), keyfile.expose_secret());
    assert_eq!(loaded.fingerprint(), keyfile.fingerprint());
}

#[test]
fn test_fingerprint_is_lowercase_sha512_hex() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "random.key", &fortenc::generate_random_data(512));

    let fp = Keyfile::load(&path).unwrap().fingerprint();
    assert_eq!(fp.len(), 128);
    assert!(fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));

    // FIPS 180-2 "abc"
    assert_eq!(
        Keyfile::from_bytes(b"abc".to_vec()).fingerprint(),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea2\
         0a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd\
         454d4423643ce80e2a9ac94fa54ca49f"
    );
}

#[test]
fn test_wrong_size_keyfile_is_rejected_not_adjusted() {
    let dir = tempdir().unwrap();

    for len in [0usize, 511, 513, 1024] {
        let path = write_fixture(dir.path(), &format!("k{len}"), &vec![0xAB; len]);
        let err = Keyfile::load(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation, "len {len}");
        assert!(err.to_string().contains("Invalid keyfile data"));
        // the file itself is left alone
        assert_eq!(fs::metadata(&path).unwrap().len(), len as u64);
    }
}

#[test]
fn test_missing_keyfile_is_load_error() {
    let dir = tempdir().unwrap();
    let err = Keyfile::load(dir.path().join("absent.key")).unwrap_err();

    assert!(matches!(err, CoreError::KeyfileLoad(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().starts_with("Unable to read the key file from disk"));
}

#[test]
fn test_persist_failure_is_reported() {
    let dir = tempdir().unwrap();
    let keyfile = Keyfile::generate(RECOMMENDED_KEY_FILE_SIZE);
    let err = keyfile
        .persist(dir.path().join("no-such-dir").join("k.key"))
        .unwrap_err();

    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn test_debug_does_not_leak_bytes() {
    let keyfile = Keyfile::from_bytes(vec![0x5A; 512]);
    let shown = format!("{keyfile:?}");
    assert!(shown.contains("512"));
    assert!(!shown.contains("90")); // 0x5A
}

#[test]
fn test_oversized_keyfile_is_rejected_from_its_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("huge.key");
    // sparse on most filesystems; only the size should ever be looked at
    let file = fs::File::create(&path).unwrap();
    file.set_len(1 << 30).unwrap();
    drop(file);

    let err = Keyfile::load(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("found 1073741824"), "{err}");
}
