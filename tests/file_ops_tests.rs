// tests/file_ops_tests.rs
mod common;

use std::fs;

use common::{patterned, write_fixture};
use fortenc::consts::MAGIC_HEADER;
use fortenc::file_ops::{
    decrypted_output_path, encrypted_output_path, file_size_bytes, file_size_mb,
    find_encrypted_files, find_plain_files, is_encrypted_data, last_modified, list_files,
};
use fortenc::{is_encrypted_file, EncryptionMachine};
use tempfile::tempdir;

#[test]
fn test_detects_container_by_marker() {
    common::setup();
    let dir = tempdir().unwrap();
    let plain = write_fixture(dir.path(), "notes.txt", b"just some text, long enough");
    let sealed = dir.path().join("notes.txt.fortenc");

    EncryptionMachine::default()
        .encrypt_file("pw", &plain, &sealed, true)
        .unwrap();

    assert!(is_encrypted_file(&sealed).unwrap());
    assert!(!is_encrypted_file(&plain).unwrap());
}

#[test]
fn test_short_or_foreign_files_are_not_containers() {
    let dir = tempdir().unwrap();
    let empty = write_fixture(dir.path(), "empty", b"");
    let short = write_fixture(dir.path(), "short", &MAGIC_HEADER[..7]);
    let near = write_fixture(dir.path(), "near", &[4, 6, 3, 9, 3, 3, 5, 3, 0, 0]);
    let exact = write_fixture(dir.path(), "exact", MAGIC_HEADER);

    assert!(!is_encrypted_file(&empty).unwrap());
    assert!(!is_encrypted_file(&short).unwrap());
    assert!(!is_encrypted_file(&near).unwrap());
    // marker alone is enough for detection
    assert!(is_encrypted_file(&exact).unwrap());

    assert!(is_encrypted_data(&[4, 6, 3, 9, 3, 3, 5, 2, 0xFF]));
    assert!(!is_encrypted_data(&[]));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(is_encrypted_file(dir.path().join("nope")).is_err());
    assert!(file_size_bytes(dir.path().join("nope")).is_err());
}

#[test]
fn test_list_files_recursive_and_flat() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write_fixture(dir.path(), "b.txt", b"b");
    write_fixture(dir.path(), "a.txt", b"a");
    write_fixture(&dir.path().join("sub"), "c.txt", b"c");

    let flat = list_files(dir.path(), false, false).unwrap();
    assert_eq!(flat, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);

    let deep = list_files(dir.path(), true, false).unwrap();
    assert_eq!(deep.len(), 3);
    assert!(deep.contains(&dir.path().join("sub").join("c.txt")));
    assert!(deep.iter().all(|p| p.is_file()));
}

#[test]
fn test_find_partitions_by_marker() {
    let dir = tempdir().unwrap();
    let machine = EncryptionMachine::default();

    let first = write_fixture(dir.path(), "one.bin", &patterned(100));
    let second = write_fixture(dir.path(), "two.bin", &patterned(300));
    machine
        .encrypt_file("pw", &second, dir.path().join("two.bin.fortenc"), false)
        .unwrap();

    let files = list_files(dir.path(), true, false).unwrap();
    let encrypted = find_encrypted_files(&files);
    let plain = find_plain_files(&files);

    assert_eq!(encrypted, vec![dir.path().join("two.bin.fortenc")]);
    assert_eq!(plain, vec![first]);
}

#[test]
fn test_unreadable_entries_are_skipped() {
    let dir = tempdir().unwrap();
    let real = write_fixture(dir.path(), "real.txt", b"plain");
    let gone = dir.path().join("gone.txt");

    let files = vec![real.clone(), gone];
    assert_eq!(find_plain_files(&files), vec![real]);
    assert!(find_encrypted_files(&files).is_empty());
}

#[test]
fn test_size_and_timestamp_helpers() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "mb.bin", &vec![0u8; 1024 * 1024 + 512 * 1024]);

    assert_eq!(file_size_bytes(&path).unwrap(), 1_572_864);
    assert!((file_size_mb(&path).unwrap() - 1.5).abs() < f64::EPSILON);

    let stamp = last_modified(&path).unwrap();
    assert_eq!(stamp.len(), 16);
    assert_eq!(&stamp[4..5], "-");
    assert_eq!(&stamp[10..11], " ");
    assert_eq!(&stamp[13..14], ":");
}

#[test]
fn test_encrypted_output_path_never_targets_an_existing_file() {
    let dir = tempdir().unwrap();
    let plain = write_fixture(dir.path(), "a.txt", b"new contents");

    assert_eq!(
        encrypted_output_path(&plain, ".fortenc"),
        Some(dir.path().join("a.txt.fortenc"))
    );

    write_fixture(dir.path(), "a.txt.fortenc", b"older container");
    assert_eq!(encrypted_output_path(&plain, ".fortenc"), None);
}

#[test]
fn test_decrypted_output_path_falls_back_without_clobbering() {
    let dir = tempdir().unwrap();
    let sealed = write_fixture(dir.path(), "a.txt.fortenc", b"sealed");

    assert_eq!(
        decrypted_output_path(&sealed, ".fortenc"),
        Some(dir.path().join("a.txt"))
    );

    write_fixture(dir.path(), "a.txt", b"already here");
    assert_eq!(
        decrypted_output_path(&sealed, ".fortenc"),
        Some(dir.path().join("a.txt.fortenc.decrypted"))
    );

    write_fixture(dir.path(), "a.txt.fortenc.decrypted", b"also here");
    assert_eq!(decrypted_output_path(&sealed, ".fortenc"), None);

    // nothing to strip
    let odd = write_fixture(dir.path(), "blob.bin", b"sealed");
    assert_eq!(
        decrypted_output_path(&odd, ".fortenc"),
        Some(dir.path().join("blob.bin.decrypted"))
    );
}
