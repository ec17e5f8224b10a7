// src/file_ops.rs
//! File detection and directory scanning used for batch selection
//!
//! The only thing these helpers know about the format is the marker.

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::warn;
use walkdir::WalkDir;

use crate::consts::{MAGIC_HEADER, MAGIC_HEADER_SIZE};
use crate::error::Result;

/// Check if data starts with the container marker
pub fn is_encrypted_data(data: &[u8]) -> bool {
    data.starts_with(MAGIC_HEADER)
}

/// `true` iff the first 8 bytes of the file are the container marker.
/// Files shorter than the marker are never encrypted.
pub fn is_encrypted_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let mut head = Vec::with_capacity(MAGIC_HEADER_SIZE);
    File::open(path.as_ref())?
        .take(MAGIC_HEADER_SIZE as u64)
        .read_to_end(&mut head)?;
    Ok(is_encrypted_data(&head))
}

pub fn file_size_bytes<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(std::fs::metadata(path.as_ref())?.len())
}

pub fn file_size_mb<P: AsRef<Path>>(path: P) -> Result<f64> {
    Ok(file_size_bytes(path)? as f64 / 1024.0 / 1024.0)
}

/// Local modification time as `YYYY-MM-DD HH:MM`
pub fn last_modified<P: AsRef<Path>>(path: P) -> Result<String> {
    let modified: DateTime<Local> = std::fs::metadata(path.as_ref())?.modified()?.into();
    Ok(modified.format("%Y-%m-%d %H:%M").to_string())
}

/// Regular files under `dir`, sorted by name. Subdirectories are only
/// descended into when `recursive` is set.
pub fn list_files<P: AsRef<Path>>(
    dir: P,
    recursive: bool,
    follow_links: bool,
) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(follow_links)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Suffix appended when a decrypted name cannot drop the extension
pub const DECRYPTED_SUFFIX: &str = ".decrypted";

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// `report.pdf` → `report.pdf.fortenc`, or `None` if that name is taken.
/// Existing containers are never a target.
pub fn encrypted_output_path(path: &Path, extension: &str) -> Option<PathBuf> {
    let out = with_suffix(path, extension);
    (!out.exists()).then_some(out)
}

/// `report.pdf.fortenc` → `report.pdf`. Falls back to appending
/// [`DECRYPTED_SUFFIX`] when the name has no extension to drop or the
/// stripped name exists; `None` if every candidate is taken.
pub fn decrypted_output_path(path: &Path, extension: &str) -> Option<PathBuf> {
    let stripped = path
        .to_str()
        .and_then(|s| s.strip_suffix(extension))
        .filter(|stem| !stem.is_empty() && !stem.ends_with(std::path::MAIN_SEPARATOR))
        .map(PathBuf::from);

    stripped
        .into_iter()
        .chain(std::iter::once(with_suffix(path, DECRYPTED_SUFFIX)))
        .find(|candidate| !candidate.exists())
}

/// Files from `files` that carry the container marker.
/// Unreadable files are skipped with a warning.
pub fn find_encrypted_files(files: &[PathBuf]) -> Vec<PathBuf> {
    partition(files, true)
}

/// Files from `files` that do not carry the container marker.
/// Unreadable files are skipped with a warning.
pub fn find_plain_files(files: &[PathBuf]) -> Vec<PathBuf> {
    partition(files, false)
}

fn partition(files: &[PathBuf], want_encrypted: bool) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|path| match is_encrypted_file(path) {
            Ok(encrypted) => encrypted == want_encrypted,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                false
            }
        })
        .cloned()
        .collect()
}
