// src/bin/fort_batch.rs
//! Batch encrypt / decrypt every eligible file under a directory
//!
//! Usage: fort_batch <encrypt|decrypt> <dir> [--keep]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fortenc::aliases::Passphrase;
use fortenc::file_ops::{
    decrypted_output_path, encrypted_output_path, find_encrypted_files, find_plain_files,
    list_files,
};
use fortenc::EncryptionMachine;
use rpassword::prompt_password;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fort_batch",
    version,
    about = "Encrypt or decrypt every eligible file under a directory"
)]
struct Cli {
    /// What to do with the files found
    #[arg(value_enum)]
    mode: Mode,

    /// Directory to scan
    dir: PathBuf,

    /// Keep plaintext originals after encrypting
    #[arg(long)]
    keep: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encrypt,
    Decrypt,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let Cli { mode, dir, keep } = Cli::parse();

    let config = fortenc::load_config();
    let keep_plain = keep || config.engine.keep_plain_file;
    let extension = config.batch.extension.as_str();
    let machine = EncryptionMachine::from_config(config);

    let files = list_files(&dir, config.batch.recursive, config.batch.follow_links)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let targets = match mode {
        Mode::Encrypt => find_plain_files(&files),
        Mode::Decrypt => find_encrypted_files(&files),
    };

    if targets.is_empty() {
        info!("Nothing to do in {}", dir.display());
        return Ok(());
    }

    let verb = match mode {
        Mode::Encrypt => "Encrypt",
        Mode::Decrypt => "Decrypt",
    };
    print!("{verb} {} file(s) under {} ? [y/N] ", targets.len(), dir.display());
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    if !matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        println!("  → aborted");
        return Ok(());
    }

    let passphrase = Passphrase::new(prompt_password("Passphrase: ")?);
    if passphrase.expose_secret().is_empty() {
        bail!("Passphrase must not be empty");
    }
    if mode == Mode::Encrypt {
        let confirm = Passphrase::new(prompt_password("Confirm passphrase: ")?);
        if confirm.expose_secret() != passphrase.expose_secret() {
            bail!("Passphrases do not match");
        }
    }

    let mut done = 0usize;
    let mut failed = 0usize;
    let mut tampered = 0usize;
    let mut skipped = 0usize;

    for path in &targets {
        match mode {
            Mode::Encrypt => {
                let Some(out) = encrypted_output_path(path, extension) else {
                    skipped += 1;
                    warn!("SKIPPED {}: a container with that name already exists", path.display());
                    continue;
                };
                match machine.encrypt_file(passphrase.expose_secret(), path, &out, keep_plain) {
                    Ok(_) => {
                        done += 1;
                        info!("ENCRYPTED → {}", out.display());
                    }
                    Err(e) => {
                        failed += 1;
                        warn!("FAILED {}: {e}", path.display());
                    }
                }
            }
            Mode::Decrypt => {
                let Some(out) = decrypted_output_path(path, extension) else {
                    skipped += 1;
                    warn!("SKIPPED {}: no free output name", path.display());
                    continue;
                };
                match machine.decrypt_file(passphrase.expose_secret(), path, &out) {
                    Ok(outcome) if outcome.is_tampered() => {
                        done += 1;
                        tampered += 1;
                        warn!("DECRYPTED but TAMPERED → {}", out.display());
                    }
                    Ok(_) => {
                        done += 1;
                        info!("DECRYPTED → {}", out.display());
                    }
                    Err(e) => {
                        failed += 1;
                        warn!("FAILED {}: {e}", path.display());
                    }
                }
            }
        }
    }

    println!("\n=== BATCH COMPLETE ===");
    println!("{verb}ed: {done}");
    println!("Skipped: {skipped}");
    println!("Failed: {failed}");
    if mode == Mode::Decrypt {
        println!("Tampered: {tampered}");
    }

    if failed > 0 {
        bail!("{failed} file(s) failed");
    }
    Ok(())
}
