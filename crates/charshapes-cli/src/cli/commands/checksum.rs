//! `charshapes checksum` / `charshapes verify` – MD5 of a file.

use anyhow::{bail, Result};
use charshapes_core::checksum;
use std::path::Path;

/// Compute and print the MD5 of the given file.
pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::md5_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}

pub fn run_verify(path: &Path, expected: &str) -> Result<()> {
    if !checksum::verify(path, expected) {
        bail!("{}: checksum mismatch or unreadable file", path.display());
    }
    println!("{}: OK", path.display());
    Ok(())
}
