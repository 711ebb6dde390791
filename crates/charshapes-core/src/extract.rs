//! Zip extraction into the raw folder.

use crate::error::{DatasetError, Result};
use encoding_rs::SHIFT_JIS;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Decode a zip entry name, trying UTF-8 first, then Shift_JIS.
fn decode_entry_name(raw: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(raw) {
        return s.to_string();
    }

    // Japanese archivers commonly write Shift_JIS names without the UTF-8 flag.
    let (decoded, _, had_errors) = SHIFT_JIS.decode(raw);
    if !had_errors {
        return decoded.into_owned();
    }

    String::from_utf8_lossy(raw).into_owned()
}

/// Relative path for an entry name, or `None` if it would escape the target
/// (absolute path, drive prefix or `..`).
fn enclosed_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    let mut out = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// Extract every entry of `archive_path` under `target_dir`, creating it if
/// needed. Returns the number of files written.
///
/// Nothing is rolled back on failure: entries written before the error stay
/// on disk, and the archive itself is never touched.
pub fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<usize> {
    let zip_err = |source: ZipError| DatasetError::Extraction {
        archive: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(DatasetError::fs("open", archive_path))?;
    let mut archive = ZipArchive::new(file).map_err(zip_err)?;
    fs::create_dir_all(target_dir).map_err(DatasetError::fs("create dir", target_dir))?;

    let mut files = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_err)?;
        let name = decode_entry_name(entry.name_raw());
        let relative = enclosed_path(&name).ok_or_else(|| DatasetError::UnsafeEntry {
            archive: archive_path.to_path_buf(),
            entry: name.clone(),
        })?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let out_path = target_dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(DatasetError::fs("create dir", &out_path))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(DatasetError::fs("create dir", parent))?;
        }

        let mut out = File::create(&out_path).map_err(DatasetError::fs("create", &out_path))?;
        // Read-side failures here mean a corrupt entry; report them as extraction errors.
        io::copy(&mut entry, &mut out).map_err(|e| zip_err(ZipError::Io(e)))?;
        files += 1;
    }

    tracing::debug!(
        archive = %archive_path.display(),
        target = %target_dir.display(),
        files,
        "extracted"
    );
    Ok(files)
}
