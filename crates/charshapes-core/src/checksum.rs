//! Archive integrity checks.
//!
//! The published dataset checksums are MD5, so that is what we compute. This is
//! a corruption check for downloaded archives, not a security boundary.

use crate::error::{DatasetError, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Archives are hashed in 1 MiB reads to keep memory flat for large books.
const CHUNK_SIZE: usize = 1024 * 1024;

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).map_err(DatasetError::fs("open", path))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(DatasetError::fs("read", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// True when `path` is a regular file whose MD5 equals `expected` exactly.
///
/// Missing files, directories and unreadable files all report `false`; a
/// mismatch only ever drives a re-download, never an error.
pub fn verify(path: &Path, expected: &str) -> bool {
    if !path.is_file() {
        return false;
    }
    match md5_path(path) {
        Ok(digest) => {
            let ok = digest == expected;
            tracing::debug!(path = %path.display(), %digest, expected, ok, "checksum");
            ok
        }
        Err(e) => {
            tracing::warn!("checksum failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn md5_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(md5_path(f.path()).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn md5_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(md5_path(f.path()).unwrap(), "b1946ac92492d2347c6235b4d2611184");
    }

    #[test]
    fn md5_path_spans_several_chunks() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let body: Vec<u8> = (0u8..=255).cycle().take(CHUNK_SIZE * 2 + 17).collect();
        f.write_all(&body).unwrap();
        f.flush().unwrap();
        let expected = hex::encode(Md5::digest(&body));
        assert_eq!(md5_path(f.path()).unwrap(), expected);
    }

    #[test]
    fn verify_matches_and_mismatches() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert!(verify(f.path(), "b1946ac92492d2347c6235b4d2611184"));
        assert!(!verify(f.path(), "d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn verify_is_case_sensitive() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert!(!verify(f.path(), "B1946AC92492D2347C6235B4D2611184"));
    }

    #[test]
    fn verify_missing_path_is_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!verify(&dir.path().join("absent.zip"), "d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn verify_directory_is_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!verify(dir.path(), "d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn md5_path_missing_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = md5_path(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, DatasetError::Filesystem { op: "open", .. }));
    }
}
