//! Archive file lifecycle on disk.
//!
//! Downloads are written to `<archive>.part` and renamed over the final path
//! once the transfer completes, so an interrupted download never leaves a
//! truncated file under the archive's real name.

use crate::error::{DatasetError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Sequential writer for one archive download.
pub struct ArchiveFile {
    out: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl ArchiveFile {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(DatasetError::fs("create", &temp_path))?;
        Ok(Self {
            out: BufWriter::new(file),
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append a chunk of the response body.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and rename over the final path, replacing any previous file.
    pub fn finalize(self) -> Result<PathBuf> {
        let ArchiveFile {
            out,
            temp_path,
            final_path,
            ..
        } = self;
        let file = out
            .into_inner()
            .map_err(|e| DatasetError::Filesystem {
                op: "flush",
                path: temp_path.clone(),
                source: e.into_error(),
            })?;
        file.sync_all().map_err(DatasetError::fs("sync", &temp_path))?;
        drop(file);

        std::fs::rename(&temp_path, &final_path).map_err(DatasetError::fs("rename", &temp_path))?;
        Ok(final_path)
    }

    /// Drop the partial download.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!(path = %temp_path.display(), "could not remove partial download: {}", e);
        }
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `book.zip` -> `book.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
