//! Download, verify and extract every book in a catalog.
//!
//! Runs strictly sequentially over the catalog. The first fatal error aborts
//! the remaining entries; nothing is retried here.

use crate::catalog::{ArchiveDescriptor, Catalog};
use crate::checksum;
use crate::error::{DatasetError, Result};
use crate::extract;
use crate::fetch::ArchiveSource;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the folder under the dataset root holding archives and
/// extracted books.
pub const DEFAULT_RAW_FOLDER: &str = "raw";

#[derive(Debug, Clone)]
pub struct AcquireOptions {
    pub raw_folder: String,
    /// Skip a book without any network traffic when its archive is gone and
    /// its extraction directory exists (the state a completed run leaves).
    pub skip_extracted: bool,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            raw_folder: DEFAULT_RAW_FOLDER.to_string(),
            skip_extracted: true,
        }
    }
}

/// What happened to each book, by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquireReport {
    /// Downloaded during this run.
    pub fetched: Vec<String>,
    /// Left alone because a previous run already extracted them.
    pub skipped: Vec<String>,
    /// Extracted (and their archive removed) during this run.
    pub extracted: Vec<String>,
}

/// Create `path` and its parents; an existing directory is fine.
fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(DatasetError::fs("create dir", path))
}

/// Paths used for one book inside the raw folder.
struct BookPaths {
    archive: PathBuf,
    extract_dir: PathBuf,
}

impl BookPaths {
    fn new(raw_dir: &Path, descriptor: &ArchiveDescriptor) -> Self {
        Self {
            archive: raw_dir.join(&descriptor.local_archive_name),
            extract_dir: raw_dir.join(descriptor.extract_dir_name()),
        }
    }
}

/// Acquire every book of `catalog` into `root/<raw_folder>`.
///
/// Per book: a verified archive on disk is reused; otherwise, unless the book
/// was already extracted, the archive is fetched over any stale copy. The
/// archive is then extracted next to itself and deleted. A failed extraction
/// keeps the archive so the next run can try again.
pub fn acquire(
    catalog: &Catalog,
    root: &Path,
    source: &dyn ArchiveSource,
    options: &AcquireOptions,
) -> Result<AcquireReport> {
    let raw_dir = root.join(&options.raw_folder);
    ensure_dir(&raw_dir)?;

    let mut report = AcquireReport::default();
    for descriptor in catalog.iter() {
        let paths = BookPaths::new(&raw_dir, descriptor);
        let id = descriptor.identifier.clone();

        if checksum::verify(&paths.archive, &descriptor.expected_md5) {
            tracing::info!(book = %id, "archive already downloaded and verified");
        } else if options.skip_extracted
            && !paths.archive.exists()
            && paths.extract_dir.is_dir()
        {
            tracing::info!(book = %id, dir = %paths.extract_dir.display(), "already extracted, skipping");
            report.skipped.push(id);
            continue;
        } else {
            tracing::info!(book = %id, url = %descriptor.source_url, "downloading");
            let bytes = source.fetch(&descriptor.source_url, &paths.archive)?;
            if !checksum::verify(&paths.archive, &descriptor.expected_md5) {
                tracing::warn!(book = %id, bytes, "downloaded archive does not match the published checksum");
            }
            report.fetched.push(id.clone());
        }

        tracing::info!(book = %id, archive = %paths.archive.display(), "extracting");
        let files = extract::extract_archive(&paths.archive, &paths.extract_dir)?;
        fs::remove_file(&paths.archive).map_err(DatasetError::fs("remove", &paths.archive))?;
        tracing::debug!(book = %id, files, "archive removed after extraction");
        report.extracted.push(id);
    }

    Ok(report)
}
