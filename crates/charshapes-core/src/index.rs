//! Character index: walks the extracted books and pairs every image file with
//! its code-point label.
//!
//! Expected layout: `raw/<book>/characters/U+XXXX/<image>`. Any directory
//! whose name contains `U+` is a label root, wherever it sits in the tree.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker that makes a directory a label root.
pub const LABEL_MARKER: &str = "U+";

/// Which directory name a file's label is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelSource {
    /// The directory directly containing the file. Files nested below a label
    /// root are labelled with their own parent, not the root.
    #[default]
    ImmediateParent,
    /// The enclosing `U+` directory, however deep the file sits.
    LabelRoot,
}

#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub label_source: LabelSource,
    /// Sort records by path. Walk order is filesystem dependent otherwise.
    pub sort: bool,
}

/// One image file and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRecord {
    pub image_path: PathBuf,
    pub code_point: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetIndex {
    pub records: Vec<CharacterRecord>,
    pub labels: BTreeSet<String>,
}

impl DatasetIndex {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_label_dir(name: &OsStr) -> bool {
    name.to_string_lossy().contains(LABEL_MARKER)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory test that follows symlinks; `file_type()` alone reports the link.
fn points_to_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn walk_err(path: &Path) -> impl FnOnce(walkdir::Error) -> DatasetError + '_ {
    move |source| DatasetError::Walk {
        path: path.to_path_buf(),
        source,
    }
}

/// All label roots under `raw_path`, in walk order. The walk does not descend
/// into a root once found, so nested `U+` directories are only reached through
/// their ancestor and no file is indexed twice. A symlink to a directory is a
/// label root when its own name carries the marker; other links are not
/// followed.
pub fn find_label_dirs(raw_path: &Path) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    let mut walker = WalkDir::new(raw_path).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(walk_err(raw_path))?;
        if !points_to_dir(&entry) || !is_label_dir(entry.file_name()) {
            continue;
        }
        let descended = entry.file_type().is_dir();
        roots.push(entry.into_path());
        if descended {
            walker.skip_current_dir();
        }
    }
    Ok(roots)
}

/// Build the index for everything under `raw_path`.
///
/// Every file below a label root becomes a record; there is no extension
/// filter, so stray non-image files surface later as decode errors. Every
/// directory visited below a root (the root included, even when empty)
/// contributes its name to the label set under `LabelSource::ImmediateParent`.
/// A missing `raw_path` yields an empty index.
pub fn build_index(raw_path: &Path, options: &IndexOptions) -> Result<DatasetIndex> {
    if !raw_path.is_dir() {
        tracing::warn!(path = %raw_path.display(), "raw folder missing; index is empty");
        return Ok(DatasetIndex::default());
    }

    let roots = find_label_dirs(raw_path)?;
    let mut index = DatasetIndex::default();

    for root in &roots {
        let root_label = dir_name(root);
        if options.label_source == LabelSource::LabelRoot {
            index.labels.insert(root_label.clone());
        }

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(walk_err(root))?;
            if points_to_dir(&entry) {
                // Links to directories below the root are neither walked nor indexed.
                if entry.depth() > 0 && !entry.file_type().is_dir() {
                    continue;
                }
                if options.label_source == LabelSource::ImmediateParent {
                    index.labels.insert(dir_name(entry.path()));
                }
                continue;
            }

            let code_point = match options.label_source {
                LabelSource::ImmediateParent => {
                    entry.path().parent().map(dir_name).unwrap_or_default()
                }
                LabelSource::LabelRoot => root_label.clone(),
            };
            index.records.push(CharacterRecord {
                image_path: entry.into_path(),
                code_point,
            });
        }
    }

    if options.sort {
        index.records.sort_by(|a, b| a.image_path.cmp(&b.image_path));
    }

    tracing::info!(
        records = index.records.len(),
        labels = index.labels.len(),
        label_dirs = roots.len(),
        "index built"
    );
    Ok(index)
}
