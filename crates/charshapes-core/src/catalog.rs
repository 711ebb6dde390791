//! The set of book archives to acquire.
//!
//! A `Catalog` is a plain value handed to the acquisition pipeline, so tests
//! can point it at a local server or a synthetic list of books.

use serde::Serialize;
use std::path::Path;

/// Host serving the PMJT Character Shapes books.
pub const DEFAULT_BASE_URL: &str = "http://codh.rois.ac.jp/char-shape";

/// Book identifiers and the MD5 of each published `{id}.zip`.
const CODH_BOOKS: [(&str, &str); 15] = [
    ("200003076", "46571ea44b897d335fc8968ad8c496de"),
    ("200003967", "fa3100fd0da6a670c0e63aeeedef8e5c"),
    ("200014740", "4a8ded7745a8447577c98205fc9ba7a7"),
    ("200021637", "2c238dc7bf696a20d116c1023c38e00f"),
    ("200021660", "472edecf9ebb1aa73937ad298a0664a1"),
    ("200021712", "c516c4b44782ebec6915d6862b7a1c7b"),
    ("200021763", "df364b6e775f9f85b55b7aadd8f64e71"),
    ("200021802", "4d15096d97e95b219a6ba0d60da046a8"),
    ("200021851", "0c4b941c41b0f501c235795d95ef8252"),
    ("200021853", "3224bd91ae222d15ccbe04948bff5dd5"),
    ("200021869", "5ebba23cf69b49ddee5abac9361d305c"),
    ("200021925", "e1f6a57bfea7f2203dc367045df6f614"),
    ("200022050", "fd62690aa1cd9ab1380d8782f6dc5f76"),
    ("brsk00000", "b52a20509e391650b6532484aae4e191"),
    ("hnsd00000", "208956eeea1a37a231dfb2dba6cc0608"),
];

/// One downloadable book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveDescriptor {
    pub identifier: String,
    pub source_url: String,
    pub expected_md5: String,
    /// Filename the archive is stored under inside the raw folder.
    pub local_archive_name: String,
}

impl ArchiveDescriptor {
    /// Builds the descriptor for `{base_url}/book/{id}/{id}.zip`.
    pub fn new(base_url: &str, identifier: &str, expected_md5: &str) -> Self {
        let source_url = book_url(base_url, identifier);
        let local_archive_name = filename_from_url_path(&source_url)
            .unwrap_or_else(|| format!("{identifier}.zip"));
        Self {
            identifier: identifier.to_string(),
            source_url,
            expected_md5: expected_md5.to_string(),
            local_archive_name,
        }
    }

    /// Name of the directory the archive is extracted into: the archive
    /// filename without its extension.
    pub fn extract_dir_name(&self) -> String {
        Path::new(&self.local_archive_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.identifier.clone())
    }
}

/// Ordered list of archives; acquisition walks it front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: Vec<ArchiveDescriptor>,
}

impl Catalog {
    pub fn new(entries: Vec<ArchiveDescriptor>) -> Self {
        Self { entries }
    }

    /// The 15 published books, served from `base_url`.
    pub fn codh(base_url: &str) -> Self {
        Self::new(
            CODH_BOOKS
                .iter()
                .map(|(id, md5)| ArchiveDescriptor::new(base_url, id, md5))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&ArchiveDescriptor> {
        self.entries.iter().find(|d| d.identifier == identifier)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::codh(DEFAULT_BASE_URL)
    }
}

fn book_url(base_url: &str, identifier: &str) -> String {
    format!(
        "{}/book/{id}/{id}.zip",
        base_url.trim_end_matches('/'),
        id = identifier
    )
}

/// Last non-empty path segment of `url`, or `None` if it has none.
fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
