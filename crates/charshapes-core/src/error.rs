//! Error type shared by acquisition, indexing and sample access.

use std::io;
use std::path::{Path, PathBuf};

/// Failures surfaced to callers. Nothing in this crate retries; the caller
/// decides whether to run the acquisition/index cycle again.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Curl reported an error (connection, timeout, invalid URL, ...).
    #[error("fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Directory creation, file write, rename or deletion failed.
    #[error("{op} {}: {source}", .path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive is corrupt or unreadable. The archive file is left in place.
    #[error("extract {}: {source}", .archive.display())]
    Extraction {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An archive entry would land outside the extraction directory.
    #[error("extract {}: entry {entry:?} escapes the target directory", .archive.display())]
    UnsafeEntry { archive: PathBuf, entry: String },

    /// Directory traversal failed while building the index.
    #[error("walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Sample index outside `[0, len)`.
    #[error("index {index} out of range for dataset of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// The image decoder rejected the file.
    #[error("decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    pub(crate) fn fs<'a>(
        op: &'static str,
        path: &'a Path,
    ) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| DatasetError::Filesystem {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn network(url: &str) -> impl Fn(curl::Error) -> Self + '_ {
        move |source| DatasetError::Network {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let e = DatasetError::OutOfRange { index: 5, len: 3 };
        assert_eq!(e.to_string(), "index 5 out of range for dataset of length 3");
    }

    #[test]
    fn filesystem_message_includes_path() {
        let path = Path::new("/tmp/raw/book.zip");
        let e = DatasetError::fs("remove", path)(io::Error::new(io::ErrorKind::Other, "busy"));
        assert_eq!(e.to_string(), "remove /tmp/raw/book.zip: busy");
    }

    #[test]
    fn http_status_message() {
        let e = DatasetError::HttpStatus {
            url: "http://example.com/a.zip".to_string(),
            status: 404,
        };
        assert_eq!(e.to_string(), "GET http://example.com/a.zip returned HTTP 404");
    }
}
