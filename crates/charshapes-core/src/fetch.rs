//! Fetching archive bytes from a remote host.
//!
//! `ArchiveSource` is the seam the acquisition pipeline downloads through;
//! `CurlSource` is the libcurl implementation used outside of tests.

use crate::error::{DatasetError, Result};
use crate::storage::ArchiveFile;
use std::path::Path;
use std::time::Duration;

/// Anything that can place the body behind `url` at `dest`.
///
/// Implementations must replace any existing content at `dest` and report the
/// number of bytes written.
pub trait ArchiveSource {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Single-stream HTTP GET via libcurl. No retries, no Range requests.
#[derive(Debug, Clone)]
pub struct CurlSource {
    pub connect_timeout: Duration,
    /// Upper bound for the whole transfer.
    pub timeout: Duration,
}

impl Default for CurlSource {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
        }
    }
}

impl CurlSource {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    fn transfer(&self, url: &str, out: &mut ArchiveFile) -> Result<u64> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(DatasetError::network(url))?;
        easy.follow_location(true).map_err(DatasetError::network(url))?;
        easy.max_redirections(10).map_err(DatasetError::network(url))?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(DatasetError::network(url))?;
        easy.timeout(self.timeout).map_err(DatasetError::network(url))?;
        easy.fail_on_error(false).map_err(DatasetError::network(url))?;

        let mut write_error = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match out.write_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        write_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(DatasetError::network(url))?;
            transfer.perform()
        };

        if let Some(source) = write_error {
            return Err(DatasetError::Filesystem {
                op: "write",
                path: out.temp_path().to_path_buf(),
                source,
            });
        }
        performed.map_err(DatasetError::network(url))?;

        let status = easy.response_code().map_err(DatasetError::network(url))?;
        if !(200..300).contains(&status) {
            return Err(DatasetError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(out.written())
    }
}

impl ArchiveSource for CurlSource {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut out = ArchiveFile::create(dest)?;
        match self.transfer(url, &mut out) {
            Ok(n) => {
                out.finalize()?;
                tracing::debug!(url, bytes = n, dest = %dest.display(), "fetched");
                Ok(n)
            }
            Err(e) => {
                out.discard();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let s = CurlSource::default();
        assert_eq!(s.connect_timeout, Duration::from_secs(30));
        assert_eq!(s.timeout, Duration::from_secs(3600));
    }

    #[test]
    fn unreachable_host_is_network_error_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("book.zip");
        // Port 9 (discard) on loopback is closed in test environments.
        let source = CurlSource::new(Duration::from_secs(2), Duration::from_secs(5));
        let err = source.fetch("http://127.0.0.1:9/book.zip", &dest).unwrap_err();
        assert!(matches!(err, DatasetError::Network { .. }));
        assert!(!dest.exists());
        assert!(!crate::storage::temp_path(&dest).exists());
    }
}
