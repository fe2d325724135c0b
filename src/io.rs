//! The read primitive the engines consume.
//!
//! Reads return `Ok(None)` when the file is absent — during search a missing
//! candidate is routine and must not be an error. Everything else (permission
//! denied, bad UTF-8 surfaced as `InvalidData`, etc.) is a hard failure that
//! aborts the whole operation.
//!
//! The trait exists so tests can inject a read-counting stub and callers with
//! exotic filesystems can substitute their own reader.

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Raw file-content retrieval for both engines.
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Blocking read. `Ok(None)` means the file does not exist.
    fn read_sync(&self, path: &Path) -> io::Result<Option<String>>;

    /// Non-blocking read with the same contract.
    async fn read(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Distinguish "file absent" from hard failures.
///
/// `NotADirectory` counts as absent: nested search places like
/// `.config/apprc` routinely hit a plain file where a directory component is
/// expected, and that is a miss, not an error.
fn absent(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

/// The default reader: plain filesystem access.
pub struct FsReader;

#[async_trait]
impl FileReader for FsReader {
    fn read_sync(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if absent(e.kind()) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if absent(e.kind()) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
