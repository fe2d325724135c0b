//! Path resolution helpers: search start directory and the fallback root.

use std::path::{Path, PathBuf};

use crate::error::ConfsearchError;

fn io_error(path: &Path, source: std::io::Error) -> ConfsearchError {
    ConfsearchError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve the directory a search starts from.
///
/// A directory resolves to itself; a file resolves to its containing
/// directory. The path is made absolute first so cache keys and returned
/// filepaths are stable regardless of how the caller spelled the start path.
pub(crate) fn start_directory_sync(path: &Path) -> Result<PathBuf, ConfsearchError> {
    let absolute = std::path::absolute(path).map_err(|e| io_error(path, e))?;
    let metadata = std::fs::metadata(&absolute).map_err(|e| io_error(&absolute, e))?;
    if metadata.is_dir() {
        Ok(absolute)
    } else {
        Ok(parent_of(&absolute))
    }
}

/// Non-blocking twin of [`start_directory_sync`].
pub(crate) async fn start_directory(path: &Path) -> Result<PathBuf, ConfsearchError> {
    let absolute = std::path::absolute(path).map_err(|e| io_error(path, e))?;
    let metadata = tokio::fs::metadata(&absolute)
        .await
        .map_err(|e| io_error(&absolute, e))?;
    if metadata.is_dir() {
        Ok(absolute)
    } else {
        Ok(parent_of(&absolute))
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Resolve an explicit load target to an absolute path.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, ConfsearchError> {
    std::path::absolute(path).map_err(|e| io_error(path, e))
}

/// The platform config directory for `package` — `~/.config/{package}` on
/// Linux, the OS equivalent elsewhere. This is the fallback root for the
/// XDG search; places under it are already namespaced by the package name.
///
/// `None` when the platform provides no home directory (e.g. bare CI users).
pub(crate) fn fallback_root(package: &str) -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", package)?;
    Some(proj.config_dir().to_path_buf())
}
