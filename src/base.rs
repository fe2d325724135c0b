//! Policy shared by both engines.
//!
//! The two engines differ only in how they schedule reads and loader calls;
//! every rule that decides *what happens next* lives here so it is written
//! once and holds for both. Covers: the stop condition, directory advance,
//! probe-content classification, and load-path validation.

use std::path::{Path, PathBuf};

use crate::error::ConfsearchError;
use crate::types::{SearchOutcome, Transform};

/// Immutable engine configuration, fixed at build time.
#[derive(Clone)]
pub(crate) struct FinderConfig {
    pub package: String,
    pub search_places: Vec<String>,
    pub xdg: bool,
    pub xdg_search_places: Vec<String>,
    pub stop_on_empty: bool,
    pub transform: Transform,
}

/// Whether ascent halts with this outcome.
///
/// `Found` always halts. `Empty` halts only under the stop-on-empty policy —
/// and when it does, it halts immediately: later places in the same directory
/// are not probed. `NotFound` never halts on its own; it means "try the next
/// place, then the parent directory".
pub(crate) fn should_stop(outcome: &SearchOutcome, stop_on_empty: bool) -> bool {
    match outcome {
        SearchOutcome::NotFound => false,
        SearchOutcome::Empty { .. } => stop_on_empty,
        SearchOutcome::Found { .. } => true,
    }
}

/// The next directory to search, or `None` when ascent is over.
///
/// Ascent is over when the outcome is terminal or the filesystem root is
/// reached (`Path::parent` of a root is `None`).
pub(crate) fn next_directory(
    dir: &Path,
    outcome: &SearchOutcome,
    stop_on_empty: bool,
) -> Option<PathBuf> {
    if should_stop(outcome, stop_on_empty) {
        return None;
    }
    dir.parent().map(Path::to_path_buf)
}

/// What a probe read produced, before loader dispatch.
pub(crate) enum ProbeContent {
    /// The candidate file does not exist. Routine, not an error.
    Absent,
    /// The file exists but is blank or whitespace-only.
    Blank,
    /// Non-blank content for the loader.
    Content(String),
}

pub(crate) fn classify_content(content: Option<String>) -> ProbeContent {
    match content {
        None => ProbeContent::Absent,
        Some(s) if s.trim().is_empty() => ProbeContent::Blank,
        Some(s) => ProbeContent::Content(s),
    }
}

/// Reject an empty `load` target before any I/O happens.
pub(crate) fn validate_load_path(path: &Path) -> Result<(), ConfsearchError> {
    if path.as_os_str().is_empty() {
        return Err(ConfsearchError::EmptyFilePath);
    }
    Ok(())
}
