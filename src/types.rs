use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfsearchError;

/// The terminal result of a search or load operation.
///
/// Exactly one of the three shapes is produced per probe. `Empty` is distinct
/// from `NotFound` so callers can tell "explicitly disabled" (a file was
/// dropped in place but left blank) from "no config anywhere".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No candidate file exists anywhere on the search path.
    NotFound,
    /// A candidate file exists but its content is blank or whitespace-only.
    Empty { filepath: PathBuf },
    /// A loader produced a value from the file at `filepath`.
    Found { config: Value, filepath: PathBuf },
}

impl SearchOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchOutcome::NotFound)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::Empty { .. })
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// The file that produced this outcome, if any.
    pub fn filepath(&self) -> Option<&Path> {
        match self {
            SearchOutcome::NotFound => None,
            SearchOutcome::Empty { filepath } | SearchOutcome::Found { filepath, .. } => {
                Some(filepath)
            }
        }
    }

    /// The parsed value, if this is a `Found` outcome.
    pub fn config(&self) -> Option<&Value> {
        match self {
            SearchOutcome::Found { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Consume the outcome, yielding the parsed value of a `Found`.
    pub fn into_config(self) -> Option<Value> {
        match self {
            SearchOutcome::Found { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Deserialize a `Found` value into a typed config struct.
    ///
    /// `None` for `NotFound` and `Empty`; `Some(Err)` when the value does
    /// not fit `T`, reported against the file that produced it.
    pub fn into_typed<T: DeserializeOwned>(self) -> Option<Result<T, ConfsearchError>> {
        match self {
            SearchOutcome::Found { config, filepath } => Some(
                serde_json::from_value(config).map_err(|e| ConfsearchError::Parse {
                    path: filepath,
                    source: Box::new(e),
                }),
            ),
            _ => None,
        }
    }
}

/// Final hook applied to the terminal outcome of every search/load, including
/// `NotFound` — a transform can turn "no config" into a default configuration.
pub type Transform =
    Arc<dyn Fn(SearchOutcome) -> Result<SearchOutcome, ConfsearchError> + Send + Sync>;

/// The identity transform. Used when the builder is given none.
pub fn identity_transform() -> Transform {
    Arc::new(|outcome| Ok(outcome))
}
