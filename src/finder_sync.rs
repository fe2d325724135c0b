//! The blocking engine. Same rules as [`Finder`](crate::Finder), every read
//! and loader call blocking the current thread. For single-threaded callers
//! that cannot await; owns its caches with no locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::base::{self, FinderConfig, ProbeContent};
use crate::cache::SyncCache;
use crate::error::ConfsearchError;
use crate::io::FileReader;
use crate::loaders::LoaderRegistry;
use crate::paths;
use crate::types::SearchOutcome;

pub struct FinderSync {
    config: FinderConfig,
    loaders: LoaderRegistry,
    reader: Arc<dyn FileReader>,
    search_cache: Option<SyncCache>,
    load_cache: Option<SyncCache>,
}

impl FinderSync {
    pub(crate) fn new(
        config: FinderConfig,
        loaders: LoaderRegistry,
        reader: Arc<dyn FileReader>,
        search_cache: bool,
        load_cache: bool,
    ) -> Self {
        Self {
            config,
            loaders,
            reader,
            search_cache: search_cache.then(SyncCache::new),
            load_cache: load_cache.then(SyncCache::new),
        }
    }

    /// Search upward from the process working directory.
    pub fn search(&self) -> Result<SearchOutcome, ConfsearchError> {
        let cwd = std::env::current_dir().map_err(|e| ConfsearchError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        self.search_from(cwd)
    }

    /// Search upward from `path`. A file resolves to its containing directory.
    pub fn search_from(&self, path: impl AsRef<Path>) -> Result<SearchOutcome, ConfsearchError> {
        let start = paths::start_directory_sync(path.as_ref())?;
        let mut outcome = self.search_from_directory(start, &self.config.search_places)?;

        // Primary ascent came up dry: one more pass rooted at the platform
        // config dir, if enabled and resolvable.
        if !base::should_stop(&outcome, self.config.stop_on_empty)
            && self.config.xdg
            && let Some(root) = paths::fallback_root(&self.config.package)
        {
            debug!("falling back to platform config dir {}", root.display());
            outcome = self.search_from_directory(root, &self.config.xdg_search_places)?;
        }

        Ok(outcome)
    }

    /// Load an explicit file, bypassing directory ascent. A missing file is a
    /// hard failure here, unlike during search.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SearchOutcome, ConfsearchError> {
        let path = path.as_ref();
        base::validate_load_path(path)?;
        let filepath = paths::absolute(path)?;

        let run = || {
            let content = self.read(&filepath)?.ok_or_else(|| {
                ConfsearchError::FileNotFound {
                    path: filepath.clone(),
                }
            })?;
            let outcome = self.outcome_for(filepath.clone(), Some(content))?;
            (self.config.transform)(outcome)
        };

        match &self.load_cache {
            Some(cache) => cache.get_or_compute(&filepath, run),
            None => run(),
        }
    }

    pub fn clear_search_cache(&self) {
        if let Some(cache) = &self.search_cache {
            cache.clear();
        }
    }

    pub fn clear_load_cache(&self) {
        if let Some(cache) = &self.load_cache {
            cache.clear();
        }
    }

    pub fn clear_caches(&self) {
        self.clear_search_cache();
        self.clear_load_cache();
    }

    /// One ascent step: probe this directory, recurse into the parent if
    /// nothing terminal turned up, and apply the transform where ascent ends.
    /// Every visited directory is a caching point for the eventual outcome.
    fn search_from_directory(
        &self,
        dir: PathBuf,
        places: &[String],
    ) -> Result<SearchOutcome, ConfsearchError> {
        let run = || {
            let outcome = self.search_directory(&dir, places)?;
            match base::next_directory(&dir, &outcome, self.config.stop_on_empty) {
                Some(parent) => self.search_from_directory(parent, places),
                None => (self.config.transform)(outcome),
            }
        };

        match &self.search_cache {
            Some(cache) => cache.get_or_compute(&dir, run),
            None => run(),
        }
    }

    fn search_directory(
        &self,
        dir: &Path,
        places: &[String],
    ) -> Result<SearchOutcome, ConfsearchError> {
        for place in places {
            let outcome = self.probe_place(dir, place)?;
            if base::should_stop(&outcome, self.config.stop_on_empty) {
                return Ok(outcome);
            }
        }
        Ok(SearchOutcome::NotFound)
    }

    fn probe_place(&self, dir: &Path, place: &str) -> Result<SearchOutcome, ConfsearchError> {
        let filepath = dir.join(place);
        trace!("probing {}", filepath.display());
        let content = self.read(&filepath)?;
        self.outcome_for(filepath, content)
    }

    fn read(&self, path: &Path) -> Result<Option<String>, ConfsearchError> {
        self.reader
            .read_sync(path)
            .map_err(|e| ConfsearchError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn outcome_for(
        &self,
        filepath: PathBuf,
        content: Option<String>,
    ) -> Result<SearchOutcome, ConfsearchError> {
        match base::classify_content(content) {
            ProbeContent::Absent => Ok(SearchOutcome::NotFound),
            ProbeContent::Blank => Ok(SearchOutcome::Empty { filepath }),
            ProbeContent::Content(content) => {
                let loader = self.loaders.resolve(&filepath)?;
                let config = loader.load_sync(&filepath, &content)?;
                debug!("loaded config from {}", filepath.display());
                Ok(SearchOutcome::Found { config, filepath })
            }
        }
    }
}
