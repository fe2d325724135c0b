//! The non-blocking engine.
//!
//! Identical rules to [`FinderSync`](crate::FinderSync): places are probed
//! strictly in order and directories strictly bottom-up, because the first
//! terminal result must win deterministically — concurrent probing could let
//! I/O completion order decide which file "wins". Suspension happens at every
//! read and at loader invocation. Concurrent calls that land on the same
//! uncached directory share one in-flight computation instead of duplicating
//! work.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::base::{self, FinderConfig, ProbeContent};
use crate::cache::AsyncCache;
use crate::error::ConfsearchError;
use crate::io::FileReader;
use crate::loaders::LoaderRegistry;
use crate::paths;
use crate::types::SearchOutcome;

pub struct Finder {
    config: FinderConfig,
    loaders: LoaderRegistry,
    reader: Arc<dyn FileReader>,
    search_cache: Option<AsyncCache>,
    load_cache: Option<AsyncCache>,
}

impl Finder {
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
            search_cache: search_cache.then(AsyncCache::new),
            load_cache: load_cache.then(AsyncCache::new),
        }
    }

    /// Search upward from the process working directory.
    pub async fn search(&self) -> Result<SearchOutcome, ConfsearchError> {
        let cwd = std::env::current_dir().map_err(|e| ConfsearchError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        self.search_from(cwd).await
    }

    /// Search upward from `path`. A file resolves to its containing directory.
    pub async fn search_from(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<SearchOutcome, ConfsearchError> {
        let start = paths::start_directory(path.as_ref()).await?;
        let mut outcome = self
            .search_from_directory(start, &self.config.search_places)
            .await?;

        if !base::should_stop(&outcome, self.config.stop_on_empty)
            && self.config.xdg
            && let Some(root) = paths::fallback_root(&self.config.package)
        {
            debug!("falling back to platform config dir {}", root.display());
            outcome = self
                .search_from_directory(root, &self.config.xdg_search_places)
                .await?;
        }

        Ok(outcome)
    }

    /// Load an explicit file, bypassing directory ascent. A missing file is a
    /// hard failure here, unlike during search.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<SearchOutcome, ConfsearchError> {
        let path = path.as_ref();
        base::validate_load_path(path)?;
        let filepath = paths::absolute(path)?;

        let run = || async {
            let content = self.read(&filepath).await?.ok_or_else(|| {
                ConfsearchError::FileNotFound {
                    path: filepath.clone(),
                }
            })?;
            let outcome = self.outcome_for(filepath.clone(), Some(content)).await?;
            (self.config.transform)(outcome)
        };

        match &self.load_cache {
            Some(cache) => cache.get_or_compute(&filepath, run).await,
            None => run().await,
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

    /// One ascent step, memoized per directory. The recursive call is boxed;
    /// everything else matches the blocking engine line for line.
    async fn search_from_directory(
        &self,
        dir: PathBuf,
        places: &[String],
    ) -> Result<SearchOutcome, ConfsearchError> {
        let run = || async {
            let outcome = self.search_directory(&dir, places).await?;
            match base::next_directory(&dir, &outcome, self.config.stop_on_empty) {
                Some(parent) => Box::pin(self.search_from_directory(parent, places)).await,
                None => (self.config.transform)(outcome),
            }
        };

        match &self.search_cache {
            Some(cache) => cache.get_or_compute(&dir, run).await,
            None => run().await,
        }
    }

    async fn search_directory(
        &self,
        dir: &Path,
        places: &[String],
    ) -> Result<SearchOutcome, ConfsearchError> {
        for place in places {
            let outcome = self.probe_place(dir, place).await?;
            if base::should_stop(&outcome, self.config.stop_on_empty) {
                return Ok(outcome);
            }
        }
        Ok(SearchOutcome::NotFound)
    }

    async fn probe_place(
        &self,
        dir: &Path,
        place: &str,
    ) -> Result<SearchOutcome, ConfsearchError> {
        let filepath = dir.join(place);
        trace!("probing {}", filepath.display());
        let content = self.read(&filepath).await?;
        self.outcome_for(filepath, content).await
    }

    async fn read(&self, path: &Path) -> Result<Option<String>, ConfsearchError> {
        self.reader
            .read(path)
            .await
            .map_err(|e| ConfsearchError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    async fn outcome_for(
        &self,
        filepath: PathBuf,
        content: Option<String>,
    ) -> Result<SearchOutcome, ConfsearchError> {
        match base::classify_content(content) {
            ProbeContent::Absent => Ok(SearchOutcome::NotFound),
            ProbeContent::Blank => Ok(SearchOutcome::Empty { filepath }),
            ProbeContent::Content(content) => {
                let loader = self.loaders.resolve(&filepath)?;
                let config = loader.load(&filepath, &content).await?;
                debug!("loaded config from {}", filepath.display());
                Ok(SearchOutcome::Found { config, filepath })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CountingReader, PLACES, builder};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn nothing_anywhere_is_not_found() {
        let dir = TempDir::new().unwrap();
        let finder = builder().build();
        assert!(finder.search_from(dir.path()).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn ascends_to_ancestor_match() {
        let root = TempDir::new().unwrap();
        let deep = root.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.path().join(PLACES[0]), r#"{"level": "root"}"#).unwrap();

        let finder = builder().build();
        let outcome = finder.search_from(&deep).await.unwrap();
        assert_eq!(outcome.config().unwrap()["level"], json!("root"));
        assert_eq!(
            outcome.filepath(),
            Some(root.path().join(PLACES[0]).as_path())
        );
    }

    #[tokio::test]
    async fn first_place_wins_within_a_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PLACES[0]), r#"{"from": "first"}"#).unwrap();
        fs::write(dir.path().join(PLACES[1]), r#"{"from": "second"}"#).unwrap();

        let outcome = builder().build().search_from(dir.path()).await.unwrap();
        assert_eq!(outcome.config().unwrap()["from"], json!("first"));
    }

    #[tokio::test]
    async fn blank_file_halts_under_stop_on_empty() {
        let root = TempDir::new().unwrap();
        let child = root.path().join("child");
        fs::create_dir(&child).unwrap();
        fs::write(child.join(PLACES[0]), " \n").unwrap();
        fs::write(root.path().join(PLACES[0]), r#"{"level": "root"}"#).unwrap();

        let finder = builder().stop_on_empty(true).build();
        let outcome = finder.search_from(&child).await.unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn concurrent_searches_share_the_underlying_work() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PLACES[0]), r#"{"n": 1}"#).unwrap();

        let reader = Arc::new(CountingReader::new());
        let finder = builder().reader(reader.clone()).build();

        // Neither call has a warm cache; the in-flight computation is shared.
        let (a, b) = tokio::join!(
            finder.search_from(dir.path()),
            finder.search_from(dir.path()),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(reader.reads(), 1);
    }

    #[tokio::test]
    async fn search_caches_by_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PLACES[0]), r#"{"n": 1}"#).unwrap();

        let reader = Arc::new(CountingReader::new());
        let finder = builder().reader(reader.clone()).build();

        let first = finder.search_from(dir.path()).await.unwrap();
        let reads_after_first = reader.reads();
        let second = finder.search_from(dir.path()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(reader.reads(), reads_after_first);
    }

    #[tokio::test]
    async fn load_missing_file_is_hard_failure() {
        let dir = TempDir::new().unwrap();
        let err = builder()
            .build()
            .load(dir.path().join("ghost.json"))
            .await
            .expect_err("expected failure");
        assert!(matches!(err, ConfsearchError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn load_empty_path_fails_before_io() {
        let err = builder().build().load("").await.expect_err("expected failure");
        assert!(matches!(err, ConfsearchError::EmptyFilePath));
    }

    #[tokio::test]
    async fn transform_applies_to_load() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{"n": 1}"#).unwrap();

        let finder = builder()
            .transform(|outcome| match outcome {
                SearchOutcome::Found { filepath, .. } => Ok(SearchOutcome::Found {
                    config: json!({"replaced": true}),
                    filepath,
                }),
                other => Ok(other),
            })
            .build();

        let outcome = finder.load(&file).await.unwrap();
        assert_eq!(outcome.config().unwrap()["replaced"], json!(true));
    }

    #[tokio::test]
    async fn agrees_with_blocking_engine() {
        let root = TempDir::new().unwrap();
        let deep = root.path().join("w");
        fs::create_dir(&deep).unwrap();
        fs::write(root.path().join(PLACES[1]), r#"{"who": "root"}"#).unwrap();

        let from_async = builder().build().search_from(&deep).await.unwrap();
        let from_sync = builder().build_sync().search_from(&deep).unwrap();
        assert_eq!(from_async, from_sync);
    }
}
