//! Memoization wrappers for search and load results.
//!
//! Both caches store whatever the underlying work returns — `NotFound`
//! included — but never a failure: an error propagates past the cache
//! uninserted so a later call can retry instead of observing a poisoned
//! entry. The async cache additionally shares in-flight computations, so two
//! concurrent callers of the same uncached key run the work exactly once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::error::ConfsearchError;
use crate::types::SearchOutcome;

/// Memoization for the blocking engine. Single-threaded by contract, so
/// interior mutability is a `RefCell`, not a lock.
#[derive(Default)]
pub(crate) struct SyncCache {
    inner: RefCell<HashMap<PathBuf, SearchOutcome>>,
}

impl SyncCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `key`, or run `work` and store its
    /// result. Errors are returned without touching the cache.
    pub fn get_or_compute(
        &self,
        key: &Path,
        work: impl FnOnce() -> Result<SearchOutcome, ConfsearchError>,
    ) -> Result<SearchOutcome, ConfsearchError> {
        if let Some(hit) = self.inner.borrow().get(key) {
            return Ok(hit.clone());
        }
        let outcome = work()?;
        self.inner
            .borrow_mut()
            .insert(key.to_path_buf(), outcome.clone());
        Ok(outcome)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

/// Memoization for the non-blocking engine.
///
/// Each key owns a `OnceCell`; concurrent callers clone the cell under a
/// short-lived lock and await initialization outside it. `get_or_try_init`
/// gives the duplicate-suppression the engine needs: the first caller runs
/// the work, later callers wait on the same cell, and a failed initialization
/// leaves the cell empty for the next attempt.
#[derive(Default)]
pub(crate) struct AsyncCache {
    inner: Mutex<HashMap<PathBuf, Arc<OnceCell<SearchOutcome>>>>,
}

impl AsyncCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &Path,
        work: F,
    ) -> Result<SearchOutcome, ConfsearchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SearchOutcome, ConfsearchError>>,
    {
        let cell = {
            let mut map = self.inner.lock().expect("cache lock");
            map.entry(key.to_path_buf()).or_default().clone()
        };
        cell.get_or_try_init(work).await.cloned()
    }

    pub fn clear(&self) {
        self.inner.lock().expect("cache lock").clear();
    }
}
