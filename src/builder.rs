use std::sync::Arc;

use crate::base::FinderConfig;
use crate::error::ConfsearchError;
use crate::finder::Finder;
use crate::finder_sync::FinderSync;
use crate::io::{FileReader, FsReader};
use crate::loaders::{Loader, LoaderRegistry};
use crate::types::{SearchOutcome, Transform, identity_transform};

/// Entry point for building a finder.
pub struct Confsearch;

impl Confsearch {
    /// Start configuring a finder for `package`. The package name derives the
    /// default search places (`.{package}rc` and friends) and the platform
    /// config subdirectory used by the XDG fallback.
    pub fn builder(package: &str) -> FinderBuilder {
        FinderBuilder::new(package)
    }
}

/// Builder for the two engine variants.
///
/// The same configuration builds either engine; clone the builder to get
/// both. Every option has a default, so `Confsearch::builder("myapp")
/// .build()` is a working finder.
#[derive(Clone)]
pub struct FinderBuilder {
    package: String,
    search_places: Option<Vec<String>>,
    xdg: bool,
    xdg_search_places: Option<Vec<String>>,
    stop_on_empty: bool,
    transform: Option<Transform>,
    cache: bool,
    search_cache: Option<bool>,
    load_cache: Option<bool>,
    loaders: LoaderRegistry,
    reader: Arc<dyn FileReader>,
}

impl FinderBuilder {
    fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            search_places: None,
            xdg: false,
            xdg_search_places: None,
            stop_on_empty: false,
            transform: None,
            cache: true,
            search_cache: None,
            load_cache: None,
            loaders: LoaderRegistry::with_defaults(),
            reader: Arc::new(FsReader),
        }
    }

    /// Replace the default search places entirely.
    ///
    /// Order is precedence: the first place that produces a terminal result
    /// in a directory wins, regardless of what later places would match.
    pub fn search_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_places = Some(places.into_iter().map(Into::into).collect());
        self
    }

    /// Append a search place after the defaults (or after places already set).
    pub fn add_search_place(mut self, place: impl Into<String>) -> Self {
        self.search_places
            .get_or_insert_with(|| default_search_places(&self.package))
            .push(place.into());
        self
    }

    /// Enable the platform-config-dir fallback search (default: off).
    ///
    /// When the primary ascent finds nothing terminal, the same ascent logic
    /// runs once more rooted at the platform config directory for the
    /// package, using the XDG search places.
    pub fn xdg(mut self, enabled: bool) -> Self {
        self.xdg = enabled;
        self
    }

    /// Replace the default places used for the fallback-root search.
    /// Relative to the package's platform config directory.
    pub fn xdg_search_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.xdg_search_places = Some(places.into_iter().map(Into::into).collect());
        self
    }

    /// Treat a blank candidate file as terminal (default: off).
    ///
    /// Off, a blank file is skipped like a missing one. On, it halts the
    /// search immediately and yields [`SearchOutcome::Empty`] — "a config
    /// file exists here, and it deliberately says nothing".
    pub fn stop_on_empty(mut self, enabled: bool) -> Self {
        self.stop_on_empty = enabled;
        self
    }

    /// Final hook over the terminal outcome of every search and load. Runs on
    /// all three outcome shapes, so it can map `NotFound` to defaults. The
    /// cached value is the transformed one.
    pub fn transform(
        mut self,
        transform: impl Fn(SearchOutcome) -> Result<SearchOutcome, ConfsearchError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Enable or disable both caches at once (default: on). The individual
    /// [`search_cache`](Self::search_cache) / [`load_cache`](Self::load_cache)
    /// switches override this.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Override the search cache independently of [`cache`](Self::cache).
    pub fn search_cache(mut self, enabled: bool) -> Self {
        self.search_cache = Some(enabled);
        self
    }

    /// Override the load cache independently of [`cache`](Self::cache).
    pub fn load_cache(mut self, enabled: bool) -> Self {
        self.load_cache = Some(enabled);
        self
    }

    /// Register a loader for a file extension (without the leading dot).
    pub fn loader(mut self, extension: &str, loader: Arc<dyn Loader>) -> Self {
        self.loaders.register_extension(extension, loader);
        self
    }

    /// Register a loader for an exact filename, e.g. `".myapprc"`.
    pub fn filename_loader(mut self, filename: &str, loader: Arc<dyn Loader>) -> Self {
        self.loaders.register_filename(filename, loader);
        self
    }

    /// Set the loader used when neither extension nor filename resolves.
    pub fn fallback_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loaders.set_fallback(loader);
        self
    }

    /// Replace the whole loader registry. Starts from
    /// [`LoaderRegistry::with_defaults`] otherwise.
    pub fn loader_registry(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = loaders;
        self
    }

    /// Substitute the read primitive. The default reads the real filesystem;
    /// tests inject counting or synthetic readers here.
    pub fn reader(mut self, reader: Arc<dyn FileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Build the non-blocking engine.
    pub fn build(self) -> Finder {
        let (config, loaders, reader, search_cache, load_cache) = self.into_parts();
        Finder::new(config, loaders, reader, search_cache, load_cache)
    }

    /// Build the blocking engine.
    pub fn build_sync(self) -> FinderSync {
        let (config, loaders, reader, search_cache, load_cache) = self.into_parts();
        FinderSync::new(config, loaders, reader, search_cache, load_cache)
    }

    fn into_parts(self) -> (FinderConfig, LoaderRegistry, Arc<dyn FileReader>, bool, bool) {
        let search_cache = self.search_cache.unwrap_or(self.cache);
        let load_cache = self.load_cache.unwrap_or(self.cache);
        let config = FinderConfig {
            search_places: self
                .search_places
                .unwrap_or_else(|| default_search_places(&self.package)),
            xdg: self.xdg,
            xdg_search_places: self
                .xdg_search_places
                .unwrap_or_else(default_xdg_search_places),
            stop_on_empty: self.stop_on_empty,
            transform: self.transform.unwrap_or_else(identity_transform),
            package: self.package,
        };
        (config, self.loaders, self.reader, search_cache, load_cache)
    }
}

/// The default candidate list for `package`, in precedence order: bare and
/// suffixed rc files, the same under a `.config/` subdirectory, then
/// `{package}.config.*` files.
fn default_search_places(package: &str) -> Vec<String> {
    let mut places = Vec::new();
    for prefix in [format!(".{package}rc"), format!(".config/{package}rc")] {
        places.push(prefix.clone());
        for ext in ["json", "yaml", "yml", "toml"] {
            places.push(format!("{prefix}.{ext}"));
        }
    }
    for ext in ["json", "yaml", "toml"] {
        places.push(format!("{package}.config.{ext}"));
    }
    places
}

/// Default places under the package's platform config directory.
fn default_xdg_search_places() -> Vec<String> {
    ["config", "config.json", "config.yaml", "config.yml", "config.toml"]
        .map(String::from)
        .to_vec()
}
