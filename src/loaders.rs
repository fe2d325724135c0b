//! Format loaders and the registry that maps filenames to them.
//!
//! A loader turns raw file content into a `serde_json::Value`. The registry
//! resolves a loader for a matched file in three steps: by extension, then by
//! exact filename (for extensionless conventions like `.apprc`), then the
//! registry-wide fallback. A file matched by a search place but resolvable to
//! no loader is a configuration error, not a search miss.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConfsearchError;

/// Parses raw file content into a configuration value.
///
/// Implementations are registered by extension or exact filename. The async
/// method exists for loaders that need to suspend (fetch a schema, shell out);
/// by default it delegates to the synchronous parse, so pure-parsing loaders
/// implement only `load_sync`.
#[async_trait]
pub trait Loader: Send + Sync {
    fn load_sync(&self, path: &Path, content: &str) -> Result<Value, ConfsearchError>;

    async fn load(&self, path: &Path, content: &str) -> Result<Value, ConfsearchError> {
        self.load_sync(path, content)
    }
}

/// Built-in JSON loader.
pub struct JsonLoader;

#[async_trait]
impl Loader for JsonLoader {
    fn load_sync(&self, path: &Path, content: &str) -> Result<Value, ConfsearchError> {
        serde_json::from_str(content).map_err(|e| ConfsearchError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }
}

/// Built-in YAML loader. Also the default for extensionless rc files, since
/// YAML is a superset of JSON.
pub struct YamlLoader;

#[async_trait]
impl Loader for YamlLoader {
    fn load_sync(&self, path: &Path, content: &str) -> Result<Value, ConfsearchError> {
        serde_yaml::from_str(content).map_err(|e| ConfsearchError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }
}

/// Built-in TOML loader.
pub struct TomlLoader;

#[async_trait]
impl Loader for TomlLoader {
    fn load_sync(&self, path: &Path, content: &str) -> Result<Value, ConfsearchError> {
        let parsed: toml::Value = toml::from_str(content).map_err(|e| ConfsearchError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        serde_json::to_value(parsed).map_err(|e| ConfsearchError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }
}

/// Maps file extensions and exact filenames to loaders.
#[derive(Clone)]
pub struct LoaderRegistry {
    by_extension: HashMap<String, Arc<dyn Loader>>,
    by_filename: HashMap<String, Arc<dyn Loader>>,
    fallback: Option<Arc<dyn Loader>>,
}

impl LoaderRegistry {
    /// An empty registry with no loaders at all.
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
            by_filename: HashMap::new(),
            fallback: None,
        }
    }

    /// The default registry: JSON, YAML (`.yaml`/`.yml`), and TOML by
    /// extension, with YAML as the fallback for extensionless rc files.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_extension("json", Arc::new(JsonLoader));
        registry.register_extension("yaml", Arc::new(YamlLoader));
        registry.register_extension("yml", Arc::new(YamlLoader));
        registry.register_extension("toml", Arc::new(TomlLoader));
        registry.set_fallback(Arc::new(YamlLoader));
        registry
    }

    /// Register a loader for a file extension (without the leading dot).
    pub fn register_extension(&mut self, extension: &str, loader: Arc<dyn Loader>) {
        self.by_extension.insert(extension.to_string(), loader);
    }

    /// Register a loader for an exact filename, e.g. `".apprc"`.
    pub fn register_filename(&mut self, filename: &str, loader: Arc<dyn Loader>) {
        self.by_filename.insert(filename.to_string(), loader);
    }

    /// Set the loader used when neither extension nor filename matches.
    pub fn set_fallback(&mut self, loader: Arc<dyn Loader>) {
        self.fallback = Some(loader);
    }

    /// Resolve the loader for a matched file.
    ///
    /// Order: extension key, exact filename key, fallback. Failing all three
    /// is `NoLoader` — the search place was registered without a loader.
    pub fn resolve(&self, path: &Path) -> Result<&Arc<dyn Loader>, ConfsearchError> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && let Some(loader) = self.by_extension.get(ext)
        {
            return Ok(loader);
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && let Some(loader) = self.by_filename.get(name)
        {
            return Ok(loader);
        }
        self.fallback
            .as_ref()
            .ok_or_else(|| ConfsearchError::NoLoader {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_loader_parses() {
        let value = JsonLoader
            .load_sync(Path::new("/t/.apprc.json"), r#"{"port": 3000}"#)
            .unwrap();
        assert_eq!(value, json!({"port": 3000}));
    }

    #[test]
    fn json_loader_reports_parse_error() {
        let err = JsonLoader
            .load_sync(Path::new("/t/.apprc.json"), "{nope")
            .unwrap_err();
        assert!(matches!(err, ConfsearchError::Parse { .. }));
    }

    #[test]
    fn yaml_loader_parses() {
        let value = YamlLoader
            .load_sync(Path::new("/t/.apprc.yaml"), "host: localhost\nport: 8080\n")
            .unwrap();
        assert_eq!(value, json!({"host": "localhost", "port": 8080}));
    }

    #[test]
    fn yaml_loader_accepts_json() {
        // YAML superset: rc files containing JSON still parse via the fallback.
        let value = YamlLoader
            .load_sync(Path::new("/t/.apprc"), r#"{"a": 1}"#)
            .unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn toml_loader_parses_to_json_value() {
        let value = TomlLoader
            .load_sync(Path::new("/t/app.config.toml"), "port = 9000\n[db]\nurl = \"pg://x\"\n")
            .unwrap();
        assert_eq!(value, json!({"port": 9000, "db": {"url": "pg://x"}}));
    }

    #[test]
    fn toml_loader_reports_parse_error() {
        let err = TomlLoader
            .load_sync(Path::new("/t/app.config.toml"), "port = = 1")
            .unwrap_err();
        assert!(err.to_string().contains("app.config.toml"));
    }

    #[test]
    fn resolve_prefers_extension_over_fallback() {
        // "a: 1" is valid YAML (the fallback) but not JSON. A .json file must
        // reject it, proving the extension loader won.
        let registry = LoaderRegistry::with_defaults();
        let loader = registry.resolve(Path::new("/t/.apprc.json")).unwrap();
        assert!(loader.load_sync(Path::new("/t/.apprc.json"), "a: 1").is_err());
    }

    #[test]
    fn resolve_falls_back_to_filename() {
        let mut registry = LoaderRegistry::empty();
        registry.register_filename(".apprc", Arc::new(JsonLoader));
        assert!(registry.resolve(Path::new("/repo/.apprc")).is_ok());
    }

    #[test]
    fn resolve_extensionless_uses_fallback() {
        let registry = LoaderRegistry::with_defaults();
        assert!(registry.resolve(Path::new("/repo/.apprc")).is_ok());
    }

    #[test]
    fn resolve_unknown_extension_without_fallback_fails() {
        let mut registry = LoaderRegistry::empty();
        registry.register_extension("json", Arc::new(JsonLoader));
        let err = registry.resolve(Path::new("/repo/app.config.ini")).err().unwrap();
        assert!(matches!(err, ConfsearchError::NoLoader { .. }));
    }

    #[test]
    fn unknown_extension_with_fallback_resolves() {
        // The registry-wide fallback catches anything, matching the behavior
        // of rc-style files whose extension is part of the name.
        let registry = LoaderRegistry::with_defaults();
        assert!(registry.resolve(Path::new("/repo/app.config.ini")).is_ok());
    }

    #[tokio::test]
    async fn async_load_delegates_to_sync() {
        let value = JsonLoader
            .load(Path::new("/t/.apprc.json"), r#"{"ok": true}"#)
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
    }
}
