//! Shared, file-backed cache of the reference datasets.
//!
//! Datasets are JSON files under the configured data directory. They are
//! parsed on first use and kept in memory until the file's modification time
//! changes, so editing a dataset on disk is picked up without a restart.
//!
//! The cache is injected into the Actix application as `web::Data` in
//! `main.rs` and read by both the dataset endpoint and the search endpoint.

use common::error::SourceError;
use log::{debug, info};
use serde_json::Value;
use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};
use tokio::sync::RwLock;

#[derive(Debug)]
struct CachedDataset {
    modified: SystemTime,
    payload: Arc<Value>,
}

/// A thread-safe, shareable cache of parsed datasets.
#[derive(Clone)]
pub struct DatasetCache {
    root: Arc<PathBuf>,
    /// Absolute dataset path to its last parsed content.
    ///
    /// Read by every search, written only on a miss or a changed file.
    entries: Arc<RwLock<HashMap<PathBuf, CachedDataset>>>,
}

impl DatasetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Maps a dataset path to a file under the data directory.
    ///
    /// Only plain path segments are accepted: `..`, absolute paths and drive
    /// prefixes yield `None`.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative.trim_start_matches('/'));
        let mut resolved = self.root.as_ref().clone();
        let mut segments = 0;
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    segments += 1;
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        (segments > 0).then_some(resolved)
    }

    /// Returns the parsed content of a dataset, reading the file when it is
    /// not cached yet or changed since.
    pub async fn load(&self, relative: &str) -> Result<Arc<Value>, SourceError> {
        let fetch_failed = |reason: String| SourceError::FetchFailed {
            path: relative.to_string(),
            reason,
        };

        let path = self
            .resolve(relative)
            .ok_or_else(|| fetch_failed("invalid dataset path".to_string()))?;
        let modified = tokio::fs::metadata(&path)
            .await
            .and_then(|metadata| metadata.modified())
            .map_err(|e| fetch_failed(e.to_string()))?;

        {
            let entries = self.entries.read().await;
            if let Some(cached) = entries.get(&path) {
                if cached.modified == modified {
                    debug!("Dataset cache hit for {}", path.display());
                    return Ok(cached.payload.clone());
                }
            }
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;
        let payload: Value =
            serde_json::from_slice(&bytes).map_err(|e| fetch_failed(e.to_string()))?;
        let payload = Arc::new(payload);

        info!("Loaded dataset {}", path.display());
        let mut entries = self.entries.write().await;
        entries.insert(
            path,
            CachedDataset {
                modified,
                payload: payload.clone(),
            },
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_rejects_traversal() {
        let cache = DatasetCache::new("/srv/data");
        assert_eq!(
            cache.resolve("srd/conditions.json"),
            Some(PathBuf::from("/srv/data/srd/conditions.json"))
        );
        assert_eq!(
            cache.resolve("/conditions.json"),
            Some(PathBuf::from("/srv/data/conditions.json"))
        );
        assert_eq!(cache.resolve("../secret.json"), None);
        assert_eq!(cache.resolve("srd/../../secret.json"), None);
        assert_eq!(cache.resolve(""), None);
    }

    #[actix_web::test]
    async fn test_load_parses_and_caches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("conditions.json"), r#"[{"index": "blinded"}]"#).unwrap();
        let cache = DatasetCache::new(dir.path());

        let first = cache.load("conditions.json").await.unwrap();
        let second = cache.load("conditions.json").await.unwrap();
        assert_eq!(*first, json!([{"index": "blinded"}]));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[actix_web::test]
    async fn test_load_failures_name_the_dataset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "[{").unwrap();
        let cache = DatasetCache::new(dir.path());

        for path in ["missing.json", "broken.json", "../escape.json"] {
            match cache.load(path).await {
                Err(SourceError::FetchFailed { path: failed, .. }) => assert_eq!(failed, path),
                other => panic!("unexpected result for {path}: {other:?}"),
            }
        }
    }
}
