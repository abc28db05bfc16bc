use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::OfflineError;

/// A stored response, keyed by request URL within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    #[serde(rename = "contentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Namespaced response cache. Namespaces are append/delete-only: entries
/// are put and looked up by URL, and whole namespaces are dropped during
/// upgrade cleanup. The platform guarantees each call is atomic; there is
/// no cross-call locking.
pub trait CacheStorage {
    fn list_namespaces(&self) -> Result<Vec<String>, OfflineError>;
    fn delete_namespace(&mut self, namespace: &str) -> Result<(), OfflineError>;
    fn get(&self, namespace: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError>;
    fn put(&mut self, namespace: &str, response: CachedResponse) -> Result<(), OfflineError>;
}

/// Disk-backed storage: one JSON file per namespace under the cache
/// directory, holding a URL-keyed map of responses.
pub struct DiskCacheStorage {
    cache_dir: PathBuf,
}

impl DiskCacheStorage {
    pub fn new(cache_dir: PathBuf) -> Result<Self, OfflineError> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", namespace))
    }

    fn load_namespace(
        &self,
        namespace: &str,
    ) -> Result<BTreeMap<String, CachedResponse>, OfflineError> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_namespace(
        &self,
        namespace: &str,
        entries: &BTreeMap<String, CachedResponse>,
    ) -> Result<(), OfflineError> {
        let contents = serde_json::to_string(entries)?;
        std::fs::write(self.namespace_path(namespace), contents)?;
        Ok(())
    }
}

impl CacheStorage for DiskCacheStorage {
    fn list_namespaces(&self) -> Result<Vec<String>, OfflineError> {
        let mut namespaces = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    namespaces.push(stem.to_string());
                }
            }
        }
        namespaces.sort();
        Ok(namespaces)
    }

    fn delete_namespace(&mut self, namespace: &str) -> Result<(), OfflineError> {
        let path = self.namespace_path(namespace);
        if path.exists() {
            std::fs::remove_file(path)?;
            debug!(namespace, "Deleted cache namespace");
        }
        Ok(())
    }

    fn get(&self, namespace: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        Ok(self.load_namespace(namespace)?.remove(url))
    }

    fn put(&mut self, namespace: &str, response: CachedResponse) -> Result<(), OfflineError> {
        let mut entries = self.load_namespace(namespace)?;
        entries.insert(response.url.clone(), response);
        self.save_namespace(namespace, &entries)
    }
}
