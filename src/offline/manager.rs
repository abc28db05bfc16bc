use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::network::Network;
use super::storage::{CachedResponse, CacheStorage};
use super::OfflineError;

// ============================================================================
// Constants
// ============================================================================

/// Versioned precache namespace. Bump the version to force-invalidate
/// all precached assets on the next install.
const CACHE_NAME: &str = "fleetbook-v4";

/// Namespace that accumulates responses fetched lazily during use.
const RUNTIME: &str = "runtime";

/// External hosts whose assets the pipeline is allowed to intercept.
/// Matched by substring, same as the pinned CDN URLs they cover.
const EXTERNAL_ASSET_HOSTS: &[&str] = &[
    "aistudiocdn.com",
    "cdn.tailwindcss.com",
    "lucide-react",
    "cdn.sheetjs.com",
    "cdn-icons-png.flaticon.com",
];

/// Maximum concurrent fetches during precache installation.
const MAX_CONCURRENT_PRECACHE: usize = 4;

/// Served when the network is down and nothing is cached, instead of
/// leaving the request unresolved.
const OFFLINE_FALLBACK_HTML: &str =
    "<!doctype html><html><body><h1>Offline</h1><p>This resource is not available \
     without a network connection.</p></body></html>";

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_name: String,
    pub runtime_name: String,
    pub origin: String,
    pub precache_urls: Vec<String>,
    pub allowed_hosts: Vec<String>,
}

impl CacheConfig {
    /// Standard configuration: application shell plus pinned third-party
    /// assets, all resolved against the given origin.
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/').to_string();
        Self {
            cache_name: CACHE_NAME.to_string(),
            runtime_name: RUNTIME.to_string(),
            precache_urls: vec![
                format!("{}/", origin),
                format!("{}/index.html", origin),
                format!("{}/manifest.json", origin),
                "https://cdn.tailwindcss.com".to_string(),
                "https://cdn-icons-png.flaticon.com/512/2382/2382533.png".to_string(),
            ],
            allowed_hosts: EXTERNAL_ASSET_HOSTS.iter().map(|h| h.to_string()).collect(),
            origin,
        }
    }
}

/// How the pipeline answered one intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not same-origin and not on the external allow-list; the request
    /// is not intercepted at all.
    PassThrough,
    /// Served from either namespace without touching the network.
    Cached(CachedResponse),
    /// Fetched from the network (and stored in the runtime namespace
    /// when the response was cacheable).
    Fetched(CachedResponse),
    /// Network failed with nothing cached; explicit offline placeholder.
    Fallback(CachedResponse),
}

/// Offline cache manager: precache installation, stale-namespace cleanup,
/// and the per-request pipeline (match, cache lookup, network fallback,
/// populate). Storage and network are injected so each stage is testable.
pub struct OfflineCacheManager<S: CacheStorage, N: Network> {
    config: CacheConfig,
    storage: S,
    network: N,
}

impl<S: CacheStorage, N: Network> OfflineCacheManager<S, N> {
    pub fn new(config: CacheConfig, storage: S, network: N) -> Self {
        Self {
            config,
            storage,
            network,
        }
    }

    /// Fetch and store every precache URL. All fetches must succeed with
    /// a cacheable response before anything is written, so a failed
    /// install leaves the versioned namespace unpopulated and any
    /// previously active version untouched.
    pub async fn install(&mut self) -> Result<(), OfflineError> {
        info!(
            cache = %self.config.cache_name,
            count = self.config.precache_urls.len(),
            "Installing precache"
        );

        let network = &self.network;
        let mut fetches = stream::iter(self.config.precache_urls.clone())
            .map(move |url| async move {
                let result = network.fetch(&url).await;
                (url, result)
            })
            .buffer_unordered(MAX_CONCURRENT_PRECACHE);

        let mut responses = Vec::new();
        while let Some((url, result)) = fetches.next().await {
            match result {
                Ok(response) if response.is_cacheable() => responses.push(response),
                Ok(response) => {
                    return Err(OfflineError::PrecacheFailed {
                        url,
                        reason: format!("status {}", response.status),
                    })
                }
                Err(e) => {
                    return Err(OfflineError::PrecacheFailed {
                        url,
                        reason: e.to_string(),
                    })
                }
            }
        }
        drop(fetches);

        for response in responses {
            self.storage
                .put(&self.config.cache_name, response.into_cached())?;
        }
        info!(cache = %self.config.cache_name, "Precache installed");
        Ok(())
    }

    /// Upgrade cleanup: delete every namespace that is neither the
    /// current versioned one nor the runtime one. Idempotent.
    pub fn activate(&mut self) -> Result<(), OfflineError> {
        let keep = [
            self.config.cache_name.clone(),
            self.config.runtime_name.clone(),
        ];
        for namespace in self.storage.list_namespaces()? {
            if !keep.contains(&namespace) {
                info!(namespace = %namespace, "Deleting stale cache namespace");
                self.storage.delete_namespace(&namespace)?;
            }
        }
        Ok(())
    }

    /// Run one outgoing request through the pipeline.
    pub async fn handle(&mut self, url: &str) -> Result<FetchOutcome, OfflineError> {
        if !self.intercepts(url) {
            return Ok(FetchOutcome::PassThrough);
        }

        // Cache-first: a hit in either namespace means no network attempt.
        if let Some(hit) = self.lookup(url)? {
            debug!(url, "Serving from cache");
            return Ok(FetchOutcome::Cached(hit));
        }

        match self.network.fetch(url).await {
            Ok(response) => {
                let cacheable = response.is_cacheable();
                let cached = response.into_cached();
                if cacheable {
                    self.storage
                        .put(&self.config.runtime_name, cached.clone())?;
                    debug!(url, "Stored network response in runtime cache");
                }
                Ok(FetchOutcome::Fetched(cached))
            }
            Err(e) => {
                warn!(url, error = %e, "Network failed with no cached entry, serving offline fallback");
                Ok(FetchOutcome::Fallback(offline_fallback(url)))
            }
        }
    }

    /// Match stage: only same-origin requests or URLs on the external
    /// asset allow-list are intercepted.
    fn intercepts(&self, url: &str) -> bool {
        url.starts_with(&self.config.origin)
            || self.config.allowed_hosts.iter().any(|h| url.contains(h.as_str()))
    }

    /// Unified lookup across the versioned and runtime namespaces.
    fn lookup(&self, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        for namespace in [&self.config.cache_name, &self.config.runtime_name] {
            if let Some(hit) = self.storage.get(namespace, url)? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

fn offline_fallback(url: &str) -> CachedResponse {
    CachedResponse {
        url: url.to_string(),
        status: 503,
        content_type: Some("text/html".to_string()),
        body: OFFLINE_FALLBACK_HTML.as_bytes().to_vec(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::network::{FetchedResponse, ResponseKind};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ORIGIN: &str = "https://fleet.example";

    /// In-memory CacheStorage fake.
    #[derive(Default)]
    struct MemoryStorage {
        namespaces: HashMap<String, HashMap<String, CachedResponse>>,
    }

    impl MemoryStorage {
        fn entries(&self, namespace: &str) -> usize {
            self.namespaces.get(namespace).map_or(0, |m| m.len())
        }
    }

    impl CacheStorage for MemoryStorage {
        fn list_namespaces(&self) -> Result<Vec<String>, OfflineError> {
            let mut names: Vec<String> = self.namespaces.keys().cloned().collect();
            names.sort();
            Ok(names)
        }

        fn delete_namespace(&mut self, namespace: &str) -> Result<(), OfflineError> {
            self.namespaces.remove(namespace);
            Ok(())
        }

        fn get(&self, namespace: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
            Ok(self
                .namespaces
                .get(namespace)
                .and_then(|m| m.get(url))
                .cloned())
        }

        fn put(&mut self, namespace: &str, response: CachedResponse) -> Result<(), OfflineError> {
            self.namespaces
                .entry(namespace.to_string())
                .or_default()
                .insert(response.url.clone(), response);
            Ok(())
        }
    }

    /// Network fake with a call counter; URLs without a canned response
    /// behave as unreachable (offline).
    #[derive(Default)]
    struct FakeNetwork {
        responses: HashMap<String, FetchedResponse>,
        calls: AtomicUsize,
    }

    impl FakeNetwork {
        fn with_response(mut self, response: FetchedResponse) -> Self {
            self.responses.insert(response.url.clone(), response);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Network for FakeNetwork {
        async fn fetch(&self, url: &str) -> Result<FetchedResponse, OfflineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.get(url).cloned().ok_or_else(|| {
                OfflineError::Storage(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "offline",
                ))
            })
        }
    }

    fn ok_response(url: &str, body: &[u8]) -> FetchedResponse {
        let kind = if url.starts_with(ORIGIN) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };
        FetchedResponse {
            url: url.to_string(),
            status: 200,
            kind,
            content_type: Some("text/html".to_string()),
            body: body.to_vec(),
        }
    }

    fn shell_config() -> CacheConfig {
        let mut config = CacheConfig::for_origin(ORIGIN);
        config.precache_urls = vec![
            format!("{}/", ORIGIN),
            format!("{}/index.html", ORIGIN),
        ];
        config
    }

    fn shell_network() -> FakeNetwork {
        FakeNetwork::default()
            .with_response(ok_response(&format!("{}/", ORIGIN), b"<shell>"))
            .with_response(ok_response(&format!("{}/index.html", ORIGIN), b"<index>"))
    }

    #[tokio::test]
    async fn test_install_populates_versioned_namespace() {
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), shell_network());
        manager.install().await.unwrap();

        assert_eq!(manager.storage.entries(CACHE_NAME), 2);
        let hit = manager
            .storage
            .get(CACHE_NAME, &format!("{}/index.html", ORIGIN))
            .unwrap()
            .unwrap();
        assert_eq!(hit.body, b"<index>");
    }

    #[tokio::test]
    async fn test_install_is_atomic_on_fetch_failure() {
        // './index.html' returns 404: the whole install fails and the
        // versioned namespace stays unpopulated.
        let index_url = format!("{}/index.html", ORIGIN);
        let mut not_found = ok_response(&index_url, b"gone");
        not_found.status = 404;
        let network = FakeNetwork::default()
            .with_response(ok_response(&format!("{}/", ORIGIN), b"<shell>"))
            .with_response(not_found);

        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);
        let err = manager.install().await.unwrap_err();

        assert!(matches!(err, OfflineError::PrecacheFailed { .. }));
        assert_eq!(manager.storage.entries(CACHE_NAME), 0);
    }

    #[tokio::test]
    async fn test_install_fails_when_a_url_is_unreachable() {
        // Only one of the two precache URLs resolves
        let network =
            FakeNetwork::default().with_response(ok_response(&format!("{}/", ORIGIN), b"<shell>"));
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);

        assert!(manager.install().await.is_err());
        assert_eq!(manager.storage.entries(CACHE_NAME), 0);
    }

    #[tokio::test]
    async fn test_repeated_install_is_idempotent() {
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), shell_network());
        manager.install().await.unwrap();
        let first: Vec<_> = {
            let ns = manager.storage.namespaces.get(CACHE_NAME).unwrap();
            let mut entries: Vec<_> = ns.values().cloned().collect();
            entries.sort_by(|a, b| a.url.cmp(&b.url));
            entries
        };

        manager.install().await.unwrap();
        let second: Vec<_> = {
            let ns = manager.storage.namespaces.get(CACHE_NAME).unwrap();
            let mut entries: Vec<_> = ns.values().cloned().collect();
            entries.sort_by(|a, b| a.url.cmp(&b.url));
            entries
        };

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_activate_deletes_stale_namespaces_only() {
        let mut storage = MemoryStorage::default();
        for namespace in ["fleetbook-v2", "fleetbook-v3", CACHE_NAME, RUNTIME] {
            storage
                .put(namespace, offline_fallback("https://x/"))
                .unwrap();
        }
        let mut manager =
            OfflineCacheManager::new(shell_config(), storage, FakeNetwork::default());

        manager.activate().unwrap();
        assert_eq!(
            manager.storage.list_namespaces().unwrap(),
            vec![CACHE_NAME.to_string(), RUNTIME.to_string()]
        );

        // Idempotent
        manager.activate().unwrap();
        assert_eq!(manager.storage.list_namespaces().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cache_first_makes_no_network_call() {
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), shell_network());
        manager.install().await.unwrap();
        let calls_after_install = manager.network.calls();

        let outcome = manager.handle(&format!("{}/index.html", ORIGIN)).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Cached(_)));
        assert_eq!(manager.network.calls(), calls_after_install);
    }

    #[tokio::test]
    async fn test_unmatched_request_passes_through() {
        let mut manager = OfflineCacheManager::new(
            shell_config(),
            MemoryStorage::default(),
            FakeNetwork::default(),
        );

        let outcome = manager
            .handle("https://tracker.example/analytics.js")
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::PassThrough);
        assert_eq!(manager.network.calls(), 0);
    }

    #[tokio::test]
    async fn test_allow_listed_host_is_intercepted() {
        let url = "https://cdn.tailwindcss.com";
        let network = FakeNetwork::default().with_response(ok_response(url, b"css"));
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);

        let outcome = manager.handle(url).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Fetched(_)));
    }

    #[tokio::test]
    async fn test_miss_populates_runtime_then_serves_cached() {
        let url = format!("{}/icons/later-added.png", ORIGIN);
        let network = FakeNetwork::default().with_response(ok_response(&url, b"png"));
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);

        let first = manager.handle(&url).await.unwrap();
        assert!(matches!(first, FetchOutcome::Fetched(_)));
        assert_eq!(manager.storage.entries(RUNTIME), 1);
        assert_eq!(manager.network.calls(), 1);

        let second = manager.handle(&url).await.unwrap();
        assert!(matches!(second, FetchOutcome::Cached(_)));
        assert_eq!(manager.network.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_cacheable_response_is_returned_but_not_stored() {
        let url = format!("{}/missing.png", ORIGIN);
        let mut not_found = ok_response(&url, b"nope");
        not_found.status = 404;
        let network = FakeNetwork::default().with_response(not_found);
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);

        let outcome = manager.handle(&url).await.unwrap();
        match outcome {
            FetchOutcome::Fetched(r) => assert_eq!(r.status, 404),
            other => panic!("expected fetched response, got {:?}", other),
        }
        assert_eq!(manager.storage.entries(RUNTIME), 0);

        // Next request goes back to the network
        manager.handle(&url).await.unwrap();
        assert_eq!(manager.network.calls(), 2);
    }

    #[tokio::test]
    async fn test_opaque_response_is_not_stored() {
        let url = "https://cdn-icons-png.flaticon.com/512/2382/2382533.png";
        let mut opaque = ok_response(url, b"icon");
        opaque.kind = ResponseKind::Opaque;
        let network = FakeNetwork::default().with_response(opaque);
        let mut manager =
            OfflineCacheManager::new(shell_config(), MemoryStorage::default(), network);

        manager.handle(url).await.unwrap();
        assert_eq!(manager.storage.entries(RUNTIME), 0);
    }

    #[tokio::test]
    async fn test_offline_with_no_cache_serves_fallback() {
        let mut manager = OfflineCacheManager::new(
            shell_config(),
            MemoryStorage::default(),
            FakeNetwork::default(),
        );

        let outcome = manager.handle(&format!("{}/app.js", ORIGIN)).await.unwrap();
        let response = match outcome {
            FetchOutcome::Fallback(r) => r,
            other => panic!("expected fallback, got {:?}", other),
        };
        assert_eq!(response.status, 503);
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
    }
}
