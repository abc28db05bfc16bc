//! Offline cache management.
//!
//! This module makes the application shell usable without network
//! connectivity. A versioned precache namespace holds the fixed asset
//! list fetched at install time; a runtime namespace accumulates
//! responses fetched lazily during use. Each outgoing request runs
//! through an explicit pipeline: match, cache lookup, network fallback,
//! populate. Storage and network are trait seams so the pipeline can be
//! exercised with fakes.

pub mod error;
pub mod manager;
pub mod network;
pub mod storage;

pub use error::OfflineError;
pub use manager::{CacheConfig, FetchOutcome, OfflineCacheManager};
pub use network::{FetchedResponse, HttpNetwork, Network, ResponseKind};
pub use storage::{CachedResponse, CacheStorage, DiskCacheStorage};
