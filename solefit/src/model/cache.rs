//! The model cache: keyed entries, in-flight de-duplication, fallback
//! substitution.
//!
//! # Invariants
//!
//! - At most one underlying fetch per identifier at any time; concurrent
//!   callers of [`ModelCache::load`] for the same id share the pending
//!   result.
//! - A cached entry is returned without touching the network unless the
//!   caller forces a reload.
//! - A failed load resolves to the fallback entry; it never propagates to
//!   the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::telemetry::EngineMetrics;

use super::entry::{LoadState, ModelEntry, ModelId, ModelInfo};
use super::fallback::fallback_scene;
use super::fetch::AssetFetcher;
use super::{gltf, process, ModelError};

/// Advisory asset size limit; larger assets are logged, never rejected.
pub const DEFAULT_MAX_ASSET_BYTES: u64 = 5 * 1024 * 1024;

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct ModelCacheConfig {
    /// Base URL the asset paths `models/<id>.glb` are resolved against.
    pub base_url: String,
    /// Advisory size limit for the HEAD probe.
    pub max_asset_bytes: u64,
}

impl ModelCacheConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_asset_bytes: DEFAULT_MAX_ASSET_BYTES,
        }
    }
}

/// Per-identifier slot: resolves exactly once per (re)load cycle.
type Slot = Arc<OnceCell<Arc<ModelEntry>>>;

/// Asynchronous, de-duplicating model cache.
///
/// Shared as `Arc<ModelCache>`; all methods take `&self` and are safe to
/// call from any task.
pub struct ModelCache {
    config: ModelCacheConfig,
    fetcher: Arc<dyn AssetFetcher>,
    slots: DashMap<ModelId, Slot>,
    metrics: Arc<EngineMetrics>,
    disposed: AtomicBool,
}

impl ModelCache {
    pub fn new(
        config: ModelCacheConfig,
        fetcher: Arc<dyn AssetFetcher>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            config,
            fetcher,
            slots: DashMap::new(),
            metrics,
            disposed: AtomicBool::new(false),
        }
    }

    /// URL the given model id resolves to.
    pub fn asset_url(&self, id: &ModelId) -> String {
        format!("{}/models/{}.glb", self.config.base_url.trim_end_matches('/'), id)
    }

    /// Load a model, returning the cached entry when present.
    ///
    /// Suspends until resolution. Never fails: a load error resolves to the
    /// fallback entry with `is_fallback == true`.
    pub async fn load(&self, id: &ModelId) -> Arc<ModelEntry> {
        self.load_with(id, false).await
    }

    /// [`ModelCache::load`] with an explicit reload, bypassing the cache.
    pub async fn load_with(&self, id: &ModelId, force_reload: bool) -> Arc<ModelEntry> {
        if force_reload {
            self.slots.insert(id.clone(), Arc::new(OnceCell::new()));
        }

        let slot = self.slot(id);
        if let Some(entry) = slot.get() {
            self.metrics.cache_hit();
            return Arc::clone(entry);
        }

        let entry = slot
            .get_or_init(|| async {
                let entry = self.load_uncached(id).await;
                self.metrics.model_loaded(entry.is_fallback);
                Arc::new(entry)
            })
            .await;
        Arc::clone(entry)
    }

    /// Warm the cache for a set of models.
    ///
    /// Loads run concurrently; per-id failures are absorbed into fallback
    /// entries like any other load.
    pub async fn preload(&self, ids: &[ModelId]) {
        let loads = ids.iter().map(|id| self.load(id));
        futures::future::join_all(loads).await;
        debug!(count = ids.len(), "model preloading completed");
    }

    /// Observable load state for an identifier.
    pub fn state(&self, id: &ModelId) -> LoadState {
        match self.slots.get(id) {
            None => LoadState::NotRequested,
            Some(slot) => match slot.get() {
                None => LoadState::Loading,
                Some(entry) if entry.is_fallback => LoadState::Fallback,
                Some(_) => LoadState::Loaded,
            },
        }
    }

    /// Summary of one resolved entry, if present.
    pub fn info(&self, id: &ModelId) -> Option<ModelInfo> {
        self.slots
            .get(id)
            .and_then(|slot| slot.get().map(|entry| entry.info()))
    }

    /// Summaries of every resolved entry.
    pub fn info_all(&self) -> Vec<ModelInfo> {
        self.slots
            .iter()
            .filter_map(|kv| kv.value().get().map(|entry| entry.info()))
            .collect()
    }

    /// Number of identifiers with a requested load (pending or resolved).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every cached entry and pending slot.
    ///
    /// Entry resources are released when the last outstanding reference
    /// drops. Safe to call once at shutdown; loads after disposal resolve
    /// to fallback entries without touching the network.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.slots.clear();
        debug!("model cache disposed");
    }

    fn slot(&self, id: &ModelId) -> Slot {
        let slot = self
            .slots
            .entry(id.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        Arc::clone(slot.value())
    }

    async fn load_uncached(&self, id: &ModelId) -> ModelEntry {
        if self.disposed.load(Ordering::SeqCst) {
            warn!(model = %id, "load after dispose, substituting fallback");
            return process::finish(id.clone(), fallback_scene(), true);
        }
        match self.try_load(id).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(model = %id, error = %err, "model load failed, substituting fallback");
                process::finish(id.clone(), fallback_scene(), true)
            }
        }
    }

    /// The fallible load pipeline: probe, fetch, read, post-process.
    async fn try_load(&self, id: &ModelId) -> Result<ModelEntry, ModelError> {
        let url = self.asset_url(id);

        let probe = self.fetcher.probe(&url).await?;
        if !probe.exists {
            return Err(ModelError::NotFound(url));
        }
        if let Some(size) = probe.size {
            if size > self.config.max_asset_bytes {
                warn!(
                    model = %id,
                    size_bytes = size,
                    limit_bytes = self.config.max_asset_bytes,
                    "model asset exceeds advisory size limit"
                );
            }
        }

        let bytes = self.fetcher.fetch(&url).await?;
        let scene = gltf::read_scene(&bytes)?;
        let entry = process::finish(id.clone(), scene, false);
        debug!(
            model = %id,
            triangles = entry.triangle_count,
            bytes = bytes.len(),
            "model loaded"
        );
        Ok(entry)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::fetch::{AssetProbe, BoxFuture, FetchError};
    use bytes::Bytes;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Mock transport: canned responses, counted calls, optional delay.
    pub(crate) struct MockFetcher {
        pub response: Result<Bytes, FetchError>,
        pub exists: bool,
        pub size: Option<u64>,
        pub delay: Duration,
        pub probes: AtomicUsize,
        pub fetches: AtomicUsize,
    }

    impl MockFetcher {
        pub fn serving(bytes: Vec<u8>) -> Self {
            Self {
                response: Ok(Bytes::from(bytes)),
                exists: true,
                size: None,
                delay: Duration::ZERO,
                probes: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: Err(FetchError::Transport {
                    url: "mock".into(),
                    reason: "connection reset".into(),
                }),
                ..Self::serving(Vec::new())
            }
        }

        pub fn missing() -> Self {
            Self {
                exists: false,
                ..Self::serving(Vec::new())
            }
        }
    }

    impl AssetFetcher for MockFetcher {
        fn probe<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<AssetProbe, FetchError>> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(AssetProbe {
                    exists: self.exists,
                    size: self.size,
                })
            })
        }

        fn fetch<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<Bytes, FetchError>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                self.response.clone()
            })
        }
    }

    fn cache_with(fetcher: MockFetcher) -> (ModelCache, Arc<EngineMetrics>) {
        let metrics = Arc::new(EngineMetrics::new());
        let cache = ModelCache::new(
            ModelCacheConfig::new("http://assets.test"),
            Arc::new(fetcher),
            Arc::clone(&metrics),
        );
        (cache, metrics)
    }

    #[test]
    fn test_asset_url_strips_trailing_slash() {
        let (cache, _) = cache_with(MockFetcher::missing());
        let cache = ModelCache {
            config: ModelCacheConfig::new("http://assets.test/"),
            ..cache
        };
        assert_eq!(cache.asset_url(&ModelId::new("7")), "http://assets.test/models/7.glb");
    }

    #[tokio::test]
    async fn test_failed_fetch_resolves_to_fallback() {
        let (cache, metrics) = cache_with(MockFetcher::failing());
        let entry = cache.load(&ModelId::new("1")).await;
        assert!(entry.is_fallback);
        assert!(entry.triangle_count > 0);
        assert_eq!(cache.state(&ModelId::new("1")), LoadState::Fallback);
        assert_eq!(metrics.snapshot().fallbacks, 1);
    }

    #[tokio::test]
    async fn test_missing_asset_resolves_to_fallback() {
        let (cache, _) = cache_with(MockFetcher::missing());
        let entry = cache.load(&ModelId::new("1")).await;
        assert!(entry.is_fallback);
    }

    #[tokio::test]
    async fn test_malformed_asset_resolves_to_fallback() {
        let (cache, _) = cache_with(MockFetcher::serving(b"not a glb".to_vec()));
        let entry = cache.load(&ModelId::new("1")).await;
        assert!(entry.is_fallback);
    }

    #[tokio::test]
    async fn test_state_machine_progression() {
        let (cache, _) = cache_with(MockFetcher::missing());
        let id = ModelId::new("9");
        assert_eq!(cache.state(&id), LoadState::NotRequested);
        cache.load(&id).await;
        assert_eq!(cache.state(&id), LoadState::Fallback);
    }
}
