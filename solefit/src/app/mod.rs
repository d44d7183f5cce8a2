//! Engine context and lifecycle.
//!
//! [`SoleFitEngine`] is the explicitly constructed context object that owns
//! every component: the capability profile fixed at startup, the
//! performance controller and its periodic reassessment task, the model
//! cache, the foot tracker, and the shared telemetry. Nothing in the
//! engine is ambient global state; create it at startup, share it as
//! `Arc<SoleFitEngine>`, and call [`SoleFitEngine::shutdown`] once at exit.
//!
//! # Example
//!
//! ```ignore
//! use solefit::{AppConfig, SoleFitEngine};
//! use solefit::platform::EnvSnapshot;
//!
//! let engine = SoleFitEngine::start(AppConfig::default(), &EnvSnapshot::new(ua)).await?;
//! let model = engine.load_model(&"1".into()).await;
//! // render loop: engine.record_frame(dt); engine.update_tracking(&frame);
//! engine.shutdown().await;
//! ```

mod error;

pub use error::AppError;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::AppConfig;
use crate::model::scene::Transform;
use crate::model::{
    AssetFetcher, HttpAssetFetcher, ModelCache, ModelCacheConfig, ModelEntry, ModelId,
};
use crate::perf::PerfController;
use crate::platform::{detect, CapabilityProfile, RuntimeEnv};
use crate::quality::{QualitySettings, QualityTier, TrackerSettings};
use crate::telemetry::{EngineMetrics, TelemetrySnapshot};
use crate::track::{FootPlacement, FootTracker, FootTrackerConfig, PoseFrame};

/// The AR try-on engine.
///
/// All methods take `&self`; the engine is shared across tasks as
/// `Arc<SoleFitEngine>`.
pub struct SoleFitEngine {
    profile: CapabilityProfile,
    config: AppConfig,
    perf: Arc<PerfController>,
    cache: Arc<ModelCache>,
    tracker: Mutex<FootTracker>,
    metrics: Arc<EngineMetrics>,
    cancel: CancellationToken,
    reassess_task: Mutex<Option<JoinHandle<()>>>,
}

impl SoleFitEngine {
    /// Probe the environment and start every component.
    ///
    /// Must be called from within a Tokio runtime; the periodic
    /// reassessment task is spawned here. Model preloading is kicked off
    /// in the background and does not delay startup.
    pub async fn start(config: AppConfig, env: &dyn RuntimeEnv) -> Result<Arc<Self>, AppError> {
        let fetcher: Arc<dyn AssetFetcher> =
            Arc::new(HttpAssetFetcher::with_timeout(config.fetch_timeout)?);
        Self::start_with_fetcher(config, env, fetcher).await
    }

    /// [`SoleFitEngine::start`] with an injected transport, for tests and
    /// non-HTTP asset sources.
    pub async fn start_with_fetcher(
        config: AppConfig,
        env: &dyn RuntimeEnv,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Result<Arc<Self>, AppError> {
        let profile = detect(env);
        let metrics = Arc::new(EngineMetrics::new());

        let cache_config = ModelCacheConfig {
            base_url: config.asset_base_url.clone(),
            max_asset_bytes: config.max_asset_bytes,
        };
        let cache = Arc::new(ModelCache::new(cache_config, fetcher, Arc::clone(&metrics)));

        let perf = Arc::new(PerfController::from_profile(&profile, Arc::clone(&metrics)));
        let tracker = FootTracker::new(FootTrackerConfig {
            confidence_threshold: config.confidence_threshold,
            ..FootTrackerConfig::default()
        });

        let cancel = CancellationToken::new();
        let reassess_task =
            Arc::clone(&perf).spawn_reassess(config.reassess_interval, cancel.clone());

        info!(
            device = ?profile.device,
            tier = %profile.performance_tier,
            mode = %profile.recommended_mode,
            "engine started"
        );

        let engine = Arc::new(Self {
            profile,
            config,
            perf,
            cache,
            tracker: Mutex::new(tracker),
            metrics,
            cancel,
            reassess_task: Mutex::new(Some(reassess_task)),
        });

        if !engine.config.preload_models.is_empty() {
            let preloader = Arc::clone(&engine);
            tokio::spawn(async move {
                let ids = preloader.config.preload_models.clone();
                preloader.cache.preload(&ids).await;
            });
        }

        Ok(engine)
    }

    /// The capability profile fixed at startup.
    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// The model cache.
    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Load (or fetch from cache) a model.
    pub async fn load_model(&self, id: &ModelId) -> Arc<ModelEntry> {
        self.cache.load(id).await
    }

    /// Record one rendered frame's duration.
    pub fn record_frame(&self, duration: Duration) {
        self.perf.record_frame(duration);
    }

    /// Current quality tier.
    pub fn tier(&self) -> QualityTier {
        self.perf.tier()
    }

    /// Subscribe to quality tier changes.
    pub fn subscribe_tier(&self) -> watch::Receiver<QualityTier> {
        self.perf.subscribe()
    }

    /// Current frame rate implied by recorded frames.
    pub fn current_fps(&self) -> f64 {
        self.perf.current_fps()
    }

    /// Rendering parameters for the current tier.
    pub fn quality_settings(&self) -> QualitySettings {
        QualitySettings::for_tier(self.tier())
    }

    /// Tracking cadence and confidence floors for the current tier.
    ///
    /// The configured interval is the full-quality cadence; the low tier
    /// processes landmarks half as often.
    pub fn tracker_settings(&self) -> TrackerSettings {
        let mut settings = TrackerSettings::for_tier(self.tier());
        settings.interval = if self.tier() == QualityTier::Low {
            self.config.tracking_interval * 2
        } else {
            self.config.tracking_interval
        };
        settings
    }

    /// Feed one frame of pose landmarks through the foot tracker.
    pub fn update_tracking(&self, frame: &PoseFrame) -> Option<FootPlacement> {
        let mut tracker = self.tracker.lock();
        match tracker.update(frame) {
            Some(placement) => {
                self.metrics.tracking_update(!tracker.is_confident());
                Some(placement)
            }
            None => {
                self.metrics.tracking_skipped();
                None
            }
        }
    }

    /// The transform to apply to the held model instance.
    pub fn model_transform(&self) -> Transform {
        self.tracker.lock().model_transform()
    }

    /// Point-in-time telemetry.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.metrics.snapshot()
    }

    /// Stop the periodic task and dispose the cache.
    ///
    /// Safe to call once at shutdown.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.reassess_task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
        self.cache.dispose();
        info!("engine stopped");
    }
}
