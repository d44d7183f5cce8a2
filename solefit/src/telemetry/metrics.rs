//! Atomic counter set shared across engine components.

use std::sync::atomic::{AtomicU64, Ordering};

use super::snapshot::TelemetrySnapshot;

/// Lock-free event counters.
///
/// Shared as `Arc<EngineMetrics>` between the performance controller, the
/// model cache, and the engine context. All updates use relaxed ordering -
/// counts are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    frames: AtomicU64,
    reassessments: AtomicU64,
    tier_raises: AtomicU64,
    tier_drops: AtomicU64,
    model_loads: AtomicU64,
    cache_hits: AtomicU64,
    fallbacks: AtomicU64,
    tracking_updates: AtomicU64,
    tracking_gated: AtomicU64,
    tracking_skipped: AtomicU64,
}

impl EngineMetrics {
    /// Create a counter set with all counts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame duration was recorded.
    pub fn frame_recorded(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    /// A periodic reassessment ran.
    pub fn reassessed(&self) {
        self.reassessments.fetch_add(1, Ordering::Relaxed);
    }

    /// The quality tier moved up.
    pub fn tier_raised(&self) {
        self.tier_raises.fetch_add(1, Ordering::Relaxed);
    }

    /// The quality tier moved down.
    pub fn tier_dropped(&self) {
        self.tier_drops.fetch_add(1, Ordering::Relaxed);
    }

    /// A model load resolved; `fallback` marks a substituted entry.
    pub fn model_loaded(&self, fallback: bool) {
        self.model_loads.fetch_add(1, Ordering::Relaxed);
        if fallback {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A load request was answered from cache.
    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A tracking update produced a placement; `gated` marks one held back
    /// below the confidence threshold.
    pub fn tracking_update(&self, gated: bool) {
        self.tracking_updates.fetch_add(1, Ordering::Relaxed);
        if gated {
            self.tracking_gated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A tracking update had no opinion (missing landmarks).
    pub fn tracking_skipped(&self) {
        self.tracking_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            reassessments: self.reassessments.load(Ordering::Relaxed),
            tier_raises: self.tier_raises.load(Ordering::Relaxed),
            tier_drops: self.tier_drops.load(Ordering::Relaxed),
            model_loads: self.model_loads.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            tracking_updates: self.tracking_updates.load(Ordering::Relaxed),
            tracking_gated: self.tracking_gated.load(Ordering::Relaxed),
            tracking_skipped: self.tracking_skipped.load(Ordering::Relaxed),
        }
    }
}
