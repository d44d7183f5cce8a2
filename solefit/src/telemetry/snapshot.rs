//! Point-in-time telemetry copy for display.

use std::fmt;

/// Plain-data snapshot of [`super::EngineMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Frames recorded by the render loop.
    pub frames: u64,
    /// Periodic reassessments run.
    pub reassessments: u64,
    /// Quality tier upgrades applied.
    pub tier_raises: u64,
    /// Quality tier downgrades applied.
    pub tier_drops: u64,
    /// Model load requests resolved (cache misses).
    pub model_loads: u64,
    /// Load requests answered from cache.
    pub cache_hits: u64,
    /// Loads that substituted the fallback geometry.
    pub fallbacks: u64,
    /// Tracking updates that produced a placement.
    pub tracking_updates: u64,
    /// Placements held back below the confidence threshold.
    pub tracking_gated: u64,
    /// Tracking updates with missing landmarks.
    pub tracking_skipped: u64,
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames recorded:    {}", self.frames)?;
        writeln!(
            f,
            "reassessments:      {} ({} up, {} down)",
            self.reassessments, self.tier_raises, self.tier_drops
        )?;
        writeln!(
            f,
            "model loads:        {} ({} cache hits, {} fallbacks)",
            self.model_loads, self.cache_hits, self.fallbacks
        )?;
        write!(
            f,
            "tracking updates:   {} ({} gated, {} skipped)",
            self.tracking_updates, self.tracking_gated, self.tracking_skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_counts() {
        let snapshot = TelemetrySnapshot {
            frames: 120,
            fallbacks: 3,
            ..TelemetrySnapshot::default()
        };
        let text = snapshot.to_string();
        assert!(text.contains("120"));
        assert!(text.contains("3 fallbacks"));
    }
}
