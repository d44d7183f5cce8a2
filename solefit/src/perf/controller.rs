//! The adaptation controller: rolling frame telemetry in, bounded tier
//! transitions out.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::platform::CapabilityProfile;
use crate::quality::QualityTier;
use crate::telemetry::EngineMetrics;

use super::window::FrameWindow;

/// Average frame time above `target * DOWNGRADE_FACTOR` steps the tier down.
pub const DOWNGRADE_FACTOR: f64 = 1.5;

/// Average frame time below `target * UPGRADE_FACTOR` steps the tier up.
pub const UPGRADE_FACTOR: f64 = 0.8;

/// Configuration for the performance controller.
#[derive(Debug, Clone)]
pub struct PerfControllerConfig {
    /// Frame rate the device should sustain.
    pub target_fps: u32,
    /// Number of frame samples in the rolling window.
    pub window_capacity: usize,
    /// Cadence of the periodic reassessment task.
    pub reassess_interval: Duration,
}

impl Default for PerfControllerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            window_capacity: FrameWindow::DEFAULT_CAPACITY,
            reassess_interval: Duration::from_secs(5),
        }
    }
}

impl PerfControllerConfig {
    /// Derive the target frame rate from a capability profile:
    /// 30 fps on phones and tablets, 60 fps on desktops.
    pub fn from_profile(profile: &CapabilityProfile) -> Self {
        Self {
            target_fps: profile.target_fps(),
            ..Self::default()
        }
    }
}

/// Device-adaptive quality controller.
///
/// `record_frame` is called once per rendered frame from the render loop;
/// `reassess` runs off that path, either manually or via the periodic task
/// spawned by [`PerfController::spawn_reassess`]. Tier transitions never
/// skip a step, never fall below [`QualityTier::Low`], and never climb
/// above the ceiling fixed at construction.
pub struct PerfController {
    target_frame: Duration,
    ceiling: QualityTier,
    window: Mutex<FrameWindow>,
    tier_tx: watch::Sender<QualityTier>,
    metrics: Arc<EngineMetrics>,
}

impl PerfController {
    /// Create a controller starting at `initial` with the given ceiling.
    ///
    /// The initial tier is clamped to the ceiling so a misconfigured pair
    /// cannot start above it.
    pub fn new(
        initial: QualityTier,
        ceiling: QualityTier,
        config: PerfControllerConfig,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        let initial = initial.min(ceiling);
        let (tier_tx, _) = watch::channel(initial);
        Self {
            target_frame: Duration::from_secs_f64(1.0 / f64::from(config.target_fps.max(1))),
            ceiling,
            window: Mutex::new(FrameWindow::new(config.window_capacity)),
            tier_tx,
            metrics,
        }
    }

    /// Create a controller from a capability profile.
    ///
    /// The profile supplies the initial tier, the ceiling, and the frame
    /// rate target.
    pub fn from_profile(profile: &CapabilityProfile, metrics: Arc<EngineMetrics>) -> Self {
        Self::new(
            profile.performance_tier,
            profile.tier_ceiling(),
            PerfControllerConfig::from_profile(profile),
            metrics,
        )
    }

    /// Record one rendered frame's duration. O(1), render-loop safe.
    pub fn record_frame(&self, duration: Duration) {
        self.window.lock().push(duration);
        self.metrics.frame_recorded();
    }

    /// Rolling average frame time; the target when no frames were recorded.
    pub fn average_frame_time(&self) -> Duration {
        self.window.lock().average(self.target_frame)
    }

    /// Current frame rate implied by the rolling average.
    pub fn current_fps(&self) -> f64 {
        let avg = self.average_frame_time();
        if avg.is_zero() {
            return f64::from(u32::MAX);
        }
        1.0 / avg.as_secs_f64()
    }

    /// The tier currently in effect.
    pub fn tier(&self) -> QualityTier {
        *self.tier_tx.borrow()
    }

    /// Ceiling fixed at construction.
    pub fn ceiling(&self) -> QualityTier {
        self.ceiling
    }

    /// Subscribe to tier changes.
    ///
    /// The receiver observes the current tier immediately and every change
    /// thereafter; renderer and tracking configuration hang off this.
    pub fn subscribe(&self) -> watch::Receiver<QualityTier> {
        self.tier_tx.subscribe()
    }

    /// Compare the rolling average against the target and move the tier at
    /// most one step.
    ///
    /// Returns the tier in effect after the call.
    pub fn reassess(&self) -> QualityTier {
        self.metrics.reassessed();
        let avg = self.average_frame_time();
        let current = self.tier();

        let next = if avg > self.target_frame.mul_f64(DOWNGRADE_FACTOR) {
            current.step_down()
        } else if avg < self.target_frame.mul_f64(UPGRADE_FACTOR) {
            current.step_up(self.ceiling)
        } else {
            current
        };

        if next != current {
            if next > current {
                self.metrics.tier_raised();
            } else {
                self.metrics.tier_dropped();
            }
            info!(
                from = %current,
                to = %next,
                avg_frame_ms = avg.as_secs_f64() * 1000.0,
                target_ms = self.target_frame.as_secs_f64() * 1000.0,
                "quality tier changed"
            );
            self.tier_tx.send_replace(next);
        } else {
            debug!(
                tier = %current,
                avg_frame_ms = avg.as_secs_f64() * 1000.0,
                "quality tier unchanged"
            );
        }
        next
    }

    /// Spawn the periodic reassessment task.
    ///
    /// Runs until `cancel` fires. Must be called from within a Tokio
    /// runtime. Reassessment never blocks the render loop; it shares state
    /// with `record_frame` only through the short-lived window lock.
    pub fn spawn_reassess(self: Arc<Self>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let controller = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; skip it so the first
            // reassessment sees a full interval of samples.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        controller.reassess();
                    }
                }
            }
            debug!("reassessment task stopped");
        })
    }

    #[cfg(test)]
    fn with_target_fps(target_fps: u32, initial: QualityTier, ceiling: QualityTier) -> Self {
        Self::new(
            initial,
            ceiling,
            PerfControllerConfig {
                target_fps,
                ..PerfControllerConfig::default()
            },
            Arc::new(EngineMetrics::new()),
        )
    }
}
